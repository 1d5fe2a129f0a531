use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::{fs, sync::Mutex};

/// Byte store holding the serialized collection. Reads return `None` when
/// nothing has been written yet; writes replace the whole content.
#[async_trait]
pub trait Blob: Send + Sync {
    async fn read(&self) -> Result<Option<Vec<u8>>>;
    async fn write(&self, bytes: &[u8]) -> Result<()>;
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FileBlob {
    path: PathBuf,
}

impl FileBlob {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Blob for FileBlob {
    async fn read(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error)
                .with_context(|| format!("failed to read data file '{}'", self.path.display())),
        }
    }

    async fn write(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).await.with_context(|| {
                format!(
                    "failed to create parent directory '{}' for data file '{}'",
                    parent.display(),
                    self.path.display()
                )
            })?;
        }

        fs::write(&self.path, bytes)
            .await
            .with_context(|| format!("failed to write data file '{}'", self.path.display()))?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Process-local blob. Clones share the same bytes.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlob {
    bytes: Arc<Mutex<Option<Vec<u8>>>>,
}

impl MemoryBlob {
    pub fn with_contents(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Arc::new(Mutex::new(Some(bytes.into()))),
        }
    }

    pub async fn contents(&self) -> Option<Vec<u8>> {
        self.bytes.lock().await.clone()
    }
}

#[async_trait]
impl Blob for MemoryBlob {
    async fn read(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.bytes.lock().await.clone())
    }

    async fn write(&self, bytes: &[u8]) -> Result<()> {
        *self.bytes.lock().await = Some(bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
