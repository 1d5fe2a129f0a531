use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use shared::{
    domain::{Item, ItemId, ItemPatch},
    protocol::{coerce_stored_item, MergeAction},
};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

mod blob;

pub use blob::{Blob, FileBlob, MemoryBlob};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid item: {0}")]
    Validation(String),
    #[error("item {0} not found")]
    NotFound(ItemId),
    #[error("persistence failure: {0:#}")]
    Persistence(anyhow::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Handle on the persisted item collection. Every call re-reads the blob;
/// nothing is cached between calls.
///
/// Mutations run a full load, mutate, save cycle. Clones share one write
/// gate, so mutations issued through the same handle never interleave. Other
/// processes writing the same blob are not coordinated with.
#[derive(Clone)]
pub struct ItemStore {
    blob: Arc<dyn Blob>,
    write_gate: Arc<Mutex<()>>,
}

impl ItemStore {
    pub fn new(blob: impl Blob + 'static) -> Self {
        Self {
            blob: Arc::new(blob),
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn open_file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileBlob::new(path))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryBlob::default())
    }

    pub fn location(&self) -> String {
        self.blob.describe()
    }

    /// Reads the collection. A missing or unreadable blob yields an empty
    /// collection; the failure is only logged. Loosely typed elements are
    /// coerced, and an element that cannot be read at all is skipped with a
    /// warning instead of discarding its neighbours.
    pub async fn load(&self) -> Vec<Item> {
        let bytes = match self.blob.read().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(error) => {
                warn!(
                    location = %self.blob.describe(),
                    error = %format!("{error:#}"),
                    "failed to read item collection; serving it as empty"
                );
                return Vec::new();
            }
        };

        let entries: Vec<serde_json::Value> = match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(error) => {
                warn!(
                    location = %self.blob.describe(),
                    %error,
                    "item collection is not a JSON array; serving it as empty"
                );
                return Vec::new();
            }
        };

        entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match coerce_stored_item(entry) {
                Ok(item) => Some(item),
                Err(reason) => {
                    warn!(
                        location = %self.blob.describe(),
                        index,
                        %reason,
                        "skipping unreadable item entry"
                    );
                    None
                }
            })
            .collect()
    }

    pub async fn save(&self, items: &[Item]) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(items)
            .context("failed to encode item collection")
            .map_err(StoreError::Persistence)?;
        self.blob.write(&bytes).await.map_err(|error| {
            error!(
                location = %self.blob.describe(),
                error = %format!("{error:#}"),
                "failed to persist item collection"
            );
            StoreError::Persistence(error)
        })
    }

    pub async fn get(&self, id: ItemId) -> Option<Item> {
        self.load().await.into_iter().find(|item| item.id == id)
    }

    /// Appends `candidate` when its id is new. Otherwise adds its quantity to
    /// the stored one and overwrites price and category only where the
    /// candidate supplies them.
    pub async fn create_or_merge(&self, candidate: Item) -> StoreResult<(MergeAction, Item)> {
        validate_candidate(&candidate)?;

        let _gate = self.write_gate.lock().await;
        let mut items = self.load().await;
        let (action, stored) = match position_of(&items, candidate.id) {
            Some(index) => {
                let existing = &mut items[index];
                merge_into(existing, candidate)?;
                (MergeAction::Merged, existing.clone())
            }
            None => {
                items.push(candidate.clone());
                (MergeAction::Created, candidate)
            }
        };
        self.save(&items).await?;

        info!(id = %stored.id, ?action, quantity = stored.quantity, "item stored");
        Ok((action, stored))
    }

    pub async fn replace(&self, id: ItemId, patch: ItemPatch) -> StoreResult<Item> {
        let _gate = self.write_gate.lock().await;
        let mut items = self.load().await;
        let index = position_of(&items, id).ok_or(StoreError::NotFound(id))?;
        let updated = patch.apply_to(&items[index]);
        items[index] = updated.clone();
        self.save(&items).await?;

        info!(%id, "item updated");
        Ok(updated)
    }

    pub async fn remove(&self, id: ItemId) -> StoreResult<Item> {
        let _gate = self.write_gate.lock().await;
        let mut items = self.load().await;
        let index = position_of(&items, id).ok_or(StoreError::NotFound(id))?;
        let removed = items.remove(index);
        self.save(&items).await?;

        info!(%id, "item removed");
        Ok(removed)
    }
}

fn validate_candidate(candidate: &Item) -> StoreResult<()> {
    if candidate.id.0 <= 0 {
        return Err(StoreError::Validation(
            "id must be a positive integer".into(),
        ));
    }
    if candidate.name.trim().is_empty() {
        return Err(StoreError::Validation("name must not be empty".into()));
    }
    if !candidate.quantity.is_finite() {
        return Err(StoreError::Validation(
            "quantity must be a finite number".into(),
        ));
    }
    Ok(())
}

fn position_of(items: &[Item], id: ItemId) -> Option<usize> {
    items.iter().position(|item| item.id == id)
}

// The stored name is kept; only quantity accumulates. An overflowing sum
// leaves the stored item untouched.
fn merge_into(existing: &mut Item, candidate: Item) -> StoreResult<()> {
    let quantity = existing.quantity + candidate.quantity;
    if !quantity.is_finite() {
        return Err(StoreError::Validation(
            "merged quantity is out of range".into(),
        ));
    }
    existing.quantity = quantity;
    if candidate.price.is_some() {
        existing.price = candidate.price;
    }
    if candidate.category.is_some() {
        existing.category = candidate.category;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
