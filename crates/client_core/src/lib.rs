use reqwest::{Client, Response, StatusCode};
use shared::{
    domain::{Item, ItemId, ItemPatch},
    error::{ApiError, ApiException, ErrorCode},
    protocol::MergeResponse,
    view::{self, Kpis, SortKey},
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod form;

pub use form::{format_money, FormError, ItemForm};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("item not found: {0}")]
    NotFound(String),
    #[error("item rejected: {0}")]
    Rejected(String),
    #[error("server error: {0}")]
    Api(ApiException),
}

impl From<ApiException> for ClientError {
    fn from(err: ApiException) -> Self {
        match err.code {
            ErrorCode::NotFound => Self::NotFound(err.message),
            ErrorCode::Validation => Self::Rejected(err.message),
            ErrorCode::Internal => Self::Api(err),
        }
    }
}

impl ClientError {
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::NotFound(_) => Some(ErrorCode::NotFound),
            Self::Rejected(_) => Some(ErrorCode::Validation),
            Self::Api(err) => Some(err.code),
            Self::InvalidUrl(_) | Self::Http(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// What a screen shows: the visible rows plus KPIs over the whole inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    pub rows: Vec<Item>,
    pub kpis: Kpis,
}

#[derive(Clone)]
pub struct InventoryClient {
    http: Client,
    base_url: Url,
}

impl InventoryClient {
    pub fn new(server_url: &str) -> ClientResult<Self> {
        let mut base_url = Url::parse(server_url.trim())?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn list_items(&self) -> ClientResult<Vec<Item>> {
        let response = self.http.get(self.items_url()?).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create_or_merge(&self, item: &Item) -> ClientResult<MergeResponse> {
        let response = self
            .http
            .post(self.items_url()?)
            .json(item)
            .send()
            .await?;
        let body: MergeResponse = check(response).await?.json().await?;
        debug!(id = %body.item.id, action = ?body.action, "item posted");
        Ok(body)
    }

    pub async fn update_item(&self, item_id: ItemId, patch: &ItemPatch) -> ClientResult<Item> {
        let response = self
            .http
            .put(self.item_url(item_id)?)
            .json(patch)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete_item(&self, item_id: ItemId) -> ClientResult<Item> {
        let response = self.http.delete(self.item_url(item_id)?).send().await?;
        Ok(check(response).await?.json().await?)
    }

    /// The API has no single-item read; this scans the listing.
    pub async fn find_item(&self, item_id: ItemId) -> ClientResult<Option<Item>> {
        Ok(self
            .list_items()
            .await?
            .into_iter()
            .find(|item| item.id == item_id))
    }

    pub async fn snapshot(&self, query: &str, key: SortKey) -> ClientResult<InventorySnapshot> {
        let items = self.list_items().await?;
        Ok(InventorySnapshot {
            rows: view::project(&items, query, key),
            kpis: view::aggregate(&items),
        })
    }

    fn items_url(&self) -> ClientResult<Url> {
        Ok(self.base_url.join("api/items")?)
    }

    fn item_url(&self, item_id: ItemId) -> ClientResult<Url> {
        Ok(self.base_url.join(&format!("api/items/{item_id}"))?)
    }
}

async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.bytes().await?;
    let err = serde_json::from_slice::<ApiError>(&body)
        .map(ApiException::from)
        .unwrap_or_else(|_| {
            ApiException::new(
                code_for_status(status),
                format!("server responded with {status}"),
            )
        });
    Err(err.into())
}

fn code_for_status(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        status if status.is_client_error() => ErrorCode::Validation,
        _ => ErrorCode::Internal,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
