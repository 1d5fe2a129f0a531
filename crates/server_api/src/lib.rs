use shared::{
    domain::{Item, ItemId, ItemPatch},
    error::{ApiError, ErrorCode},
    protocol::{CreateItemRequest, MergeResponse},
};
use storage::{ItemStore, StoreError};
use tracing::debug;

#[derive(Clone)]
pub struct ApiContext {
    pub store: ItemStore,
}

pub async fn list_items(ctx: &ApiContext) -> Vec<Item> {
    ctx.store.load().await
}

pub async fn create_or_merge_item(
    ctx: &ApiContext,
    request: CreateItemRequest,
) -> Result<MergeResponse, ApiError> {
    let candidate = request
        .into_item()
        .map_err(|message| ApiError::new(ErrorCode::Validation, message))?;
    debug!(id = %candidate.id, "create or merge requested");
    let (action, item) = ctx
        .store
        .create_or_merge(candidate)
        .await
        .map_err(store_error)?;
    Ok(MergeResponse { action, item })
}

pub async fn update_item(
    ctx: &ApiContext,
    item_id: ItemId,
    patch: ItemPatch,
) -> Result<Item, ApiError> {
    ctx.store
        .replace(item_id, patch)
        .await
        .map_err(store_error)
}

pub async fn delete_item(ctx: &ApiContext, item_id: ItemId) -> Result<Item, ApiError> {
    ctx.store.remove(item_id).await.map_err(store_error)
}

fn store_error(err: StoreError) -> ApiError {
    let code = match &err {
        StoreError::Validation(_) => ErrorCode::Validation,
        StoreError::NotFound(_) => ErrorCode::NotFound,
        StoreError::Persistence(_) => ErrorCode::Internal,
    };
    ApiError::new(code, err.to_string())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
