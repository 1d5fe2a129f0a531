use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use server_api::{create_or_merge_item, delete_item, list_items, update_item, ApiContext};
use shared::{
    domain::{Item, ItemId, ItemPatch},
    error::{ApiError, ErrorCode},
    protocol::{CreateItemRequest, MergeAction, MergeResponse},
};
use storage::ItemStore;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, prepare_data_file};

const MAX_BODY_BYTES: usize = 64 * 1024;

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let data_file = prepare_data_file(&settings.data_file)?;
    info!(data_file = %data_file.display(), "inventory data file ready");

    let api = ApiContext {
        store: ItemStore::open_file(data_file),
    };
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/items", get(http_list_items).post(http_create_item))
        .route(
            "/api/items/:item_id",
            put(http_update_item).delete(http_delete_item),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_items(State(state): State<Arc<AppState>>) -> Json<Vec<Item>> {
    Json(list_items(&state.api).await)
}

async fn http_create_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateItemRequest>,
) -> ApiResult<(StatusCode, Json<MergeResponse>)> {
    let response = create_or_merge_item(&state.api, req)
        .await
        .map_err(reject)?;
    let status = match response.action {
        MergeAction::Created => StatusCode::CREATED,
        MergeAction::Merged => StatusCode::OK,
    };
    Ok((status, Json(response)))
}

async fn http_update_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
    Json(patch): Json<ItemPatch>,
) -> ApiResult<Json<Item>> {
    let item = update_item(&state.api, ItemId(item_id), patch)
        .await
        .map_err(reject)?;
    Ok(Json(item))
}

async fn http_delete_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> ApiResult<Json<Item>> {
    let item = delete_item(&state.api, ItemId(item_id))
        .await
        .map_err(reject)?;
    Ok(Json(item))
}

fn reject(err: ApiError) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(message = %err.message, "request failed");
    }
    (status, Json(err))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
