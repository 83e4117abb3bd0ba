use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::console::catalog::{CatalogTab, CatalogView};
use crate::errors::AppError;
use crate::handlers::auth::check_auth;
use crate::handlers::SortRequest;
use crate::models::RecordId;
use crate::services::projection::CatalogSortKey;
use crate::state::AppState;

// GET /api/catalog
pub async fn get_catalog(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CatalogView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    Ok(Json(state.catalog.view()))
}

// POST /api/catalog/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CatalogView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.catalog.refresh().await;
    Ok(Json(state.catalog.view()))
}

// POST /api/catalog/tab
#[derive(Debug, Deserialize)]
pub struct TabRequest {
    pub tab: CatalogTab,
}

pub async fn set_tab(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<TabRequest>,
) -> Result<Json<CatalogView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.catalog.set_tab(req.tab);
    Ok(Json(state.catalog.view()))
}

// POST /api/catalog/compose
pub async fn compose(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CatalogView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.catalog.compose();
    Ok(Json(state.catalog.view()))
}

// POST /api/catalog/edit/:id
pub async fn edit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CatalogView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.catalog.edit(&RecordId::from(id))?;
    Ok(Json(state.catalog.view()))
}

// POST /api/catalog/cancel
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CatalogView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.catalog.cancel();
    Ok(Json(state.catalog.view()))
}

// PUT /api/catalog/draft
pub async fn set_draft(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(fields): Json<serde_json::Value>,
) -> Result<Json<CatalogView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.catalog.set_draft(fields)?;
    Ok(Json(state.catalog.view()))
}

// POST /api/catalog/submit
pub async fn submit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<CatalogView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.catalog.submit().await?;
    Ok(Json(state.catalog.view()))
}

// DELETE /api/catalog/items/:id
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<CatalogView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.catalog.delete(&RecordId::from(id)).await;
    Ok(Json(state.catalog.view()))
}

// POST /api/catalog/sort
pub async fn sort(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SortRequest<CatalogSortKey>>,
) -> Result<Json<CatalogView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.catalog.request_sort(req.key)?;
    Ok(Json(state.catalog.view()))
}
