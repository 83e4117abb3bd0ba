use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::console::waitlist::{TimeEdit, WaitlistView};
use crate::errors::AppError;
use crate::handlers::auth::check_auth;
use crate::handlers::SortRequest;
use crate::models::RecordId;
use crate::services::projection::{StoreFilter, WaitlistSortKey};
use crate::state::AppState;

// GET /api/waitlist
pub async fn get_waitlist(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<WaitlistView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    Ok(Json(state.waitlist.view()))
}

// POST /api/waitlist/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<WaitlistView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.waitlist.refresh().await;
    Ok(Json(state.waitlist.view()))
}

// POST /api/waitlist/select
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub date: Option<NaiveDate>,
    pub store: Option<StoreFilter>,
}

pub async fn select(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SelectRequest>,
) -> Result<Json<WaitlistView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    if let Some(date) = req.date {
        state.waitlist.select_date(date);
    }
    if let Some(store) = req.store {
        state.waitlist.select_store(store);
    }
    Ok(Json(state.waitlist.view()))
}

// POST /api/waitlist/sort
pub async fn sort(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SortRequest<WaitlistSortKey>>,
) -> Result<Json<WaitlistView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.waitlist.request_sort(req.key);
    Ok(Json(state.waitlist.view()))
}

// POST /api/waitlist/:id/edit
pub async fn begin_edit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<TimeEdit>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    let edit = state.waitlist.begin_time_edit(&RecordId::from(id))?;
    Ok(Json(edit))
}

// POST /api/waitlist/:id/cancel
pub async fn cancel_edit(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(_id): Path<String>,
) -> Result<Json<WaitlistView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.waitlist.cancel_time_edit();
    Ok(Json(state.waitlist.view()))
}

// PUT /api/waitlist/:id/time
#[derive(Debug, Deserialize)]
pub struct TimeRequest {
    pub start_time: String,
    pub end_time: String,
}

pub async fn save_time(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(req): Json<TimeRequest>,
) -> Result<Json<WaitlistView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;

    let start_time = req.start_time.trim();
    let end_time = req.end_time.trim();
    if start_time.is_empty() || end_time.is_empty() {
        return Err(AppError::Invalid(
            "start_time and end_time are required".to_string(),
        ));
    }

    state
        .waitlist
        .save_time(&RecordId::from(id), start_time, end_time)
        .await;
    Ok(Json(state.waitlist.view()))
}
