use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use crate::console::bookings::BookingsView;
use crate::errors::AppError;
use crate::handlers::auth::check_auth;
use crate::handlers::SortRequest;
use crate::services::projection::{BookingSortKey, MonthGrid};
use crate::state::AppState;

// GET /api/bookings
pub async fn get_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BookingsView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    Ok(Json(state.bookings.view()))
}

// POST /api/bookings/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<BookingsView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.bookings.refresh().await;
    Ok(Json(state.bookings.view()))
}

// POST /api/bookings/sort
pub async fn sort(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SortRequest<BookingSortKey>>,
) -> Result<Json<BookingsView>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.bookings.request_sort(req.key);
    Ok(Json(state.bookings.view()))
}

// GET /api/bookings/calendar
pub async fn calendar(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MonthGrid>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    month_grid(&state)
}

// POST /api/bookings/calendar/prev
pub async fn calendar_prev(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MonthGrid>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.bookings.shift_month(-1);
    month_grid(&state)
}

// POST /api/bookings/calendar/next
pub async fn calendar_next(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<MonthGrid>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    state.bookings.shift_month(1);
    month_grid(&state)
}

fn month_grid(state: &AppState) -> Result<Json<MonthGrid>, AppError> {
    let today = chrono::Local::now().date_naive();
    state
        .bookings
        .month_grid(today)
        .map(Json)
        .ok_or_else(|| AppError::Invalid("calendar month out of range".to_string()))
}
