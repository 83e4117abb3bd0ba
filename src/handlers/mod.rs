pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod health;
pub mod notices;
pub mod waitlist;

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SortRequest<K> {
    pub key: K,
}

/// Console API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/bookings", get(bookings::get_bookings))
        .route("/api/bookings/refresh", post(bookings::refresh))
        .route("/api/bookings/sort", post(bookings::sort))
        .route("/api/bookings/calendar", get(bookings::calendar))
        .route("/api/bookings/calendar/prev", post(bookings::calendar_prev))
        .route("/api/bookings/calendar/next", post(bookings::calendar_next))
        .route("/api/waitlist", get(waitlist::get_waitlist))
        .route("/api/waitlist/refresh", post(waitlist::refresh))
        .route("/api/waitlist/select", post(waitlist::select))
        .route("/api/waitlist/sort", post(waitlist::sort))
        .route("/api/waitlist/:id/edit", post(waitlist::begin_edit))
        .route("/api/waitlist/:id/cancel", post(waitlist::cancel_edit))
        .route("/api/waitlist/:id/time", put(waitlist::save_time))
        .route("/api/catalog", get(catalog::get_catalog))
        .route("/api/catalog/refresh", post(catalog::refresh))
        .route("/api/catalog/tab", post(catalog::set_tab))
        .route("/api/catalog/compose", post(catalog::compose))
        .route("/api/catalog/edit/:id", post(catalog::edit))
        .route("/api/catalog/cancel", post(catalog::cancel))
        .route("/api/catalog/draft", put(catalog::set_draft))
        .route("/api/catalog/submit", post(catalog::submit))
        .route(
            "/api/catalog/items/:id",
            axum::routing::delete(catalog::delete_item),
        )
        .route("/api/catalog/sort", post(catalog::sort))
        .route("/api/notices", get(notices::list))
        .route("/api/notices/stream", get(notices::stream))
        .with_state(state)
}
