use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use serde::Deserialize;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::errors::AppError;
use crate::handlers::auth::{check_auth, check_token};
use crate::services::notify::Notice;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NoticeQuery {
    pub since: Option<u64>,
}

// GET /api/notices
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<NoticeQuery>,
) -> Result<Json<Vec<Notice>>, AppError> {
    check_auth(&headers, &state.config.console_token)?;
    Ok(Json(state.notices.since(query.since.unwrap_or(0))))
}

// GET /api/notices/stream (SSE)
#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub token: Option<String>,
    pub last_id: Option<u64>,
}

fn notice_event(notice: &Notice) -> Event {
    let data = serde_json::to_string(notice).unwrap_or_default();
    Event::default()
        .id(notice.id.to_string())
        .event("notice")
        .data(data)
}

pub async fn stream(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>>, AppError> {
    // EventSource cannot set headers, so the token may come in the query
    if query.token.is_some() {
        check_token(query.token.as_deref(), &state.config.console_token)?;
    } else {
        check_auth(&headers, &state.config.console_token)?;
    }

    // Subscribe before reading the backlog so nothing falls in between
    let rx = state.notices.subscribe();
    let backlog = state.notices.since(query.last_id.unwrap_or(0));
    let seen = backlog.last().map(|n| n.id).unwrap_or(0);

    let catchup = tokio_stream::iter(
        backlog
            .into_iter()
            .map(|notice| Ok::<_, Infallible>(notice_event(&notice))),
    );

    let live = BroadcastStream::new(rx).filter_map(move |result| match result {
        Ok(notice) if notice.id > seen => Some(Ok(notice_event(&notice))),
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "notice stream lagged");
            None
        }
    });

    Ok(Sse::new(catchup.chain(live)).keep_alive(KeepAlive::default()))
}
