//! 变更事件推送 (Server-Sent Events)
//!
//! `GET /api/events?restaurant_id=1`
//!
//! 每个已提交的 [`ChangeEvent`] 以一条 SSE 消息推送，`event` 字段为事件类型。
//! 订阅者处理过慢时跳过落后的事件，不影响业务操作。

use axum::{
    Router,
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::Stream;
use serde::Deserialize;
use shared::message::ChangeEvent;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/events", get(stream))
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub restaurant_id: Option<i64>,
}

async fn stream(
    State(state): State<ServerState>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let rx = state.notifier.subscribe();
    tracing::debug!(restaurant_id = ?query.restaurant_id, "SSE subscriber connected");
    Sse::new(event_stream(rx, query.restaurant_id)).keep_alive(KeepAlive::default())
}

fn event_stream(
    rx: broadcast::Receiver<ChangeEvent>,
    restaurant_id: Option<i64>,
) -> impl Stream<Item = Result<Event, axum::Error>> {
    futures::stream::unfold(rx, move |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if restaurant_id.is_some_and(|id| id != event.restaurant_id) {
                        continue;
                    }
                    let sse = Event::default()
                        .event(event.event_type.as_str())
                        .id(event.event_id.to_string())
                        .json_data(&event);
                    return Some((sse, rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "SSE subscriber lagging, events skipped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}
