// File: crm-server/src/sse.rs
// Purpose: Server-Sent Events announcing data changes to open pages

use axum::{
    extract::State,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use crm_sync::ChangeEvent;
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;

use crate::state::AppState;

/// SSE handler; every change becomes a `sync` event carrying the change as JSON
pub async fn change_events_handler(State(state): State<AppState>) -> impl IntoResponse {
    Sse::new(create_sse_stream(state.service.subscribe())).keep_alive(KeepAlive::default())
}

/// Create SSE stream from broadcast receiver; lagged gaps are dropped
pub fn create_sse_stream(
    rx: broadcast::Receiver<ChangeEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(change) => {
                let json = serde_json::to_string(&change).ok()?;
                Some(Ok(Event::default().data(json).event("sync")))
            }
            Err(_) => None,
        }
    })
}
