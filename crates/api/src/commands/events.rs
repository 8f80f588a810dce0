//! Server-sent stream of master-data change notifications

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};
use smartcon_domain::MasterDataChanged;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

use crate::context::AppContext;

/// One SSE event per change, named after the bus topic.
///
/// A subscriber that lags behind the bus gets a single "everything changed"
/// event so the client refetches all collections.
pub async fn master_data_events(
    State(ctx): State<Arc<AppContext>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = ctx.events.subscribe();
    debug!(subscribers = ctx.events.subscriber_count(), "event stream opened");

    let events = stream::unfold(receiver, |mut receiver| async move {
        let change = match receiver.recv().await {
            Ok(change) => change,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "event stream lagged; asking client to refetch everything");
                MasterDataChanged { workers: true, teams: true, sites: true, companies: true }
            }
            Err(RecvError::Closed) => return None,
        };
        Some((Ok(to_event(&change)), receiver))
    });

    Sse::new(events).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}

fn to_event(change: &MasterDataChanged) -> Event {
    let data = serde_json::to_string(change).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(MasterDataChanged::TOPIC).data(data)
}

