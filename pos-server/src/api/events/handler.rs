//! SSE handler
//!
//! Each bus message becomes one SSE event whose name is the event type
//! (`notification` / `sync`) and whose data is the JSON payload. A
//! subscriber that falls behind receives a `sync` event carrying the
//! number of missed messages and should refetch its view.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream};
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::message::{BusMessage, SyncPayload, TableSubscription};

const KEEP_ALIVE_SECS: u64 = 15;

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    pub table: Option<u32>,
}

enum Source {
    All(broadcast::Receiver<BusMessage>),
    Table(TableSubscription),
}

impl Source {
    async fn recv(&mut self) -> Result<BusMessage, RecvError> {
        match self {
            Source::All(rx) => rx.recv().await,
            Source::Table(sub) => sub.recv().await,
        }
    }
}

/// GET /api/events
pub async fn stream(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<EventsQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let source = match query.table {
        Some(n) => Source::Table(state.message_bus.subscribe_table(n)),
        None => Source::All(state.message_bus.subscribe()),
    };
    tracing::debug!(
        user = %user.username,
        table = ?query.table,
        "Event stream opened"
    );

    let shutdown = state.message_bus.shutdown_token().clone();
    Sse::new(event_stream(source, shutdown))
        .keep_alive(KeepAlive::new().interval(Duration::from_secs(KEEP_ALIVE_SECS)))
}

fn event_stream(
    source: Source,
    shutdown: CancellationToken,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold((source, shutdown), |(mut source, shutdown)| async move {
        loop {
            let msg = next_message(&mut source, &shutdown).await?;
            if let Some(event) = to_sse_event(&msg) {
                return Some((Ok(event), (source, shutdown)));
            }
        }
    })
}

/// Next message for the subscriber, `None` once the stream should end
///
/// A lagged receiver yields a `Sync` message carrying the missed count.
async fn next_message(source: &mut Source, shutdown: &CancellationToken) -> Option<BusMessage> {
    loop {
        let received = tokio::select! {
            _ = shutdown.cancelled() => return None,
            r = source.recv() => r,
        };

        match received {
            Ok(msg) => return Some(msg),
            Err(RecvError::Lagged(missed)) => {
                tracing::warn!(missed, "Event subscriber lagged, sending sync");
                match BusMessage::sync(&SyncPayload { missed }) {
                    Ok(msg) => return Some(msg),
                    Err(e) => tracing::error!("Failed to encode sync payload: {}", e),
                }
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

fn to_sse_event(msg: &BusMessage) -> Option<Event> {
    match std::str::from_utf8(&msg.payload) {
        Ok(data) => Some(
            Event::default()
                .event(msg.event_type.to_string())
                .id(msg.request_id.to_string())
                .data(data),
        ),
        Err(e) => {
            tracing::error!(request_id = %msg.request_id, "Non-UTF8 bus payload: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageBus;
    use futures::StreamExt;
    use shared::message::{EventType, LifecycleAction, LifecycleEvent, Resource};

    #[tokio::test]
    async fn test_stream_ends_on_shutdown() {
        let bus = MessageBus::new();
        let source = Source::All(bus.subscribe());
        let stream = event_stream(source, bus.shutdown_token().clone());
        futures::pin_mut!(stream);

        bus.notify(Resource::Table, LifecycleAction::Occupied, 1, 1);
        assert!(stream.next().await.is_some());

        bus.shutdown();
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_lagged_subscriber_gets_sync() {
        let bus = MessageBus::with_capacity(2);
        let mut source = Source::All(bus.subscribe());
        for i in 0..5 {
            bus.notify(Resource::Order, LifecycleAction::Placed, 1, i);
        }
        let shutdown = bus.shutdown_token().clone();

        // First message after overflow is the sync signal
        let first = next_message(&mut source, &shutdown).await.unwrap();
        assert_eq!(first.event_type, EventType::Sync);
        let sync: SyncPayload = first.parse_payload().unwrap();
        assert_eq!(sync.missed, 3);

        // Then the retained notifications resume
        let next = next_message(&mut source, &shutdown).await.unwrap();
        assert_eq!(next.event_type, EventType::Notification);
        let event: LifecycleEvent = next.parse_payload().unwrap();
        assert_eq!(event.id, 3);
    }

    #[tokio::test]
    async fn test_table_source_passes_sync_through() {
        let bus = MessageBus::with_capacity(1);
        let mut source = Source::Table(bus.subscribe_table(2));
        bus.notify(Resource::Order, LifecycleAction::Placed, 9, 1);
        bus.notify(Resource::Order, LifecycleAction::Placed, 9, 2);
        let shutdown = bus.shutdown_token().clone();

        let first = next_message(&mut source, &shutdown).await.unwrap();
        assert_eq!(first.event_type, EventType::Sync);
    }

    #[test]
    fn test_non_utf8_payload_is_dropped() {
        let msg = BusMessage::new(EventType::Notification, vec![0xff, 0xfe]);
        assert!(to_sse_event(&msg).is_none());
    }
}
