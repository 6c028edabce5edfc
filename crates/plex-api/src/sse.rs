//! Server-sent event connections
//!
//! Each open `GET /sse` stream owns an unbounded queue. Responses posted to
//! `POST /sse` are fanned out to every queue.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::Event;
use dashmap::DashMap;
use futures::stream::{self, Stream, StreamExt};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

/// Data of the event sent after `sse_keepalive_secs` without traffic
pub const KEEPALIVE_DATA: &str = "keepalive";

/// Registry of open SSE connections
#[derive(Default)]
pub struct SseConnections {
    senders: DashMap<Uuid, mpsc::UnboundedSender<Value>>,
}

impl SseConnections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection and return its id and message queue
    pub fn open(&self) -> (Uuid, mpsc::UnboundedReceiver<Value>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.insert(id, tx);
        info!("New SSE connection: {}", id);
        (id, rx)
    }

    pub fn close(&self, id: &Uuid) {
        if self.senders.remove(id).is_some() {
            info!("SSE connection closed: {}", id);
        }
    }

    /// Queue `message` on every open connection; returns how many accepted it
    pub fn broadcast(&self, message: &Value) -> usize {
        let mut delivered = 0;
        for entry in self.senders.iter() {
            match entry.value().send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => debug!("SSE connection {} is gone", entry.key()),
            }
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }
}

/// Removes the connection from the registry when the stream is dropped
struct ConnectionGuard {
    id: Uuid,
    connections: Arc<SseConnections>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.connections.close(&self.id);
    }
}

/// The `notifications/initialized` message that opens every stream
pub fn initialized_notification() -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": "notifications/initialized",
        "params": {},
    })
}

/// Open a connection and build its event stream
pub fn event_stream(
    connections: Arc<SseConnections>,
    keepalive: Duration,
) -> impl Stream<Item = Result<Event, Infallible>> + Send + 'static {
    let (id, rx) = connections.open();
    let guard = ConnectionGuard { id, connections };

    let first = stream::once(async {
        Ok(Event::default().data(initialized_notification().to_string()))
    });

    let queued = stream::unfold((rx, guard), move |(mut rx, guard)| async move {
        let event = match tokio::time::timeout(keepalive, rx.recv()).await {
            Ok(Some(message)) => Event::default().data(message.to_string()),
            Ok(None) => return None,
            Err(_) => Event::default().data(KEEPALIVE_DATA),
        };
        Some((Ok(event), (rx, guard)))
    });

    first.chain(queued)
}
