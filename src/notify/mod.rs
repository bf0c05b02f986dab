//! Tracking-event webhooks: named event → URL with a default fallback,
//! fire-and-forget POSTs. The caller learns success or failure, never the
//! cause; causes go to the log.

mod webhook;

pub use webhook::EventDispatcher;

use std::sync::Arc;

use anyhow::Result;
use serde::Deserialize;
use serde_json::Value;

/// One tracked site event, as received from the front end.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackRequest {
    pub event: String,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub path: String,
}

/// Seam for handlers and tests; the production sink is [`EventDispatcher`].
#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    async fn track(&self, event: &str, payload: &Value, path: &str) -> Result<()>;
}

pub type DynEventSink = Arc<dyn EventSink>;

/// Wire body of a tracking POST: `{...payload, event, timestamp, path}`.
/// The three reserved keys win on collision; a non-object payload
/// contributes nothing.
pub fn event_body(event: &str, payload: &Value, path: &str, timestamp: String) -> Value {
    let mut body = match payload {
        Value::Object(map) => map.clone(),
        _ => serde_json::Map::new(),
    };
    body.insert("event".to_string(), Value::String(event.to_string()));
    body.insert("timestamp".to_string(), Value::String(timestamp));
    body.insert("path".to_string(), Value::String(path.to_string()));
    Value::Object(body)
}
