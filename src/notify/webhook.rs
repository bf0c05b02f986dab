use anyhow::{anyhow, Result};
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::WebhookMap;
use crate::lead::iso_millis;

use super::{event_body, EventSink};

pub struct EventDispatcher {
    map: WebhookMap,
    client: Client,
}

impl EventDispatcher {
    pub fn new(map: WebhookMap) -> Self {
        Self {
            map,
            client: Client::new(),
        }
    }

    pub fn webhooks(&self) -> &WebhookMap {
        &self.map
    }
}

#[async_trait::async_trait]
impl EventSink for EventDispatcher {
    /// Single POST, no retries.
    async fn track(&self, event: &str, payload: &Value, path: &str) -> Result<()> {
        let url = self.map.url_for(event);
        let body = event_body(event, payload, path, iso_millis(Utc::now()));

        match self.client.post(url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(target: "track", event, "event tracked");
                Ok(())
            }
            Ok(resp) => {
                warn!(target: "track", event, status = %resp.status(), "webhook answered non-2xx");
                Err(anyhow!("failed to track event '{event}'"))
            }
            Err(err) => {
                warn!(target: "track", event, %err, "webhook POST failed");
                Err(anyhow!("failed to track event '{event}'"))
            }
        }
    }
}
