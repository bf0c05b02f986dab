//! Service configuration: the tracking-webhook map and the upstream agent
//! endpoint. TOML file with environment overrides; compiled-in defaults
//! match the production n8n deployment. Loading is best-effort: a missing
//! or malformed file yields the defaults.

use std::collections::HashMap;
use std::{env, fs};

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/service.toml";

pub const ENV_CONFIG_PATH: &str = "SERVICE_CONFIG_PATH";
pub const ENV_AGENT_ENDPOINT: &str = "AGENT_ENDPOINT";

const WEBHOOK_BASE: &str = "https://n8n.srv942917.hstgr.cloud/webhook";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub agent: AgentConfig,
    pub webhooks: WebhookMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: format!("{WEBHOOK_BASE}/diagnostic-agent"),
            timeout_secs: 10,
        }
    }
}

/// Named tracking events → webhook URLs. Unknown event names land on the
/// default lead webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookMap {
    pub default: String,
    pub events: HashMap<String, String>,
}

impl Default for WebhookMap {
    fn default() -> Self {
        let events = [
            ("form_submit_consultation", "consultation-lead"),
            ("diagnostic_lead_captured", "diagnostic-lead"),
            ("whatsapp_button_click", "whatsapp-click"),
            ("hero_cta_click", "hero-cta"),
        ]
        .into_iter()
        .map(|(event, path)| (event.to_string(), format!("{WEBHOOK_BASE}/{path}")))
        .collect();

        Self {
            default: format!("{WEBHOOK_BASE}/new-lead"),
            events,
        }
    }
}

impl WebhookMap {
    pub fn url_for(&self, event: &str) -> &str {
        self.events
            .get(event)
            .map(String::as_str)
            .unwrap_or(&self.default)
    }
}

impl ServiceConfig {
    /// Load from `SERVICE_CONFIG_PATH` (or the default path), then apply
    /// env overrides.
    pub fn load() -> Self {
        let path = env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut cfg = match fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s).unwrap_or_else(|err| {
                warn!(%path, %err, "config file unreadable, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        };

        if let Ok(endpoint) = env::var(ENV_AGENT_ENDPOINT) {
            if !endpoint.is_empty() {
                cfg.agent.endpoint = endpoint;
            }
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_the_known_events() {
        let map = WebhookMap::default();
        assert!(map.url_for("hero_cta_click").ends_with("/hero-cta"));
        assert!(map
            .url_for("diagnostic_lead_captured")
            .ends_with("/diagnostic-lead"));
        // Unknown events fall back to the lead webhook.
        assert!(map.url_for("no_such_event").ends_with("/new-lead"));
        assert!(map.url_for("default_lead").ends_with("/new-lead"));
    }

    #[test]
    fn toml_overrides_individual_urls() {
        let cfg: ServiceConfig = toml::from_str(
            r#"
            [agent]
            enabled = false

            [webhooks]
            default = "https://example.com/hooks/lead"

            [webhooks.events]
            hero_cta_click = "https://example.com/hooks/cta"
            "#,
        )
        .unwrap();

        assert!(!cfg.agent.enabled);
        // Fields not mentioned keep their defaults.
        assert!(cfg.agent.endpoint.ends_with("/diagnostic-agent"));
        assert_eq!(cfg.agent.timeout_secs, 10);
        assert_eq!(cfg.webhooks.url_for("hero_cta_click"), "https://example.com/hooks/cta");
        assert_eq!(cfg.webhooks.url_for("anything"), "https://example.com/hooks/lead");
    }
}
