//! Diagnostic-agent adapter: the seam between this service and the
//! upstream AI workflow that drafts automation proposals.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tracing::warn;

use crate::config::AgentConfig;
use crate::lead::Lead;
use crate::normalize::AgentOutput;

/// Trait object used elsewhere in the app (handlers/tests).
pub trait AgentClient: Send + Sync {
    /// Ask the upstream agent to draft a diagnostic for one lead.
    ///
    /// `None` means the agent was unreachable or answered with something
    /// the adapter could not even deserialize; the normalizer turns that
    /// into the canned fallback, so callers never branch on it.
    fn diagnose<'a>(
        &'a self,
        lead: &'a Lead,
    ) -> Pin<Box<dyn Future<Output = Option<AgentOutput>> + Send + 'a>>;
    /// Provider name for diagnostics/headers.
    fn provider_name(&self) -> &'static str;
}

/// Convenient alias used by callers.
pub type DynAgentClient = Arc<dyn AgentClient>;

/// Factory: build a client according to config and environment variables.
///
/// * If `AGENT_TEST_MODE=mock`, returns a deterministic mock client.
/// * Else if `config.enabled==false`, returns a disabled client.
/// * Else builds the webhook-backed agent.
pub fn build_client_from_config(config: &AgentConfig) -> DynAgentClient {
    if std::env::var("AGENT_TEST_MODE")
        .map(|v| v == "mock")
        .unwrap_or(false)
    {
        return Arc::new(MockAgent::default());
    }

    if !config.enabled {
        return Arc::new(DisabledAgent);
    }

    Arc::new(WebhookAgent::new(config))
}

/// Returns `None` always; used when the agent integration is switched off.
pub struct DisabledAgent;

impl AgentClient for DisabledAgent {
    fn diagnose<'a>(
        &'a self,
        _lead: &'a Lead,
    ) -> Pin<Box<dyn Future<Output = Option<AgentOutput>> + Send + 'a>> {
        Box::pin(async { None })
    }
    fn provider_name(&self) -> &'static str {
        "disabled"
    }
}

/// Fixed output for tests/local runs. The draft is fenced the way real
/// models tend to answer even when told to return bare JSON.
#[derive(Clone)]
pub struct MockAgent {
    pub fixed: AgentOutput,
}

impl Default for MockAgent {
    fn default() -> Self {
        let draft = json!({
            "title": "אוטומציה לדוגמה",
            "steps": [{ "name": "חיבור המערכות", "tool": "n8n" }],
            "valueProposition": "חיסכון בזמן"
        });
        Self {
            fixed: AgentOutput::from_output(format!("```json\n{draft}\n```")),
        }
    }
}

impl AgentClient for MockAgent {
    fn diagnose<'a>(
        &'a self,
        _lead: &'a Lead,
    ) -> Pin<Box<dyn Future<Output = Option<AgentOutput>> + Send + 'a>> {
        let out = self.fixed.clone();
        Box::pin(async move { Some(out) })
    }
    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Posts the lead to the configured workflow endpoint and deserializes the
/// reply. Any transport failure or non-2xx status yields `None`.
pub struct WebhookAgent {
    http: reqwest::Client,
    endpoint: String,
}

impl WebhookAgent {
    pub fn new(config: &AgentConfig) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("lead-diagnostic-service/0.1")
            .connect_timeout(Duration::from_secs(4))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("reqwest client");
        Self {
            http,
            endpoint: config.endpoint.clone(),
        }
    }
}

impl AgentClient for WebhookAgent {
    fn diagnose<'a>(
        &'a self,
        lead: &'a Lead,
    ) -> Pin<Box<dyn Future<Output = Option<AgentOutput>> + Send + 'a>> {
        Box::pin(async move {
            if self.endpoint.is_empty() {
                return None;
            }

            let resp = match self.http.post(&self.endpoint).json(lead).send().await {
                Ok(r) => r,
                Err(err) => {
                    warn!(target: "agent", %err, "agent endpoint unreachable");
                    return None;
                }
            };
            if !resp.status().is_success() {
                warn!(target: "agent", status = %resp.status(), "agent endpoint answered non-2xx");
                return None;
            }
            resp.json::<AgentOutput>().await.ok()
        })
    }
    fn provider_name(&self) -> &'static str {
        "webhook"
    }
}
