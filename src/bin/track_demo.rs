//! Demo that fires a few tracking events through the dispatcher (log only
//! when the webhook endpoints are unreachable).

use lead_diagnostic_service::config::ServiceConfig;
use lead_diagnostic_service::notify::{EventDispatcher, EventSink};
use serde_json::json;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).init();
    let config = ServiceConfig::load();
    let dispatcher = EventDispatcher::new(config.webhooks.clone());

    let events = [
        ("hero_cta_click", json!({})),
        ("whatsapp_button_click", json!({ "label": "header" })),
        (
            "form_submit_consultation",
            json!({ "name": "demo", "email": "demo@example.com", "phone": "000" }),
        ),
    ];

    for (event, payload) in events {
        if let Err(err) = dispatcher.track(event, &payload, "/").await {
            eprintln!("{event}: {err}");
        }
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
    }

    println!("track-demo done");
}
