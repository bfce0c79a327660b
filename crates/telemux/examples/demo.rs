// SPDX-License-Identifier: MIT
//
// Drives the full facade surface against the recording vendor SDK, the
// same shape a host application would use on a real platform: two
// independently-configured instances, events, profile pushes, identifier
// retrieval, notification routing, and lifecycle fanout.
//
// Run with `cargo run -p telemux --example demo`.

use serde_json::json;
use telemux::{BridgeConfig, NativeBridge, Telemux};
use telemux_vendor::recording::RecordingSdk;

fn props(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(m) => m,
        _ => unreachable!("demo payloads are objects"),
    }
}

#[tokio::main]
async fn main() -> telemux::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let sdk = RecordingSdk::new();
    let config = BridgeConfig {
        default_instance: Some("dashboard1".into()),
        debug_logging: true,
        ..BridgeConfig::default()
    };
    let mux = Telemux::with_bridge(Box::new(NativeBridge::new(sdk.clone(), config.clone())), config);

    // Two dashboards with separate credentials; the second omits its
    // region and picks up the configured default.
    mux.init_instance("dashboard1", "TEST-865-ZRW-7K7Z", "TEST-021-56b", Some("eu1")).await?;
    mux.init_instance("dashboard2", "TEST-K5K-895-ZR6Z", "TEST-4c5-6a2", None).await?;

    mux.push_app_launched_event("dashboard1");
    mux.push_event(
        "dashboard1",
        "Product Viewed",
        Some(&props(json!({"Name": "Running Shoes", "Price": 129.5, "In Stock": true}))),
    );
    mux.push_screen_viewed_event("dashboard2", "Checkout");

    mux.push_profile(
        "dashboard1",
        &props(json!({
            "Identity": "user-1001",
            "Name": "Jo Smith",
            "Email": "jo@example.com",
            "DOB": "1992-12-22T06:35:31",
        })),
    );

    let id1 = mux.clevertap_id("dashboard1").await?;
    let id2 = mux.clevertap_id("dashboard2").await?;
    tracing::info!(%id1, %id2, "instance identifiers");

    // Payload from a viewed push notification, routed to the default
    // instance.
    mux.record_notification_viewed(&props(json!({"wzrk_id": "demo-push-1"})));

    // Host lifecycle transitions fan out to every live instance.
    if let Some(lifecycle) = mux.lifecycle() {
        lifecycle.activity_resumed();
        lifecycle.activity_paused();
    }

    for (index, config) in sdk.created_configs().iter().enumerate() {
        let spy = sdk.instance(index).expect("constructed instance");
        tracing::info!(
            account = %config.account_id,
            region = %config.region,
            events = ?spy.event_names(),
            profiles = spy.profiles().len(),
            notifications = spy.notifications().len(),
            "instance activity"
        );
    }

    Ok(())
}
