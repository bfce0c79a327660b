// SPDX-License-Identifier: MIT

//! Telemux — multi-instance analytics bridge facade.
//!
//! One application process can drive several independently-configured
//! analytics SDK instances side-by-side. Application code talks to
//! [`Telemux`], which routes every operation to the instance registered
//! under the caller-chosen name; the backing implementation (mobile
//! native, web, or desktop stub) is selected once at construction and
//! never re-selected.
//!
//! ```no_run
//! # async fn run() -> telemux::Result<()> {
//! use telemux::{BridgeConfig, Telemux};
//!
//! let mux = Telemux::new(BridgeConfig::default());
//! mux.init_instance("dashboard1", "TEST-865-ZRW-7K7Z", "TEST-021-56b", Some("eu1")).await?;
//! mux.push_event("dashboard1", "Product Viewed", None);
//! let id = mux.clevertap_id("dashboard1").await?;
//! # let _ = id;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use serde_json::{Map, Value};

pub use telemux_bridge::{AnalyticsBridge, InstanceLifecycle, InstanceRegistry, NativeBridge};
pub use telemux_core::error::{Result, TelemuxError};
pub use telemux_core::{
    events, profile, BridgeConfig, EventRecord, InstanceConfig, ProfileRecord, PropMap, PropValue,
};
#[cfg(target_arch = "wasm32")]
pub use telemux_web::WebBridge;

/// Selects the bridge implementation for the current platform.
///
/// Mobile targets get the registry-backed native bridge over the vendor
/// SDK; wasm gets the web fallback over the page-global browser SDK;
/// anything else gets the native bridge over the stub SDK, whose
/// initializations fail fast with `PLATFORM_UNAVAILABLE`.
fn platform_bridge(config: &BridgeConfig) -> Box<dyn AnalyticsBridge> {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = config;
        Box::new(WebBridge::from_global())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Box::new(NativeBridge::new(telemux_vendor::platform_sdk(), config.clone()))
    }
}

/// The single cross-platform contract application code calls against.
///
/// Construct one `Telemux` at startup and pass it by reference; the
/// facade holds no ambient global state, so tests can build as many
/// independent instances (with fresh registries) as they need.
pub struct Telemux {
    bridge: Box<dyn AnalyticsBridge>,
    config: BridgeConfig,
}

impl Telemux {
    /// Facade over the implementation for the current platform.
    pub fn new(config: BridgeConfig) -> Self {
        let bridge = platform_bridge(&config);
        tracing::info!(platform = bridge.platform_name(), "analytics bridge selected");
        Self { bridge, config }
    }

    /// Facade over a caller-supplied bridge (embedding, tests).
    pub fn with_bridge(bridge: Box<dyn AnalyticsBridge>, config: BridgeConfig) -> Self {
        Self { bridge, config }
    }

    pub fn platform_name(&self) -> &str {
        self.bridge.platform_name()
    }

    /// Initialize (or replace) the analytics instance registered under
    /// `name`. A missing `region` falls back to the configured default.
    pub async fn init_instance(
        &self,
        name: &str,
        account_id: &str,
        token: &str,
        region: Option<&str>,
    ) -> Result<bool> {
        let region = region.unwrap_or(&self.config.default_region);
        let config = InstanceConfig::new(account_id, token, region);
        self.bridge.init_instance(name, &config).await
    }

    /// Record an event on the named instance. Fire-and-forget.
    pub fn push_event(&self, name: &str, event: &str, props: Option<&Map<String, Value>>) {
        self.bridge.push_event(name, event, props);
    }

    /// Push a profile update to the named instance. Fire-and-forget.
    pub fn push_profile(&self, name: &str, profile: &Map<String, Value>) {
        self.bridge.push_profile(name, profile);
    }

    /// The named instance's persistent identifier.
    pub async fn clevertap_id(&self, name: &str) -> Result<String> {
        self.bridge.clevertap_id(name).await
    }

    pub fn push_app_launched_event(&self, name: &str) {
        self.bridge.push_app_launched_event(name);
    }

    pub fn push_screen_viewed_event(&self, name: &str, screen_name: &str) {
        self.bridge.push_screen_viewed_event(name, screen_name);
    }

    /// Record a notification-viewed payload against the default instance.
    pub fn record_notification_viewed(&self, payload: &Map<String, Value>) {
        self.bridge.record_notification_viewed(payload);
    }

    /// Lifecycle hook for the host application to wire once at startup.
    pub fn lifecycle(&self) -> Option<Arc<dyn InstanceLifecycle>> {
        self.bridge.lifecycle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use telemux_vendor::recording::RecordingSdk;

    fn facade_with(config: BridgeConfig) -> (Arc<RecordingSdk>, Telemux) {
        let sdk = RecordingSdk::new();
        let bridge = NativeBridge::new(sdk.clone(), config.clone());
        (sdk, Telemux::with_bridge(Box::new(bridge), config))
    }

    fn props(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn missing_region_falls_back_to_default() {
        let (sdk, mux) = facade_with(BridgeConfig::default());
        mux.init_instance("d1", "ACC", "TOK", None)
            .await
            .expect("init");

        let configs = sdk.created_configs();
        assert_eq!(configs[0].region, "us1");
    }

    #[tokio::test]
    async fn explicit_region_is_passed_through_unvalidated() {
        let (sdk, mux) = facade_with(BridgeConfig::default());
        mux.init_instance("d1", "ACC", "TOK", Some("eu1"))
            .await
            .expect("init");

        assert_eq!(sdk.created_configs()[0].region, "eu1");
    }

    #[tokio::test]
    async fn end_to_end_two_dashboards() {
        let (sdk, mux) = facade_with(BridgeConfig::default());

        assert!(mux.init_instance("d1", "ACC", "TOK", Some("eu1")).await.expect("init d1"));
        mux.push_event(
            "d1",
            "Product Viewed",
            Some(&props(json!({"Name": "XYZ", "Price": 123}))),
        );
        let id = mux.clevertap_id("d1").await.expect("id resolves");
        assert!(!id.is_empty());

        // Never-initialized name: no panic, no effect on d1.
        mux.push_event("d2", "Product Viewed", None);
        let err = mux.clevertap_id("d2").await.expect_err("d2 unknown");
        assert_eq!(err.code(), "INSTANCE_NOT_FOUND");

        let spy = sdk.instance(0).expect("d1 instance");
        assert_eq!(spy.event_names(), vec!["Product Viewed"]);
    }

    #[tokio::test]
    async fn reinit_uses_new_configuration() {
        let (sdk, mux) = facade_with(BridgeConfig::default());
        mux.init_instance("d1", "OLD", "TOK", Some("eu1")).await.expect("first");
        mux.init_instance("d1", "NEW", "TOK2", Some("us1")).await.expect("re-init");

        mux.push_app_launched_event("d1");

        // The event lands on the instance built from the new configuration.
        let replacement = sdk.instance(1).expect("second construction");
        assert_eq!(replacement.config.account_id, "NEW");
        assert_eq!(replacement.event_names(), vec!["App Launched"]);
        assert!(sdk.instance(0).expect("original").event_names().is_empty());
    }

    #[tokio::test]
    async fn notification_and_lifecycle_collaborators() {
        let (sdk, mux) = facade_with(BridgeConfig::with_default_instance("d1"));
        mux.init_instance("d1", "ACC", "TOK", None).await.expect("init");

        mux.record_notification_viewed(&props(json!({"wzrk_id": "n-7"})));
        let lifecycle = mux.lifecycle().expect("native lifecycle");
        lifecycle.activity_resumed();

        let spy = sdk.instance(0).expect("constructed");
        assert_eq!(spy.notifications().len(), 1);
        assert_eq!(spy.resumed_count(), 1);
    }
}
