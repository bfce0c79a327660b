// SPDX-License-Identifier: MIT
//
// Native bridge module.
//
// Adapts the registry's operations to the asynchronous, loosely-typed
// calling convention application code sees. All boundary payloads pass
// through value coercion before reaching an SDK instance; fire-and-forget
// operations swallow every failure condition (unknown instance, empty
// payload) and only log it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use telemux_core::error::{Result, TelemuxError};
use telemux_core::{coerce_profile, coerce_props, BridgeConfig, EventRecord, InstanceConfig};
use telemux_vendor::traits::VendorSdk;

use crate::lifecycle::LifecycleFanout;
use crate::registry::InstanceRegistry;
use crate::traits::{AnalyticsBridge, InstanceLifecycle};

/// Registry-backed bridge for the mobile platforms (and the desktop stub).
pub struct NativeBridge {
    registry: InstanceRegistry,
    config: BridgeConfig,
}

impl NativeBridge {
    pub fn new(sdk: Arc<dyn VendorSdk>, config: BridgeConfig) -> Self {
        Self {
            registry: InstanceRegistry::new(sdk),
            config,
        }
    }

    /// The registry backing this bridge (shared, cheap to clone).
    pub fn registry(&self) -> &InstanceRegistry {
        &self.registry
    }
}

#[async_trait]
impl AnalyticsBridge for NativeBridge {
    fn platform_name(&self) -> &str {
        self.registry.platform_name()
    }

    async fn init_instance(&self, name: &str, config: &InstanceConfig) -> Result<bool> {
        self.registry.init_instance(name, config)?;
        Ok(true)
    }

    fn push_event(&self, name: &str, event: &str, props: Option<&Map<String, Value>>) {
        let Some(instance) = self.registry.resolve(name) else {
            warn!(instance = name, event, "push_event: instance not found");
            return;
        };
        let record = EventRecord {
            name: event.to_string(),
            props: props.map(coerce_props).unwrap_or_default(),
        };
        if self.config.debug_logging {
            debug!(instance = name, event, props = record.props.len(), "recording event");
        }
        instance.record_event(&record);
    }

    fn push_profile(&self, name: &str, profile: &Map<String, Value>) {
        if profile.is_empty() {
            warn!(instance = name, "push_profile: empty profile, skipping");
            return;
        }
        let Some(instance) = self.registry.resolve(name) else {
            warn!(instance = name, "push_profile: instance not found");
            return;
        };
        let record = coerce_profile(profile);
        if self.config.debug_logging {
            debug!(instance = name, fields = record.fields.len(), "pushing profile");
        }
        instance.on_user_login(&record);
    }

    async fn clevertap_id(&self, name: &str) -> Result<String> {
        let instance = self
            .registry
            .resolve(name)
            .ok_or_else(|| TelemuxError::InstanceNotFound(name.to_string()))?;
        instance.clevertap_id()
    }

    fn record_notification_viewed(&self, payload: &Map<String, Value>) {
        let Some(default) = self.config.default_instance.as_deref() else {
            warn!("notification viewed but no default instance configured");
            return;
        };
        let Some(instance) = self.registry.resolve(default) else {
            warn!(instance = default, "notification viewed: default instance not found");
            return;
        };
        instance.record_notification_viewed(&coerce_props(payload));
    }

    fn lifecycle(&self) -> Option<Arc<dyn InstanceLifecycle>> {
        Some(Arc::new(LifecycleFanout::new(self.registry.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use telemux_core::PropValue;
    use telemux_vendor::recording::RecordingSdk;

    fn bridge() -> (Arc<RecordingSdk>, NativeBridge) {
        let sdk = RecordingSdk::new();
        let bridge = NativeBridge::new(sdk.clone(), BridgeConfig::default());
        (sdk, bridge)
    }

    fn props(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn init_resolves_true() {
        let (_, bridge) = bridge();
        let ok = bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");
        assert!(ok);
    }

    #[tokio::test]
    async fn init_failure_carries_init_error_tag() {
        let (sdk, bridge) = bridge();
        sdk.fail_next_init("SDK rejected configuration");
        let err = bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect_err("scripted failure");
        assert_eq!(err.code(), "INIT_ERROR");
    }

    #[tokio::test]
    async fn pushes_to_unknown_instance_are_silent_no_ops() {
        let (sdk, bridge) = bridge();
        bridge.push_event("ghost", "Product Viewed", None);
        bridge.push_profile("ghost", &props(json!({"Name": "Jo"})));
        bridge.push_app_launched_event("ghost");
        bridge.push_screen_viewed_event("ghost", "Home");

        // Nothing was constructed, nothing mutated.
        assert_eq!(sdk.construction_count(), 0);
    }

    #[tokio::test]
    async fn clevertap_id_rejects_unknown_instance() {
        let (_, bridge) = bridge();
        let err = bridge.clevertap_id("ghost").await.expect_err("must reject");
        assert_eq!(err.code(), "INSTANCE_NOT_FOUND");
        assert!(err.to_string().contains("ghost"));
    }

    #[tokio::test]
    async fn event_properties_are_coerced_per_key() {
        let (sdk, bridge) = bridge();
        bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");

        bridge.push_event(
            "d1",
            "Mixed Props",
            Some(&props(json!({
                "a": "x",
                "b": 1,
                "c": true,
                "d": [1, "y", true],
                "e": {"nested": 1},
            }))),
        );

        let spy = sdk.instance(0).expect("constructed");
        let events = spy.events();
        assert_eq!(events.len(), 1);
        let recorded = &events[0].props;
        assert_eq!(recorded["a"], PropValue::Str("x".into()));
        assert_eq!(recorded["b"], PropValue::Num(1.0));
        assert_eq!(recorded["c"], PropValue::Bool(true));
        assert_eq!(
            recorded["d"],
            PropValue::List(vec![
                PropValue::Num(1.0),
                PropValue::Str("y".into()),
                PropValue::Bool(true),
            ])
        );
        // Unsupported shape survives as a string, never as an object.
        assert!(recorded["e"].as_str().is_some());
    }

    #[tokio::test]
    async fn profile_dob_round_trip() {
        let (sdk, bridge) = bridge();
        bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");

        bridge.push_profile(
            "d1",
            &props(json!({"Identity": "u-1", "DOB": "1992-12-22T06:35:31"})),
        );
        bridge.push_profile("d1", &props(json!({"DOB": "not-a-date"})));

        let spy = sdk.instance(0).expect("constructed");
        let profiles = spy.profiles();
        assert_eq!(profiles.len(), 2);

        match &profiles[0].fields["DOB"] {
            PropValue::Date(dt) => {
                assert_eq!(dt.format("%Y-%m-%dT%H:%M:%S").to_string(), "1992-12-22T06:35:31");
            }
            other => panic!("expected Date, got {other:?}"),
        }
        assert_eq!(profiles[1].fields["DOB"], PropValue::Str("not-a-date".into()));
    }

    #[tokio::test]
    async fn empty_profile_is_not_forwarded() {
        let (sdk, bridge) = bridge();
        bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");

        bridge.push_profile("d1", &Map::new());
        let spy = sdk.instance(0).expect("constructed");
        assert!(spy.profiles().is_empty());
    }

    #[tokio::test]
    async fn convenience_wrappers_record_system_events() {
        let (sdk, bridge) = bridge();
        bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");

        bridge.push_app_launched_event("d1");
        bridge.push_screen_viewed_event("d1", "Cart");

        let spy = sdk.instance(0).expect("constructed");
        let events = spy.events();
        assert_eq!(events[0].name, "App Launched");
        assert!(events[0].props.is_empty());
        assert_eq!(events[1].name, "Screen Viewed");
        assert_eq!(events[1].props["Screen Name"], PropValue::Str("Cart".into()));
    }

    #[tokio::test]
    async fn two_instances_stay_isolated() {
        let (sdk, bridge) = bridge();
        bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init d1");

        bridge.push_event(
            "d1",
            "Product Viewed",
            Some(&props(json!({"Name": "XYZ", "Price": 123}))),
        );
        let id = bridge.clevertap_id("d1").await.expect("id resolves");
        assert!(!id.is_empty());

        // d2 was never initialized: no effect on d1's call history.
        bridge.push_event("d2", "Product Viewed", None);

        let spy = sdk.instance(0).expect("d1 instance");
        assert_eq!(spy.event_names(), vec!["Product Viewed"]);
    }

    #[tokio::test]
    async fn notification_routes_to_default_instance() {
        let sdk = RecordingSdk::new();
        let bridge = NativeBridge::new(sdk.clone(), BridgeConfig::with_default_instance("d1"));
        bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");

        bridge.record_notification_viewed(&props(json!({"wzrk_id": "n-1"})));

        let spy = sdk.instance(0).expect("constructed");
        let seen = spy.notifications();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0]["wzrk_id"], PropValue::Str("n-1".into()));
    }

    #[tokio::test]
    async fn notification_without_default_instance_is_a_no_op() {
        let (sdk, bridge) = bridge();
        bridge.record_notification_viewed(&props(json!({"wzrk_id": "n-1"})));
        assert_eq!(sdk.construction_count(), 0);
    }

    #[tokio::test]
    async fn lifecycle_handle_reaches_instances() {
        let (sdk, bridge) = bridge();
        bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");

        let lifecycle = bridge.lifecycle().expect("native bridge has lifecycle");
        lifecycle.activity_resumed();
        lifecycle.activity_paused();

        let spy = sdk.instance(0).expect("constructed");
        assert_eq!(spy.resumed_count(), 1);
        assert_eq!(spy.paused_count(), 1);
    }
}
