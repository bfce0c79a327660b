// SPDX-License-Identifier: MIT
//
// Web implementation of the bridge contract.
//
// Mirrors the native bridge's semantics with two intentional differences:
// initialization pushes an implicit "App Launched" event (the browser SDK
// records no launch event of its own), and a browser SDK that failed to
// load at startup disables the bridge entirely — every initialization
// fails fast instead of degrading.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::{Map, Value};
use tracing::warn;

use telemux_bridge::traits::AnalyticsBridge;
use telemux_core::error::{Result, TelemuxError};
use telemux_core::{
    coerce_profile, coerce_props, events, EventRecord, InstanceConfig, ProfileRecord,
};

/// One live browser SDK instance.
///
/// Identifier retrieval is callback-based on this platform; the bridge
/// adapts it to the async contract.
pub trait WebSdkHandle: Send + Sync {
    fn record_event(&self, event: &EventRecord);
    fn push_profile(&self, profile: &ProfileRecord);
    fn clevertap_id(&self, callback: Box<dyn FnOnce(String) + Send>);
}

/// Factory over the loaded browser SDK.
pub trait WebSdkLoader: Send + Sync {
    fn init(&self, config: &InstanceConfig) -> Result<Arc<dyn WebSdkHandle>>;
}

/// Bridge over the browser SDK, with its own instance registry.
pub struct WebBridge {
    /// `None` when the browser SDK failed to load at startup.
    loader: Option<Arc<dyn WebSdkLoader>>,
    instances: Mutex<HashMap<String, Arc<dyn WebSdkHandle>>>,
}

impl WebBridge {
    pub fn new(loader: Option<Arc<dyn WebSdkLoader>>) -> Self {
        if loader.is_none() {
            warn!("browser analytics SDK not available, web bridge disabled");
        }
        Self {
            loader,
            instances: Mutex::new(HashMap::new()),
        }
    }

    /// Bridge over the page-global browser SDK, if it loaded.
    #[cfg(target_arch = "wasm32")]
    pub fn from_global() -> Self {
        Self::new(crate::js::global_loader())
    }

    fn resolve(&self, name: &str) -> Option<Arc<dyn WebSdkHandle>> {
        self.instances
            .lock()
            .expect("web instance registry lock poisoned")
            .get(name)
            .cloned()
    }
}

#[async_trait]
impl AnalyticsBridge for WebBridge {
    fn platform_name(&self) -> &str {
        "Web"
    }

    async fn init_instance(&self, name: &str, config: &InstanceConfig) -> Result<bool> {
        let loader = self
            .loader
            .as_ref()
            .ok_or(TelemuxError::PlatformUnavailable)?;
        let handle = loader.init(config)?;

        self.instances
            .lock()
            .expect("web instance registry lock poisoned")
            .insert(name.to_string(), Arc::clone(&handle));

        // The native launch event is a separate explicit call; the web path
        // bundles it into initialization.
        handle.record_event(&EventRecord::named(events::APP_LAUNCHED));
        Ok(true)
    }

    fn push_event(&self, name: &str, event: &str, props: Option<&Map<String, Value>>) {
        let Some(handle) = self.resolve(name) else {
            warn!(instance = name, event, "push_event: web instance not found");
            return;
        };
        handle.record_event(&EventRecord {
            name: event.to_string(),
            props: props.map(coerce_props).unwrap_or_default(),
        });
    }

    fn push_profile(&self, name: &str, profile: &Map<String, Value>) {
        if profile.is_empty() {
            warn!(instance = name, "push_profile: empty profile, skipping");
            return;
        }
        let Some(handle) = self.resolve(name) else {
            warn!(instance = name, "push_profile: web instance not found");
            return;
        };
        handle.push_profile(&coerce_profile(profile));
    }

    async fn clevertap_id(&self, name: &str) -> Result<String> {
        let handle = self
            .resolve(name)
            .ok_or_else(|| TelemuxError::InstanceNotFound(name.to_string()))?;

        let (tx, rx) = oneshot::channel();
        handle.clevertap_id(Box::new(move |id| {
            let _ = tx.send(id);
        }));
        // A dropped callback (SDK never answered) resolves to the empty
        // string, matching the no-identifier-yet contract.
        Ok(rx.await.unwrap_or_default())
    }

    fn record_notification_viewed(&self, _payload: &Map<String, Value>) {
        warn!("notification recording is not supported on the web bridge");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use telemux_core::PropValue;

    /// Handle double that records calls and answers identifier queries.
    #[derive(Default)]
    struct FakeHandle {
        events: Mutex<Vec<EventRecord>>,
        profiles: Mutex<Vec<ProfileRecord>>,
        id: String,
    }

    impl FakeHandle {
        fn with_id(id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: id.to_string(),
                ..Self::default()
            })
        }

        fn event_names(&self) -> Vec<String> {
            self.events
                .lock()
                .expect("events lock")
                .iter()
                .map(|e| e.name.clone())
                .collect()
        }
    }

    impl WebSdkHandle for FakeHandle {
        fn record_event(&self, event: &EventRecord) {
            self.events.lock().expect("events lock").push(event.clone());
        }

        fn push_profile(&self, profile: &ProfileRecord) {
            self.profiles
                .lock()
                .expect("profiles lock")
                .push(profile.clone());
        }

        fn clevertap_id(&self, callback: Box<dyn FnOnce(String) + Send>) {
            callback(self.id.clone());
        }
    }

    struct FakeLoader {
        handles: Mutex<Vec<Arc<FakeHandle>>>,
    }

    impl FakeLoader {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                handles: Mutex::new(Vec::new()),
            })
        }

        fn handle(&self, index: usize) -> Arc<FakeHandle> {
            self.handles.lock().expect("handles lock")[index].clone()
        }
    }

    impl WebSdkLoader for FakeLoader {
        fn init(&self, _config: &InstanceConfig) -> Result<Arc<dyn WebSdkHandle>> {
            let handle = FakeHandle::with_id("web-id-1");
            self.handles
                .lock()
                .expect("handles lock")
                .push(Arc::clone(&handle));
            Ok(handle)
        }
    }

    fn props(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn init_pushes_implicit_app_launched() {
        let loader = FakeLoader::new();
        let bridge = WebBridge::new(Some(loader.clone()));

        let ok = bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");
        assert!(ok);

        assert_eq!(loader.handle(0).event_names(), vec!["App Launched"]);
    }

    #[tokio::test]
    async fn missing_sdk_fails_fast() {
        let bridge = WebBridge::new(None);
        let err = bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect_err("disabled bridge must reject");
        assert_eq!(err.code(), "PLATFORM_UNAVAILABLE");
    }

    #[tokio::test]
    async fn callback_id_adapts_to_async() {
        let loader = FakeLoader::new();
        let bridge = WebBridge::new(Some(loader));
        bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");

        let id = bridge.clevertap_id("d1").await.expect("id resolves");
        assert_eq!(id, "web-id-1");
    }

    #[tokio::test]
    async fn unknown_instance_rejects_id_and_swallows_pushes() {
        let loader = FakeLoader::new();
        let bridge = WebBridge::new(Some(loader.clone()));
        bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");

        bridge.push_event("ghost", "Anything", None);
        let err = bridge.clevertap_id("ghost").await.expect_err("must reject");
        assert_eq!(err.code(), "INSTANCE_NOT_FOUND");

        // d1 saw only its implicit launch event.
        assert_eq!(loader.handle(0).event_names(), vec!["App Launched"]);
    }

    #[tokio::test]
    async fn profile_coercion_applies_on_web_too() {
        let loader = FakeLoader::new();
        let bridge = WebBridge::new(Some(loader.clone()));
        bridge
            .init_instance("d1", &InstanceConfig::new("ACC", "TOK", "eu1"))
            .await
            .expect("init");

        bridge.push_profile("d1", &props(json!({"DOB": "1992-12-22T06:35:31"})));

        let handle = loader.handle(0);
        let profiles = handle.profiles.lock().expect("profiles lock");
        assert!(matches!(profiles[0].fields["DOB"], PropValue::Date(_)));
    }
}
