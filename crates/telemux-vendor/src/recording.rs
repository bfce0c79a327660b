// SPDX-License-Identifier: MIT
//
// Recording vendor SDK — a test double that captures every call.
//
// Used by the bridge and facade test suites (and the demo example) in
// place of a real SDK. It records instance constructions, forwarded
// events, profiles, notification payloads, and lifecycle transitions, and
// can be scripted to fail the next construction.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use telemux_core::error::{Result, TelemuxError};
use telemux_core::{EventRecord, InstanceConfig, ProfileRecord, PropMap};

use crate::traits::{VendorInstance, VendorSdk};

/// SDK factory that hands out [`RecordingInstance`]s and remembers every
/// construction in order.
#[derive(Default)]
pub struct RecordingSdk {
    instances: Mutex<Vec<Arc<RecordingInstance>>>,
    fail_next: Mutex<Option<String>>,
}

impl RecordingSdk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make the next `create_instance` call fail with the given message.
    pub fn fail_next_init(&self, message: impl Into<String>) {
        *self.fail_next.lock().expect("fail_next lock") = Some(message.into());
    }

    /// Every configuration that reached `create_instance`, in call order.
    pub fn created_configs(&self) -> Vec<InstanceConfig> {
        self.instances
            .lock()
            .expect("instances lock")
            .iter()
            .map(|i| i.config.clone())
            .collect()
    }

    /// Instance constructed by the n-th successful `create_instance` call.
    pub fn instance(&self, index: usize) -> Option<Arc<RecordingInstance>> {
        self.instances.lock().expect("instances lock").get(index).cloned()
    }

    /// The most recently constructed instance.
    pub fn last_instance(&self) -> Option<Arc<RecordingInstance>> {
        self.instances.lock().expect("instances lock").last().cloned()
    }

    pub fn construction_count(&self) -> usize {
        self.instances.lock().expect("instances lock").len()
    }
}

impl VendorSdk for RecordingSdk {
    fn platform_name(&self) -> &str {
        "Recording"
    }

    fn create_instance(&self, config: &InstanceConfig) -> Result<Arc<dyn VendorInstance>> {
        if let Some(message) = self.fail_next.lock().expect("fail_next lock").take() {
            return Err(TelemuxError::Init(message));
        }
        let instance = Arc::new(RecordingInstance::new(config.clone()));
        self.instances
            .lock()
            .expect("instances lock")
            .push(Arc::clone(&instance));
        Ok(instance)
    }
}

/// A live "instance" that stores what it was asked to record.
pub struct RecordingInstance {
    /// Configuration this instance was constructed with.
    pub config: InstanceConfig,
    id: String,
    personalization: AtomicBool,
    events: Mutex<Vec<EventRecord>>,
    profiles: Mutex<Vec<ProfileRecord>>,
    notifications: Mutex<Vec<PropMap>>,
    resumed: AtomicUsize,
    paused: AtomicUsize,
}

impl RecordingInstance {
    fn new(config: InstanceConfig) -> Self {
        Self {
            config,
            id: format!("rec-{}", uuid::Uuid::new_v4()),
            personalization: AtomicBool::new(false),
            events: Mutex::new(Vec::new()),
            profiles: Mutex::new(Vec::new()),
            notifications: Mutex::new(Vec::new()),
            resumed: AtomicUsize::new(0),
            paused: AtomicUsize::new(0),
        }
    }

    pub fn personalization_enabled(&self) -> bool {
        self.personalization.load(Ordering::SeqCst)
    }

    /// Recorded events in call order.
    pub fn events(&self) -> Vec<EventRecord> {
        self.events.lock().expect("events lock").clone()
    }

    /// Just the recorded event names, in call order.
    pub fn event_names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.name).collect()
    }

    pub fn profiles(&self) -> Vec<ProfileRecord> {
        self.profiles.lock().expect("profiles lock").clone()
    }

    pub fn notifications(&self) -> Vec<PropMap> {
        self.notifications.lock().expect("notifications lock").clone()
    }

    pub fn resumed_count(&self) -> usize {
        self.resumed.load(Ordering::SeqCst)
    }

    pub fn paused_count(&self) -> usize {
        self.paused.load(Ordering::SeqCst)
    }
}

impl VendorInstance for RecordingInstance {
    fn enable_personalization(&self) {
        self.personalization.store(true, Ordering::SeqCst);
    }

    fn record_event(&self, event: &EventRecord) {
        self.events.lock().expect("events lock").push(event.clone());
    }

    fn on_user_login(&self, profile: &ProfileRecord) {
        self.profiles.lock().expect("profiles lock").push(profile.clone());
    }

    fn clevertap_id(&self) -> Result<String> {
        Ok(self.id.clone())
    }

    fn record_notification_viewed(&self, payload: &PropMap) {
        self.notifications
            .lock()
            .expect("notifications lock")
            .push(payload.clone());
    }

    fn activity_resumed(&self) {
        self.resumed.fetch_add(1, Ordering::SeqCst);
    }

    fn activity_paused(&self) {
        self.paused.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_constructions_in_order() {
        let sdk = RecordingSdk::new();
        sdk.create_instance(&InstanceConfig::new("A", "T1", "eu1"))
            .expect("first");
        sdk.create_instance(&InstanceConfig::new("B", "T2", "us1"))
            .expect("second");

        let configs = sdk.created_configs();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].account_id, "A");
        assert_eq!(configs[1].account_id, "B");
    }

    #[test]
    fn fail_next_init_fails_exactly_once() {
        let sdk = RecordingSdk::new();
        sdk.fail_next_init("bad credentials");

        let err = sdk
            .create_instance(&InstanceConfig::new("A", "T", "eu1"))
            .expect_err("scripted failure");
        assert_eq!(err.code(), "INIT_ERROR");
        assert!(err.to_string().contains("bad credentials"));

        sdk.create_instance(&InstanceConfig::new("A", "T", "eu1"))
            .expect("recovers after the scripted failure");
    }

    #[test]
    fn ids_are_non_empty_and_distinct() {
        let sdk = RecordingSdk::new();
        sdk.create_instance(&InstanceConfig::new("A", "T", "eu1"))
            .expect("first");
        sdk.create_instance(&InstanceConfig::new("B", "T", "eu1"))
            .expect("second");

        let a = sdk.instance(0).expect("first instance");
        let b = sdk.instance(1).expect("second instance");
        let id_a = a.clevertap_id().expect("id");
        let id_b = b.clevertap_id().expect("id");
        assert!(!id_a.is_empty());
        assert_ne!(id_a, id_b);
    }
}
