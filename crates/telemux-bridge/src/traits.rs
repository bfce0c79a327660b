// SPDX-License-Identifier: MIT
//
// The cross-platform bridge contract.
//
// Every platform implementation (native registry-backed, web fallback)
// presents this exact capability set. The facade selects one
// implementation at startup and never branches per-call, so error shapes
// and async semantics are identical everywhere.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use telemux_core::error::Result;
use telemux_core::{events, InstanceConfig};

/// Uniform analytics bridge contract.
///
/// Value-returning operations are async and reject with tagged errors;
/// fire-and-forget operations return immediately, swallow failures, and
/// only log them — a telemetry call must never crash the caller.
#[async_trait]
pub trait AnalyticsBridge: Send + Sync {
    /// Human-readable platform name (e.g. "Android", "Web").
    fn platform_name(&self) -> &str;

    /// Create (or replace) the instance registered under `name`.
    ///
    /// Resolves `true` on success; rejects with an `INIT_ERROR`-tagged
    /// error when the underlying SDK refuses the configuration.
    async fn init_instance(&self, name: &str, config: &InstanceConfig) -> Result<bool>;

    /// Record an event on the named instance. Fire-and-forget; an
    /// unresolved name is a logged no-op. Property values are coerced per
    /// key before forwarding.
    fn push_event(&self, name: &str, event: &str, props: Option<&Map<String, Value>>);

    /// Push a profile update to the named instance. Fire-and-forget; an
    /// unresolved name or an empty profile is a no-op. String DOB values
    /// are parsed into dates, falling back to the raw string.
    fn push_profile(&self, name: &str, profile: &Map<String, Value>);

    /// The named instance's persistent identifier (empty string when the
    /// SDK has none yet). Rejects with `INSTANCE_NOT_FOUND` for names
    /// never initialized.
    async fn clevertap_id(&self, name: &str) -> Result<String>;

    /// Record the system "App Launched" event on the named instance.
    fn push_app_launched_event(&self, name: &str) {
        self.push_event(name, events::APP_LAUNCHED, None);
    }

    /// Record the system "Screen Viewed" event with the screen name.
    fn push_screen_viewed_event(&self, name: &str, screen_name: &str) {
        let mut props = Map::new();
        props.insert(
            events::SCREEN_NAME.to_string(),
            Value::String(screen_name.to_string()),
        );
        self.push_event(name, events::SCREEN_VIEWED, Some(&props));
    }

    /// Record a notification-viewed payload against the configured default
    /// instance. Fire-and-forget.
    fn record_notification_viewed(&self, payload: &Map<String, Value>);

    /// Hook handle for the startup-wired lifecycle collaborator. `None`
    /// where the platform has no activity lifecycle.
    fn lifecycle(&self) -> Option<Arc<dyn InstanceLifecycle>> {
        None
    }
}

/// Activity lifecycle hook, invoked by the host application's lifecycle
/// collaborator on every transition. The bridge exposes no further
/// lifecycle API — wiring happens once at startup.
pub trait InstanceLifecycle: Send + Sync {
    fn activity_resumed(&self);
    fn activity_paused(&self);
}
