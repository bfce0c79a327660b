// SPDX-License-Identifier: MIT
//
// Platform-agnostic traits over the vendor analytics SDK.
//
// The vendor SDK's delivery, batching, and persistence internals are
// opaque. The bridge depends only on the operations below: instance
// creation, event recording, profile updates, identifier retrieval,
// notification-viewed recording, and activity lifecycle notification.

use std::sync::Arc;

use telemux_core::error::Result;
use telemux_core::{EventRecord, InstanceConfig, ProfileRecord, PropMap};

/// Factory for live SDK instances on one platform.
pub trait VendorSdk: Send + Sync {
    /// Human-readable platform name (e.g. "iOS", "Android").
    fn platform_name(&self) -> &str;

    /// Construct a new SDK instance bound to the given configuration.
    ///
    /// Returns `TelemuxError::Init` when the underlying SDK rejects the
    /// configuration. Success is reported only once the instance is fully
    /// constructed and ready to record.
    fn create_instance(&self, config: &InstanceConfig) -> Result<Arc<dyn VendorInstance>>;
}

/// One live, configured connection to the analytics backend.
///
/// Owned exclusively by the registry that created it; lifetime is the
/// process lifetime (no teardown operation is exposed).
pub trait VendorInstance: Send + Sync {
    /// Turn on personalization / system-event capture. Called once right
    /// after creation.
    fn enable_personalization(&self);

    /// Record a custom event. Fire-and-forget at the SDK boundary.
    fn record_event(&self, event: &EventRecord);

    /// Push a user-profile update (identity switch included).
    fn on_user_login(&self, profile: &ProfileRecord);

    /// The SDK's persistent device identifier. Empty string when the SDK
    /// has not assigned one yet.
    fn clevertap_id(&self) -> Result<String>;

    /// Record that a push notification was viewed, with its opaque payload.
    fn record_notification_viewed(&self, payload: &PropMap);

    /// Activity lifecycle transitions, forwarded by the startup-wired
    /// lifecycle collaborator.
    fn activity_resumed(&self);
    fn activity_paused(&self);
}

impl std::fmt::Debug for dyn VendorInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("VendorInstance")
    }
}
