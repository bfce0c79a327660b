// SPDX-License-Identifier: MIT
//
// Core domain types for the Telemux analytics bridge.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::value::PropValue;

/// Coerced property map attached to events, profiles, and notification
/// payloads. Keys are unique; iteration order is not significant.
pub type PropMap = HashMap<String, PropValue>;

/// Immutable configuration for one analytics destination.
///
/// Supplied once per instance name at initialization. The region is an
/// opaque routing string ("eu1", "us1", ...) passed through unvalidated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub account_id: String,
    pub account_token: String,
    pub region: String,
}

impl InstanceConfig {
    pub fn new(
        account_id: impl Into<String>,
        account_token: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            account_token: account_token.into(),
            region: region.into(),
        }
    }
}

/// A single analytics event, ready to forward to an SDK instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Event name, e.g. "Product Viewed".
    pub name: String,
    /// Coerced event properties. Empty when the caller supplied none.
    pub props: PropMap,
}

impl EventRecord {
    /// Event with no properties.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            props: PropMap::new(),
        }
    }
}

/// A user-profile update, ready to forward to an SDK instance.
///
/// Field keys follow the vendor's identity vocabulary (see the `profile`
/// module constants); arbitrary custom keys are allowed alongside them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub fields: PropMap,
}

impl ProfileRecord {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Well-known profile field keys.
pub mod profile {
    pub const IDENTITY: &str = "Identity";
    pub const NAME: &str = "Name";
    pub const EMAIL: &str = "Email";
    pub const PHONE: &str = "Phone";
    pub const GENDER: &str = "Gender";
    /// Date of birth. String values under this key are parsed into a date
    /// before forwarding; parse failure forwards the raw string unchanged.
    pub const DOB: &str = "DOB";
}

/// System event names recorded by the convenience wrappers.
pub mod events {
    pub const APP_LAUNCHED: &str = "App Launched";
    pub const SCREEN_VIEWED: &str = "Screen Viewed";
    /// Property key carrying the screen name on a Screen Viewed event.
    pub const SCREEN_NAME: &str = "Screen Name";
}
