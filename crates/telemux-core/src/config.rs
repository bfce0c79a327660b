// SPDX-License-Identifier: MIT
//
// Bridge configuration.

use serde::{Deserialize, Serialize};

/// Process-wide bridge settings.
///
/// Constructed once at startup and passed by reference to the facade; the
/// bridge never reads ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Region used when `init_instance` is called without one.
    pub default_region: String,
    /// Instance name that receives notification-viewed payloads.
    /// `None` makes notification recording a logged no-op.
    pub default_instance: Option<String>,
    /// Emit verbose per-call logging from the bridge.
    pub debug_logging: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            default_region: "us1".into(),
            default_instance: None,
            debug_logging: false,
        }
    }
}

impl BridgeConfig {
    /// Config that routes notification payloads to the given instance.
    pub fn with_default_instance(name: impl Into<String>) -> Self {
        Self {
            default_instance: Some(name.into()),
            ..Self::default()
        }
    }
}
