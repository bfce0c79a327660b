// SPDX-License-Identifier: MIT
//
// Stub vendor SDK for desktop/CI builds where no native analytics SDK
// exists.
//
// Instance creation fails fast with `PlatformUnavailable`, so the registry
// never holds a live instance on these targets and every subsequent call
// follows the documented absent-instance paths. Real implementations live
// in the `ios` and `android` modules.

use std::sync::Arc;

use telemux_core::error::{Result, TelemuxError};
use telemux_core::InstanceConfig;

use crate::traits::{VendorInstance, VendorSdk};

/// No-op SDK returned on non-mobile, non-web platforms.
pub struct StubSdk;

impl VendorSdk for StubSdk {
    fn platform_name(&self) -> &str {
        "Desktop (stub)"
    }

    fn create_instance(&self, config: &InstanceConfig) -> Result<Arc<dyn VendorInstance>> {
        tracing::warn!(
            account_id = %config.account_id,
            "VendorSdk::create_instance called on stub SDK"
        );
        Err(TelemuxError::PlatformUnavailable)
    }
}
