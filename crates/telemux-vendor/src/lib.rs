// SPDX-License-Identifier: MIT
//
// Telemux — vendor analytics SDK seam.
//
// The bridge never talks to the vendor SDK directly; it goes through the
// traits in this crate. Each OS target provides an implementation over its
// native SDK (Objective-C on iOS, ART/JNI on Android). Desktop and CI
// builds get a stub whose instance creation fails fast, and tests get a
// recording double that captures every forwarded call.

pub mod recording;
pub mod traits;

#[cfg(target_os = "ios")]
pub mod ios;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(any(target_os = "ios", target_os = "android")))]
pub mod stub;

use std::sync::Arc;

/// Retrieves the vendor SDK implementation for the target operating system.
pub fn platform_sdk() -> Arc<dyn traits::VendorSdk> {
    #[cfg(target_os = "ios")]
    {
        // iOS: `objc2` message passing to the vendor's Objective-C SDK.
        Arc::new(ios::IosSdk::new())
    }
    #[cfg(target_os = "android")]
    {
        // Android: `jni-rs` calls into the vendor's Java SDK on the ART runtime.
        Arc::new(android::AndroidSdk::new())
    }
    #[cfg(not(any(target_os = "ios", target_os = "android")))]
    {
        // DESKTOP/CI: stub whose instance creation reports PlatformUnavailable.
        Arc::new(stub::StubSdk)
    }
}
