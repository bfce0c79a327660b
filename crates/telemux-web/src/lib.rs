// SPDX-License-Identifier: MIT
//
// Telemux — web fallback bridge.
//
// On the web there is no native module and no shared registry, so this
// crate reimplements the bridge contract over the vendor's browser SDK,
// keeping its own name→instance map. The JS boundary itself is isolated
// behind a small handle seam so the bridge semantics stay testable off
// the browser.

pub mod bridge;

#[cfg(target_arch = "wasm32")]
pub mod js;

pub use bridge::{WebBridge, WebSdkHandle, WebSdkLoader};
