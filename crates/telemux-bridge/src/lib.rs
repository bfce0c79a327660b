// SPDX-License-Identifier: MIT
//
// Telemux — instance registry and native bridge module.
//
// The registry owns the name→instance mapping for one platform; the
// native bridge adapts its operations to the asynchronous, loosely-typed
// calling convention application code sees, with per-key value coercion
// at the boundary. Lifecycle fanout forwards activity transitions to
// every live instance.

pub mod lifecycle;
pub mod native;
pub mod registry;
pub mod traits;

pub use lifecycle::LifecycleFanout;
pub use native::NativeBridge;
pub use registry::InstanceRegistry;
pub use traits::{AnalyticsBridge, InstanceLifecycle};
