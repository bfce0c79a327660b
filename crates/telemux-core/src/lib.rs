// SPDX-License-Identifier: MIT
//
// Telemux — Core types, value coercion, and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod types;
pub mod value;

pub use config::BridgeConfig;
pub use error::TelemuxError;
pub use types::*;
pub use value::{coerce_profile, coerce_props, coerce_value, PropValue};
