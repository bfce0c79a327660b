// SPDX-License-Identifier: MIT
//
// Unified error types for Telemux.

use thiserror::Error;

/// Top-level error type for all Telemux operations.
#[derive(Debug, Error)]
pub enum TelemuxError {
    // -- Instance lifecycle --
    #[error("failed to initialize analytics instance: {0}")]
    Init(String),

    #[error("analytics instance '{0}' not found")]
    InstanceNotFound(String),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("analytics bridge not available on this platform")]
    PlatformUnavailable,
}

impl TelemuxError {
    /// Short stable tag for this error, surfaced across the bridge boundary
    /// alongside the free-form message. Callers on the far side of a
    /// script/native boundary match on these rather than on message text.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Init(_) => "INIT_ERROR",
            Self::InstanceNotFound(_) => "INSTANCE_NOT_FOUND",
            Self::Bridge(_) => "BRIDGE_ERROR",
            Self::PlatformUnavailable => "PLATFORM_UNAVAILABLE",
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TelemuxError>;
