//! Workspace error type.
//!
//! Sub-crates define their own error enums for their own failure paths and
//! wrap `LiftError` where configuration problems can surface.

use thiserror::Error;

/// The top-level error type for `lift-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum LiftError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("floor {floor} outside 0..{floors}")]
    InvalidFloor { floor: u32, floors: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `lift-*` crates.
pub type LiftResult<T> = Result<T, LiftError>;
