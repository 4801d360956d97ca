//! Error types and handling for the match engine.
//!
//! This module defines the error types that can occur during engine
//! operations, providing clear categorization of different failure modes.
//! Lookup misses are not errors; APIs that can miss return `Option`.

/// Enumeration of fatal engine errors.
///
/// Both variants are unrecoverable at their point of use: a round cannot
/// run without a valid rotation/catalog (`Configuration`) or without a
/// materialized playfield (`Provisioning`). Callers propagate these to the
/// process edge rather than retrying.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Rotation list or catalog resources were unreadable or unusable at startup
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Template copy or environment creation failed for the round being staged
    #[error("Provisioning error: {0}")]
    Provisioning(String),
}

/// Result alias used by fallible engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced by the Engine Host across the capability boundary.
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    /// The host declined the operation (e.g. refused to unload an
    /// environment that still has live references)
    #[error("Host refused: {0}")]
    Refused(String),

    /// The host failed internally while servicing the request
    #[error("Host internal error: {0}")]
    Internal(String),
}
