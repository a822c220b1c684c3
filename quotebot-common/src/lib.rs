//! Common types and utilities shared across quotebot crates.
//!
//! This crate defines the shared error type and the observability helpers used
//! throughout the workspace. It is intentionally lightweight so that every crate,
//! including the HTTP-backed collaborators, can depend on it.
//!
//! # Overview
//!
//! - [`QuotebotError`] and [`Result`]: shared error handling
//! - [`observability`]: centralised tracing/logging initialisation
//!
//! # Examples
//!
//! ```rust
//! use quotebot_common::{QuotebotError, Result};
//!
//! fn pick(pool: &[&str]) -> Result<String> {
//!     pool.first()
//!         .map(|s| s.to_string())
//!         .ok_or(QuotebotError::EmptyPool)
//! }
//!
//! assert!(matches!(pick(&[]), Err(QuotebotError::EmptyPool)));
//! assert_eq!(pick(&["hi"]).unwrap(), "hi");
//! ```

pub mod observability;

/// Error types used across the quotebot system.
#[derive(thiserror::Error, Debug)]
pub enum QuotebotError {
    /// The tabular source could not be read.
    #[error("Source read error: {0}")]
    SourceRead(String),

    /// There was nothing at all to choose from, posted or not.
    #[error("No quotes available to post")]
    EmptyPool,

    /// The posting service rejected the post or returned no identifier.
    #[error("Publish failed: {0}")]
    Publish(String),

    /// Marking the published row as posted failed.
    #[error("Write-back failed: {0}")]
    WriteBack(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`QuotebotError`].
pub type Result<T> = std::result::Result<T, QuotebotError>;
