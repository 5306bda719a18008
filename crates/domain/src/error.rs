//! Unified error type for the domain layer
//!
//! Provides a common error type that can be used across all domain
//! operations, enabling consistent error handling without forcing callers
//! to reach for `String` or `anyhow`.

use thiserror::Error;

/// Unified error type for domain operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A STAT7 address field was outside its valid range.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// An enrichment was attempted with a type not in the closed `StoryElement` set.
    #[error("invalid enrichment type: {0}")]
    InvalidEnrichment(String),

    /// An `advance_to_orbit` call would have decreased lineage.
    #[error("lineage must be nondecreasing: current {current}, attempted {attempted}")]
    LineageRegression { current: u64, attempted: u64 },

    /// Entity not found.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// Realm not found.
    #[error("realm not found: {0}")]
    RealmNotFound(String),
}

impl DomainError {
    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::InvalidAddress(msg.into())
    }

    pub fn invalid_enrichment(msg: impl Into<String>) -> Self {
        Self::InvalidEnrichment(msg.into())
    }
}
