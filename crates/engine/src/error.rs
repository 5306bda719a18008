//! Unified error type for the engine layer, wrapping domain and provider
//! errors the way the teacher wraps `RepoError` into a higher-level
//! `WorldError`.

use multiverse_domain::DomainError;
use multiverse_providers::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    /// No registered provider could satisfy a realm spec.
    #[error("no provider can generate realm {realm_id}")]
    NoProvider { realm_id: String },

    /// `BigBang::initialize_multiverse` failed partway through; no universe
    /// is exposed to the caller.
    #[error("big bang failed for realm {realm_id}: {source}")]
    BigBangFailed {
        realm_id: String,
        #[source]
        source: Box<EngineError>,
    },

    /// A torus cycle handler failed; the cycle fails as a unit and the
    /// universe is left at the pre-cycle orbit.
    #[error("cycle failed: {0}")]
    CycleFailed(String),

    /// `launch_demo`/`BigBang` referenced a realm id with no matching spec.
    #[error("unknown realm: {0}")]
    UnknownRealm(String),

    /// Replayed universe hash did not match the expected hash.
    #[error("replay validation failed: expected {expected}, got {actual}")]
    ReplayValidationError { expected: String, actual: String },
}
