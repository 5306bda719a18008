//! Provider-layer errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    /// A provider generated a realm with zero entities.
    #[error("provider produced an empty realm for {realm_id}")]
    Empty { realm_id: String },

    /// The generated realm failed a domain invariant (e.g. address bounds).
    #[error("generated realm {realm_id} failed validation: {reason}")]
    Invalid { realm_id: String, reason: String },
}
