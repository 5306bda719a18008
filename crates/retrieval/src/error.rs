//! Retrieval-layer errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RetrievalError {
    /// Template content has an unclosed `{{...}}` placeholder.
    #[error("malformed template {template_id}: unclosed placeholder")]
    MalformedTemplate { template_id: String },

    /// A slot referenced by a template was not present in the slot context.
    #[error("unfilled slot `{0}` in template")]
    UnfilledSlot(String),

    /// Saved index dimension or template count does not match the current
    /// encoder/template store.
    #[error("index mismatch: {reason}")]
    IndexMismatch { reason: String },

    #[error("io error: {0}")]
    Io(String),
}
