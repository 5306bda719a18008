pub mod embedding;
pub mod error;
pub mod pack_loader;
pub mod reputation;
pub mod slot_fill;
pub mod template;

pub use embedding::{EmbeddingService, EncoderPort, SearchHit};
#[cfg(any(test, feature = "test-util"))]
pub use embedding::MockEncoderPort;
pub use error::RetrievalError;
pub use pack_loader::{PackLoader, PackStats};
pub use reputation::{ReputationThresholds, ReputationTier};
pub use slot_fill::{fill_slots, validate_placeholders};
pub use template::{Document, PackItem, Template};
