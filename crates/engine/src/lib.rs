//! Multiverse engine: BigBang initialization, the torus enrichment cycle,
//! the optional tier-classification perspective, and snapshot/replay.

pub mod bigbang;
pub mod error;
pub mod snapshot;
pub mod tier;
pub mod torus;
pub mod universe_spec;

pub use bigbang::{BigBang, ProviderRegistry};
pub use error::EngineError;
pub use snapshot::{export, replay_from_seed, EntityExport, RealmExport, Snapshot};
pub use tier::{personality_seed_traits, Tier, TierAssignment, TierRegistry, Theme};
pub use torus::{SemanticReprojectionPort, TorusCycleEngine};
pub use universe_spec::{RealmRequest, UniverseSpec};
