//! Multiverse domain: the STAT7 address space, entity/realm/universe model,
//! and the invariants that every other crate in the workspace builds on.
//!
//! This crate has no knowledge of providers, retrieval, or adapters — it
//! only models the data and the rules for mutating it.

pub mod entity;
pub mod error;
pub mod ids;
pub mod realm;
pub mod stat7;
pub mod universe;

pub use entity::{Enrichment, Entity, StoryElement};
pub use error::DomainError;
pub use ids::{EntityId, FactionId, PlayerId, RealmId, UniverseId};
pub use realm::{RealmData, RealmType};
pub use stat7::{EuclideanResonance, Resonance, Stat7Address, HORIZON_MAX, PERCENT_MAX};
pub use universe::{CycleRecord, SharedUniverse, Universe};
