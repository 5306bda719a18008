//! The request a provider is asked to satisfy.

use multiverse_domain::{RealmId, RealmType};

/// Describes one realm `BigBang` wants generated. `seed` is the per-realm
/// child seed derived by the orchestrator (spec'd as `seed ^ realm_index`);
/// providers must derive all randomness from it and nothing else.
#[derive(Debug, Clone)]
pub struct RealmSpec {
    pub id: RealmId,
    pub realm_type: RealmType,
    pub seed: u64,
    /// The realm's position in spec order; doubles as the STAT7 `realm`
    /// coordinate for every entity the provider mints.
    pub realm_index: u32,
    /// Anchors a custom-registered realm is built from; ignored by the
    /// procedural/arcade providers.
    pub anchors: Vec<String>,
}

impl RealmSpec {
    pub fn new(id: impl Into<RealmId>, realm_type: RealmType, seed: u64, realm_index: u32) -> Self {
        Self {
            id: id.into(),
            realm_type,
            seed,
            realm_index,
            anchors: Vec::new(),
        }
    }

    pub fn with_anchors(mut self, anchors: Vec<String>) -> Self {
        self.anchors = anchors;
        self
    }
}
