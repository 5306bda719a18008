//! Input to `BigBang::initialize_multiverse`.

use multiverse_domain::RealmType;

/// One realm `BigBang` must populate, in the order it appears in
/// `UniverseSpec::realms`. Provider selection and entity generation both
/// respect this order (spec §4.4 determinism: "provider selection is fully
/// ordered").
#[derive(Debug, Clone)]
pub struct RealmRequest {
    pub id: String,
    pub realm_type: RealmType,
    pub anchors: Vec<String>,
}

impl RealmRequest {
    pub fn new(id: impl Into<String>, realm_type: RealmType) -> Self {
        Self {
            id: id.into(),
            realm_type,
            anchors: Vec::new(),
        }
    }

    pub fn with_anchors(mut self, anchors: Vec<String>) -> Self {
        self.anchors = anchors;
        self
    }
}

#[derive(Debug, Clone)]
pub struct UniverseSpec {
    pub seed: u64,
    pub realms: Vec<RealmRequest>,
}

impl UniverseSpec {
    pub fn new(seed: u64, realms: Vec<RealmRequest>) -> Self {
        Self { seed, realms }
    }
}
