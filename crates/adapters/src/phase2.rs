//! Phase-2 adapter: projects an entity into an NPC registration (spec
//! §4.10). Grounded on the engine's tier classifier (`multiverse-engine`'s
//! `stable_hash` technique) for deterministic, seed-free name selection.

use std::collections::{BTreeMap, BTreeSet};

use multiverse_domain::{Entity, FactionId, RealmId, StoryElement};

/// The closed set of personality labels a registration may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonalityLabel {
    Talkative,
    Experienced,
    Mysterious,
    Neutral,
    Vigilant,
}

impl PersonalityLabel {
    pub fn label(&self) -> &'static str {
        match self {
            PersonalityLabel::Talkative => "talkative",
            PersonalityLabel::Experienced => "experienced",
            PersonalityLabel::Mysterious => "mysterious",
            PersonalityLabel::Neutral => "neutral",
            PersonalityLabel::Vigilant => "vigilant",
        }
    }
}

/// `enriched_dimensions` is the set of enrichment-type labels observed on
/// the entity; `label` is the single dominant personality derived from it.
#[derive(Debug, Clone)]
pub struct PersonalityTraits {
    pub enriched_dimensions: BTreeSet<String>,
    pub label: PersonalityLabel,
}

fn classify_personality(enriched_dimensions: &BTreeSet<String>) -> PersonalityLabel {
    // Priority order is fixed so the mapping stays deterministic when an
    // entity carries more than one enrichment type.
    const PRIORITY: &[(StoryElement, PersonalityLabel)] = &[
        (StoryElement::Dialogue, PersonalityLabel::Talkative),
        (StoryElement::NpcHistory, PersonalityLabel::Experienced),
        (StoryElement::Contradiction, PersonalityLabel::Vigilant),
        (StoryElement::SemanticContext, PersonalityLabel::Mysterious),
        (StoryElement::Quest, PersonalityLabel::Vigilant),
    ];
    PRIORITY
        .iter()
        .find(|(kind, _)| enriched_dimensions.contains(kind.label()))
        .map(|(_, label)| *label)
        .unwrap_or(PersonalityLabel::Neutral)
}

#[derive(Debug, Clone)]
pub struct NpcRegistration {
    pub npc_id: String,
    /// The raw entity id `npc_id` was composed from; Phase-3/Phase-4
    /// registries are still keyed by this, not by `npc_id`.
    pub entity_id: String,
    pub realm_id: RealmId,
    pub name: String,
    pub role: String,
    pub faction_id: Option<FactionId>,
    pub personality_traits: PersonalityTraits,
    pub interaction_count: usize,
}

/// Reads an entity's `faction_id` metadata key, if present and well-formed.
fn faction_id_from_metadata(entity: &Entity) -> Option<FactionId> {
    let raw = entity.metadata().get("faction_id")?.as_str()?;
    raw.parse::<uuid::Uuid>().ok().map(FactionId::from_uuid)
}

fn stable_hash(s: &str) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for byte in s.bytes() {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

const NAME_POOL: &[&str] = &[
    "Theron", "Mira", "Oskar", "Liana", "Bram", "Corwin", "Seraphine", "Dagrun", "Yvette", "Holt",
];

fn derive_name(realm_id: &str, entity_id: &str) -> String {
    let index = stable_hash(&format!("{realm_id}:{entity_id}")) as usize % NAME_POOL.len();
    NAME_POOL[index].to_string()
}

/// Builds an `NpcRegistration` from an entity's observed enrichments.
pub fn register_entity_as_npc(
    entity: &Entity,
    realm_id: &RealmId,
    override_name: Option<&str>,
) -> NpcRegistration {
    let enriched_dimensions: BTreeSet<String> =
        entity.enrichments().iter().map(|e| e.kind.label().to_string()).collect();
    let label = classify_personality(&enriched_dimensions);

    NpcRegistration {
        npc_id: format!("npc_{realm_id}_{}", entity.id()),
        entity_id: entity.id().clone(),
        realm_id: realm_id.clone(),
        name: override_name
            .map(str::to_string)
            .unwrap_or_else(|| derive_name(realm_id, entity.id())),
        role: entity
            .entity_type()
            .strip_prefix("npc_")
            .unwrap_or(entity.entity_type())
            .to_string(),
        faction_id: faction_id_from_metadata(entity),
        personality_traits: PersonalityTraits {
            enriched_dimensions,
            label,
        },
        interaction_count: entity.enrichment_count(),
    }
}

/// Indexes every registration by npc_id and by realm_id (spec §4.10).
#[derive(Debug, Default)]
pub struct Phase2Registry {
    by_npc: BTreeMap<String, NpcRegistration>,
    by_realm: BTreeMap<RealmId, Vec<String>>,
}

impl Phase2Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, registration: NpcRegistration) {
        self.by_realm
            .entry(registration.realm_id.clone())
            .or_default()
            .push(registration.npc_id.clone());
        self.by_npc.insert(registration.npc_id.clone(), registration);
    }

    pub fn get_npc(&self, npc_id: &str) -> Option<&NpcRegistration> {
        self.by_npc.get(npc_id)
    }

    pub fn get_realm_npcs(&self, realm_id: &str) -> Vec<&NpcRegistration> {
        self.by_realm
            .get(realm_id)
            .map(|ids| ids.iter().filter_map(|id| self.by_npc.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.by_npc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_npc.is_empty()
    }
}
