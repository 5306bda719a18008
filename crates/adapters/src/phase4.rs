//! Phase-4 adapter: projects an entity into a dialogue state used as slot
//! context during NPC queries (spec §4.10).

use std::collections::BTreeMap;

use multiverse_domain::{Entity, StoryElement};
use serde::Serialize;
use serde_json::{json, Value};

const ORBIT_TIMES: [&str; 7] = ["dawn", "morning", "noon", "afternoon", "evening", "dusk", "night"];

fn location_type_for(realm_id: &str) -> &'static str {
    if realm_id.contains("tavern") {
        "tavern"
    } else if realm_id.contains("dungeon") {
        "dungeon"
    } else {
        "neutral_ground"
    }
}

fn time_of_day(orbit: u64) -> &'static str {
    ORBIT_TIMES[(orbit % 7) as usize]
}

fn npc_mood_for(most_recent: Option<StoryElement>) -> &'static str {
    match most_recent {
        Some(StoryElement::Dialogue) => "talkative",
        Some(StoryElement::NpcHistory) => "experienced",
        Some(StoryElement::Quest) => "engaged",
        Some(StoryElement::Contradiction) => "conflicted",
        Some(StoryElement::SemanticContext) | None => "neutral",
    }
}

fn narrative_phase_for(enrichment_count: usize) -> &'static str {
    match enrichment_count {
        0 => "introduction",
        1..=2 => "context",
        3..=4 => "deepening",
        _ => "resolution",
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DialogueState {
    pub entity_id: String,
    pub npc_name: String,
    pub realm_id: String,
    pub location_type: &'static str,
    pub current_orbit: u64,
    pub time_of_day: &'static str,
    pub npc_mood: &'static str,
    pub narrative_phase: &'static str,
    pub turn: u64,
}

/// Keys a dialogue state by (entity_id, realm_id): the same entity could, in
/// principle, be projected into more than one realm's conversation surface.
type DialogueKey = (String, String);

#[derive(Debug, Default)]
pub struct Phase4Registry {
    states: BTreeMap<DialogueKey, DialogueState>,
}

impl Phase4Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize_dialogue_state(
        &mut self,
        entity: &Entity,
        npc_name: &str,
        realm_id: &str,
        current_orbit: u64,
    ) -> &DialogueState {
        let most_recent = entity.enrichments().last().map(|e| e.kind);
        let state = DialogueState {
            entity_id: entity.id().clone(),
            npc_name: npc_name.to_string(),
            realm_id: realm_id.to_string(),
            location_type: location_type_for(realm_id),
            current_orbit,
            time_of_day: time_of_day(current_orbit),
            npc_mood: npc_mood_for(most_recent),
            narrative_phase: narrative_phase_for(entity.enrichment_count()),
            turn: 0,
        };
        let key = (entity.id().clone(), realm_id.to_string());
        self.states.entry(key).or_insert(state)
    }

    pub fn advance_dialogue_turn(&mut self, entity_id: &str, realm_id: &str) -> Option<u64> {
        let state = self.states.get_mut(&(entity_id.to_string(), realm_id.to_string()))?;
        state.turn += 1;
        Some(state.turn)
    }

    /// Returns the stored state as a JSON map, with `time_of_day` and
    /// `current_orbit` recomputed for `orbit` (callers may query a future
    /// orbit without re-initializing).
    pub fn get_dialogue_context(&self, entity_id: &str, realm_id: &str, orbit: u64) -> Option<Value> {
        let state = self.states.get(&(entity_id.to_string(), realm_id.to_string()))?;
        Some(json!({
            "entity_id": state.entity_id,
            "npc_name": state.npc_name,
            "realm_id": state.realm_id,
            "location_type": state.location_type,
            "current_orbit": orbit,
            "time_of_day": time_of_day(orbit),
            "npc_mood": state.npc_mood,
            "narrative_phase": state.narrative_phase,
            "turn": state.turn,
        }))
    }

    pub fn get(&self, entity_id: &str, realm_id: &str) -> Option<&DialogueState> {
        self.states.get(&(entity_id.to_string(), realm_id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
