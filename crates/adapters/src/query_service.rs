//! Query Service (spec C9): reputation-gated, semantically-retrieved NPC
//! dialogue. `query_npc` is the single public entrypoint.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use multiverse_domain::{FactionId, PlayerId};
use multiverse_retrieval::{
    fill_slots, EmbeddingService, EncoderPort, PackLoader, ReputationThresholds, ReputationTier,
};

use crate::error::QueryError;
use crate::phase2::Phase2Registry;
use crate::phase4::Phase4Registry;

/// External reputation state (spec §6): player standing per faction.
#[allow(async_fn_in_trait)]
pub trait ReputationPort: Send + Sync {
    async fn get_reputation(&self, player_id: PlayerId, faction_id: FactionId) -> i64;
    async fn modify_reputation(&self, player_id: PlayerId, faction_id: FactionId, delta: i64) -> i64;
}

/// A player's profile, read purely to build slot context (spec §6).
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    pub name: String,
    pub title: String,
    pub faction_id: Option<FactionId>,
    pub inventory_summary: Vec<String>,
    pub quest_context: String,
    pub journey_events: Vec<String>,
}

#[allow(async_fn_in_trait)]
pub trait PlayerStatePort: Send + Sync {
    async fn get_player(&self, player_id: PlayerId) -> Option<PlayerProfile>;
}

/// The closed intent table the keyword path matches against (spec §4.9.4).
const INTENT_TABLE: &[(&str, &[&str])] = &[
    ("greeting", &["hello", "hi", "hey", "greetings"]),
    ("farewell", &["bye", "farewell", "goodbye"]),
    ("help_request", &["help", "assist", "guide"]),
    ("trade_inquiry", &["buy", "sell", "trade", "price"]),
    ("hostile", &["threat", "attack", "enemy", "fight"]),
    ("general_conversation", &["talk", "chat", "tell"]),
];

fn derive_intent_tags(user_input: &str) -> Vec<&'static str> {
    let words: Vec<String> = user_input
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();

    INTENT_TABLE
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| words.iter().any(|w| w == k)))
        .map(|(intent, _)| *intent)
        .collect()
}

struct Session {
    turn: u64,
    last_intent: Option<String>,
    last_active: Instant,
}

/// The final response to a `query_npc` call (spec §4.9 step 7).
#[derive(Debug, Clone)]
pub struct Response {
    pub npc_response: String,
    pub template_id: String,
    pub similarity: Option<f32>,
    pub tier: ReputationTier,
    pub turn: u64,
    pub slot_snapshot: BTreeMap<String, String>,
}

pub struct QueryServiceConfig {
    pub session_idle_timeout: Duration,
    pub default_fallback_template_id: String,
    /// Reached turn count resets the session exactly like an idle timeout
    /// (spec §9 Open Questions); `None` leaves a conversation uncapped.
    pub max_turns_per_conversation: Option<u32>,
}

impl Default for QueryServiceConfig {
    fn default() -> Self {
        Self {
            session_idle_timeout: Duration::from_secs(300),
            default_fallback_template_id: "default_fallback".to_string(),
            max_turns_per_conversation: None,
        }
    }
}

/// Owns conversation sessions (one per (player, npc) pair) and dispatches
/// `query_npc`. Generic over the encoder so callers without an
/// `EmbeddingService` can still construct one for the keyword-only path.
pub struct QueryService<E: EncoderPort> {
    config: QueryServiceConfig,
    thresholds: ReputationThresholds,
    sessions: std::collections::HashMap<(PlayerId, String), Session>,
    embedding: Option<EmbeddingService<E>>,
}

impl<E: EncoderPort> QueryService<E> {
    pub fn new(config: QueryServiceConfig, thresholds: ReputationThresholds) -> Self {
        Self {
            config,
            thresholds,
            sessions: std::collections::HashMap::new(),
            embedding: None,
        }
    }

    pub fn with_embedding(mut self, embedding: EmbeddingService<E>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// At-most-one active session per (player, npc); resets on idle timeout
    /// (spec §4.9 guarantees).
    fn session_turn(&mut self, player_id: PlayerId, npc_id: &str, intent: Option<&str>) -> u64 {
        let key = (player_id, npc_id.to_string());
        let now = Instant::now();
        let session = self.sessions.entry(key).or_insert_with(|| Session {
            turn: 0,
            last_intent: None,
            last_active: now,
        });

        let idle_expired = now.duration_since(session.last_active) > self.config.session_idle_timeout;
        let turn_cap_reached = self
            .config
            .max_turns_per_conversation
            .is_some_and(|cap| session.turn >= cap as u64);
        if idle_expired || turn_cap_reached {
            session.turn = 0;
            session.last_intent = None;
        }
        session.turn += 1;
        session.last_active = now;
        session.last_intent = intent.map(str::to_string);
        session.turn
    }

    /// Trait objects don't work here: native `async fn` in a trait isn't
    /// dyn-compatible, so the ports are generic parameters instead.
    #[allow(clippy::too_many_arguments)]
    pub async fn query_npc<R: ReputationPort, P: PlayerStatePort>(
        &mut self,
        player_id: PlayerId,
        npc_id: &str,
        user_input: &str,
        realm_id: &str,
        current_orbit: u64,
        reputation_port: &R,
        player_state_port: &P,
        phase2: &Phase2Registry,
        phase4: &mut Phase4Registry,
        pack_loader: &PackLoader,
    ) -> Result<Response, QueryError> {
        let registration = phase2
            .get_npc(npc_id)
            .ok_or_else(|| QueryError::UnknownNpc(npc_id.to_string()))?
            .clone();
        let player = player_state_port
            .get_player(player_id)
            .await
            .ok_or_else(|| QueryError::UnknownPlayer(player_id.to_string()))?;

        let score = match registration.faction_id {
            Some(faction_id) => reputation_port.get_reputation(player_id, faction_id).await,
            None => 0,
        };
        let tier = self.thresholds.tier_for(score);

        // Ordered candidate chain (spec §4.9 step 5): embedding top hit, then
        // every keyword-intent match, then the default fallback. The first
        // candidate whose slots all resolve wins; a candidate that can't be
        // filled (e.g. a template referencing `{{location}}` while no
        // Phase-4 dialogue state exists yet) is skipped rather than erroring.
        let mut candidates: Vec<&multiverse_retrieval::Template> = Vec::new();
        let mut embedding_similarity = None;

        if let Some(embedding) = &self.embedding {
            let hits = embedding.search(user_input, 5, tier).await;
            if let Some(hit) = hits.first() {
                if let Some(template) = pack_loader.find_by_id(&hit.template_id) {
                    candidates.push(template);
                    embedding_similarity = Some(hit.score);
                }
            }
        }

        let intent_tags = derive_intent_tags(user_input);
        for template in pack_loader.find_all_by_intent(&intent_tags, tier) {
            if !candidates.iter().any(|c| c.template_id == template.template_id) {
                candidates.push(template);
            }
        }
        if let Some(template) = pack_loader.find_by_id(&self.config.default_fallback_template_id) {
            if !candidates.iter().any(|c| c.template_id == template.template_id) {
                candidates.push(template);
            }
        }

        // Phase-4 stays keyed by the raw entity id, not the composed
        // `npc_id` (spec §3: `npc_id = "npc_{realm_id}_{entity_id}"`).
        let dialogue_context =
            phase4.get_dialogue_context(&registration.entity_id, realm_id, current_orbit);

        let mut slot_context = BTreeMap::new();
        slot_context.insert("user_name".to_string(), player.name.clone());
        slot_context.insert("user_title".to_string(), player.title.clone());
        slot_context.insert("npc_name".to_string(), registration.name.clone());
        slot_context.insert("npc_role".to_string(), registration.role.clone());
        slot_context.insert("item_types".to_string(), player.inventory_summary.join(", "));
        slot_context.insert("inventory_summary".to_string(), player.inventory_summary.join(", "));
        slot_context.insert("quest_context".to_string(), player.quest_context.clone());
        slot_context.insert("faction_standing".to_string(), tier.label().to_string());
        slot_context.insert(
            "npc_history".to_string(),
            format!("{} prior interactions", registration.interaction_count),
        );
        if let Some(context) = &dialogue_context {
            slot_context.insert(
                "location".to_string(),
                context["location_type"].as_str().unwrap_or("neutral_ground").to_string(),
            );
            slot_context.insert(
                "time_of_day".to_string(),
                context["time_of_day"].as_str().unwrap_or("noon").to_string(),
            );
            slot_context.insert(
                "npc_mood".to_string(),
                context["npc_mood"].as_str().unwrap_or("neutral").to_string(),
            );
            slot_context.insert(
                "narrative_phase".to_string(),
                context["narrative_phase"].as_str().unwrap_or("introduction").to_string(),
            );
        }

        let context_map: std::collections::HashMap<String, String> =
            slot_context.iter().map(|(k, v)| (k.clone(), v.clone())).collect();

        let mut filled = None;
        for (idx, template) in candidates.iter().enumerate() {
            if let Ok(npc_response) = fill_slots(&template.content, &context_map) {
                let similarity = if idx == 0 { embedding_similarity } else { None };
                filled = Some((npc_response, template.template_id.clone(), similarity));
                break;
            }
        }
        let (npc_response, template_id, similarity) = filled.unwrap_or_else(|| {
            (
                format!("{} has nothing more to say right now.", registration.name),
                "safe_fallback_response".to_string(),
                None,
            )
        });

        let turn = self.session_turn(player_id, npc_id, intent_tags.first().copied());
        phase4.advance_dialogue_turn(&registration.entity_id, realm_id);

        Ok(Response {
            npc_response,
            template_id,
            similarity,
            tier,
            turn,
            slot_snapshot: slot_context,
        })
    }
}
