//! `launch_demo` (spec C12): the sole composition root that wires
//! providers, BigBang, the torus cycle, and adapter integration together.

use std::collections::BTreeMap;

use multiverse_adapters::{integrate_universe, Phase2Registry, Phase3Registry, Phase4Registry};
use multiverse_domain::{Entity, RealmData, RealmId, RealmType, StoryElement, Stat7Address};
use multiverse_engine::{export, BigBang, ProviderRegistry, RealmRequest, UniverseSpec};
use multiverse_providers::{Arcade2DProvider, CustomProvider, Procedural3DProvider};
use serde_json::json;

use crate::error::OrchestratorError;

const TAVERN_KEEPER_NAMES: &[&str] = &["Oswin", "Maribel", "Halric"];
const DUNGEON_GUARDIAN_NAMES: &[&str] = &["Vorn", "Ysolde", "Kragg"];

/// Hand-authored, non-procedural realm: a fixed cast of NPCs at distinct
/// adjacency slots, deterministic regardless of seed (spec §4.12 step 2).
fn authored_realm(names: &[&str], npc_type: &str) -> impl Fn(&multiverse_providers::RealmSpec) -> RealmData + Send + Sync {
    let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
    let npc_type = npc_type.to_string();
    move |spec| {
        let mut realm = RealmData::new(spec.id.clone(), spec.realm_type.clone());
        for (idx, name) in names.iter().enumerate() {
            let address = Stat7Address::new(spec.realm_index, 0, idx as u32, 0, 50, 50, 50)
                .expect("fixed authored coordinates are always valid");
            let npc_id = format!("npc_{}_{}", npc_type, name.to_lowercase());
            realm.insert_entity(Entity::new(npc_id, format!("npc_{npc_type}"), address));
        }
        realm
    }
}

/// Metadata returned from a completed demo run (spec §4.12 step 6).
#[derive(Debug, Clone)]
pub struct Metadata {
    pub seed: u64,
    pub universe_id: String,
    pub universe_hash: String,
    pub realms: BTreeMap<RealmId, usize>,
    pub total_entities: usize,
    pub total_orbits_completed: u64,
    pub initialization_time_ms: u64,
}

/// Providers registered in deterministic priority order: the 3D and 2D
/// procedural generators outrank the empty custom provider, which exists so
/// callers can register ad-hoc generator closures for custom realm ids.
fn default_provider_registry() -> ProviderRegistry {
    let mut custom = CustomProvider::new();
    custom.register("tavern", authored_realm(TAVERN_KEEPER_NAMES, "keeper"));
    custom.register("dungeon", authored_realm(DUNGEON_GUARDIAN_NAMES, "guardian"));

    let mut registry = ProviderRegistry::new();
    registry.register(30, Box::new(Procedural3DProvider));
    registry.register(20, Box::new(Arcade2DProvider));
    registry.register(10, Box::new(custom));
    registry
}

/// Closed mapping of known realm ids to the realm type a provider expects
/// (spec §4.12 step 2: "any unknown realm id fails with UnknownRealm").
fn realm_type_for_id(realm_id: &str) -> Option<RealmType> {
    match realm_id {
        "overworld" | "metvan" => Some(RealmType::metvan_3d()),
        "tavern" | "dungeon" => Some(RealmType::custom()),
        "arcade" | "minigame" => Some(RealmType::arcade_2d()),
        _ => None,
    }
}

pub async fn launch_demo(
    seed: u64,
    orbits: u32,
    realm_ids: &[String],
    enrichment_types: &[StoryElement],
) -> Result<Metadata, OrchestratorError> {
    let realm_requests = realm_ids
        .iter()
        .map(|id| {
            realm_type_for_id(id)
                .map(|realm_type| RealmRequest::new(id.clone(), realm_type))
                .ok_or_else(|| OrchestratorError::UnknownRealm(id.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let registry = default_provider_registry();
    let bigbang = BigBang::new(registry);
    let spec = UniverseSpec::new(seed, realm_requests);
    let universe = bigbang.initialize_multiverse(&spec).await?;
    tracing::info!(seed, realm_count = realm_ids.len(), "multiverse initialized");

    let torus = multiverse_engine::TorusCycleEngine::new();
    for orbit in 0..orbits {
        torus.execute_torus_cycle(&universe, enrichment_types, None).await?;
        tracing::debug!(orbit, "torus cycle complete");
    }

    let mut phase2 = Phase2Registry::new();
    let mut phase3 = Phase3Registry::new();
    let mut phase4 = Phase4Registry::new();
    let report = integrate_universe(&universe, &mut phase2, &mut phase3, &mut phase4).await;
    if !report.errors.is_empty() {
        tracing::warn!(errors = ?report.errors, "integrate_universe recorded per-entity failures");
    }

    let config_json = json!({ "seed": seed, "orbits": orbits, "realms": realm_ids });
    let snapshot = export(&universe, None, config_json, json!(realm_ids), false, false, false).await;

    Ok(Metadata {
        seed,
        universe_id: snapshot.universe_id,
        universe_hash: snapshot.universe_hash,
        realms: universe.entity_counts_by_realm().await,
        total_entities: universe.total_entity_count().await,
        total_orbits_completed: universe.current_orbit().await,
        initialization_time_ms: universe.initialization_time_ms().await.unwrap_or(0),
    })
}
