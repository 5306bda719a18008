//! Universe Snapshot & Replay (spec C11): deterministic export plus
//! hash-validated replay.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use multiverse_domain::{StoryElement, Universe};

use crate::bigbang::{BigBang, ProviderRegistry};
use crate::error::EngineError;
use crate::tier::TierRegistry;
use crate::torus::TorusCycleEngine;
use crate::universe_spec::{RealmRequest, UniverseSpec};

/// One entity's exported state: STAT7 plus its enrichment ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityExport {
    pub id: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub address: std::collections::BTreeMap<String, u64>,
    pub enrichments: Option<Vec<String>>,
}

/// One realm's exported state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmExport {
    pub id: String,
    pub realm_type: String,
    pub orbit: u64,
    pub lineage: u64,
    pub entities: Vec<EntityExport>,
}

/// The canonical, serializable export of a universe at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub seed: Option<u64>,
    pub universe_id: String,
    pub universe_hash: String,
    pub tier_assignments: Value,
    pub realms: Vec<RealmExport>,
    pub audit_trail: Option<Value>,
    pub orchestrator_config: Value,
    pub universe_specifications: Value,
    pub export_timestamp: String,
}

/// Gathers immutable identifiers, tier assignments, realms, and (optionally)
/// enrichments/audit trail, then computes the deterministic `universe_hash`.
pub async fn export(
    universe: &Universe,
    tier_registry: Option<&TierRegistry>,
    orchestrator_config: Value,
    universe_specifications: Value,
    include_enrichments: bool,
    include_audit_trail: bool,
    include_governance: bool,
) -> Snapshot {
    let mut realm_ids = universe.realm_ids().await;
    realm_ids.sort();

    let mut realms = Vec::with_capacity(realm_ids.len());
    for realm_id in &realm_ids {
        universe
            .with_realm(realm_id, |realm| {
                let mut entity_ids: Vec<String> = realm.entities().map(|e| e.id().clone()).collect();
                entity_ids.sort();
                let entities = entity_ids
                    .iter()
                    .map(|id| {
                        let entity = realm.get_entity(id).expect("id came from this realm");
                        EntityExport {
                            id: entity.id().clone(),
                            entity_type: entity.entity_type().to_string(),
                            address: entity
                                .address()
                                .to_mapping()
                                .expect("address always valid")
                                .into_iter()
                                .map(|(k, v)| (k.to_string(), v))
                                .collect(),
                            enrichments: include_enrichments.then(|| {
                                entity
                                    .enrichments()
                                    .iter()
                                    .map(|e| e.kind.label().to_string())
                                    .collect()
                            }),
                        }
                    })
                    .collect();
                realms.push(RealmExport {
                    id: realm.id().clone(),
                    realm_type: realm.realm_type().0.clone(),
                    orbit: realm.orbit(),
                    lineage: realm.lineage(),
                    entities,
                });
            })
            .await;
    }

    let tier_assignments = tier_registry
        .map(|registry| {
            let mut map = serde_json::Map::new();
            for realm_id in &realm_ids {
                if let Some(assignment) = registry.get(realm_id) {
                    map.insert(
                        realm_id.clone(),
                        json!({
                            "tier": assignment.tier.label(),
                            "theme": assignment.theme.label(),
                            "tier_depth": assignment.tier_depth,
                        }),
                    );
                }
            }
            Value::Object(map)
        })
        .unwrap_or(Value::Null);

    let cycle_history = universe.cycle_history().await;
    let audit_trail = include_audit_trail.then(|| {
        json!(cycle_history
            .into_iter()
            .map(|c| json!({
                "orbit": c.orbit,
                "realms_updated": c.realms_updated,
                "enrichment_types": c.enrichment_types.iter().map(StoryElement::label).collect::<Vec<_>>(),
            }))
            .collect::<Vec<_>>())
    });
    let _ = include_governance; // governance export is a no-op placeholder: out of scope per spec §1 (no admin UI/authz)

    let universe_hash = compute_universe_hash(universe.initialization_seed(), &realms, &tier_assignments);

    Snapshot {
        seed: universe.initialization_seed(),
        universe_id: universe.id().to_string(),
        universe_hash,
        tier_assignments,
        realms,
        audit_trail,
        orchestrator_config,
        universe_specifications,
        export_timestamp: Utc::now().to_rfc3339(),
    }
}

/// Deterministic fingerprint over `{seed, sorted realm ids, sorted entity ids
/// per realm, STAT7 tuples, enrichment type sequences, tier assignments}`
/// (spec §4.11). Excludes the export timestamp and universe id, which vary
/// run-to-run even with identical simulated state.
fn compute_universe_hash(seed: Option<u64>, realms: &[RealmExport], tier_assignments: &Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(seed.unwrap_or(0).to_le_bytes());
    for realm in realms {
        hasher.update(realm.id.as_bytes());
        hasher.update(realm.realm_type.as_bytes());
        hasher.update(realm.orbit.to_le_bytes());
        hasher.update(realm.lineage.to_le_bytes());
        for entity in &realm.entities {
            hasher.update(entity.id.as_bytes());
            for value in entity.address.values() {
                hasher.update(value.to_le_bytes());
            }
            if let Some(enrichments) = &entity.enrichments {
                for kind in enrichments {
                    hasher.update(kind.as_bytes());
                }
            }
        }
    }
    hasher.update(tier_assignments.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Rebuilds a universe from scratch using the given seed and config, then
/// (optionally) validates the resulting hash against an expected value.
/// Idempotent: repeated calls with identical inputs yield identical hashes.
pub async fn replay_from_seed(
    seed: u64,
    realm_requests: Vec<RealmRequest>,
    orbits: u32,
    enrichment_types: &[StoryElement],
    registry: ProviderRegistry,
    validate_hash: Option<&str>,
) -> Result<Snapshot, EngineError> {
    let spec = UniverseSpec::new(seed, realm_requests);
    let bigbang = BigBang::new(registry);
    let universe = bigbang.initialize_multiverse(&spec).await?;

    let torus = TorusCycleEngine::new();
    for _ in 0..orbits {
        torus
            .execute_torus_cycle(&universe, enrichment_types, None)
            .await
            .map_err(|e| EngineError::CycleFailed(e.to_string()))?;
    }

    let snapshot = export(&universe, None, Value::Null, Value::Null, true, true, false).await;

    if let Some(expected) = validate_hash {
        if expected != snapshot.universe_hash {
            return Err(EngineError::ReplayValidationError {
                expected: expected.to_string(),
                actual: snapshot.universe_hash,
            });
        }
    }
    Ok(snapshot)
}
