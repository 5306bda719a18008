//! The Torus Cycle Engine: concurrent enrichment cycles with locking
//! (spec C5).

use std::sync::Arc;

use serde_json::json;
use tokio::sync::Mutex;

use multiverse_domain::{CycleRecord, Entity, StoryElement, Universe};

use crate::error::EngineError;

/// Delegation point for the `SEMANTIC_CONTEXT` handler (spec §4.5: "delegated
/// to adapter re-run"). `multiverse-engine` cannot depend on
/// `multiverse-adapters` (the dependency runs the other way, since adapters
/// read a `Universe`), so the Phase-3 adapter is injected as a port; the
/// orchestrator crate wires the real implementation in. Without one, the
/// handler falls back to a minimal semantic-context payload.
pub trait SemanticReprojectionPort: Send + Sync {
    fn reproject(&self, entity: &Entity, realm_id: &str) -> serde_json::Value;
}

/// Serializes `execute_torus_cycle` calls so two cycles on the same universe
/// never interleave their handler passes (spec §4.5, §5 ordering guarantees).
#[derive(Clone, Default)]
pub struct TorusCycleEngine {
    lock: Arc<Mutex<()>>,
}

impl TorusCycleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn execute_torus_cycle(
        &self,
        universe: &Universe,
        enrichment_types: &[StoryElement],
        reprojector: Option<&dyn SemanticReprojectionPort>,
    ) -> Result<CycleRecord, EngineError> {
        let _guard = self.lock.lock().await;

        let realm_ids = universe.realm_ids().await;
        let now = chrono::Utc::now();

        for enrichment_type in enrichment_types {
            for realm_id in &realm_ids {
                universe
                    .with_realm_mut(realm_id, |realm| {
                        dispatch_handler(realm.entities_mut(), *enrichment_type, realm_id, now, reprojector)
                    })
                    .await;
            }
        }

        let new_orbit = universe.advance_orbit().await;

        let record = CycleRecord {
            orbit: new_orbit,
            realms_updated: realm_ids,
            enrichment_types: enrichment_types.to_vec(),
        };
        universe.push_cycle_record(record.clone()).await;
        Ok(record)
    }
}

fn dispatch_handler<'a>(
    mut entities: impl Iterator<Item = &'a mut Entity>,
    enrichment_type: StoryElement,
    realm_id: &str,
    now: chrono::DateTime<chrono::Utc>,
    reprojector: Option<&dyn SemanticReprojectionPort>,
) {
    match enrichment_type {
        StoryElement::Dialogue => {
            for entity in entities.filter(|e| e.is_npc()) {
                entity.enrich(StoryElement::Dialogue, json!({ "note": "dialogue exchanged" }), now);
            }
        }
        StoryElement::NpcHistory => {
            for entity in entities.filter(|e| e.is_npc()) {
                entity.enrich(StoryElement::NpcHistory, json!({ "note": "history recorded" }), now);
            }
        }
        StoryElement::Quest => {
            if let Some(entity) = entities.find(|e| e.is_npc()) {
                entity.enrich(StoryElement::Quest, json!({ "note": "quest offered" }), now);
            } else {
                tracing::debug!(realm_id, "no NPC entity to assign a quest to; skipping");
            }
        }
        StoryElement::Contradiction => {
            for entity in entities.filter(|e| e.metadata().contains_key("contradictions")) {
                entity.enrich(
                    StoryElement::Contradiction,
                    json!({ "timeline_reconciliation": true, "resolution_orbit": serde_json::Value::Null }),
                    now,
                );
            }
        }
        StoryElement::SemanticContext => {
            for entity in entities {
                let data = match reprojector {
                    Some(port) => port.reproject(entity, realm_id),
                    None => json!({ "note": "semantic context reprojected" }),
                };
                entity.enrich(StoryElement::SemanticContext, data, now);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiverse_domain::{RealmData, RealmType, Stat7Address};

    fn addr() -> Stat7Address {
        Stat7Address::new(0, 0, 0, 0, 0, 0, 0).unwrap()
    }

    async fn sample_universe() -> Universe {
        let universe = Universe::new(Some(1));
        let mut realm = RealmData::new("tavern".to_string(), RealmType::custom());
        realm.insert_entity(Entity::new("npc_bartender".into(), "npc_bartender", addr()));
        universe.insert_realm(realm).await;
        universe
    }

    #[tokio::test]
    async fn dialogue_cycle_enriches_npcs_and_advances_orbit() {
        let universe = sample_universe().await;
        let engine = TorusCycleEngine::new();
        let record = engine
            .execute_torus_cycle(&universe, &[StoryElement::Dialogue], None)
            .await
            .unwrap();

        assert_eq!(record.orbit, 1);
        assert_eq!(universe.current_orbit().await, 1);
        universe
            .with_realm("tavern", |r| {
                assert_eq!(r.get_entity("npc_bartender").unwrap().enrichment_count(), 1);
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn quest_handler_skips_realms_with_no_npc() {
        let universe = Universe::new(None);
        let realm = RealmData::new("empty_realm".to_string(), RealmType::custom());
        universe.insert_realm(realm).await;
        let engine = TorusCycleEngine::new();
        let record = engine
            .execute_torus_cycle(&universe, &[StoryElement::Quest], None)
            .await
            .unwrap();
        assert_eq!(record.orbit, 1);
    }

    #[tokio::test]
    async fn two_concurrent_cycles_with_disjoint_types_advance_orbit_by_two() {
        let universe = Arc::new(sample_universe().await);
        let engine = TorusCycleEngine::new();

        let u1 = universe.clone();
        let e1 = engine.clone();
        let u2 = universe.clone();
        let e2 = engine.clone();

        let (r1, r2) = tokio::join!(
            e1.execute_torus_cycle(&u1, &[StoryElement::Dialogue], None),
            e2.execute_torus_cycle(&u2, &[StoryElement::NpcHistory], None),
        );
        r1.unwrap();
        r2.unwrap();

        assert_eq!(universe.current_orbit().await, 2);
        universe
            .with_realm("tavern", |r| {
                assert_eq!(r.get_entity("npc_bartender").unwrap().address().lineage(), 2);
            })
            .await
            .unwrap();
    }
}
