//! The Universe: owns every realm, the current orbit, and the append-only
//! cycle history. Orbit advancement is serialized through an internal
//! mutual-exclusion primitive (spec §4.2 concurrency contract).

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::entity::StoryElement;
use crate::ids::{RealmId, UniverseId};
use crate::realm::RealmData;

/// A single torus-cycle record appended to `cycle_history`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleRecord {
    pub orbit: u64,
    pub realms_updated: Vec<RealmId>,
    pub enrichment_types: Vec<StoryElement>,
}

/// Owns every realm and the orbit counter. Cheap to clone a handle to (wrap
/// in `Arc<Universe>`); the orbit-advance lock lives inside.
#[derive(Debug)]
pub struct Universe {
    id: UniverseId,
    realms: Mutex<BTreeMap<RealmId, RealmData>>,
    current_orbit: Mutex<u64>,
    cycle_history: Mutex<Vec<CycleRecord>>,
    initialization_seed: Option<u64>,
    initialization_time_ms: Mutex<Option<u64>>,
}

impl Universe {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            id: UniverseId::new(),
            realms: Mutex::new(BTreeMap::new()),
            current_orbit: Mutex::new(0),
            cycle_history: Mutex::new(Vec::new()),
            initialization_seed: seed,
            initialization_time_ms: Mutex::new(None),
        }
    }

    pub fn id(&self) -> UniverseId {
        self.id
    }

    pub fn initialization_seed(&self) -> Option<u64> {
        self.initialization_seed
    }

    pub async fn set_initialization_time_ms(&self, ms: u64) {
        *self.initialization_time_ms.lock().await = Some(ms);
    }

    pub async fn initialization_time_ms(&self) -> Option<u64> {
        *self.initialization_time_ms.lock().await
    }

    pub async fn current_orbit(&self) -> u64 {
        *self.current_orbit.lock().await
    }

    /// Attach a fully generated realm. Only called during `BigBang`
    /// initialization, before the universe is shared with other callers.
    pub async fn insert_realm(&self, realm: RealmData) {
        self.realms.lock().await.insert(realm.id().clone(), realm);
    }

    pub async fn realm_ids(&self) -> Vec<RealmId> {
        self.realms.lock().await.keys().cloned().collect()
    }

    pub async fn with_realm<R>(&self, id: &str, f: impl FnOnce(&RealmData) -> R) -> Option<R> {
        self.realms.lock().await.get(id).map(f)
    }

    pub async fn with_realm_mut<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut RealmData) -> R,
    ) -> Option<R> {
        self.realms.lock().await.get_mut(id).map(f)
    }

    pub async fn realm_count(&self) -> usize {
        self.realms.lock().await.len()
    }

    pub async fn total_entity_count(&self) -> usize {
        self.realms
            .lock()
            .await
            .values()
            .map(|r| r.entity_count())
            .sum()
    }

    pub async fn entity_counts_by_realm(&self) -> BTreeMap<RealmId, usize> {
        self.realms
            .lock()
            .await
            .iter()
            .map(|(id, r)| (id.clone(), r.entity_count()))
            .collect()
    }

    pub async fn cycle_history(&self) -> Vec<CycleRecord> {
        self.cycle_history.lock().await.clone()
    }

    pub async fn push_cycle_record(&self, record: CycleRecord) {
        self.cycle_history.lock().await.push(record);
    }

    /// The single mutation point for orbit/lineage increments, serialized by
    /// locking every realm for the duration of the bump. `current_orbit`
    /// increases by exactly 1; every realm's `orbit` is set to match and its
    /// `lineage` increases by exactly 1; every entity's address advances.
    pub async fn advance_orbit(&self) -> u64 {
        let mut realms = self.realms.lock().await;
        let mut orbit_guard = self.current_orbit.lock().await;
        *orbit_guard += 1;
        let new_orbit = *orbit_guard;
        for realm in realms.values_mut() {
            realm.advance(new_orbit);
            for entity in realm.entities_mut() {
                let advanced = entity.address().advance_orbit();
                // Entities only ever advance forward from here, so this
                // cannot hit `LineageRegression`.
                entity
                    .advance_to_orbit(advanced)
                    .expect("orbit advance never regresses lineage");
            }
        }
        new_orbit
    }
}

/// Convenience alias used throughout the engine/adapters crates: a universe
/// is always shared behind an `Arc` once `BigBang` hands it off.
pub type SharedUniverse = Arc<Universe>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::realm::RealmType;
    use crate::stat7::Stat7Address;

    fn addr(lineage: u64) -> Stat7Address {
        Stat7Address::new(0, lineage, 0, 0, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn advance_orbit_increments_orbit_and_lineage_exactly_once() {
        let universe = Universe::new(Some(42));
        let mut realm = RealmData::new("overworld".to_string(), RealmType::metvan_3d());
        realm.insert_entity(Entity::new("npc_1".into(), "npc_guard", addr(0)));
        universe.insert_realm(realm).await;

        universe.advance_orbit().await;

        assert_eq!(universe.current_orbit().await, 1);
        universe
            .with_realm("overworld", |r| {
                assert_eq!(r.orbit(), 1);
                assert_eq!(r.lineage(), 1);
                assert_eq!(r.get_entity("npc_1").unwrap().address().lineage(), 1);
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn two_advances_increment_lineage_by_exactly_two() {
        let universe = Universe::new(None);
        let mut realm = RealmData::new("tavern".to_string(), RealmType::custom());
        realm.insert_entity(Entity::new("npc_1".into(), "npc_bartender", addr(0)));
        universe.insert_realm(realm).await;

        universe.advance_orbit().await;
        universe.advance_orbit().await;

        assert_eq!(universe.current_orbit().await, 2);
        universe
            .with_realm("tavern", |r| {
                assert_eq!(r.get_entity("npc_1").unwrap().address().lineage(), 2);
            })
            .await
            .unwrap();
    }
}
