//! Realms: a named collection of entities advancing together through orbits.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::ids::{EntityId, RealmId};

/// The kind of content a realm was generated from. Not a closed enum in the
/// spec ("one of {METVAN_3D, CUSTOM, ARCADE_2D, ...}") — providers may
/// register additional realm types, so this wraps a string with named
/// constructors for the spec's built-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealmType(pub String);

impl RealmType {
    pub const METVAN_3D: &'static str = "METVAN_3D";
    pub const CUSTOM: &'static str = "CUSTOM";
    pub const ARCADE_2D: &'static str = "ARCADE_2D";

    pub fn metvan_3d() -> Self {
        Self(Self::METVAN_3D.to_string())
    }

    pub fn custom() -> Self {
        Self(Self::CUSTOM.to_string())
    }

    pub fn arcade_2d() -> Self {
        Self(Self::ARCADE_2D.to_string())
    }
}

/// A realm's entities and advancement counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealmData {
    id: RealmId,
    realm_type: RealmType,
    entities: BTreeMap<EntityId, Entity>,
    orbit: u64,
    lineage: u64,
}

impl RealmData {
    pub fn new(id: RealmId, realm_type: RealmType) -> Self {
        Self {
            id,
            realm_type,
            entities: BTreeMap::new(),
            orbit: 0,
            lineage: 0,
        }
    }

    pub fn id(&self) -> &RealmId {
        &self.id
    }

    pub fn realm_type(&self) -> &RealmType {
        &self.realm_type
    }

    pub fn orbit(&self) -> u64 {
        self.orbit
    }

    pub fn lineage(&self) -> u64 {
        self.lineage
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.values_mut()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn get_entity(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    pub fn get_entity_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    pub fn insert_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.id().clone(), entity);
    }

    /// Ordered sub-sequence of entities whose `type` starts with `prefix`.
    pub fn get_entities_by_type(&self, prefix: &str) -> Vec<&Entity> {
        self.entities
            .values()
            .filter(|e| e.entity_type().starts_with(prefix))
            .collect()
    }

    /// Called by `Universe::advance_orbit`: bump the realm's own counters to
    /// match the universe's new orbit.
    pub(crate) fn advance(&mut self, new_orbit: u64) {
        self.orbit = new_orbit;
        self.lineage += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat7::Stat7Address;

    fn addr() -> Stat7Address {
        Stat7Address::new(0, 0, 0, 0, 0, 0, 0).unwrap()
    }

    #[test]
    fn get_entities_by_type_filters_by_prefix() {
        let mut realm = RealmData::new("tavern".to_string(), RealmType::custom());
        realm.insert_entity(Entity::new("npc_1".into(), "npc_bartender", addr()));
        realm.insert_entity(Entity::new("district_1".into(), "district_market", addr()));
        realm.insert_entity(Entity::new("npc_2".into(), "npc_patron", addr()));

        let npcs = realm.get_entities_by_type("npc_");
        assert_eq!(npcs.len(), 2);
    }

    #[test]
    fn advance_bumps_orbit_and_lineage() {
        let mut realm = RealmData::new("overworld".to_string(), RealmType::metvan_3d());
        realm.advance(1);
        assert_eq!(realm.orbit(), 1);
        assert_eq!(realm.lineage(), 1);
    }
}
