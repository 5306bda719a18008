//! 2D arcade content provider: a flatter realm of "room" entities and a
//! handful of NPCs, without the district/NPC adjacency-block layout the 3D
//! provider uses.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use multiverse_domain::{Entity, RealmData, RealmType, Stat7Address};

use crate::error::ProviderError;
use crate::provider::ContentProvider;
use crate::realm_spec::RealmSpec;

const ROOM_COUNT_RANGE: std::ops::RangeInclusive<usize> = 1..=4;

#[derive(Debug, Default)]
pub struct Arcade2DProvider;

impl ContentProvider for Arcade2DProvider {
    fn can_generate_realm(&self, spec: &RealmSpec) -> bool {
        spec.realm_type == RealmType::arcade_2d()
    }

    fn generate_realm_content(&self, spec: &RealmSpec) -> Result<RealmData, ProviderError> {
        let mut rng = StdRng::seed_from_u64(spec.seed);
        let room_count = rng.gen_range(ROOM_COUNT_RANGE);

        let mut realm = RealmData::new(spec.id.clone(), spec.realm_type.clone());
        for room_idx in 0..room_count {
            let address = Stat7Address::new(
                spec.realm_index,
                0,
                room_idx as u32,
                0,
                rng.gen_range(0..=100),
                rng.gen_range(0..=100),
                rng.gen_range(0..=100),
            )
            .map_err(|e| ProviderError::Invalid {
                realm_id: spec.id.clone(),
                reason: e.to_string(),
            })?;
            realm.insert_entity(Entity::new(format!("room_{room_idx}"), "room_arcade", address));

            let npc_address = Stat7Address::new(
                spec.realm_index,
                0,
                1000 + room_idx as u32,
                0,
                rng.gen_range(0..=100),
                rng.gen_range(0..=100),
                rng.gen_range(0..=100),
            )
            .map_err(|e| ProviderError::Invalid {
                realm_id: spec.id.clone(),
                reason: e.to_string(),
            })?;
            realm.insert_entity(Entity::new(
                format!("npc_sprite_{room_idx}"),
                "npc_sprite",
                npc_address,
            ));
        }

        if realm.entity_count() == 0 {
            return Err(ProviderError::Empty {
                realm_id: spec.id.clone(),
            });
        }
        Ok(realm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_at_least_one_room_and_one_npc() {
        let provider = Arcade2DProvider;
        let spec = RealmSpec::new("arcade", RealmType::arcade_2d(), 3, 0);
        let realm = provider.generate_realm_content(&spec).unwrap();
        assert!(realm.get_entities_by_type("room_").len() >= 1);
        assert!(realm.get_entities_by_type("npc_").len() >= 1);
    }

    #[test]
    fn rejects_non_arcade_types() {
        let provider = Arcade2DProvider;
        let spec = RealmSpec::new("overworld", RealmType::metvan_3d(), 3, 0);
        assert!(!provider.can_generate_realm(&spec));
    }
}
