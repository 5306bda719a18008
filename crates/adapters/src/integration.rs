//! `integrate_universe`: runs the three phase adapters over every realm and
//! entity in a universe (spec §4.10). Unlike `BigBang`, per-entity failures
//! are captured rather than aborting the whole pass, because adapter output
//! is derived and safe to re-run.

use multiverse_domain::Universe;

use crate::phase2::{register_entity_as_npc, Phase2Registry};
use crate::phase3::Phase3Registry;
use crate::phase4::Phase4Registry;

#[derive(Debug, Clone, Default)]
pub struct IntegrationReport {
    pub realms_integrated: usize,
    pub npcs_registered: usize,
    pub semantic_contexts: usize,
    pub dialogue_sessions: usize,
    pub errors: Vec<String>,
}

pub async fn integrate_universe(
    universe: &Universe,
    phase2: &mut Phase2Registry,
    phase3: &mut Phase3Registry,
    phase4: &mut Phase4Registry,
) -> IntegrationReport {
    let mut report = IntegrationReport::default();
    let current_orbit = universe.current_orbit().await;
    let realm_ids = universe.realm_ids().await;

    for realm_id in &realm_ids {
        let outcome = universe
            .with_realm(realm_id, |realm| {
                let mut local_errors = Vec::new();
                let mut local_npcs = 0;
                let mut local_contexts = 0;
                let mut local_sessions = 0;

                for entity in realm.entities() {
                    if entity.id().is_empty() {
                        local_errors.push(format!("realm {realm_id}: entity has an empty id"));
                        continue;
                    }

                    phase3.extract_and_register(entity, realm_id);
                    local_contexts += 1;

                    if entity.is_npc() {
                        let registration = register_entity_as_npc(entity, realm_id, None);
                        let npc_name = registration.name.clone();
                        phase2.register(registration);
                        local_npcs += 1;

                        phase4.initialize_dialogue_state(entity, &npc_name, realm_id, current_orbit);
                        local_sessions += 1;
                    }
                }

                (local_errors, local_npcs, local_contexts, local_sessions)
            })
            .await;

        match outcome {
            Some((errors, npcs, contexts, sessions)) => {
                report.errors.extend(errors);
                report.npcs_registered += npcs;
                report.semantic_contexts += contexts;
                report.dialogue_sessions += sessions;
                report.realms_integrated += 1;
            }
            None => report.errors.push(format!("realm {realm_id} vanished mid-integration")),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiverse_domain::{Entity, RealmData, RealmType, Stat7Address, StoryElement};
    use chrono::Utc;
    use serde_json::json;

    fn addr() -> Stat7Address {
        Stat7Address::new(0, 0, 0, 0, 0, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn integrates_npcs_and_districts_across_one_realm() {
        let universe = Universe::new(Some(1));
        let mut realm = RealmData::new("tavern".to_string(), RealmType::custom());
        let mut npc = Entity::new("npc_1".to_string(), "npc_bartender", addr());
        npc.enrich(StoryElement::Dialogue, json!({}), Utc::now());
        npc.enrich(StoryElement::NpcHistory, json!({}), Utc::now());
        realm.insert_entity(npc);
        realm.insert_entity(Entity::new("district_1".to_string(), "district_market", addr()));
        universe.insert_realm(realm).await;

        let mut phase2 = Phase2Registry::new();
        let mut phase3 = Phase3Registry::new();
        let mut phase4 = Phase4Registry::new();
        let report = integrate_universe(&universe, &mut phase2, &mut phase3, &mut phase4).await;

        assert_eq!(report.realms_integrated, 1);
        assert_eq!(report.npcs_registered, 1);
        assert_eq!(report.semantic_contexts, 2);
        assert_eq!(report.dialogue_sessions, 1);
        assert!(report.errors.is_empty());

        assert!(phase2.get_npc("npc_tavern_npc_1").is_some());
        assert!(phase3.get("district_1").is_some());
        assert!(phase4.get("npc_1", "tavern").is_some());
    }

    #[tokio::test]
    async fn s4_scenario_two_npcs_two_cycles_of_dialogue_and_history() {
        let universe = Universe::new(Some(42));
        let mut realm = RealmData::new("tavern".to_string(), RealmType::custom());
        realm.insert_entity(Entity::new("npc_1".to_string(), "npc_bartender", addr()));
        realm.insert_entity(Entity::new("npc_2".to_string(), "npc_patron", addr()));
        universe.insert_realm(realm).await;

        let engine = multiverse_engine::TorusCycleEngine::new();
        for _ in 0..2 {
            engine
                .execute_torus_cycle(
                    &universe,
                    &[StoryElement::Dialogue, StoryElement::NpcHistory],
                    None,
                )
                .await
                .unwrap();
        }

        let mut phase2 = Phase2Registry::new();
        let mut phase3 = Phase3Registry::new();
        let mut phase4 = Phase4Registry::new();
        integrate_universe(&universe, &mut phase2, &mut phase3, &mut phase4).await;

        let npcs = phase2.get_realm_npcs("tavern");
        assert_eq!(npcs.len(), 2);
        for npc in &npcs {
            assert!(npc.personality_traits.enriched_dimensions.contains("dialogue"));
            assert!(npc.personality_traits.enriched_dimensions.contains("npc_history"));
        }

        let by_topic = phase3.search_by_topic("dialogue");
        assert_eq!(by_topic.len(), 2);

        let context = phase4.get_dialogue_context("npc_1", "tavern", 2).unwrap();
        assert_eq!(context["location_type"], "tavern");
        assert_eq!(context["time_of_day"], "noon");
    }
}
