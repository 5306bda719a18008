//! Custom provider: hand-registered realms, keyed by realm id. Used for
//! author-authored content that procedural generation should never touch.

use std::collections::HashMap;

use multiverse_domain::{RealmData, RealmType};

use crate::error::ProviderError;
use crate::provider::ContentProvider;
use crate::realm_spec::RealmSpec;

type Generator = Box<dyn Fn(&RealmSpec) -> RealmData + Send + Sync>;

/// Holds one generator closure per registered realm id. `can_generate_realm`
/// only matches realms that were explicitly registered, so a `CustomProvider`
/// never silently swallows a realm meant for another provider.
#[derive(Default)]
pub struct CustomProvider {
    generators: HashMap<String, Generator>,
}

impl CustomProvider {
    pub fn new() -> Self {
        Self {
            generators: HashMap::new(),
        }
    }

    pub fn register(
        &mut self,
        realm_id: impl Into<String>,
        generator: impl Fn(&RealmSpec) -> RealmData + Send + Sync + 'static,
    ) {
        self.generators.insert(realm_id.into(), Box::new(generator));
    }
}

impl ContentProvider for CustomProvider {
    fn can_generate_realm(&self, spec: &RealmSpec) -> bool {
        spec.realm_type == RealmType::custom() && self.generators.contains_key(&spec.id)
    }

    fn generate_realm_content(&self, spec: &RealmSpec) -> Result<RealmData, ProviderError> {
        let generator = self.generators.get(&spec.id).ok_or_else(|| ProviderError::Empty {
            realm_id: spec.id.clone(),
        })?;
        let realm = generator(spec);
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
    use multiverse_domain::{Entity, Stat7Address};

    fn addr() -> Stat7Address {
        Stat7Address::new(0, 0, 0, 0, 0, 0, 0).unwrap()
    }

    #[test]
    fn only_matches_registered_realm_ids() {
        let mut provider = CustomProvider::new();
        provider.register("shrine", |spec| {
            let mut realm = RealmData::new(spec.id.clone(), spec.realm_type.clone());
            realm.insert_entity(Entity::new("npc_keeper".into(), "npc_keeper", addr()));
            realm
        });

        let registered = RealmSpec::new("shrine", RealmType::custom(), 1, 0);
        let unregistered = RealmSpec::new("other", RealmType::custom(), 1, 0);
        assert!(provider.can_generate_realm(&registered));
        assert!(!provider.can_generate_realm(&unregistered));
    }

    #[test]
    fn generate_realm_content_runs_the_registered_closure() {
        let mut provider = CustomProvider::new();
        provider.register("shrine", |spec| {
            let mut realm = RealmData::new(spec.id.clone(), spec.realm_type.clone());
            realm.insert_entity(Entity::new("npc_keeper".into(), "npc_keeper", addr()));
            realm
        });
        let spec = RealmSpec::new("shrine", RealmType::custom(), 1, 0);
        let realm = provider.generate_realm_content(&spec).unwrap();
        assert_eq!(realm.entity_count(), 1);
    }

    #[test]
    fn empty_generator_output_fails() {
        let mut provider = CustomProvider::new();
        provider.register("void", |spec| RealmData::new(spec.id.clone(), spec.realm_type.clone()));
        let spec = RealmSpec::new("void", RealmType::custom(), 1, 0);
        assert!(matches!(
            provider.generate_realm_content(&spec),
            Err(ProviderError::Empty { .. })
        ));
    }
}
