//! Atomic universe initialization (spec C4).

use std::sync::Arc;
use std::time::Instant;

use multiverse_domain::{SharedUniverse, Universe};
use multiverse_providers::{ContentProvider, RealmSpec};

use crate::error::EngineError;
use crate::universe_spec::UniverseSpec;

struct Registration {
    priority: i32,
    insertion_order: usize,
    provider: Box<dyn ContentProvider>,
}

/// Providers are tried highest-priority first; equal priority falls back to
/// stable insertion order (spec §4.4: "tie-break by stable insertion order").
#[derive(Default)]
pub struct ProviderRegistry {
    registrations: Vec<Registration>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, priority: i32, provider: Box<dyn ContentProvider>) {
        let insertion_order = self.registrations.len();
        self.registrations.push(Registration {
            priority,
            insertion_order,
            provider,
        });
    }

    fn select(&self, spec: &RealmSpec) -> Option<&dyn ContentProvider> {
        let mut candidates: Vec<&Registration> = self
            .registrations
            .iter()
            .filter(|r| r.provider.can_generate_realm(spec))
            .collect();
        candidates.sort_by_key(|r| (std::cmp::Reverse(r.priority), r.insertion_order));
        candidates.first().map(|r| r.provider.as_ref())
    }
}

/// Drives `ProviderRegistry` selection into a fully populated `Universe`.
pub struct BigBang {
    registry: ProviderRegistry,
}

impl BigBang {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Builds every realm into a scratch buffer first; only on full success
    /// is a `Universe` constructed and handed back, so a failing call never
    /// exposes a partially initialized universe to the caller (spec §4.4
    /// atomicity, §8: "no Universe observable to a caller contains any
    /// partially initialized realm").
    pub async fn initialize_multiverse(
        &self,
        spec: &UniverseSpec,
    ) -> Result<SharedUniverse, EngineError> {
        let started = Instant::now();
        let mut realms = Vec::with_capacity(spec.realms.len());

        for (index, request) in spec.realms.iter().enumerate() {
            let realm_spec = RealmSpec::new(
                request.id.clone(),
                request.realm_type.clone(),
                spec.seed ^ index as u64,
                index as u32,
            )
            .with_anchors(request.anchors.clone());

            let provider = self.registry.select(&realm_spec).ok_or_else(|| EngineError::NoProvider {
                realm_id: request.id.clone(),
            })?;

            let realm = provider.generate_realm_content(&realm_spec).map_err(|e| {
                EngineError::BigBangFailed {
                    realm_id: request.id.clone(),
                    source: Box::new(EngineError::Provider(e)),
                }
            })?;
            realms.push(realm);
        }

        let universe = Arc::new(Universe::new(Some(spec.seed)));
        for realm in realms {
            universe.insert_realm(realm).await;
        }
        universe
            .set_initialization_time_ms(started.elapsed().as_millis() as u64)
            .await;
        tracing::info!(realm_count = spec.realms.len(), seed = spec.seed, "big bang complete");
        Ok(universe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use multiverse_domain::RealmType;
    use multiverse_providers::{Arcade2DProvider, CustomProvider, Procedural3DProvider};

    use crate::universe_spec::RealmRequest;

    #[tokio::test]
    async fn initializes_every_realm_in_spec_order() {
        let mut registry = ProviderRegistry::new();
        registry.register(10, Box::new(Procedural3DProvider));
        registry.register(5, Box::new(Arcade2DProvider));
        let bigbang = BigBang::new(registry);

        let spec = UniverseSpec::new(
            42,
            vec![
                RealmRequest::new("overworld", RealmType::metvan_3d()),
                RealmRequest::new("minigame", RealmType::arcade_2d()),
            ],
        );

        let universe = bigbang.initialize_multiverse(&spec).await.unwrap();
        assert_eq!(universe.realm_count().await, 2);
        assert!(universe.initialization_time_ms().await.is_some());
    }

    #[tokio::test]
    async fn no_provider_fails_without_exposing_partial_universe() {
        let registry = ProviderRegistry::new();
        let bigbang = BigBang::new(registry);
        let spec = UniverseSpec::new(1, vec![RealmRequest::new("overworld", RealmType::metvan_3d())]);
        let result = bigbang.initialize_multiverse(&spec).await;
        assert!(matches!(result, Err(EngineError::NoProvider { .. })));
    }

    #[tokio::test]
    async fn failure_on_second_realm_leaves_no_universe() {
        let mut registry = ProviderRegistry::new();
        registry.register(10, Box::new(Procedural3DProvider));
        registry.register(10, Box::new(CustomProvider::new()));
        let bigbang = BigBang::new(registry);

        let spec = UniverseSpec::new(
            1,
            vec![
                RealmRequest::new("overworld", RealmType::metvan_3d()),
                RealmRequest::new("unregistered_custom_realm", RealmType::custom()),
            ],
        );
        let result = bigbang.initialize_multiverse(&spec).await;
        assert!(result.is_err());
    }
}
