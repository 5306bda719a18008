pub mod error;
pub mod integration;
pub mod phase2;
pub mod phase3;
pub mod phase4;
pub mod query_service;

pub use error::QueryError;
pub use integration::{integrate_universe, IntegrationReport};
pub use phase2::{NpcRegistration, Phase2Registry, PersonalityLabel, PersonalityTraits};
pub use phase3::{extract_semantic_context, Phase3Registry, SemanticContext};
pub use phase4::{DialogueState, Phase4Registry};
pub use query_service::{
    PlayerProfile, PlayerStatePort, QueryService, QueryServiceConfig, ReputationPort, Response,
};
