//! Orchestrator-level errors.

use multiverse_engine::EngineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("invalid config: unrecognized option `{0}`")]
    InvalidConfig(String),

    #[error("invalid config: {reason}")]
    InvalidConfigValue { reason: String },

    #[error("unknown realm id: {0}")]
    UnknownRealm(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}
