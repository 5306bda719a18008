//! Query-service errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("unknown npc: {0}")]
    UnknownNpc(String),

    #[error("unknown player: {0}")]
    UnknownPlayer(String),
}
