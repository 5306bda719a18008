pub mod config;
pub mod error;
pub mod launch;

pub use config::OrchestratorConfig;
pub use error::OrchestratorError;
pub use launch::{launch_demo, Metadata};
