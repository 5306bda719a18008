//! Multiverse Orchestrator - composition root for the demo binary.
//!
//! No HTTP/CLI surface (out of scope per spec §1): this runs one demo
//! `launch_demo` call against the default realm set and prints metadata.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use multiverse_domain::StoryElement;
use multiverse_orchestrator::launch_demo;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "multiverse_orchestrator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Multiverse Orchestrator demo");

    let realms = vec!["overworld".to_string(), "tavern".to_string()];
    let enrichment_types = [StoryElement::Dialogue, StoryElement::NpcHistory];
    let metadata = launch_demo(42, 2, &realms, &enrichment_types).await?;

    tracing::info!(
        universe_id = %metadata.universe_id,
        universe_hash = %metadata.universe_hash,
        total_entities = metadata.total_entities,
        total_orbits_completed = metadata.total_orbits_completed,
        initialization_time_ms = metadata.initialization_time_ms,
        "demo complete"
    );

    Ok(())
}
