//! Section index server binary
//!
//! Run with: cargo run -p section-index --bin section-index-server [config.toml]
//!
//! The config path may also be given in `SECTION_INDEX_CONFIG`.

use section_index::{config::IndexerConfig, server::IndexServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "section_index=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SECTION_INDEX_CONFIG").ok())
        .map(PathBuf::from);

    let config = IndexerConfig::load(config_path.as_deref())?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Max section length: {}", config.sectioning.max_section_length);
    tracing::info!("  - Sentence search limit: {}", config.sectioning.sentence_search_limit);
    tracing::info!("  - Section overlap: {}", config.sectioning.section_overlap);
    tracing::info!("  - Batch size: {}", config.batching.batch_size);

    let server = IndexServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/file/upload   - Analyze and index a file");
    println!("  POST /api/sections      - Index an analysis result");
    println!("  POST /api/file/remove   - Remove a file's sections");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
