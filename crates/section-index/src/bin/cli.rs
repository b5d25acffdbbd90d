//! Section index CLI
//!
//! ```bash
//! # Print the sections of an analysis result as JSON lines
//! section-index sections analysis.json --filename report.pdf --category manuals
//!
//! # Section and submit to the configured search index
//! section-index --config indexer.toml index analysis.json --filename report.pdf
//!
//! # Remove a file's sections from the index
//! section-index --config indexer.toml remove report.pdf
//!
//! # Clear the whole index
//! section-index --config indexer.toml remove --all
//! ```

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use section_index::{
    config::IndexerConfig, providers::InMemorySink, AnalyzedDocument, DocumentIndexer,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "section-index")]
#[command(version)]
#[command(about = "Split analysed documents into provenance-tagged sections", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print tagged sections as JSON lines
    Sections(DocumentArgs),
    /// Section a document and submit it to the search index
    Index(DocumentArgs),
    /// Remove every section of a file from the search index
    Remove {
        /// Source file name as indexed
        #[arg(required_unless_present = "all")]
        filename: Option<String>,

        /// Clear every section in the index
        #[arg(long, conflicts_with = "filename")]
        all: bool,
    },
}

#[derive(Args, Debug)]
struct DocumentArgs {
    /// Analysis result (JSON)
    analysis: PathBuf,

    /// Source file name used for ids and citations
    #[arg(long)]
    filename: String,

    /// Category stored with every section
    #[arg(long)]
    category: Option<String>,
}

fn read_analysis(path: &Path) -> anyhow::Result<AnalyzedDocument> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid analysis in {}", path.display()))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = IndexerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Sections(args) => {
            let analysis = read_analysis(&args.analysis)?;
            let indexer = DocumentIndexer::new(&config, None, Arc::new(InMemorySink::new()))?;
            let records = indexer.sections(&args.filename, &analysis, args.category.as_deref())?;
            for record in records {
                println!("{}", serde_json::to_string(&record)?);
            }
        }
        Commands::Index(args) => {
            let analysis = read_analysis(&args.analysis)?;
            let indexer = DocumentIndexer::from_config(&config)?;
            let report = indexer
                .index_analysis(&args.filename, &analysis, args.category.as_deref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Remove { filename, .. } => {
            let indexer = DocumentIndexer::from_config(&config)?;
            match filename {
                Some(filename) => {
                    let removed = indexer.remove_file(&filename).await?;
                    println!("Removed {} sections of {}", removed, filename);
                }
                None => {
                    let removed = indexer.remove_all().await?;
                    println!("Removed all {} sections", removed);
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "section_index=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
