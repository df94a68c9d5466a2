//! Showcase CLI — batch entry points for the submission-to-asset pipeline.
//!
//! Both commands drive the same orchestrator; they differ only in where the
//! submissions come from. Configuration is environment-driven (see
//! `PipelineConfig::from_env`); a `.env` file is honored.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use showcase_cli::init_tracing;
use showcase_core::{BatchError, PipelineConfig, Submission, SubmissionResult};
use showcase_ingest::{extract_records, extract_rows, SourceFields};
use showcase_pipeline::{export_archive, AirtableStore, PipelineOrchestrator, RecordReconciler};
use showcase_processing::AssetTransform;
use showcase_storage::{create_store, AssetStore};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "showcase", about = "Community showcase asset pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a spreadsheet export (CSV)
    RunCsv {
        /// Path to the exported CSV file
        file: PathBuf,
        /// Write a ZIP of all published assets to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },
    /// Process submissions straight from the external record store
    RunStore {
        /// Write a ZIP of all published assets to this path
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct RunReport {
    submissions: usize,
    assets_published: usize,
    slot_failures: usize,
    reconciled: usize,
    results: Vec<SubmissionResult>,
}

impl RunReport {
    fn new(results: Vec<SubmissionResult>) -> Self {
        RunReport {
            submissions: results.len(),
            assets_published: results.iter().map(|r| r.assets.len()).sum(),
            slot_failures: results.iter().map(|r| r.slot_errors.len()).sum(),
            reconciled: results
                .iter()
                .filter(|r| r.reconciliation.as_ref().is_some_and(|o| o.matched))
                .count(),
            results,
        }
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize report")?;
    println!("{}", out);
    Ok(())
}

/// Build the one orchestrator both entry points share.
async fn build_pipeline(
    config: &PipelineConfig,
) -> anyhow::Result<(PipelineOrchestrator, Arc<dyn AssetStore>)> {
    let store = create_store(&config.storage, config.publish_timeout)
        .await
        .context("Configure asset store")?;

    let transformer = Arc::new(AssetTransform::new(
        Arc::clone(&store),
        config.download_timeout,
    )?);

    let reconciler = match &config.record_store {
        Some(record_store) => Some(RecordReconciler::new(
            Arc::new(AirtableStore::new(record_store)?),
            config.field_schema.clone(),
        )),
        None => {
            tracing::info!("Record store not configured; reconciliation will be skipped");
            None
        }
    };

    let orchestrator = PipelineOrchestrator::new(
        transformer,
        reconciler,
        config.profiles,
        config.max_concurrent_slots,
    );
    Ok((orchestrator, store))
}

async fn run(
    config: &PipelineConfig,
    submissions: Vec<Submission>,
    export: Option<PathBuf>,
) -> anyhow::Result<()> {
    tracing::info!(count = submissions.len(), "Processing submissions");

    let (orchestrator, store) = build_pipeline(config).await?;
    let results = orchestrator.run(&submissions).await;

    if let Some(path) = export {
        let archive = export_archive(store, &results).await?;
        std::fs::write(&path, archive)
            .with_context(|| format!("Write archive to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote asset archive");
    }

    print_json(&RunReport::new(results))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = PipelineConfig::from_env()?;

    match cli.command {
        Commands::RunCsv { file, export } => {
            // Failure to read the input source is the only hard failure.
            let text = std::fs::read_to_string(&file)
                .map_err(|e| BatchError::Input(format!("{}: {}", file.display(), e)))?;

            let rows = showcase_ingest::parse(&text);
            let submissions = extract_rows(&rows);
            run(&config, submissions, export).await
        }
        Commands::RunStore { export } => {
            let record_store = config
                .record_store
                .as_ref()
                .context("run-store requires AIRTABLE_API_KEY, AIRTABLE_BASE_ID, and AIRTABLE_TABLE")?;

            let client = AirtableStore::new(record_store)?;
            let records = showcase_pipeline::RecordStore::list(&client)
                .await
                .map_err(|e| BatchError::Input(e.to_string()))?;

            let submissions = extract_records(&records, &SourceFields::default());
            run(&config, submissions, export).await
        }
    }
}
