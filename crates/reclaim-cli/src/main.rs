//! reclaim - run one garbage collection pass over a cluster fixture

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use reclaim_core::domain::{GcKind, GcRequest};
use reclaim_core::gc::{CoreSchedulerBuilder, GcConfig};
use reclaim_core::ports::FixedClock;

mod fixture;

use fixture::Fixture;

/// Reclaim - garbage collection for cluster scheduler state
#[derive(Parser)]
#[command(name = "reclaim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GC configuration (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Cluster state fixture (JSON)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one collection pass
    Run {
        /// eval, node, job or force
        kind: GcKind,

        /// Snapshot index to read (default: the fixture's latest index)
        #[arg(long)]
        reference_index: Option<u64>,

        /// Print the plan without deleting anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => GcConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => GcConfig::default(),
    };

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Run {
            kind,
            reference_index,
            dry_run,
        } => {
            let fixture = match &cli.state {
                Some(path) => Fixture::load(path)?,
                None => Fixture::default(),
            };
            run(config, fixture, kind, reference_index, dry_run).await?;
        }
    }

    Ok(())
}

async fn run(
    config: GcConfig,
    fixture: Fixture,
    kind: GcKind,
    reference_index: Option<u64>,
    dry_run: bool,
) -> Result<()> {
    let now = fixture.now;
    let (store, table) = fixture.into_store().await;

    let mut builder = CoreSchedulerBuilder::new()
        .config(config)
        .snapshots(store.clone())
        .sink(store.clone())
        .oracle(table);
    if let Some(now) = now {
        builder = builder.clock(Arc::new(FixedClock::new(now)));
    }
    let scheduler = builder.build().context("failed to build scheduler")?;

    let reference_index = match reference_index {
        Some(index) => index.into(),
        None => store.latest_index().await,
    };
    let request = GcRequest::new(kind, reference_index);
    info!(%kind, %reference_index, dry_run, "starting gc");

    if dry_run {
        let plan = scheduler
            .plan(request)
            .await
            .with_context(|| format!("{kind} plan failed"))?;
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        let summary = scheduler
            .process(request)
            .await
            .with_context(|| format!("{kind} run failed"))?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
