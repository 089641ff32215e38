//! Stepwise CLI
//!
//! Offline tool for previewing job submissions and checking pipelines
//! against a catalog snapshot.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use stepwise_engine::{EngineConfig, NamingStrategy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "stepwise")]
#[command(about = "Stepwise pipeline job request CLI", long_about = None)]
struct Cli {
    /// Catalog snapshot (templates, components, pipelines) as JSON
    #[arg(long, env = "STEPWISE_CATALOG", default_value = "catalog.json")]
    catalog: PathBuf,

    /// Execution target recorded on submissions
    #[arg(long, env = "STEPWISE_EXECUTION_TARGET", default_value = "condor")]
    execution_target: String,

    /// Storage path prefix stripped from archive paths
    #[arg(long, env = "STEPWISE_STORAGE_HOME", default_value = "/iplant/home")]
    storage_home: String,

    /// Job name uniqueness strategy (indexed or timestamp)
    #[arg(long, env = "STEPWISE_JOB_NAMING", default_value = "indexed")]
    job_naming: NamingStrategy,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Logs go to stderr so documents on stdout stay parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stepwise_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let engine = EngineConfig::new(cli.execution_target)
        .with_storage_home(cli.storage_home)
        .with_naming(cli.job_naming);
    engine.validate()?;

    let config = Config {
        catalog_path: cli.catalog,
        engine,
    };

    handle_command(cli.command, &config)
}
