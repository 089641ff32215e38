//! Job command handlers
//!
//! Formats job requests into submission documents and previews the job
//! name a request would be submitted under.

use anyhow::{Context as _, Result};
use clap::Subcommand;
use colored::*;
use std::path::PathBuf;
use stepwise_core::dto::job::{JobRequest, Owner};
use stepwise_core::dto::submission::SubmissionDocument;
use stepwise_engine::repository::MemoryJobNames;
use stepwise_engine::service::naming_service;
use stepwise_engine::{Context, build_submission};

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Format a job request into a submission document
    Format {
        /// Path to the job request JSON
        #[arg(short, long)]
        request: PathBuf,

        /// Short user name of the job owner
        #[arg(short, long, env = "STEPWISE_USER")]
        user: String,

        /// E-mail address of the job owner
        #[arg(short, long, env = "STEPWISE_EMAIL", default_value = "")]
        email: String,

        /// Names of the owner's existing jobs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        existing: Vec<String>,

        /// Print a summary instead of the JSON document
        #[arg(long)]
        summary: bool,
    },
    /// Show the name a job would be submitted under
    Name {
        /// Requested job name
        name: String,

        /// Names of the owner's existing jobs (comma-separated)
        #[arg(long, value_delimiter = ',')]
        existing: Vec<String>,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
pub fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    match command {
        JobCommands::Format {
            request,
            user,
            email,
            existing,
            summary,
        } => format_job(config, &request, Owner::new(user, email), existing, summary),
        JobCommands::Name { name, existing } => preview_name(config, &name, existing),
    }
}

/// Format a job request read from a file
fn format_job(
    config: &Config,
    request_path: &PathBuf,
    owner: Owner,
    existing: Vec<String>,
    summary: bool,
) -> Result<()> {
    let catalog = config.load_catalog()?;

    let json = std::fs::read_to_string(request_path)
        .with_context(|| format!("Failed to read request file: {}", request_path.display()))?;
    let request: JobRequest = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse request file: {}", request_path.display()))?;

    let job_names = MemoryJobNames::new().with_names(&owner.username, existing);
    let ctx = Context::new(&catalog, &job_names, &config.engine);

    let document = build_submission(&ctx, &request, &owner)
        .with_context(|| format!("Failed to format job request for analysis {}", request.pipeline_id))?;

    if summary {
        print_document_summary(&document);
    } else {
        println!("{}", serde_json::to_string_pretty(&document)?);
    }

    Ok(())
}

/// Preview job name uniqueness
fn preview_name(config: &Config, name: &str, existing: Vec<String>) -> Result<()> {
    const PREVIEW_USER: &str = "preview";
    let job_names = MemoryJobNames::new().with_names(PREVIEW_USER, existing);
    let job_name =
        naming_service::unique_job_name(config.engine.naming, &job_names, PREVIEW_USER, name);

    match job_name.display_name {
        Some(original) => println!(
            "{} {} {}",
            original.yellow(),
            "→".dimmed(),
            job_name.name.green().bold()
        ),
        None => println!("{}", job_name.name.green().bold()),
    }

    Ok(())
}

/// Print a submission summary
fn print_document_summary(document: &SubmissionDocument) {
    println!("{}", "✓ Job request formatted".green().bold());
    println!("  UUID:     {}", document.uuid.to_string().cyan());
    println!("  Name:     {}", document.name.bold());
    if let Some(display_name) = &document.display_name {
        println!("  Display:  {}", display_name.dimmed());
    }
    println!(
        "  Analysis: {} ({})",
        document.analysis_name,
        document.analysis_id.dimmed()
    );
    println!("  Target:   {}", document.execution_target);
    println!("  Output:   {}", document.output_dir.dimmed());

    for step in &document.steps {
        println!();
        println!(
            "  {} {} {}",
            "▸".cyan(),
            step.name.bold(),
            format!("[{}]", step.component.component_type).dimmed()
        );
        println!(
            "    Command: {}/{}",
            step.component.location.dimmed(),
            step.component.name
        );
        for param in &step.config.params {
            let rendered = if param.name.is_empty() {
                param.value.clone()
            } else {
                format!("{} {}", param.name, param.value)
            };
            println!(
                "    {:>3}  {}  {}",
                param.order,
                rendered,
                param.id.dimmed()
            );
        }
        if !step.config.input.is_empty() {
            println!("    Inputs:  {}", step.config.input.len().to_string().dimmed());
        }
        println!("    Outputs: {}", step.config.output.len().to_string().dimmed());
    }
}
