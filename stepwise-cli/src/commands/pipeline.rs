//! Pipeline command handlers
//!
//! Lists the pipelines of a catalog snapshot, shows their steps and edges,
//! and checks that a pipeline is ready to be formatted.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use stepwise_core::domain::pipeline::PipelineDefinition;
use stepwise_engine::repository::{Catalog, MemoryCatalog};
use stepwise_engine::service::dispatch_service;
use stepwise_engine::service::formatter::load_pipeline;

use crate::config::Config;

/// Pipeline subcommands
#[derive(Subcommand)]
pub enum PipelineCommands {
    /// List all pipelines in the catalog
    List,
    /// Get pipeline details
    Get {
        /// Pipeline ID
        id: String,
    },
    /// Check that a pipeline can be formatted
    Validate {
        /// Pipeline ID
        id: String,
    },
}

/// Handle pipeline commands
///
/// Routes pipeline subcommands to their respective handlers.
pub fn handle_pipeline_command(command: PipelineCommands, config: &Config) -> Result<()> {
    let catalog = config.load_catalog()?;

    match command {
        PipelineCommands::List => list_pipelines(&catalog),
        PipelineCommands::Get { id } => get_pipeline(&catalog, &id),
        PipelineCommands::Validate { id } => validate_pipeline(&catalog, &id),
    }
}

/// List all pipelines
fn list_pipelines(catalog: &MemoryCatalog) -> Result<()> {
    let pipelines = catalog.pipelines();

    if pipelines.is_empty() {
        println!("{}", "No pipelines found.".yellow());
    } else {
        println!(
            "{}",
            format!("Found {} pipeline(s):", pipelines.len()).bold()
        );
        println!();
        for pipeline in pipelines {
            print_pipeline_summary(pipeline);
        }
    }

    Ok(())
}

/// Get and display a single pipeline
fn get_pipeline(catalog: &MemoryCatalog, id: &str) -> Result<()> {
    let pipeline = catalog
        .find_pipeline(id)
        .with_context(|| format!("Pipeline not found: {}", id))?;

    print_pipeline_details(catalog, &pipeline);

    Ok(())
}

/// Run the structural checks a formatting pass would run
fn validate_pipeline(catalog: &MemoryCatalog, id: &str) -> Result<()> {
    let formatter = dispatch_service::select_formatter(catalog, id)
        .with_context(|| format!("Pipeline {} has no usable backend", id))?;
    let (pipeline, templates) =
        load_pipeline(catalog, id).with_context(|| format!("Pipeline {} is invalid", id))?;

    println!(
        "{}",
        format!("✓ Pipeline {} is valid", pipeline.name).green().bold()
    );
    println!("  Backend: {}", format!("{:?}", formatter).cyan());
    println!("  Steps:   {}", pipeline.steps.len());
    println!("  Edges:   {}", pipeline.edges.len());

    let slot_count: usize = templates
        .iter()
        .map(|template| template.parameters().count() + template.inputs.len() + template.outputs.len())
        .sum();
    println!("  Slots:   {}", slot_count.to_string().dimmed());

    Ok(())
}

/// Print a pipeline summary
fn print_pipeline_summary(pipeline: &PipelineDefinition) {
    let status = if pipeline.disabled {
        " (disabled)".red().to_string()
    } else {
        String::new()
    };
    println!("  {} {}{}", "▸".cyan(), pipeline.name.bold(), status);
    println!("    ID:    {}", pipeline.id.dimmed());
    println!("    Steps: {}", pipeline.steps.len().to_string().dimmed());
    if !pipeline.description.is_empty() {
        println!("    Description: {}", pipeline.description.dimmed());
    }
    println!();
}

/// Print detailed pipeline information
fn print_pipeline_details(catalog: &MemoryCatalog, pipeline: &PipelineDefinition) {
    println!("{}", "Pipeline Details:".bold());
    println!("  ID:          {}", pipeline.id.cyan());
    println!("  Name:        {}", pipeline.name.bold());
    if !pipeline.description.is_empty() {
        println!("  Description: {}", pipeline.description);
    }
    if pipeline.disabled {
        println!("  Status:      {}", "disabled".red());
    }
    if let Some(integration) = &pipeline.integration {
        println!(
            "  Integrator:  {} <{}>",
            integration.integrator_name, integration.integrator_email
        );
        if let Some(date) = integration.integration_date {
            println!("  Integrated:  {}", date.format("%Y-%m-%d %H:%M:%S"));
        }
    }

    println!();
    println!("{}", "Steps:".bold());
    for step in &pipeline.steps {
        let template = catalog.find_template(&step.template_id);
        let template_name = template
            .as_ref()
            .map(|template| template.name.as_str())
            .unwrap_or("<missing template>");
        println!(
            "  {} {} {}",
            "▸".cyan(),
            step.name.bold(),
            format!("[{}]", template_name).dimmed()
        );
        let mut overrides: Vec<_> = step.overrides.iter().collect();
        overrides.sort();
        for (parameter_id, value) in overrides {
            println!("    {} = {}", parameter_id.cyan(), value);
        }
    }

    if !pipeline.edges.is_empty() {
        println!();
        println!("{}", "Edges:".bold());
        for edge in &pipeline.edges {
            println!("  {} → {}", edge.source.cyan(), edge.target.cyan());
            for mapping in &edge.mappings {
                println!("    {} → {}", mapping.source, mapping.target.dimmed());
            }
        }
    }
}
