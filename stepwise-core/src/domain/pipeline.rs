//! Pipeline domain types
//!
//! The serialized form of a pipeline, as the catalog stores it. Steps are
//! referenced by name; the engine turns this into an index-addressed arena.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pipeline definition ("transformation activity")
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub pipeline_type: String,
    #[serde(default)]
    pub wiki_url: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub steps: Vec<StepDefinition>,
    #[serde(default)]
    pub edges: Vec<EdgeDefinition>,
    #[serde(default)]
    pub integration: Option<IntegrationData>,
}

/// One use of a template inside a pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepDefinition {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub template_id: String,
    /// Literal values fixed at authoring time, keyed by parameter id
    #[serde(default)]
    pub overrides: HashMap<String, String>,
}

/// Data flowing from one step to a later one
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDefinition {
    /// Source step name
    pub source: String,
    /// Target step name
    pub target: String,
    #[serde(default)]
    pub mappings: Vec<Mapping>,
}

/// Source-side key to target input id
///
/// A source key prefixed with [`INPUT_REFERENCE_MARKER`] names an input of
/// the source step instead of one of its outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub source: String,
    pub target: String,
}

/// Prefix marking an edge source key as an input of the source step
pub const INPUT_REFERENCE_MARKER: &str = "in#";

/// Who published the pipeline, and when
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationData {
    pub integrator_name: String,
    pub integrator_email: String,
    #[serde(default)]
    pub integration_date: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub edited_date: Option<chrono::DateTime<chrono::Utc>>,
}
