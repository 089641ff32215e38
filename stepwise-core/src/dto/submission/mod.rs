//! Submission document DTOs
//!
//! The document handed to an execution backend. Field names follow the wire
//! format the backends already consume.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::component::DeployedComponent;
use crate::domain::template::Multiplicity;

/// Request type recorded on every submission
pub const REQUEST_TYPE_SUBMIT: &str = "submit";

/// Complete job submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionDocument {
    pub uuid: Uuid,
    pub name: String,
    /// Name the user asked for, present only when `name` had to be changed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub description: String,
    pub request_type: String,
    pub execution_target: String,
    pub username: String,
    pub email: String,
    pub analysis_id: String,
    pub analysis_name: String,
    pub analysis_description: String,
    pub output_dir: String,
    pub create_output_subdir: bool,
    pub notify: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    pub steps: Vec<SubmissionStep>,
}

/// One formatted pipeline step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionStep {
    pub name: String,
    #[serde(rename = "type")]
    pub step_type: String,
    pub component: ComponentSummary,
    pub config: StepConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

/// The parts of a deployed component a backend needs to launch it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub name: String,
    pub location: String,
    #[serde(rename = "type")]
    pub component_type: String,
    pub description: String,
}

impl From<&DeployedComponent> for ComponentSummary {
    fn from(component: &DeployedComponent) -> Self {
        Self {
            name: component.name.clone(),
            location: component.location.clone(),
            component_type: component.component_type.clone(),
            description: component.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepConfig {
    pub params: Vec<Param>,
    pub input: Vec<InputFile>,
    pub output: Vec<OutputFile>,
}

/// Command-line parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub order: i32,
    pub name: String,
    pub value: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplicity: Option<Multiplicity>,
}

/// File staged in before the step runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFile {
    pub id: String,
    pub name: String,
    pub property: String,
    #[serde(rename = "type")]
    pub info_type: String,
    pub value: String,
    pub multiplicity: Multiplicity,
    pub retain: bool,
}

/// File collected after the step completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFile {
    pub id: String,
    pub name: String,
    pub property: String,
    #[serde(rename = "type")]
    pub info_type: String,
    pub multiplicity: Multiplicity,
    pub retain: bool,
}
