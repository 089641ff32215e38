//! Deployed component domain types

use serde::{Deserialize, Serialize};

/// A tool installed on an execution backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeployedComponent {
    pub id: String,
    pub name: String,
    pub location: String,
    /// Backend tag, e.g. "executable" or "fAPI"
    #[serde(rename = "type")]
    pub component_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub attribution: Option<String>,
}
