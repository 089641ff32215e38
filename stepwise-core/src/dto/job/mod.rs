//! Job request DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_true() -> bool {
    true
}

/// Request to turn a pipeline into a job submission
///
/// `config` maps `"<step name>_<parameter id>"` to the value the user chose.
/// Values for `many` parameters may be JSON arrays or JSON-array-encoded strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(alias = "analysis_id")]
    pub pipeline_id: String,
    #[serde(default, alias = "outputDirectory", alias = "output_dir")]
    pub output_directory: String,
    #[serde(default)]
    pub config: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub notify: bool,
    /// Retain every intermediate file
    #[serde(default)]
    pub debug: bool,
    /// Job id chosen by the caller; a fresh one is generated otherwise
    #[serde(default)]
    pub uuid: Option<Uuid>,
    #[serde(default = "default_true")]
    pub create_output_subdir: bool,
    #[serde(default)]
    pub callback: Option<String>,
}

impl JobRequest {
    /// Looks up a configuration entry
    pub fn config_entry(&self, key: &str) -> Option<&serde_json::Value> {
        self.config.as_ref().and_then(|config| config.get(key))
    }
}

/// The user a job is submitted for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    /// Short user name, used for job-name uniqueness and proxying
    pub username: String,
    pub email: String,
}

impl Owner {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }
}
