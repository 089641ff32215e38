//! In-memory repositories
//!
//! Backed by plain maps. The catalog can be loaded from a JSON snapshot
//! shaped `{ "templates": [..], "components": [..], "pipelines": [..] }`.

use serde::Deserialize;
use std::collections::HashMap;

use stepwise_core::domain::component::DeployedComponent;
use stepwise_core::domain::pipeline::PipelineDefinition;
use stepwise_core::domain::template::Template;

use super::{Catalog, JobNameStore};

/// Serialized catalog contents
#[derive(Debug, Default, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub templates: Vec<Template>,
    #[serde(default)]
    pub components: Vec<DeployedComponent>,
    #[serde(default)]
    pub pipelines: Vec<PipelineDefinition>,
}

#[derive(Debug, Default)]
pub struct MemoryCatalog {
    templates: HashMap<String, Template>,
    components: HashMap<String, DeployedComponent>,
    pipelines: HashMap<String, PipelineDefinition>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        let mut catalog = Self::new();
        for template in snapshot.templates {
            catalog.insert_template(template);
        }
        for component in snapshot.components {
            catalog.insert_component(component);
        }
        for pipeline in snapshot.pipelines {
            catalog.insert_pipeline(pipeline);
        }
        catalog
    }

    /// Parses a JSON catalog snapshot
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn insert_template(&mut self, template: Template) {
        self.templates.insert(template.id.clone(), template);
    }

    pub fn insert_component(&mut self, component: DeployedComponent) {
        self.components.insert(component.id.clone(), component);
    }

    pub fn insert_pipeline(&mut self, pipeline: PipelineDefinition) {
        self.pipelines.insert(pipeline.id.clone(), pipeline);
    }

    pub fn with_template(mut self, template: Template) -> Self {
        self.insert_template(template);
        self
    }

    pub fn with_component(mut self, component: DeployedComponent) -> Self {
        self.insert_component(component);
        self
    }

    pub fn with_pipeline(mut self, pipeline: PipelineDefinition) -> Self {
        self.insert_pipeline(pipeline);
        self
    }

    /// All pipelines, sorted by name
    pub fn pipelines(&self) -> Vec<&PipelineDefinition> {
        let mut pipelines: Vec<_> = self.pipelines.values().collect();
        pipelines.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        pipelines
    }
}

impl Catalog for MemoryCatalog {
    fn find_template(&self, id: &str) -> Option<Template> {
        self.templates.get(id).cloned()
    }

    fn find_component(&self, id: &str) -> Option<DeployedComponent> {
        self.components.get(id).cloned()
    }

    fn find_pipeline(&self, id: &str) -> Option<PipelineDefinition> {
        self.pipelines.get(id).cloned()
    }
}

/// Job names keyed by user name
#[derive(Debug, Default)]
pub struct MemoryJobNames {
    names: HashMap<String, Vec<String>>,
}

impl MemoryJobNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, username: &str, name: impl Into<String>) {
        self.names
            .entry(username.to_string())
            .or_default()
            .push(name.into());
    }

    pub fn with_names<I, S>(mut self, username: &str, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.record(username, name);
        }
        self
    }
}

impl JobNameStore for MemoryJobNames {
    fn list_job_names(&self, username: &str) -> Vec<String> {
        self.names.get(username).cloned().unwrap_or_default()
    }
}
