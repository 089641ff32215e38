//! Repository Module
//!
//! Read access to the data the engine consumes but does not own.
//! Lookups hand out owned snapshots; a formatting pass never writes back.

pub mod memory;

use stepwise_core::domain::component::DeployedComponent;
use stepwise_core::domain::pipeline::PipelineDefinition;
use stepwise_core::domain::template::Template;

// Re-export for convenience
pub use memory::{MemoryCatalog, MemoryJobNames};

/// Lookup of templates, deployed components and pipelines by id
pub trait Catalog: Send + Sync {
    fn find_template(&self, id: &str) -> Option<Template>;

    fn find_component(&self, id: &str) -> Option<DeployedComponent>;

    fn find_pipeline(&self, id: &str) -> Option<PipelineDefinition>;
}

/// Names of the jobs a user has already submitted
pub trait JobNameStore: Send + Sync {
    fn list_job_names(&self, username: &str) -> Vec<String>;
}
