//! Service Module
//!
//! Business logic of the engine. Services read from the repositories and
//! never write back; all state lives for one request.

pub mod dispatch;
pub mod formatter;
pub mod naming;
pub mod pipeline;
pub mod registry;
pub mod resolver;

use stepwise_core::dto::job::{JobRequest, Owner};
use stepwise_core::dto::submission::SubmissionDocument;

use crate::config::EngineConfig;
use crate::error::Result;
use crate::repository::{Catalog, JobNameStore};

// Re-export for convenience
pub use dispatch as dispatch_service;
pub use naming as naming_service;
pub use pipeline as pipeline_service;

/// Collaborators a formatting pass reads from
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub catalog: &'a dyn Catalog,
    pub job_names: &'a dyn JobNameStore,
    pub config: &'a EngineConfig,
}

impl<'a> Context<'a> {
    pub fn new(
        catalog: &'a dyn Catalog,
        job_names: &'a dyn JobNameStore,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            catalog,
            job_names,
            config,
        }
    }
}

/// Turn a job request into a submission document
///
/// Selects the backend from the pipeline's first step, then formats every
/// step. Nothing is returned unless every step formats.
pub fn build_submission(
    ctx: &Context<'_>,
    request: &JobRequest,
    owner: &Owner,
) -> Result<SubmissionDocument> {
    let formatter = dispatch::select_formatter(ctx.catalog, &request.pipeline_id)?;
    let document = formatter.format(ctx, request, owner)?;

    tracing::info!(
        "Job {} ({}) formatted with {} step(s)",
        document.name,
        document.uuid,
        document.steps.len()
    );

    Ok(document)
}
