//! Job Request Formatters
//!
//! Walks a pipeline step by step, resolves every slot and assembles the
//! submission document for the selected backend.

mod batch;
pub mod params;
mod remote;

use tracing::info;
use uuid::Uuid;

use stepwise_core::domain::component::DeployedComponent;
use stepwise_core::domain::template::Template;
use stepwise_core::dto::job::{JobRequest, Owner};
use stepwise_core::dto::submission::{REQUEST_TYPE_SUBMIT, SubmissionDocument, SubmissionStep};

use super::Context;
use super::naming::{self, JobName};
use super::pipeline::Pipeline;
use super::registry::ValueRegistry;
use super::resolver::{Resolution, Resolver, Slot, Value, slots};
use crate::error::{EngineError, Result};
use crate::repository::Catalog;

/// Backend a pipeline is formatted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formatter {
    /// Batch cluster running `executable` components
    Batch,
    /// Remote API running `fAPI` components
    RemoteApi,
}

/// A slot with the value it resolved to
pub(crate) struct ResolvedSlot<'a> {
    pub slot: Slot<'a>,
    pub value: Value,
}

/// Everything a backend needs to format one step
pub(crate) struct StepInput<'a> {
    pub name: &'a str,
    pub component: &'a DeployedComponent,
    pub slots: Vec<ResolvedSlot<'a>>,
    pub job_name: &'a JobName,
    pub request: &'a JobRequest,
    pub owner: &'a Owner,
}

impl Formatter {
    /// Format a job request into a submission document
    pub fn format(
        &self,
        ctx: &Context<'_>,
        request: &JobRequest,
        owner: &Owner,
    ) -> Result<SubmissionDocument> {
        if request.name.trim().is_empty() {
            return Err(EngineError::InvalidRequest("job name is required".to_string()));
        }

        let (pipeline, templates) = load_pipeline(ctx.catalog, &request.pipeline_id)?;

        let job_name = naming::unique_job_name(
            ctx.config.naming,
            ctx.job_names,
            &owner.username,
            &request.name,
        );

        info!(
            "Formatting job {} for {} ({} steps, {:?})",
            job_name.name,
            owner.username,
            pipeline.steps.len(),
            self
        );

        let resolver = Resolver::new(&pipeline, &templates, request);
        let mut registry = ValueRegistry::new();
        let mut steps = Vec::with_capacity(pipeline.steps.len());

        for (index, (step, template)) in pipeline.steps.iter().zip(&templates).enumerate() {
            let component = load_component(ctx, template)?;

            let mut resolved = Vec::new();
            for slot in slots(template) {
                if let Resolution::Value { value, .. } = resolver.resolve(index, &slot, &mut registry)? {
                    resolved.push(ResolvedSlot { slot, value });
                }
            }
            registry.mark_visited(index);

            let input = StepInput {
                name: &step.name,
                component: &component,
                slots: resolved,
                job_name: &job_name,
                request,
                owner,
            };

            let formatted = match self {
                Self::Batch => batch::format_step(ctx, input)?,
                Self::RemoteApi => remote::format_step(ctx, input)?,
            };
            steps.push(formatted);
        }

        Ok(assemble(ctx, &pipeline, request, owner, job_name, steps))
    }
}

/// Load a pipeline with the template of every step
///
/// Runs every structural check that does not depend on a job request:
/// the pipeline must exist and be enabled, its steps must be ordered, its
/// templates must be well formed and every edge must connect real slots.
pub fn load_pipeline(catalog: &dyn Catalog, pipeline_id: &str) -> Result<(Pipeline, Vec<Template>)> {
    let definition = catalog
        .find_pipeline(pipeline_id)
        .ok_or_else(|| EngineError::AnalysisNotFound(pipeline_id.to_string()))?;

    if definition.disabled {
        return Err(EngineError::AnalysisDisabled(definition.id.clone()));
    }

    let pipeline = Pipeline::from_definition(&definition)?;
    let templates = load_templates(catalog, &pipeline)?;
    pipeline.validate_edges(&templates)?;

    Ok((pipeline, templates))
}

fn load_templates(catalog: &dyn Catalog, pipeline: &Pipeline) -> Result<Vec<Template>> {
    pipeline
        .steps
        .iter()
        .map(|step| -> Result<Template> {
            let template = catalog
                .find_template(&step.template_id)
                .ok_or_else(|| EngineError::TemplateNotFound(step.template_id.clone()))?;
            template
                .validate()
                .map_err(|message| EngineError::InvalidTemplate {
                    template_id: template.id.clone(),
                    message,
                })?;
            Ok(template)
        })
        .collect()
}

fn load_component(ctx: &Context<'_>, template: &Template) -> Result<DeployedComponent> {
    template
        .component_id
        .as_deref()
        .and_then(|id| ctx.catalog.find_component(id))
        .ok_or_else(|| EngineError::ComponentNotFound {
            template_id: template.id.clone(),
            component_id: template.component_id.clone(),
        })
}

fn assemble(
    ctx: &Context<'_>,
    pipeline: &Pipeline,
    request: &JobRequest,
    owner: &Owner,
    job_name: JobName,
    steps: Vec<SubmissionStep>,
) -> SubmissionDocument {
    SubmissionDocument {
        uuid: request.uuid.unwrap_or_else(Uuid::new_v4),
        name: job_name.name,
        display_name: job_name.display_name,
        description: request.description.clone(),
        request_type: REQUEST_TYPE_SUBMIT.to_string(),
        execution_target: ctx.config.execution_target.clone(),
        username: owner.username.clone(),
        email: owner.email.clone(),
        analysis_id: pipeline.id.clone(),
        analysis_name: pipeline.name.clone(),
        analysis_description: pipeline.description.clone(),
        output_dir: request.output_directory.clone(),
        create_output_subdir: request.create_output_subdir,
        notify: request.notify,
        callback: request.callback.clone(),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::error::ErrorKind;
    use crate::repository::MemoryJobNames;
    use crate::service::dispatch::REMOTE_API_COMPONENT;
    use crate::testing;

    #[test]
    fn test_empty_job_header() {
        let catalog = testing::catalog(REMOTE_API_COMPONENT);
        let names = MemoryJobNames::new();
        let config = EngineConfig::default();
        let ctx = Context::new(&catalog, &names, &config);

        let doc = Formatter::RemoteApi
            .format(&ctx, &testing::request(testing::ONE_EMPTY_STEP), &testing::owner())
            .unwrap();

        assert_eq!(doc.analysis_id, testing::ONE_EMPTY_STEP);
        assert_eq!(doc.analysis_name, "name of analysis with one empty step");
        assert_eq!(doc.analysis_description, "description of analysis with one empty step");
        assert_eq!(doc.description, "empty description");
        assert_eq!(doc.execution_target, "condor");
        assert_eq!(doc.name, "empty");
        assert!(doc.display_name.is_none());
        assert!(!doc.notify);
        assert_eq!(doc.request_type, "submit");
        assert_eq!(doc.username, "someuser");
        assert_eq!(doc.email, "someuser@example.com");
        assert_eq!(doc.steps.len(), 1);
    }

    #[test]
    fn test_request_uuid_is_honoured() {
        let catalog = testing::catalog(REMOTE_API_COMPONENT);
        let names = MemoryJobNames::new();
        let config = EngineConfig::default();
        let ctx = Context::new(&catalog, &names, &config);

        let mut request = testing::request(testing::ONE_EMPTY_STEP);
        let id = Uuid::new_v4();
        request.uuid = Some(id);

        let doc = Formatter::Batch.format(&ctx, &request, &testing::owner()).unwrap();
        assert_eq!(doc.uuid, id);
    }

    #[test]
    fn test_non_unique_job_name() {
        let catalog = testing::catalog(REMOTE_API_COMPONENT);
        let names = MemoryJobNames::new().with_names("someuser", ["empty"]);
        let config = EngineConfig::default();
        let ctx = Context::new(&catalog, &names, &config);

        let doc = Formatter::RemoteApi
            .format(&ctx, &testing::request(testing::ONE_EMPTY_STEP), &testing::owner())
            .unwrap();
        assert_eq!(doc.name, "empty-1");
        assert_eq!(doc.display_name.as_deref(), Some("empty"));

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["display_name"], "empty");
    }

    #[test]
    fn test_empty_pipeline_formats_no_steps() {
        let catalog = testing::catalog(REMOTE_API_COMPONENT);
        let names = MemoryJobNames::new();
        let config = EngineConfig::default();
        let ctx = Context::new(&catalog, &names, &config);

        let doc = Formatter::RemoteApi
            .format(&ctx, &testing::request(testing::EMPTY), &testing::owner())
            .unwrap();
        assert!(doc.steps.is_empty());
        assert_eq!(doc.analysis_name, "empty analysis name");
    }

    #[test]
    fn test_invalid_template_rejected() {
        let mut template = testing::properties_template();
        template.groups[0].parameters[0].type_name = "Input".to_string();
        template.groups[0].parameters[0].data_object = Some("missing".to_string());
        let catalog = testing::catalog(REMOTE_API_COMPONENT).with_template(template);
        let names = MemoryJobNames::new();
        let config = EngineConfig::default();
        let ctx = Context::new(&catalog, &names, &config);

        let err = Formatter::RemoteApi
            .format(&ctx, &testing::request(testing::PROPERTIES), &testing::owner())
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidTemplate { .. }));
        assert_eq!(err.kind(), ErrorKind::MalformedDefinition);
    }

    #[test]
    fn test_malformed_edge_rejected() {
        let mut pipeline = testing::catalog(REMOTE_API_COMPONENT)
            .find_pipeline(testing::MULTISTEP)
            .unwrap();
        pipeline.edges[0].mappings[0].target = "notAnInput".to_string();
        let catalog = testing::catalog(REMOTE_API_COMPONENT).with_pipeline(pipeline);
        let names = MemoryJobNames::new();
        let config = EngineConfig::default();
        let ctx = Context::new(&catalog, &names, &config);

        let err = Formatter::RemoteApi
            .format(&ctx, &testing::request_with_config(testing::MULTISTEP), &testing::owner())
            .unwrap_err();
        assert!(matches!(err, EngineError::MalformedEdge { .. }));
    }

    #[test]
    fn test_blank_job_name_rejected() {
        let catalog = testing::catalog(REMOTE_API_COMPONENT);
        let names = MemoryJobNames::new();
        let config = EngineConfig::default();
        let ctx = Context::new(&catalog, &names, &config);

        let mut request = testing::request(testing::ONE_EMPTY_STEP);
        request.name = " ".to_string();
        let err = Formatter::Batch.format(&ctx, &request, &testing::owner()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
    }

    #[test]
    fn test_load_pipeline_checks_structure() {
        let catalog = testing::catalog(REMOTE_API_COMPONENT);

        let (pipeline, templates) = load_pipeline(&catalog, testing::MULTISTEP).unwrap();
        assert_eq!(pipeline.steps.len(), templates.len());

        let err = load_pipeline(&catalog, "missing").unwrap_err();
        assert!(err.is_not_found());
    }
}
