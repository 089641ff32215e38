//! Backend Dispatcher
//!
//! Picks the formatter for a pipeline from the component type of the tool
//! behind its first step.

use tracing::info;

use super::formatter::Formatter;
use crate::error::{EngineError, Result};
use crate::repository::Catalog;

/// Component type run by the batch cluster
pub const EXECUTABLE_COMPONENT: &str = "executable";

/// Component type run through the remote API
pub const REMOTE_API_COMPONENT: &str = "fAPI";

/// Select the formatter for a pipeline
pub fn select_formatter(catalog: &dyn Catalog, pipeline_id: &str) -> Result<Formatter> {
    let pipeline = catalog
        .find_pipeline(pipeline_id)
        .ok_or_else(|| EngineError::AnalysisNotFound(pipeline_id.to_string()))?;

    if pipeline.disabled {
        return Err(EngineError::AnalysisDisabled(pipeline_id.to_string()));
    }

    let first = pipeline
        .steps
        .first()
        .ok_or_else(|| EngineError::EmptyPipeline(pipeline_id.to_string()))?;

    let template = catalog
        .find_template(&first.template_id)
        .ok_or_else(|| EngineError::TemplateNotFound(first.template_id.clone()))?;

    let component = template
        .component_id
        .as_deref()
        .and_then(|id| catalog.find_component(id))
        .ok_or_else(|| EngineError::ComponentNotFound {
            template_id: template.id.clone(),
            component_id: template.component_id.clone(),
        })?;

    let formatter = match component.component_type.as_str() {
        EXECUTABLE_COMPONENT => Formatter::Batch,
        REMOTE_API_COMPONENT => Formatter::RemoteApi,
        other => return Err(EngineError::UnrecognizedComponentType(other.to_string())),
    };

    info!(
        "Analysis {} dispatched to {:?} formatter (component {})",
        pipeline_id, formatter, component.name
    );

    Ok(formatter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::repository::MemoryCatalog;
    use crate::testing;

    #[test]
    fn test_dispatch_by_component_type() {
        let remote = testing::catalog(REMOTE_API_COMPONENT);
        let batch = testing::catalog(EXECUTABLE_COMPONENT);

        for id in [testing::PROPERTIES, testing::INPUTS, testing::MULTISTEP] {
            assert_eq!(select_formatter(&remote, id).unwrap(), Formatter::RemoteApi);
            assert_eq!(select_formatter(&batch, id).unwrap(), Formatter::Batch);
        }
    }

    #[test]
    fn test_unknown_component_type() {
        let catalog = testing::catalog("deployed component type");
        let err = select_formatter(&catalog, testing::PROPERTIES).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedComponentType);
    }

    #[test]
    fn test_missing_pipeline() {
        let catalog = testing::catalog(REMOTE_API_COMPONENT);
        let err = select_formatter(&catalog, "nope").unwrap_err();
        assert!(matches!(err, EngineError::AnalysisNotFound(_)));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_pipeline() {
        let catalog = testing::catalog(REMOTE_API_COMPONENT);
        let err = select_formatter(&catalog, testing::EMPTY).unwrap_err();
        assert!(matches!(err, EngineError::EmptyPipeline(_)));
    }

    #[test]
    fn test_disabled_pipeline() {
        let mut pipeline = testing::catalog(REMOTE_API_COMPONENT)
            .find_pipeline(testing::PROPERTIES)
            .unwrap();
        pipeline.disabled = true;
        let catalog = testing::catalog(REMOTE_API_COMPONENT).with_pipeline(pipeline);

        let err = select_formatter(&catalog, testing::PROPERTIES).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Rejected);
    }

    #[test]
    fn test_missing_template_and_component() {
        let catalog = MemoryCatalog::new().with_pipeline(
            testing::catalog(REMOTE_API_COMPONENT)
                .find_pipeline(testing::PROPERTIES)
                .unwrap(),
        );
        let err = select_formatter(&catalog, testing::PROPERTIES).unwrap_err();
        assert!(matches!(err, EngineError::TemplateNotFound(_)));

        let mut template = testing::properties_template();
        template.component_id = None;
        let catalog = catalog.with_template(template);
        let err = select_formatter(&catalog, testing::PROPERTIES).unwrap_err();
        assert!(matches!(err, EngineError::ComponentNotFound { component_id: None, .. }));
    }
}
