//! Error types for the Stepwise engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Broad classification of an [`EngineError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A pipeline, template, component or output could not be found
    NotFound,
    /// The stored pipeline or template breaks a structural invariant
    MalformedDefinition,
    /// The first step's component names no known backend
    UnrecognizedComponentType,
    /// A parameter type no backend can format
    Unsupported,
    /// The request was refused
    Rejected,
}

/// Errors that can occur while resolving and formatting a job request
#[derive(Debug, Error)]
pub enum EngineError {
    /// No pipeline with the requested id
    #[error("Analysis not found: {0}")]
    AnalysisNotFound(String),

    /// Pipeline exists but has been disabled
    #[error("Analysis {0} is disabled and cannot be submitted")]
    AnalysisDisabled(String),

    /// Pipeline has no steps to run
    #[error("Analysis {0} has no steps")]
    EmptyPipeline(String),

    /// Template referenced by a step is missing
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Template has no deployed component, or the component is missing
    #[error("Deployed component not found for template {template_id}")]
    ComponentNotFound {
        template_id: String,
        component_id: Option<String>,
    },

    /// Edge names an output the source template does not declare
    #[error("Output {output_id} not found in template {template_id}")]
    TemplateLookup {
        template_id: String,
        output_id: String,
    },

    /// First step's component type has no formatter
    #[error("Unrecognized component type: {0}")]
    UnrecognizedComponentType(String),

    /// Parameter type known to the catalog but not to any backend
    #[error("Unsupported parameter type {type_name} for parameter {parameter_id} in step {step}")]
    UnsupportedParameterType {
        step: String,
        parameter_id: String,
        type_name: String,
    },

    /// Edge references a parameter absent from the referenced template
    #[error("Malformed edge into step {step}: {message}")]
    MalformedEdge { step: String, message: String },

    /// Pipeline definition cannot be loaded
    #[error("Malformed definition of analysis {pipeline_id}: {message}")]
    MalformedDefinition {
        pipeline_id: String,
        message: String,
    },

    /// Two edges feed the same input of the same step
    #[error("Input {parameter_id} of step {step} is the target of more than one edge")]
    DuplicateEdgeTarget { step: String, parameter_id: String },

    /// Steps are not stored in a topological order of the edges
    #[error("Cyclic or unordered pipeline: {0}")]
    CyclicOrUnorderedPipeline(String),

    /// Template breaks its own invariants
    #[error("Invalid template {template_id}: {message}")]
    InvalidTemplate {
        template_id: String,
        message: String,
    },

    /// Request payload is unusable
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl EngineError {
    /// Create a malformed-definition error for a pipeline
    pub fn malformed(pipeline_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedDefinition {
            pipeline_id: pipeline_id.into(),
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AnalysisNotFound(_)
            | Self::TemplateNotFound(_)
            | Self::ComponentNotFound { .. }
            | Self::TemplateLookup { .. } => ErrorKind::NotFound,
            Self::EmptyPipeline(_)
            | Self::MalformedEdge { .. }
            | Self::MalformedDefinition { .. }
            | Self::DuplicateEdgeTarget { .. }
            | Self::CyclicOrUnorderedPipeline(_)
            | Self::InvalidTemplate { .. } => ErrorKind::MalformedDefinition,
            Self::UnrecognizedComponentType(_) => ErrorKind::UnrecognizedComponentType,
            Self::UnsupportedParameterType { .. } => ErrorKind::Unsupported,
            Self::AnalysisDisabled(_) | Self::InvalidRequest(_) => ErrorKind::Rejected,
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}
