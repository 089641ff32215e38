//! Parameter Resolver
//!
//! Computes the effective value of every slot of a step. First hit wins:
//! user configuration, step override, inbound edge (inputs only), template
//! default. Input and plain values are recorded in the registry so that
//! later steps can read them.

use serde_json::Value as JsonValue;
use tracing::debug;

use stepwise_core::domain::template::{DataObject, Multiplicity, Parameter, ParameterType, Template};
use stepwise_core::dto::job::JobRequest;

use super::pipeline::{Edge, Pipeline, input_reference};
use super::registry::ValueRegistry;
use crate::error::{EngineError, Result};

/// One resolvable unit of a template
#[derive(Debug, Clone, Copy)]
pub enum Slot<'a> {
    /// Parameter not backed by a data object
    Plain(&'a Parameter),
    /// Input data object, optionally exposed through an Input parameter
    Input {
        data_object: &'a DataObject,
        parameter: Option<&'a Parameter>,
    },
    /// Output data object, optionally exposed through an Output parameter
    Output {
        data_object: &'a DataObject,
        parameter: Option<&'a Parameter>,
    },
}

impl<'a> Slot<'a> {
    /// Id used for configuration keys, overrides and edge targets
    pub fn id(&self) -> &'a str {
        match *self {
            Self::Plain(parameter) => &parameter.id,
            Self::Input { data_object, .. } | Self::Output { data_object, .. } => &data_object.id,
        }
    }

    fn parameter(&self) -> Option<&'a Parameter> {
        match *self {
            Self::Plain(parameter) => Some(parameter),
            Self::Input { parameter, .. } | Self::Output { parameter, .. } => parameter,
        }
    }

    fn omit_if_blank(&self) -> bool {
        self.parameter().is_some_and(|p| p.omit_if_blank)
    }

    /// Only inputs take JSON-array values
    fn accepts_many(&self) -> bool {
        matches!(self, Self::Input { data_object, .. } if data_object.multiplicity == Multiplicity::Many)
    }

    fn default_value(&self) -> Option<String> {
        match self {
            Self::Plain(parameter) => parameter.default_value.clone(),
            Self::Input { parameter, .. } => parameter.and_then(|p| p.default_value.clone()),
            Self::Output { data_object, .. } => Some(data_object.name.clone()),
        }
    }

    /// Name the value is recorded under; outputs are not recorded
    fn registry_name(&self) -> Option<&'a str> {
        match *self {
            Self::Plain(parameter) => Some(&parameter.name),
            Self::Input { data_object, .. } => Some(&data_object.id),
            Self::Output { .. } => None,
        }
    }
}

/// Slots of a template, parameters first in group order, then data objects
/// no parameter exposes
pub fn slots(template: &Template) -> Vec<Slot<'_>> {
    let mut slots: Vec<Slot<'_>> = Vec::new();

    for parameter in template.parameters() {
        let data_object = parameter.data_object.as_deref();
        let slot = match (parameter.parameter_type(), data_object) {
            (ParameterType::Input, Some(id)) => template.find_input(id).map(|data_object| Slot::Input {
                data_object,
                parameter: Some(parameter),
            }),
            (ParameterType::Output, Some(id)) => template.find_output(id).map(|data_object| Slot::Output {
                data_object,
                parameter: Some(parameter),
            }),
            _ => Some(Slot::Plain(parameter)),
        };
        slots.extend(slot);
    }

    let owned = |id: &str| template.parameter_for_data_object(id).is_some();

    slots.extend(
        template
            .inputs
            .iter()
            .filter(|input| !owned(&input.id))
            .map(|data_object| Slot::Input {
                data_object,
                parameter: None,
            }),
    );
    slots.extend(
        template
            .outputs
            .iter()
            .filter(|output| !owned(&output.id))
            .map(|data_object| Slot::Output {
                data_object,
                parameter: None,
            }),
    );

    slots
}

/// Resolved value, a single string or an ordered list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Single(String),
    Many(Vec<String>),
}

impl Value {
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Single(value) => value.trim().is_empty(),
            Self::Many(values) => values.iter().all(|value| value.trim().is_empty()),
        }
    }

    pub fn items(&self) -> Vec<&str> {
        match self {
            Self::Single(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// The value as one string; longer lists are rendered as a JSON array
    pub fn text(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::Many(values) => match values.as_slice() {
                [] => String::new(),
                [value] => value.clone(),
                _ => JsonValue::from(values.clone()).to_string(),
            },
        }
    }

    fn map(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            Self::Single(value) => Self::Single(f(&value)),
            Self::Many(values) => Self::Many(values.iter().map(|value| f(value)).collect()),
        }
    }
}

/// Which precedence rule produced a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Config,
    Override,
    Edge,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Value { value: Value, source: ValueSource },
    /// Blank value of an omit-if-blank parameter
    Suppressed,
    Absent,
}

/// Strip the leading `/zone/home` segments from a data-store path
///
/// `/iplant/home/someuser/x` becomes `/someuser/x`. Paths with fewer than
/// two leading segments are returned unchanged.
pub fn strip_storage_prefix(path: &str) -> &str {
    let Some(rest) = path.strip_prefix('/') else {
        return path;
    };
    let Some(first) = rest.find('/') else {
        return path;
    };
    let after = &rest[first + 1..];
    match after.find('/') {
        Some(second) => &after[second..],
        None => "",
    }
}

fn json_text(value: &JsonValue) -> String {
    match value {
        JsonValue::String(text) => text.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse a JSON array of values; blank or malformed text yields no values
fn parse_list(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<JsonValue>>(raw) {
        Ok(values) => values.iter().map(json_text).collect(),
        Err(err) => {
            debug!("Ignoring malformed list value {:?}: {}", raw, err);
            Vec::new()
        }
    }
}

pub struct Resolver<'a> {
    pipeline: &'a Pipeline,
    templates: &'a [Template],
    request: &'a JobRequest,
}

impl<'a> Resolver<'a> {
    /// `templates[i]` must be the template of step `i`
    pub fn new(pipeline: &'a Pipeline, templates: &'a [Template], request: &'a JobRequest) -> Self {
        Self {
            pipeline,
            templates,
            request,
        }
    }

    /// Resolve one slot of a step, recording input and plain values
    pub fn resolve(
        &self,
        step: usize,
        slot: &Slot<'_>,
        registry: &mut ValueRegistry,
    ) -> Result<Resolution> {
        let step_name = &self.pipeline.steps[step].name;

        let Some((value, source)) = self.lookup(step, slot, registry)? else {
            debug!("{}_{}: no value", step_name, slot.id());
            return Ok(Resolution::Absent);
        };

        let value = match (slot, source) {
            (Slot::Input { .. }, ValueSource::Edge) => value,
            (Slot::Input { .. }, _) => value.map(|path| strip_storage_prefix(path).to_string()),
            _ => value,
        };

        debug!("{}_{} = {:?} ({:?})", step_name, slot.id(), value, source);

        if let Some(name) = slot.registry_name() {
            registry.record(step_name, name, value.clone());
        }

        if slot.omit_if_blank() && value.is_blank() {
            return Ok(Resolution::Suppressed);
        }

        Ok(Resolution::Value { value, source })
    }

    fn lookup(
        &self,
        step: usize,
        slot: &Slot<'_>,
        registry: &ValueRegistry,
    ) -> Result<Option<(Value, ValueSource)>> {
        let current = &self.pipeline.steps[step];
        let id = slot.id();

        let config_key = format!("{}_{}", current.name, id);
        if let Some(raw) = self.request.config_entry(&config_key) {
            return Ok(Some((Self::config_value(slot, raw), ValueSource::Config)));
        }

        if let Some(raw) = current.overrides.get(id) {
            return Ok(Some((Self::text_value(slot, raw), ValueSource::Override)));
        }

        if let Slot::Input { .. } = slot {
            if let Some((edge, mapping)) = self.pipeline.inbound_mapping(step, id) {
                if let Some(mut values) = self.follow_edge(step, edge, &mapping.source, registry)? {
                    let value = if values.len() == 1 && !slot.accepts_many() {
                        Value::Single(values.swap_remove(0))
                    } else {
                        Value::Many(values)
                    };
                    return Ok(Some((value, ValueSource::Edge)));
                }
            }
        }

        Ok(slot
            .default_value()
            .map(|raw| (Self::text_value(slot, &raw), ValueSource::Default)))
    }

    /// Values flowing along an edge, or `None` to fall through to the default
    fn follow_edge(
        &self,
        step: usize,
        edge: &Edge,
        source_key: &str,
        registry: &ValueRegistry,
    ) -> Result<Option<Vec<String>>> {
        let source = &self.pipeline.steps[edge.source];

        if let Some(name) = input_reference(source_key, &source.name) {
            if !registry.has_visited(edge.source) {
                return Err(EngineError::CyclicOrUnorderedPipeline(format!(
                    "step {} reads input {} of step {} before it was resolved",
                    self.pipeline.steps[step].name, name, source.name
                )));
            }
            return Ok(registry
                .lookup(&source.name, name)
                .map(|value| value.items().into_iter().map(str::to_string).collect()));
        }

        if let Some(value) = source.overrides.get(source_key) {
            return Ok(Some(vec![value.clone()]));
        }

        let template = self
            .templates
            .get(edge.source)
            .ok_or_else(|| EngineError::TemplateNotFound(source.template_id.clone()))?;

        template
            .output_name(source_key)
            .map(|name| Some(vec![name.to_string()]))
            .ok_or_else(|| EngineError::TemplateLookup {
                template_id: template.id.clone(),
                output_id: source_key.to_string(),
            })
    }

    fn config_value(slot: &Slot<'_>, raw: &JsonValue) -> Value {
        match raw {
            JsonValue::Array(values) if slot.accepts_many() => {
                Value::Many(values.iter().map(json_text).collect())
            }
            other => {
                let text = json_text(other);
                if text.trim().is_empty() {
                    Value::Many(Vec::new())
                } else {
                    Self::text_value(slot, &text)
                }
            }
        }
    }

    fn text_value(slot: &Slot<'_>, raw: &str) -> Value {
        if slot.accepts_many() {
            Value::Many(parse_list(raw))
        } else {
            Value::Single(raw.to_string())
        }
    }
}
