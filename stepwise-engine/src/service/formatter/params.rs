//! Shared parameter formatting
//!
//! Turns resolved slot values into command-line parameters and file
//! declarations. Both backends build on these helpers.

use serde::Deserialize;
use tracing::warn;

use stepwise_core::domain::template::{DataObject, Multiplicity, Parameter, ParameterType};
use stepwise_core::dto::submission::{InputFile, OutputFile, Param};

use crate::error::{EngineError, Result};
use crate::service::resolver::Value;

/// Build a parameter, folding `name=` options into the value
///
/// Negative orders become 0 for named parameters; unnamed parameters with a
/// negative order are dropped.
pub fn param(
    order: i32,
    name: &str,
    value: &str,
    id: &str,
    multiplicity: Option<Multiplicity>,
) -> Option<Param> {
    let order = match order {
        o if o >= 0 => o,
        _ if !name.trim().is_empty() => 0,
        _ => return None,
    };

    let (name, value) = if name.ends_with('=') {
        (String::new(), format!("{}{}", name, value))
    } else {
        (name.to_string(), value.to_string())
    };

    Some(Param {
        order,
        name,
        value,
        id: id.to_string(),
        multiplicity,
    })
}

/// Stable sort by declared order
pub fn sort_by_order(params: &mut [Param]) {
    params.sort_by_key(|param| param.order);
}

#[derive(Debug, Default, Deserialize)]
struct SelectionValue {
    #[serde(default)]
    name: String,
    #[serde(default)]
    value: String,
}

impl SelectionValue {
    fn is_empty(&self) -> bool {
        self.name.is_empty() && self.value.is_empty()
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(parameter: &Parameter, raw: &str) -> Option<T> {
    if raw.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(raw) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            warn!("Ignoring malformed value for parameter {}: {}", parameter.id, err);
            None
        }
    }
}

/// Split a flag option at the first whitespace run or just after `=`
fn split_option(option: &str) -> (&str, &str) {
    let space = option.find(char::is_whitespace);
    let equals = option.find('=').map(|i| i + 1);

    match (space, equals) {
        (Some(s), Some(e)) if e <= s => (&option[..e], &option[e..]),
        (Some(s), _) => (&option[..s], option[s..].trim_start()),
        (None, Some(e)) => (&option[..e], &option[e..]),
        (None, None) => (option, ""),
    }
}

/// Parameters for a slot not backed by a data object
///
/// Environment variables and info parameters yield nothing here.
pub fn plain_params(step: &str, parameter: &Parameter, value: &Value) -> Result<Vec<Param>> {
    let raw = value.text();
    let order = parameter.order;
    let id = parameter.id.as_str();

    let params = match parameter.parameter_type() {
        ParameterType::Text | ParameterType::Number => {
            param(order, &parameter.name, &raw, id, None).into_iter().collect()
        }
        ParameterType::Flag => {
            let options: Vec<&str> = parameter.name.split(',').map(str::trim).collect();
            let chosen = if raw.trim().eq_ignore_ascii_case("true") {
                options.first()
            } else {
                options.get(1)
            };
            chosen
                .filter(|option| !option.is_empty())
                .and_then(|option| {
                    let (name, value) = split_option(option);
                    param(order, name, value, id, None)
                })
                .into_iter()
                .collect()
        }
        ParameterType::Selection => parse_json::<SelectionValue>(parameter, &raw)
            .filter(|selection| !selection.is_empty())
            .and_then(|selection| param(order, &selection.name, &selection.value, id, None))
            .into_iter()
            .collect(),
        ParameterType::TreeSelection => parse_json::<Vec<SelectionValue>>(parameter, &raw)
            .unwrap_or_default()
            .iter()
            .filter(|selection| !selection.is_empty())
            .filter_map(|selection| param(order, &selection.name, &selection.value, id, None))
            .collect(),
        ParameterType::Info | ParameterType::EnvironmentVariable => Vec::new(),
        ParameterType::Input | ParameterType::Output => Vec::new(),
        ParameterType::Unsupported => {
            return Err(EngineError::UnsupportedParameterType {
                step: step.to_string(),
                parameter_id: parameter.id.clone(),
                type_name: parameter.type_name.clone(),
            });
        }
    };

    Ok(params)
}

/// One parameter per non-blank path, named by the switch
pub fn input_params(
    input: &DataObject,
    value: &Value,
    multiplicity: Option<Multiplicity>,
) -> Vec<Param> {
    value
        .items()
        .into_iter()
        .filter(|path| !path.trim().is_empty())
        .filter_map(|path| param(input.order, &input.switch, path, &input.id, multiplicity))
        .collect()
}

/// Parameter for an output, if the tool takes it on the command line
pub fn output_param(
    output: &DataObject,
    value: &Value,
    multiplicity: Option<Multiplicity>,
) -> Option<Param> {
    if output.implicit || value.is_blank() || (output.order < 0 && output.switch.trim().is_empty()) {
        return None;
    }
    param(output.order, &output.switch, &value.text(), &output.id, multiplicity)
}

/// Last path segment; empty for paths ending in `/`
fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Files to stage in for an input
pub fn input_files(input: &DataObject, value: &Value, debug: bool) -> Vec<InputFile> {
    value
        .items()
        .into_iter()
        .filter(|path| !path.trim().is_empty())
        .map(|path| {
            let name = basename(path).to_string();
            InputFile {
                id: input.id.clone(),
                property: name.clone(),
                name,
                info_type: input.info_type.trim().to_string(),
                value: path.to_string(),
                multiplicity: input.multiplicity,
                retain: debug || input.retain,
            }
        })
        .collect()
}

/// File to collect for an output; implicit or blank outputs are skipped
pub fn output_file(output: &DataObject, value: &Value, debug: bool) -> Option<OutputFile> {
    let name = value.text();
    if output.implicit || name.trim().is_empty() {
        return None;
    }
    Some(OutputFile {
        id: output.id.clone(),
        property: name.clone(),
        name,
        info_type: output.info_type.clone(),
        multiplicity: output.multiplicity,
        retain: debug || output.retain,
    })
}

/// Folder of job logs, always retained
pub fn logs_output() -> OutputFile {
    OutputFile {
        id: "logs".to_string(),
        name: "logs".to_string(),
        property: "logs".to_string(),
        info_type: "File".to_string(),
        multiplicity: Multiplicity::Folder,
        retain: true,
    }
}
