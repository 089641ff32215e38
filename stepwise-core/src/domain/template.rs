//! Template domain types
//!
//! A template is a reusable tool definition: grouped parameters plus the
//! input and output data objects the tool reads and writes.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Tool template
///
/// Structure shared between the catalog (stores) and the engine (resolves).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub template_type: String,
    /// Identifier of the deployed component that runs this template
    #[serde(default)]
    pub component_id: Option<String>,
    #[serde(default)]
    pub groups: Vec<ParameterGroup>,
    #[serde(default)]
    pub inputs: Vec<DataObject>,
    #[serde(default)]
    pub outputs: Vec<DataObject>,
}

impl Template {
    /// All parameters of the template, in group order
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.groups.iter().flat_map(|group| group.parameters.iter())
    }

    pub fn find_input(&self, id: &str) -> Option<&DataObject> {
        self.inputs.iter().find(|input| input.id == id)
    }

    pub fn find_output(&self, id: &str) -> Option<&DataObject> {
        self.outputs.iter().find(|output| output.id == id)
    }

    /// Declared file name of the output with the given id
    pub fn output_name(&self, id: &str) -> Option<&str> {
        self.find_output(id).map(|output| output.name.as_str())
    }

    /// The parameter that exposes the given data object, if any
    pub fn parameter_for_data_object(&self, data_object_id: &str) -> Option<&Parameter> {
        self.parameters()
            .find(|p| p.data_object.as_deref() == Some(data_object_id))
    }

    /// Checks that every data object referenced by a parameter is declared
    /// as one of the template's inputs or outputs.
    pub fn validate(&self) -> Result<(), String> {
        for parameter in self.parameters() {
            let kind = parameter.parameter_type();
            match (&parameter.data_object, kind) {
                (Some(id), ParameterType::Input) if self.find_input(id).is_none() => {
                    return Err(format!(
                        "parameter {} references undeclared input {}",
                        parameter.id, id
                    ));
                }
                (Some(id), ParameterType::Output) if self.find_output(id).is_none() => {
                    return Err(format!(
                        "parameter {} references undeclared output {}",
                        parameter.id, id
                    ));
                }
                (None, ParameterType::Input | ParameterType::Output) => {
                    return Err(format!(
                        "{} parameter {} has no data object",
                        parameter.type_name, parameter.id
                    ));
                }
                (Some(id), _) if self.find_input(id).is_none() && self.find_output(id).is_none() => {
                    return Err(format!(
                        "parameter {} references undeclared data object {}",
                        parameter.id, id
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Group of related parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParameterGroup {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "type")]
    pub group_type: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
}

/// A single tool parameter
///
/// `name` doubles as the command-line option; for flags it holds the
/// comma-separated "on, off" alternatives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: i32,
    #[serde(rename = "type", default = "default_type_name")]
    pub type_name: String,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub omit_if_blank: bool,
    #[serde(default)]
    pub validator: Option<Validator>,
    /// Id of the data object behind an input or output parameter
    #[serde(default)]
    pub data_object: Option<String>,
}

fn default_type_name() -> String {
    "Text".to_string()
}

impl Parameter {
    pub fn parameter_type(&self) -> ParameterType {
        ParameterType::from_name(&self.type_name)
    }
}

/// Closed set of parameter kinds the formatters know how to handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterType {
    Text,
    Number,
    Flag,
    Selection,
    TreeSelection,
    Input,
    Output,
    EnvironmentVariable,
    Info,
    /// Known to the catalog but not supported by any backend
    Unsupported,
}

impl ParameterType {
    /// Maps a catalog type name onto a parameter kind
    ///
    /// Unknown names are treated as free text.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Flag" => Self::Flag,
            "TreeSelection" => Self::TreeSelection,
            "Input" => Self::Input,
            "Output" => Self::Output,
            "EnvironmentVariable" => Self::EnvironmentVariable,
            "Info" => Self::Info,
            "Number" | "Integer" | "Double" => Self::Number,
            "BarcodeSelector" | "ClipperSelector" => Self::Unsupported,
            other if other.ends_with("Selection") => Self::Selection,
            _ => Self::Text,
        }
    }
}

/// Validation rules attached to a parameter
///
/// Carried through from the catalog; the engine does not evaluate them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Validator {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "type")]
    pub rule_type: String,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// Number of values a data object accepts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Multiplicity {
    #[default]
    #[serde(alias = "one")]
    Single,
    Many,
    #[serde(alias = "collection")]
    Folder,
}

/// Where a tool writes an output
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    File,
    Stdout,
    Stderr,
}

/// Input or output file declared by a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataObject {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub multiplicity: Multiplicity,
    #[serde(default)]
    pub order: i32,
    /// Command-line switch preceding the file path
    #[serde(default)]
    pub switch: String,
    #[serde(default = "default_info_type")]
    pub info_type: String,
    #[serde(default = "default_data_format")]
    pub data_format: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub retain: bool,
    /// Produced by the tool but never shown to the user
    #[serde(default)]
    pub implicit: bool,
    #[serde(default)]
    pub data_source: DataSource,
}

fn default_info_type() -> String {
    "File".to_string()
}

fn default_data_format() -> String {
    "Unspecified".to_string()
}
