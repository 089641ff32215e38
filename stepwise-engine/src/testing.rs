//! Shared test fixtures
//!
//! A small catalog of pipelines: an empty one, one with a single empty step,
//! one with plain properties, one with inputs, and a two-step chain.

use serde_json::{Value as JsonValue, json};

use stepwise_core::domain::component::DeployedComponent;
use stepwise_core::domain::pipeline::PipelineDefinition;
use stepwise_core::domain::template::Template;
use stepwise_core::dto::job::{JobRequest, Owner};

use crate::repository::{Catalog, MemoryCatalog};
use crate::service::pipeline::Pipeline;

pub const EMPTY: &str = "empty_analysis";
pub const ONE_EMPTY_STEP: &str = "analysis_with_one_empty_step";
pub const PROPERTIES: &str = "analysis_with_properties";
pub const INPUTS: &str = "analysis_with_inputs";
pub const MULTISTEP: &str = "multistep_analysis";

const COMPONENT_ID: &str = "deployed_component_id";

fn template(value: JsonValue) -> Template {
    serde_json::from_value(value).unwrap()
}

fn property(name: &str, order: i32) -> JsonValue {
    json!({
        "id": format!("{name} id"),
        "name": name,
        "label": format!("{name} label"),
        "description": format!("{name} description"),
        "order": order,
        "default_value": name.replace("--", "")
    })
}

fn data_object(id: &str, name: &str, order: i32, switch: &str, multiplicity: &str) -> JsonValue {
    json!({
        "id": id,
        "name": name,
        "order": order,
        "switch": switch,
        "multiplicity": multiplicity
    })
}

pub fn component(component_type: &str) -> DeployedComponent {
    DeployedComponent {
        id: COMPONENT_ID.to_string(),
        name: "deployed component name".to_string(),
        location: "deployed component location".to_string(),
        component_type: component_type.to_string(),
        description: "deployed component description".to_string(),
        version: None,
        attribution: None,
    }
}

pub fn properties_template() -> Template {
    let mut hidden = property("--fifth=", 5);
    hidden["visible"] = json!(false);
    let mut flag = property("--sixth=", 6);
    flag["type"] = json!("Flag");
    flag["default_value"] = json!("false");

    template(json!({
        "id": "template_with_properties",
        "name": "template with properties",
        "component_id": COMPONENT_ID,
        "groups": [
            { "name": "first", "parameters": [property("--first=", 1), property("--second=", 2)] },
            { "name": "second", "parameters": [property("--third=", 3), property("--fourth=", 4), hidden, flag] }
        ]
    }))
}

fn inputs_template() -> Template {
    template(json!({
        "id": "template_with_inputs",
        "name": "template with inputs",
        "component_id": COMPONENT_ID,
        "inputs": [
            data_object("inputFile", "inputFile", 1, "--in=", "one"),
            data_object("inputFolder", "inputFolder", 2, "--folder=", "folder"),
            data_object("inputFiles", "inputFiles", 3, "", "many"),
            data_object("templateInputFile", "templateInputFile", 4, "--tin=", "one")
        ]
    }))
}

fn multistep_template_1() -> Template {
    template(json!({
        "id": "multistep_analysis_template_1",
        "name": "multistep template 1",
        "component_id": COMPONENT_ID,
        "inputs": [data_object("sharedInput", "sharedInput", 1, "--sharedIn=", "one")],
        "outputs": [
            data_object("chainedOutput", "chained_output.txt", 2, "--chainedOut=", "one"),
            data_object("templateOutput", "templateOutput", 3, "--templateOut=", "one")
        ]
    }))
}

fn multistep_template_2() -> Template {
    template(json!({
        "id": "multistep_analysis_template_2",
        "name": "multistep template 2",
        "component_id": COMPONENT_ID,
        "inputs": [
            data_object("sharedInput", "sharedInput", 1, "--sharedIn=", "one"),
            data_object("chainedInput", "chainedInput", 2, "--chainedIn=", "one"),
            data_object("templateInput", "templateInput", 3, "--templateIn=", "one")
        ]
    }))
}

fn empty_template() -> Template {
    template(json!({ "id": "empty_template", "name": "empty", "component_id": COMPONENT_ID }))
}

/// Replaces the properties template: one file output and two redirections
pub fn redirecting_template() -> Template {
    template(json!({
        "id": "template_with_properties",
        "name": "redirecting",
        "component_id": COMPONENT_ID,
        "outputs": [
            data_object("report", "report.txt", 1, "--report=", "one"),
            { "id": "stdout", "name": "out.log", "order": -1, "data_source": "stdout" },
            { "id": "stderr", "name": "err.log", "order": -1, "data_source": "stderr" }
        ]
    }))
}

/// Replaces the properties template: environment variables only
pub fn environment_template() -> Template {
    template(json!({
        "id": "template_with_properties",
        "name": "environment",
        "component_id": COMPONENT_ID,
        "groups": [{
            "name": "env",
            "parameters": [
                { "id": "home", "name": "HOME", "type": "EnvironmentVariable" },
                { "id": "lang", "name": "LANG", "type": "EnvironmentVariable", "default_value": "" },
                {
                    "id": "unset",
                    "name": "UNSET",
                    "type": "EnvironmentVariable",
                    "default_value": "",
                    "omit_if_blank": true
                }
            ]
        }]
    }))
}

/// Template whose data objects are exposed through parameters
pub fn template_with_data_parameters() -> Template {
    template(json!({
        "id": "with_data_parameters",
        "name": "with data parameters",
        "groups": [{
            "name": "all",
            "parameters": [
                { "id": "threshold", "name": "-t", "type": "Number", "default_value": "3" },
                { "id": "readsParam", "name": "reads", "type": "Input", "data_object": "reads" },
                { "id": "reportParam", "name": "report", "type": "Output", "data_object": "report" }
            ]
        }],
        "inputs": [data_object("reads", "reads", 1, "-i", "one")],
        "outputs": [
            data_object("report", "report.txt", 2, "-o", "one"),
            data_object("log", "run.log", -1, "", "one")
        ]
    }))
}

fn pipeline(value: JsonValue) -> PipelineDefinition {
    serde_json::from_value(value).unwrap()
}

fn pipelines() -> Vec<PipelineDefinition> {
    vec![
        pipeline(json!({
            "id": EMPTY,
            "name": "empty analysis name",
            "description": "empty analysis description"
        })),
        pipeline(json!({
            "id": ONE_EMPTY_STEP,
            "name": "name of analysis with one empty step",
            "description": "description of analysis with one empty step",
            "steps": [{
                "id": "empty_step",
                "name": "empty step name",
                "description": "empty step description",
                "template_id": "empty_template"
            }]
        })),
        pipeline(json!({
            "id": PROPERTIES,
            "name": "name of analysis with properties",
            "description": "description of analysis with properties",
            "steps": [{
                "id": "step_with_properties",
                "name": "name of step with properties",
                "template_id": "template_with_properties"
            }]
        })),
        pipeline(json!({
            "id": INPUTS,
            "name": "name of analysis with inputs",
            "description": "description of analysis with inputs",
            "steps": [{
                "id": "step_with_inputs",
                "name": "name of step with inputs",
                "template_id": "template_with_inputs",
                "overrides": { "templateInputFile": "/iPlant/home/someuser/baz" }
            }]
        })),
        pipeline(json!({
            "id": MULTISTEP,
            "name": "name of multistep analysis",
            "description": "description of multistep analysis",
            "steps": [
                {
                    "id": "multistep_analysis_step_1",
                    "name": "name of multistep analysis step 1",
                    "template_id": "multistep_analysis_template_1",
                    "overrides": { "templateOutput": "template_template_output.txt" }
                },
                {
                    "id": "multistep_analysis_step_2",
                    "name": "name of multistep analysis step 2",
                    "template_id": "multistep_analysis_template_2"
                }
            ],
            "edges": [{
                "source": "name of multistep analysis step 1",
                "target": "name of multistep analysis step 2",
                "mappings": [
                    { "source": "in#sharedInput", "target": "sharedInput" },
                    { "source": "chainedOutput", "target": "chainedInput" },
                    { "source": "templateOutput", "target": "templateInput" }
                ]
            }]
        })),
    ]
}

/// Catalog of every fixture, with the shared component of the given type
pub fn catalog(component_type: &str) -> MemoryCatalog {
    let mut catalog = MemoryCatalog::new().with_component(component(component_type));
    for template in [
        empty_template(),
        properties_template(),
        inputs_template(),
        multistep_template_1(),
        multistep_template_2(),
    ] {
        catalog.insert_template(template);
    }
    for pipeline in pipelines() {
        catalog.insert_pipeline(pipeline);
    }
    catalog
}

/// A fixture pipeline loaded into the arena, with one template per step
pub fn loaded(pipeline_id: &str) -> (MemoryCatalog, Pipeline, Vec<Template>) {
    let catalog = catalog("fAPI");
    let definition = catalog.find_pipeline(pipeline_id).unwrap();
    let pipeline = Pipeline::from_definition(&definition).unwrap();
    let templates = pipeline
        .steps
        .iter()
        .map(|step| catalog.find_template(&step.template_id).unwrap())
        .collect();
    (catalog, pipeline, templates)
}

pub fn owner() -> Owner {
    Owner::new("someuser", "someuser@example.com")
}

/// Request without configuration, named "empty"
pub fn request(pipeline_id: &str) -> JobRequest {
    serde_json::from_value(json!({
        "name": "empty",
        "description": "empty description",
        "notify": false,
        "analysis_id": pipeline_id,
        "outputDirectory": "/iplant/home/someuser/analyses"
    }))
    .unwrap()
}

/// Request named "config" carrying values for every fixture pipeline
pub fn request_with_config(pipeline_id: &str) -> JobRequest {
    serde_json::from_value(json!({
        "name": "config",
        "description": "config",
        "notify": false,
        "debug": false,
        "analysis_id": pipeline_id,
        "outputDirectory": "/iplant/home/someuser/analyses",
        "config": {
            "name of step with properties_--first= id": "one",
            "name of step with properties_--second= id": "two",
            "name of step with properties_--third= id": "three",
            "name of step with properties_--fourth= id": "four",
            "name of step with properties_--sixth= id": "true",
            "name of step with inputs_inputFile": "/iPlant/home/someuser/somefile.txt",
            "name of step with inputs_inputFolder": "/iPlant/home/someuser/somefolder",
            "name of step with inputs_inputFiles": "[\"/iPlant/home/someuser/foo\", \"/iPlant/home/someuser/bar\"]",
            "name of multistep analysis step 1_sharedInput": "/iPlant/home/someuser/shared_input.txt"
        }
    }))
    .unwrap()
}
