//! Batch cluster formatter
//!
//! Steps run `executable` components directly. Environment variables and
//! stdout/stderr redirection are declared per step.

use std::collections::BTreeMap;

use stepwise_core::domain::template::{DataSource, ParameterType};
use stepwise_core::dto::submission::{ComponentSummary, StepConfig, SubmissionStep};

use super::{StepInput, params};
use crate::error::Result;
use crate::service::Context;
use crate::service::resolver::Slot;

pub(super) fn format_step(ctx: &Context<'_>, input: StepInput<'_>) -> Result<SubmissionStep> {
    let debug = input.request.debug;
    let mut config = StepConfig::default();
    let mut environment = BTreeMap::new();
    let mut stdout = None;
    let mut stderr = None;

    for resolved in &input.slots {
        let value = &resolved.value;
        match resolved.slot {
            Slot::Plain(parameter) if parameter.parameter_type() == ParameterType::EnvironmentVariable => {
                environment.insert(parameter.name.clone(), value.text());
            }
            Slot::Plain(parameter) => {
                config
                    .params
                    .extend(params::plain_params(input.name, parameter, value)?);
            }
            Slot::Input { data_object, .. } => {
                config.params.extend(params::input_params(data_object, value, None));
                config.input.extend(params::input_files(data_object, value, debug));
            }
            Slot::Output { data_object, .. } => {
                match data_object.data_source {
                    DataSource::File => {
                        config.params.extend(params::output_param(data_object, value, None));
                    }
                    DataSource::Stdout => stdout = Some(value.text()),
                    DataSource::Stderr => stderr = Some(value.text()),
                }
                config.output.extend(params::output_file(data_object, value, debug));
            }
        }
    }

    params::sort_by_order(&mut config.params);
    config.output.push(params::logs_output());

    Ok(SubmissionStep {
        name: input.name.to_string(),
        step_type: ctx.config.execution_target.clone(),
        component: ComponentSummary::from(input.component),
        config,
        environment: Some(environment),
        stdout,
        stderr,
    })
}

#[cfg(test)]
mod tests {
    use crate::config::EngineConfig;
    use crate::repository::{MemoryCatalog, MemoryJobNames};
    use crate::service::Context;
    use crate::service::dispatch::EXECUTABLE_COMPONENT;
    use crate::service::formatter::Formatter;
    use crate::testing;
    use serde_json::json;
    use stepwise_core::domain::template::Multiplicity;
    use stepwise_core::dto::submission::SubmissionDocument;

    fn format(catalog: &MemoryCatalog, request: &stepwise_core::dto::job::JobRequest) -> SubmissionDocument {
        let names = MemoryJobNames::new();
        let config = EngineConfig::default();
        let ctx = Context::new(catalog, &names, &config);
        Formatter::Batch.format(&ctx, request, &testing::owner()).unwrap()
    }

    #[test]
    fn test_no_synthetic_params() {
        let catalog = testing::catalog(EXECUTABLE_COMPONENT);
        let doc = format(&catalog, &testing::request_with_config(testing::PROPERTIES));

        let params = &doc.steps[0].config.params;
        assert_eq!(params.len(), 6);
        assert_eq!(params[0].value, "--first=one");
        assert_eq!(params[5].value, "--sixth=");
        assert!(params.iter().all(|p| p.multiplicity.is_none()));
        assert_eq!(doc.steps[0].step_type, "condor");
        assert_eq!(doc.steps[0].environment, Some(Default::default()));
    }

    #[test]
    fn test_input_declarations() {
        let catalog = testing::catalog(EXECUTABLE_COMPONENT);
        let doc = format(&catalog, &testing::request_with_config(testing::INPUTS));
        let config = &doc.steps[0].config;

        let values: Vec<&str> = config.params.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(
            values,
            vec![
                "--in=/someuser/somefile.txt",
                "--folder=/someuser/somefolder",
                "/someuser/foo",
                "/someuser/bar",
                "--tin=/someuser/baz",
            ]
        );

        assert_eq!(config.input.len(), 5);
        let folder = config.input.iter().find(|i| i.id == "inputFolder").unwrap();
        assert_eq!(folder.name, "somefolder");
        assert_eq!(folder.property, "somefolder");
        assert_eq!(folder.value, "/someuser/somefolder");
        assert_eq!(folder.multiplicity, Multiplicity::Folder);
        assert_eq!(folder.info_type, "File");
        assert!(!folder.retain);
    }

    #[test]
    fn test_debug_retains_everything() {
        let catalog = testing::catalog(EXECUTABLE_COMPONENT);
        let mut request = testing::request_with_config(testing::INPUTS);
        request.debug = true;
        let doc = format(&catalog, &request);

        let config = &doc.steps[0].config;
        assert!(config.input.iter().all(|input| input.retain));
        assert!(config.output.iter().all(|output| output.retain));
    }

    #[test]
    fn test_outputs_logs_and_redirection() {
        let catalog = testing::catalog(EXECUTABLE_COMPONENT).with_template(testing::redirecting_template());
        let doc = format(&catalog, &testing::request(testing::PROPERTIES));
        let step = &doc.steps[0];

        assert_eq!(step.stdout.as_deref(), Some("out.log"));
        assert_eq!(step.stderr.as_deref(), Some("err.log"));

        let params: Vec<&str> = step.config.params.iter().map(|p| p.value.as_str()).collect();
        assert_eq!(params, vec!["--report=report.txt"]);

        let outputs: Vec<&str> = step.config.output.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(outputs, vec!["report.txt", "out.log", "err.log", "logs"]);
        let logs = step.config.output.last().unwrap();
        assert_eq!(logs.multiplicity, Multiplicity::Folder);
        assert!(logs.retain);
    }

    #[test]
    fn test_environment_variables() {
        let catalog = testing::catalog(EXECUTABLE_COMPONENT).with_template(testing::environment_template());
        let mut request = testing::request(testing::PROPERTIES);
        request.config = Some(
            json!({ "name of step with properties_home": "/scratch" })
                .as_object()
                .unwrap()
                .clone(),
        );
        let doc = format(&catalog, &request);

        let environment = doc.steps[0].environment.as_ref().unwrap();
        assert_eq!(environment.get("HOME").map(String::as_str), Some("/scratch"));
        assert_eq!(environment.get("LANG").map(String::as_str), Some(""));
        assert!(!environment.contains_key("UNSET"));
        assert!(doc.steps[0].config.params.is_empty());
    }
}
