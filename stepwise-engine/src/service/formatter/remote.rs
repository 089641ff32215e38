//! Remote API formatter
//!
//! Steps run `fAPI` components through a wrapper command, so every step
//! starts with the wrapper's own parameters.

use stepwise_core::dto::submission::{ComponentSummary, Param, StepConfig, SubmissionStep};

use super::{StepInput, params};
use crate::error::Result;
use crate::service::Context;
use crate::service::resolver::Slot;

/// Output directory relative to the storage home, plus the job folder
fn archive_path(ctx: &Context<'_>, input: &StepInput<'_>) -> String {
    let directory = &input.request.output_directory;
    let relative = directory
        .strip_prefix(ctx.config.storage_home.as_str())
        .unwrap_or(directory.as_str())
        .trim_end_matches('/');

    if input.request.create_output_subdir {
        format!("{}/{}", relative, input.job_name.name)
    } else {
        relative.to_string()
    }
}

/// Wrapper parameters that precede the tool's own
fn synthetic_params(ctx: &Context<'_>, input: &StepInput<'_>) -> Vec<Param> {
    [
        params::param(0, "", "run", "command", None),
        params::param(1, "--proxy_user=", &input.owner.username, "proxyUser", None),
        params::param(1, "--jobName=", &input.job_name.name, "jobName", None),
        params::param(1, "", "--archive", "archiveResults", None),
        params::param(1, "--archivePath=", &archive_path(ctx, input), "archivePath", None),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub(super) fn format_step(ctx: &Context<'_>, input: StepInput<'_>) -> Result<SubmissionStep> {
    let debug = input.request.debug;
    let mut config = StepConfig::default();

    for resolved in &input.slots {
        let value = &resolved.value;
        match resolved.slot {
            Slot::Plain(parameter) => {
                config
                    .params
                    .extend(params::plain_params(input.name, parameter, value)?);
            }
            Slot::Input { data_object, .. } => {
                // Inputs with a negative order are staged but never passed
                if data_object.order >= 0 {
                    let multiplicity = Some(data_object.multiplicity);
                    config
                        .params
                        .extend(params::input_params(data_object, value, multiplicity));
                }
                config.input.extend(params::input_files(data_object, value, debug));
            }
            Slot::Output { data_object, .. } => {
                let multiplicity = Some(data_object.multiplicity);
                config
                    .params
                    .extend(params::output_param(data_object, value, multiplicity));
                config.output.extend(params::output_file(data_object, value, debug));
            }
        }
    }

    params::sort_by_order(&mut config.params);
    let mut all = synthetic_params(ctx, &input);
    all.append(&mut config.params);
    config.params = all;
    config.output.push(params::logs_output());

    Ok(SubmissionStep {
        name: input.name.to_string(),
        step_type: ctx.config.execution_target.clone(),
        component: ComponentSummary::from(input.component),
        config,
        environment: None,
        stdout: None,
        stderr: None,
    })
}
