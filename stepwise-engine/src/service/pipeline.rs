//! Pipeline Service
//!
//! Loads a stored pipeline definition into an index-addressed arena and
//! checks its structure once, so later passes can trust edge indices.

use std::collections::{HashMap, HashSet};

use stepwise_core::domain::pipeline::{INPUT_REFERENCE_MARKER, Mapping, PipelineDefinition};
use stepwise_core::domain::template::Template;

use crate::error::{EngineError, Result};

/// A step of a loaded pipeline
#[derive(Debug, Clone)]
pub struct Step {
    pub name: String,
    pub description: String,
    pub template_id: String,
    pub overrides: HashMap<String, String>,
}

/// Data dependency between two steps, as arena indices
#[derive(Debug, Clone)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub mappings: Vec<Mapping>,
}

/// Loaded pipeline
///
/// Steps are stored in execution order and every edge points forward.
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub id: String,
    pub name: String,
    pub description: String,
    pub steps: Vec<Step>,
    pub edges: Vec<Edge>,
}

impl Pipeline {
    /// Convert a stored definition into the arena
    ///
    /// Fails on edges naming unknown steps, on inputs fed by more than one
    /// edge, and on edges that do not point strictly forward.
    pub fn from_definition(definition: &PipelineDefinition) -> Result<Self> {
        let steps: Vec<Step> = definition
            .steps
            .iter()
            .map(|step| Step {
                name: step.name.clone(),
                description: step.description.clone(),
                template_id: step.template_id.clone(),
                overrides: step.overrides.clone(),
            })
            .collect();

        let mut index_by_name: HashMap<&str, usize> = HashMap::new();
        for (index, step) in steps.iter().enumerate() {
            if index_by_name.insert(step.name.as_str(), index).is_some() {
                return Err(EngineError::malformed(
                    &definition.id,
                    format!("step name {} is used more than once", step.name),
                ));
            }
        }

        let mut edges = Vec::with_capacity(definition.edges.len());
        let mut targets: HashSet<(usize, &str)> = HashSet::new();

        for edge in &definition.edges {
            let source = *index_by_name.get(edge.source.as_str()).ok_or_else(|| {
                EngineError::malformed(&definition.id, format!("edge source {} is not a step", edge.source))
            })?;
            let target = *index_by_name.get(edge.target.as_str()).ok_or_else(|| {
                EngineError::malformed(&definition.id, format!("edge target {} is not a step", edge.target))
            })?;

            for mapping in &edge.mappings {
                if !targets.insert((target, mapping.target.as_str())) {
                    return Err(EngineError::DuplicateEdgeTarget {
                        step: edge.target.clone(),
                        parameter_id: mapping.target.clone(),
                    });
                }
            }

            edges.push(Edge {
                source,
                target,
                mappings: edge.mappings.clone(),
            });
        }

        let pipeline = Self {
            id: definition.id.clone(),
            name: definition.name.clone(),
            description: definition.description.clone(),
            steps,
            edges,
        };

        pipeline.check_order()?;

        Ok(pipeline)
    }

    /// Reject cycles, then reject edges that point backwards in stored order.
    fn check_order(&self) -> Result<()> {
        let n = self.steps.len();
        let mut in_degree = vec![0usize; n];
        let mut adj: Vec<Vec<usize>> = vec![vec![]; n];

        for edge in &self.edges {
            adj[edge.source].push(edge.target);
            in_degree[edge.target] += 1;
        }

        let mut queue: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut visited = 0;

        while let Some(node) = queue.pop() {
            visited += 1;
            for &neighbor in &adj[node] {
                in_degree[neighbor] -= 1;
                if in_degree[neighbor] == 0 {
                    queue.push(neighbor);
                }
            }
        }

        if visited != n {
            let stuck: Vec<&str> = (0..n)
                .filter(|&i| in_degree[i] > 0)
                .map(|i| self.steps[i].name.as_str())
                .collect();
            return Err(EngineError::CyclicOrUnorderedPipeline(format!(
                "cycle in analysis {} through steps {}",
                self.id,
                stuck.join(", ")
            )));
        }

        if let Some(edge) = self.edges.iter().find(|edge| edge.source >= edge.target) {
            return Err(EngineError::CyclicOrUnorderedPipeline(format!(
                "step {} runs before step {} but reads from it in analysis {}",
                self.steps[edge.target].name, self.steps[edge.source].name, self.id
            )));
        }

        Ok(())
    }

    /// The edge and mapping that feed an input of a step, if any
    pub fn inbound_mapping(&self, target: usize, parameter_id: &str) -> Option<(&Edge, &Mapping)> {
        self.edges
            .iter()
            .filter(|edge| edge.target == target)
            .find_map(|edge| {
                edge.mappings
                    .iter()
                    .find(|mapping| mapping.target == parameter_id)
                    .map(|mapping| (edge, mapping))
            })
    }

    /// Check every edge against the templates of its steps
    ///
    /// `templates[i]` is the template of step `i`. Edge targets must be
    /// inputs of the target template; input references must be inputs of
    /// the source template.
    pub fn validate_edges(&self, templates: &[Template]) -> Result<()> {
        for edge in &self.edges {
            let source = &self.steps[edge.source];
            let target = &self.steps[edge.target];
            let (Some(source_template), Some(target_template)) =
                (templates.get(edge.source), templates.get(edge.target))
            else {
                return Err(EngineError::malformed(
                    &self.id,
                    "templates do not line up with steps",
                ));
            };

            for mapping in &edge.mappings {
                if target_template.find_input(&mapping.target).is_none() {
                    return Err(EngineError::MalformedEdge {
                        step: target.name.clone(),
                        message: format!(
                            "{} is not an input of template {}",
                            mapping.target, target_template.id
                        ),
                    });
                }

                if let Some(name) = input_reference(&mapping.source, &source.name) {
                    if source_template.find_input(name).is_none() {
                        return Err(EngineError::MalformedEdge {
                            step: target.name.clone(),
                            message: format!(
                                "{} is not an input of template {} used by step {}",
                                name, source_template.id, source.name
                            ),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

/// Input name behind an `in#` source key, without the source step prefix
///
/// Returns `None` for keys that name an output.
pub fn input_reference<'a>(source_key: &'a str, source_step: &str) -> Option<&'a str> {
    let name = source_key.strip_prefix(INPUT_REFERENCE_MARKER)?;
    let prefixed = name
        .strip_prefix(source_step)
        .and_then(|rest| rest.strip_prefix('_'));
    Some(prefixed.unwrap_or(name))
}
