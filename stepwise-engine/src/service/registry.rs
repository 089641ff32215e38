//! Resolved-value registry
//!
//! Values resolved for earlier steps, keyed `"<step name>_<name>"`, so later
//! steps can read a source step's inputs through `in#` edges. One registry
//! lives for exactly one formatting pass.

use std::collections::{HashMap, HashSet};

use super::resolver::Value;

#[derive(Debug, Default)]
pub struct ValueRegistry {
    values: HashMap<String, Value>,
    visited: HashSet<usize>,
}

impl ValueRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(step: &str, name: &str) -> String {
        format!("{}_{}", step, name)
    }

    /// Record the value of a step's parameter, replacing any earlier value
    pub fn record(&mut self, step: &str, name: &str, value: Value) {
        self.values.insert(Self::key(step, name), value);
    }

    pub fn lookup(&self, step: &str, name: &str) -> Option<&Value> {
        self.values.get(&Self::key(step, name))
    }

    /// Mark a step as fully resolved
    pub fn mark_visited(&mut self, step: usize) {
        self.visited.insert(step);
    }

    pub fn has_visited(&self, step: usize) -> bool {
        self.visited.contains(&step)
    }
}
