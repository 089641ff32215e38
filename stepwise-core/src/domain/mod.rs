//! Core domain types
//!
//! This module contains the catalog entities the engine reads while it builds a
//! job submission. They are read-only snapshots: the engine never mutates them.

pub mod component;
pub mod pipeline;
pub mod template;
