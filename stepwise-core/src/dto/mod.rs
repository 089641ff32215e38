//! Data Transfer Objects
//!
//! The request payload accepted by the engine and the submission document it
//! produces for an execution backend.

pub mod job;
pub mod submission;
