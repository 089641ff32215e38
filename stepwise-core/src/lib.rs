//! Stepwise Core
//!
//! Core types for the Stepwise job-request formatting engine.
//!
//! This crate contains:
//! - Domain types: tool templates, deployed components and pipeline definitions
//! - DTOs: the job request payload and the submission document

pub mod domain;
pub mod dto;
