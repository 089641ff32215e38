//! Stepwise Engine
//!
//! Resolves the parameters of every step of a pipeline and formats the
//! result as a job submission for the batch cluster or the remote API.
//!
//! ```ignore
//! let ctx = Context::new(&catalog, &job_names, &config);
//! let document = build_submission(&ctx, &request, &owner)?;
//! ```

pub mod config;
pub mod error;
pub mod repository;
pub mod service;

#[cfg(test)]
mod testing;

pub use config::{EngineConfig, NamingStrategy};
pub use error::{EngineError, ErrorKind, Result};
pub use service::{Context, build_submission};
