//! Configuration module
//!
//! Handles CLI configuration: where the catalog lives and the engine settings.

use anyhow::{Context, Result};
use std::path::PathBuf;
use stepwise_engine::EngineConfig;
use stepwise_engine::repository::MemoryCatalog;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the catalog snapshot
    pub catalog_path: PathBuf,

    /// Settings handed to the engine
    pub engine: EngineConfig,
}

impl Config {
    /// Read and parse the catalog snapshot
    pub fn load_catalog(&self) -> Result<MemoryCatalog> {
        let json = std::fs::read_to_string(&self.catalog_path).with_context(|| {
            format!("Failed to read catalog file: {}", self.catalog_path.display())
        })?;

        MemoryCatalog::from_json(&json).with_context(|| {
            format!("Failed to parse catalog file: {}", self.catalog_path.display())
        })
    }
}
