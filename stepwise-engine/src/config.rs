//! Engine configuration
//!
//! Settings that stay fixed across requests: where jobs run, which storage
//! zone user paths live under, and how job names are made unique.

use std::fmt;
use std::str::FromStr;

/// Default execution target recorded on submissions
pub const DEFAULT_EXECUTION_TARGET: &str = "condor";

/// Default root of user home directories in the data store
pub const DEFAULT_STORAGE_HOME: &str = "/iplant/home";

/// How a job name that is already taken gets changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NamingStrategy {
    /// Append `-<n>` with the next free index
    #[default]
    Indexed,
    /// Append a UTC timestamp, never consulting existing names
    Timestamp,
}

impl FromStr for NamingStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "indexed" => Ok(Self::Indexed),
            "timestamp" => Ok(Self::Timestamp),
            other => anyhow::bail!("unknown job naming strategy: {}", other),
        }
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed => write!(f, "indexed"),
            Self::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Execution target recorded on every submission (e.g., "condor")
    pub execution_target: String,

    /// Storage path prefix stripped from output directories for archiving
    pub storage_home: String,

    /// Job name uniqueness strategy
    pub naming: NamingStrategy,
}

impl EngineConfig {
    /// Creates a new configuration with defaults
    pub fn new(execution_target: String) -> Self {
        Self {
            execution_target,
            storage_home: DEFAULT_STORAGE_HOME.to_string(),
            naming: NamingStrategy::default(),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - STEPWISE_EXECUTION_TARGET (optional, default: condor)
    /// - STEPWISE_STORAGE_HOME (optional, default: /iplant/home)
    /// - STEPWISE_JOB_NAMING (optional, indexed | timestamp, default: indexed)
    pub fn from_env() -> anyhow::Result<Self> {
        let execution_target = std::env::var("STEPWISE_EXECUTION_TARGET")
            .unwrap_or_else(|_| DEFAULT_EXECUTION_TARGET.to_string());

        let storage_home = std::env::var("STEPWISE_STORAGE_HOME")
            .unwrap_or_else(|_| DEFAULT_STORAGE_HOME.to_string());

        let naming = match std::env::var("STEPWISE_JOB_NAMING") {
            Ok(value) => value.parse()?,
            Err(_) => NamingStrategy::default(),
        };

        Ok(Self {
            execution_target,
            storage_home,
            naming,
        })
    }

    pub fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_storage_home(mut self, storage_home: impl Into<String>) -> Self {
        self.storage_home = storage_home.into();
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.execution_target.trim().is_empty() {
            anyhow::bail!("execution_target cannot be empty");
        }

        if !self.storage_home.starts_with('/') {
            anyhow::bail!("storage_home must be an absolute path");
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTION_TARGET.to_string())
    }
}
