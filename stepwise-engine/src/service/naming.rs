//! Job name uniqueness
//!
//! A user cannot have two jobs with the same name. Colliding names are
//! either suffixed with the next free index or stamped with the time.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::config::NamingStrategy;
use crate::repository::JobNameStore;

/// The name a job is submitted under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobName {
    pub name: String,
    /// The requested name, present only when `name` differs from it
    pub display_name: Option<String>,
}

impl JobName {
    fn unchanged(desired: &str) -> Self {
        Self {
            name: desired.to_string(),
            display_name: None,
        }
    }

    fn renamed(name: String, desired: &str) -> Self {
        warn!("Job name {} is taken, submitting as {}", desired, name);
        Self {
            name,
            display_name: Some(desired.to_string()),
        }
    }
}

/// Pick a job name with the configured strategy
pub fn unique_job_name(
    strategy: NamingStrategy,
    store: &dyn JobNameStore,
    username: &str,
    desired: &str,
) -> JobName {
    match strategy {
        NamingStrategy::Indexed => ensure_unique(store, username, desired),
        NamingStrategy::Timestamp => timestamped(desired, Utc::now()),
    }
}

/// Index of `name` among the variants of `desired`
///
/// `desired` itself is index 0 and `desired-<digits>` is that number.
fn collision_index(desired: &str, name: &str) -> Option<u64> {
    let rest = name.strip_prefix(desired)?;
    if rest.is_empty() {
        return Some(0);
    }
    let digits = rest.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Suffix `desired` with one more than the highest index already in use
pub fn ensure_unique(store: &dyn JobNameStore, username: &str, desired: &str) -> JobName {
    let highest = store
        .list_job_names(username)
        .iter()
        .filter_map(|name| collision_index(desired, name))
        .max();

    match highest {
        None => JobName::unchanged(desired),
        Some(index) => JobName::renamed(format!("{}-{}", desired, index.saturating_add(1)), desired),
    }
}

/// Replace spaces and append a millisecond UTC timestamp
pub fn timestamped(desired: &str, now: DateTime<Utc>) -> JobName {
    let name = format!(
        "{}-{}",
        desired.replace(' ', "_"),
        now.format("%Y-%m-%d-%H-%M-%S%.3f")
    );
    JobName {
        name,
        display_name: Some(desired.to_string()),
    }
}
