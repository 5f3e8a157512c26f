//! Observation source abstraction.
//!
//! The monitor never owns observation storage. A source hands it a bounded
//! window per request, either the latest N samples or a time range.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::types::Observation;

#[derive(Debug, Error)]
#[error("Observation source '{source_name}' failed: {message}")]
pub struct SourceError {
    pub source_name: String,
    pub message: String,
}

/// Trait abstracting where observation windows come from.
#[async_trait]
pub trait ObservationSource: Send + Sync {
    /// The `limit` most recent observations, newest first.
    async fn latest(&self, limit: usize) -> Result<Vec<Observation>, SourceError>;

    /// Observations with `start <= timestamp <= end`, newest first.
    async fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Observation>, SourceError>;

    /// Human-readable name for logging.
    fn source_name(&self) -> &str;
}

// ============================================================================
// In-memory source (replays, tests)
// ============================================================================

/// Serves windows from a pre-loaded observation log.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    /// Kept newest first
    observations: Vec<Observation>,
}

impl InMemorySource {
    pub fn new(mut observations: Vec<Observation>) -> Self {
        observations.sort_by(|a, b| b.chronological_cmp(a));
        Self { observations }
    }

    /// Load a JSON array of observations.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Every observation, newest first.
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Timestamp of the newest observation.
    pub fn newest(&self) -> Option<DateTime<Utc>> {
        self.observations.first().map(|o| o.timestamp)
    }
}

#[async_trait]
impl ObservationSource for InMemorySource {
    async fn latest(&self, limit: usize) -> Result<Vec<Observation>, SourceError> {
        Ok(self.observations.iter().take(limit).cloned().collect())
    }

    async fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Observation>, SourceError> {
        if start > end {
            return Err(SourceError {
                source_name: self.source_name().to_string(),
                message: format!("range start {start} is after end {end}"),
            });
        }
        Ok(self
            .observations
            .iter()
            .filter(|o| o.timestamp >= start && o.timestamp <= end)
            .cloned()
            .collect())
    }

    fn source_name(&self) -> &str {
        "in-memory"
    }
}
