//! Downtime types: DowntimeEvent, DowntimeSeverity, DowntimeType, DowntimeSummary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{MachineComponent, MachineStatus};

/// Severity of a reconstructed downtime episode.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DowntimeSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DowntimeSeverity {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for DowntimeSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Planned (maintenance) vs unplanned downtime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DowntimeType {
    Preventive,
    Reactive,
}

impl DowntimeType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preventive => "preventive",
            Self::Reactive => "reactive",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DowntimeStatus {
    Resolved,
    /// Window ended before the machine recovered; `end_time` is "now".
    Ongoing,
}

/// A discrete downtime episode reconstructed from the observation log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DowntimeEvent {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub component: MachineComponent,
    pub reason: String,
    pub severity: DowntimeSeverity,
    #[serde(rename = "type")]
    pub event_type: DowntimeType,
    pub status: DowntimeStatus,
    /// Status and metrics of the observation that opened the episode
    pub trigger_status: MachineStatus,
    pub trigger_performance: f64,
    pub trigger_quality: f64,
    pub notes: String,
}

impl DowntimeEvent {
    pub fn is_ongoing(&self) -> bool {
        self.status == DowntimeStatus::Ongoing
    }

    /// Exact episode length in seconds, for display of sub-minute events.
    pub fn duration_seconds(&self) -> i64 {
        (self.end_time - self.start_time).num_seconds().max(0)
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Count and total minutes for one component.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ComponentDowntime {
    pub count: usize,
    pub total_duration: i64,
}

/// Aggregate statistics over a list of downtime events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DowntimeSummary {
    pub count: usize,
    pub total_duration: i64,
    pub average_duration: f64,
    /// Always contains all four severities, zero-filled
    pub counts_by_severity: BTreeMap<DowntimeSeverity, usize>,
    pub counts_by_type: BTreeMap<DowntimeType, usize>,
    pub counts_by_component: BTreeMap<MachineComponent, ComponentDowntime>,
}
