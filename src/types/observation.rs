//! Observation types: MachineStatus, Observation, SensorConditions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// Machine Status
// ============================================================================

/// Status reported by the machine controller with every observation.
///
/// Declaration order is the tie-break for samples sharing a timestamp:
/// `Running` sorts first, so a down status reported at the same instant
/// owns the following interval.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum MachineStatus {
    #[default]
    Running,
    Error,
    Stopped,
    Idle,
    Maintenance,
    Downtime,
}

impl MachineStatus {
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Running => "Running",
            Self::Error => "Error",
            Self::Stopped => "Stopped",
            Self::Idle => "Idle",
            Self::Maintenance => "Maintenance",
            Self::Downtime => "Downtime",
        }
    }
}

impl std::fmt::Display for MachineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Observation
// ============================================================================

/// One periodic status sample from the production line.
///
/// The mandatory fields come from every controller message. The optional
/// free-text fields are only present when the operator panel or a sensor
/// reported a cause, and drive the escalation reason cascade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub machine_status: MachineStatus,
    /// Performance rate (0-100%)
    pub performance_rate: f64,
    /// Quality rate (0-100%)
    pub quality_rate: f64,
    #[serde(default)]
    pub cumulative_production: u64,
    #[serde(default)]
    pub cumulative_defects: u64,

    /// Explicit controller error text (highest-priority reason source)
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub failure_reason: Option<String>,
    #[serde(default)]
    pub downtime_reason: Option<String>,
    /// Shift number as reported by the panel (1, 2 or 3)
    #[serde(default)]
    pub shift: Option<f64>,
    #[serde(default)]
    pub current_shift: Option<f64>,

    /// Condition scores from auxiliary sensors (0.0-1.0, 1.0 = like new)
    #[serde(default, flatten)]
    pub sensors: SensorConditions,
}

impl Observation {
    /// Minimal observation with no optional fields set.
    pub fn new(
        timestamp: DateTime<Utc>,
        machine_status: MachineStatus,
        performance_rate: f64,
        quality_rate: f64,
    ) -> Self {
        Self {
            timestamp,
            machine_status,
            performance_rate,
            quality_rate,
            cumulative_production: 0,
            cumulative_defects: 0,
            error_message: None,
            failure_reason: None,
            downtime_reason: None,
            shift: None,
            current_shift: None,
            sensors: SensorConditions::default(),
        }
    }

    /// Total chronological order: timestamp, then status, then the two
    /// rates. Samples sharing a timestamp always land in the same order no
    /// matter how the window was handed over.
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then_with(|| self.machine_status.cmp(&other.machine_status))
            .then_with(|| self.performance_rate.total_cmp(&other.performance_rate))
            .then_with(|| self.quality_rate.total_cmp(&other.quality_rate))
    }

    /// Borrow a window in chronological order.
    pub fn chronological(window: &[Self]) -> Vec<&Self> {
        let mut ordered: Vec<&Self> = window.iter().collect();
        ordered.sort_by(|a, b| a.chronological_cmp(b));
        ordered
    }

    /// Latest observation of a window regardless of the window's ordering.
    pub fn latest(window: &[Self]) -> Option<&Self> {
        window.iter().max_by(|a, b| a.chronological_cmp(b))
    }
}

/// Auxiliary condition scores used when no health index is available.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct SensorConditions {
    #[serde(default)]
    pub suction_strength: Option<f64>,
    #[serde(default)]
    pub blade_sharpness: Option<f64>,
    #[serde(default)]
    pub temp_consistency: Option<f64>,
}

impl SensorConditions {
    /// All reported scores, in a fixed order.
    pub fn reported(&self) -> Vec<f64> {
        [self.suction_strength, self.blade_sharpness, self.temp_consistency]
            .into_iter()
            .flatten()
            .collect()
    }
}
