//! Rule-based duration baseline.
//!
//! `baseline = base(severity) × category × shift × health`, bounded to the
//! configured realistic range.

use statrs::statistics::Statistics;

use crate::config::EstimatorConfig;
use crate::fmea::{base_duration_minutes, severity_for, FailureCategory};
use crate::types::{SensorConditions, Shift};

/// Multiplier when the shift is unknown.
const UNKNOWN_SHIFT_MULTIPLIER: f64 = 1.2;

/// Later shifts run with fewer technicians on site.
pub const fn shift_multiplier(shift: Option<Shift>) -> f64 {
    match shift {
        Some(Shift::Morning) => 1.0,
        Some(Shift::Afternoon) => 1.1,
        Some(Shift::Night) => 1.3,
        None => UNKNOWN_SHIFT_MULTIPLIER,
    }
}

/// Worse condition means a longer intervention.
pub fn health_index_multiplier(health_index: f64) -> f64 {
    if health_index >= 80.0 {
        0.7
    } else if health_index >= 60.0 {
        1.0
    } else if health_index >= 40.0 {
        1.3
    } else if health_index >= 20.0 {
        1.8
    } else {
        2.5
    }
}

/// Same idea on the 0-1 sensor condition scale.
pub fn sensor_condition_multiplier(average: f64) -> f64 {
    if average >= 0.8 {
        0.8
    } else if average >= 0.6 {
        1.0
    } else if average >= 0.4 {
        1.4
    } else if average >= 0.2 {
        2.0
    } else {
        2.8
    }
}

/// Health multiplier from the best signal available: the health index,
/// else the average of reported sensor scores, else neutral.
pub fn health_multiplier(health_index: Option<f64>, sensors: &SensorConditions) -> f64 {
    if let Some(index) = health_index {
        return health_index_multiplier(index);
    }
    let reported = sensors.reported();
    if reported.is_empty() {
        return 1.0;
    }
    sensor_condition_multiplier(reported.iter().mean())
}

/// Rule-based baseline with every factor that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    pub severity: u8,
    pub category: Option<FailureCategory>,
    pub base_duration: f64,
    pub category_multiplier: f64,
    pub shift_multiplier: f64,
    pub health_multiplier: f64,
    /// Product of the factors, bounded
    pub minutes: f64,
}

impl Baseline {
    /// `reason` must already be in the canonical vocabulary.
    pub fn compute(
        reason: &str,
        shift: Option<Shift>,
        health_index: Option<f64>,
        sensors: &SensorConditions,
        config: &EstimatorConfig,
    ) -> Self {
        let severity = severity_for(reason).severity();
        let base_duration = base_duration_minutes(severity);
        let category = FailureCategory::classify(reason);
        let category_multiplier = category.map_or(1.0, FailureCategory::multiplier);
        let shift_multiplier = shift_multiplier(shift);
        let health_multiplier = health_multiplier(health_index, sensors);

        let raw = base_duration * category_multiplier * shift_multiplier * health_multiplier;

        Self {
            severity,
            category,
            base_duration,
            category_multiplier,
            shift_multiplier,
            health_multiplier,
            minutes: config.bound(raw),
        }
    }
}
