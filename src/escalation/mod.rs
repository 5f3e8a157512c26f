//! Escalation Trigger
//!
//! Once a component's health index drops below the critical threshold the
//! trigger extracts a root-cause reason and the production shift from the
//! observation window and asks the duration estimator how long the
//! intervention will take. The result is attached to the assessment as an
//! [`EscalationRecord`].

pub mod cascade;

pub use cascade::{extract_reason, extract_shift, plant_hour, GENERIC_REASON};

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::estimator::{DurationEstimator, EstimationInput};
use crate::types::{EscalationRecord, EstimateOutcome, HealthAssessment, Observation};

#[derive(Debug, Clone)]
pub struct EscalationTrigger {
    critical_threshold: f64,
    utc_offset_hours: i32,
    estimator: DurationEstimator,
}

impl EscalationTrigger {
    pub fn new(critical_threshold: f64, utc_offset_hours: i32, estimator: DurationEstimator) -> Self {
        Self {
            critical_threshold,
            utc_offset_hours,
            estimator,
        }
    }

    pub fn should_escalate(&self, health_index: f64) -> bool {
        health_index < self.critical_threshold
    }

    /// Escalate if the assessment is below the critical threshold.
    pub async fn evaluate(
        &self,
        assessment: &HealthAssessment,
        window: &[Observation],
        now: DateTime<Utc>,
    ) -> Option<EscalationRecord> {
        if !self.should_escalate(assessment.final_health_index) {
            return None;
        }
        Some(self.escalate(assessment, window, now).await)
    }

    /// Build the escalation record unconditionally.
    ///
    /// A failed estimation still yields a triggered record; the failure is
    /// carried in `duration_estimate` instead of an estimate.
    pub async fn escalate(
        &self,
        assessment: &HealthAssessment,
        window: &[Observation],
        now: DateTime<Utc>,
    ) -> EscalationRecord {
        let (reason, reason_source) = extract_reason(window, &assessment.component_name);
        let (shift, shift_source) = extract_shift(window, now, self.utc_offset_hours);

        let input = EstimationInput {
            reason: reason.clone(),
            shift: Some(shift),
            health_index: Some(assessment.final_health_index),
            sensors: Observation::latest(window).map(|o| o.sensors).unwrap_or_default(),
        };

        let duration_estimate = match self.estimator.estimate(&input).await {
            Ok(estimate) => {
                info!(
                    component = %assessment.component_name,
                    health_index = assessment.final_health_index,
                    reason = %estimate.reason,
                    shift = %shift,
                    minutes = estimate.minutes,
                    "Maintenance escalated"
                );
                EstimateOutcome::Estimated(estimate)
            }
            Err(e) => {
                warn!(
                    component = %assessment.component_name,
                    health_index = assessment.final_health_index,
                    error = %e,
                    "Maintenance escalated without a duration estimate"
                );
                EstimateOutcome::Failed { message: e.to_string() }
            }
        };

        EscalationRecord {
            triggered: true,
            threshold: self.critical_threshold,
            extracted_reason: reason,
            reason_source,
            shift,
            shift_source,
            duration_estimate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AvailabilityConfig, EstimatorConfig, HealthConfig};
    use crate::estimator::{FixedEstimator, NullEstimator};
    use crate::health::HealthScorer;
    use crate::types::{MachineStatus, ReasonSource, Shift, ShiftSource};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn trigger(estimator: DurationEstimator) -> EscalationTrigger {
        EscalationTrigger::new(40.0, 7, estimator)
    }

    fn assessment(index: f64) -> HealthAssessment {
        let mut a = HealthScorer::new(&HealthConfig::default(), &AvailabilityConfig::default())
            .assess("Feeder", 0.0, 100.0, &[]);
        a.final_health_index = index;
        a
    }

    #[test]
    fn test_threshold_is_strict() {
        let t = trigger(DurationEstimator::new(Arc::new(NullEstimator), &EstimatorConfig::default()));
        assert!(t.should_escalate(39.9));
        assert!(!t.should_escalate(40.0));
        assert!(!t.should_escalate(85.0));
    }

    #[tokio::test]
    async fn test_evaluate_skips_healthy() {
        let t = trigger(DurationEstimator::new(Arc::new(NullEstimator), &EstimatorConfig::default()));
        assert!(t.evaluate(&assessment(40.0), &[], Utc::now()).await.is_none());
    }

    #[tokio::test]
    async fn test_escalation_record() {
        let t = trigger(DurationEstimator::new(Arc::new(FixedEstimator(300.0)), &EstimatorConfig::default()));
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let mut obs = Observation::new(now, MachineStatus::Error, 10.0, 90.0);
        obs.error_message = Some("CRACK".to_string());
        obs.shift = Some(2.0);

        let record = t.evaluate(&assessment(25.0), &[obs], now).await.unwrap();
        assert!(record.triggered);
        assert_eq!(record.threshold, 40.0);
        assert_eq!(record.extracted_reason, "CRACK");
        assert_eq!(record.reason_source, ReasonSource::ErrorMessage);
        assert_eq!(record.shift, Shift::Afternoon);
        assert_eq!(record.shift_source, ShiftSource::Shift);
        assert_eq!(record.duration_estimate.estimate().unwrap().minutes, 560.2);
    }

    #[tokio::test]
    async fn test_failed_estimate_still_triggers() {
        let t = trigger(DurationEstimator::new(Arc::new(NullEstimator), &EstimatorConfig::default()));
        let record = t.escalate(&assessment(f64::NAN), &[], Utc::now()).await;
        assert!(record.triggered);
        assert_eq!(record.reason_source, ReasonSource::ComponentDefault);
        assert!(matches!(record.duration_estimate, EstimateOutcome::Failed { .. }));
    }
}
