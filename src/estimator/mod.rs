//! Maintenance Duration Estimator
//!
//! Multi-tier calibration of how long the next maintenance intervention
//! will take:
//!
//! 1. Translate the reason into the canonical vocabulary
//! 2. Rule-based baseline from severity, category, shift and condition
//! 3. Ask the external statistical estimator for a raw prediction
//! 4. Blend the two and bound the result to the realistic range
//!
//! The statistical estimator is an opaque collaborator behind
//! [`StatisticalEstimator`]. It may be slow, fail, or be absent entirely;
//! every such case degrades to the baseline and is logged, never
//! propagated.

mod baseline;
mod blend;

pub use baseline::{
    health_index_multiplier, health_multiplier, sensor_condition_multiplier, shift_multiplier, Baseline,
};
pub use blend::{blend, format_duration, Blend};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EstimatorConfig;
use crate::fmea::translate_reason;
use crate::health::round_to;
use crate::types::{Confidence, DurationEstimate, SensorConditions, Shift};

// ============================================================================
// External estimator seam
// ============================================================================

#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("Estimator unavailable: {0}")]
    Unavailable(String),

    #[error("Prediction failed: {0}")]
    Prediction(String),

    #[error("Invalid estimation input: {0}")]
    InvalidInput(String),
}

/// What the statistical estimator is asked.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EstimatorRequest {
    /// Canonical reason, already translated
    pub reason: String,
    pub shift: Option<Shift>,
    /// Additional features (severity, category, condition scores, ...)
    pub context: BTreeMap<String, serde_json::Value>,
}

/// Black-box predictor of maintenance minutes.
#[async_trait]
pub trait StatisticalEstimator: Send + Sync {
    /// Predict the intervention length in minutes.
    async fn predict(&self, request: &EstimatorRequest) -> Result<f64, EstimatorError>;

    /// Estimator name for logging
    fn name(&self) -> &'static str;
}

/// Estimator used when no model is deployed. Always unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEstimator;

#[async_trait]
impl StatisticalEstimator for NullEstimator {
    async fn predict(&self, _request: &EstimatorRequest) -> Result<f64, EstimatorError> {
        Err(EstimatorError::Unavailable("no model configured".to_string()))
    }

    fn name(&self) -> &'static str {
        "null"
    }
}

/// Estimator that always answers the same number. Useful for replays and
/// demonstrations.
#[derive(Debug, Clone, Copy)]
pub struct FixedEstimator(pub f64);

#[async_trait]
impl StatisticalEstimator for FixedEstimator {
    async fn predict(&self, _request: &EstimatorRequest) -> Result<f64, EstimatorError> {
        Ok(self.0)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

// ============================================================================
// Duration estimator
// ============================================================================

/// Inputs to one estimation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EstimationInput {
    /// Raw reason as reported (device code or free text)
    pub reason: String,
    pub shift: Option<Shift>,
    pub health_index: Option<f64>,
    pub sensors: SensorConditions,
}

/// Calibrates durations using a rule-based baseline and an injected
/// statistical estimator.
#[derive(Clone)]
pub struct DurationEstimator {
    estimator: Arc<dyn StatisticalEstimator>,
    config: EstimatorConfig,
}

impl std::fmt::Debug for DurationEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DurationEstimator")
            .field("estimator", &self.estimator.name())
            .field("config", &self.config)
            .finish()
    }
}

impl DurationEstimator {
    pub fn new(estimator: Arc<dyn StatisticalEstimator>, config: &EstimatorConfig) -> Self {
        Self {
            estimator,
            config: config.clone(),
        }
    }

    /// Estimate with the configured timeout.
    pub async fn estimate(&self, input: &EstimationInput) -> Result<DurationEstimate, EstimatorError> {
        self.estimate_with_timeout(input, self.config.timeout()).await
    }

    /// Estimate with a caller-supplied timeout for the statistical call.
    ///
    /// Only malformed input (non-finite health index or sensor score) is an
    /// error. Estimator failures degrade to the baseline.
    pub async fn estimate_with_timeout(
        &self,
        input: &EstimationInput,
        timeout: Duration,
    ) -> Result<DurationEstimate, EstimatorError> {
        validate_input(input)?;

        let reason = translate_reason(&input.reason);
        let baseline = Baseline::compute(&reason, input.shift, input.health_index, &input.sensors, &self.config);
        debug!(
            reason = %reason,
            severity = baseline.severity,
            category = ?baseline.category,
            base = baseline.base_duration,
            category_x = baseline.category_multiplier,
            shift_x = baseline.shift_multiplier,
            health_x = baseline.health_multiplier,
            baseline = baseline.minutes,
            "Baseline computed"
        );

        let request = EstimatorRequest {
            reason: reason.clone(),
            shift: input.shift,
            context: request_context(input, &baseline),
        };
        let raw = self.raw_prediction(&request, timeout).await;

        let blended = blend(baseline.minutes, raw, &self.config);
        let minutes = round_to(self.config.bound(blended.minutes), 1);
        debug!(raw = ?raw, branch = ?blended.branch, minutes, "Duration estimated");

        Ok(DurationEstimate {
            minutes,
            formatted: format_duration(minutes),
            reason,
            severity: baseline.severity,
            category: baseline.category.map(|c| c.as_str().to_string()),
            base_duration: baseline.base_duration,
            category_multiplier: baseline.category_multiplier,
            shift_multiplier: baseline.shift_multiplier,
            health_multiplier: baseline.health_multiplier,
            baseline: round_to(baseline.minutes, 1),
            raw_prediction: raw.map(|r| round_to(r, 1)),
            branch: blended.branch,
            adjustment_applied: raw.is_some(),
            confidence: Confidence::from_model_answer(raw.is_some()),
        })
    }

    /// Ask the statistical estimator. Any failure is logged and reported as
    /// "no prediction"; negative answers are clamped to zero.
    async fn raw_prediction(&self, request: &EstimatorRequest, timeout: Duration) -> Option<f64> {
        let name = self.estimator.name();
        match tokio::time::timeout(timeout, self.estimator.predict(request)).await {
            Ok(Ok(raw)) if raw.is_finite() => Some(raw.max(0.0)),
            Ok(Ok(raw)) => {
                warn!(estimator = name, raw, "Estimator returned a non-finite value, using baseline");
                None
            }
            Ok(Err(e)) => {
                warn!(estimator = name, error = %e, "Estimator failed, using baseline");
                None
            }
            Err(_) => {
                warn!(estimator = name, timeout_ms = timeout.as_millis() as u64, "Estimator timed out, using baseline");
                None
            }
        }
    }
}

fn validate_input(input: &EstimationInput) -> Result<(), EstimatorError> {
    if let Some(h) = input.health_index {
        if !h.is_finite() {
            return Err(EstimatorError::InvalidInput(format!("health index is not finite: {h}")));
        }
    }
    if let Some(bad) = input.sensors.reported().into_iter().find(|v| !v.is_finite()) {
        return Err(EstimatorError::InvalidInput(format!("sensor score is not finite: {bad}")));
    }
    Ok(())
}

fn request_context(input: &EstimationInput, baseline: &Baseline) -> BTreeMap<String, serde_json::Value> {
    let mut context = BTreeMap::new();
    context.insert("severity".to_string(), json!(baseline.severity));
    context.insert("category".to_string(), json!(baseline.category.map(|c| c.as_str())));
    context.insert("baseline_minutes".to_string(), json!(baseline.minutes));
    if let Some(h) = input.health_index {
        context.insert("health_index".to_string(), json!(h));
    }
    let s = &input.sensors;
    for (key, value) in [
        ("suction_strength", s.suction_strength),
        ("blade_sharpness", s.blade_sharpness),
        ("temp_consistency", s.temp_consistency),
    ] {
        if let Some(v) = value {
            context.insert(key.to_string(), json!(v));
        }
    }
    context
}
