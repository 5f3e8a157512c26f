//! Composite Health Scorer
//!
//! Deterministic health index for one line component. Two independent
//! signals are blended:
//! - reliability: the FMEA risk priority number, inverted so 100 is best
//! - effectiveness: OEE from time-weighted availability and the latest
//!   performance and quality rates
//!
//! # Scoring
//!
//! ```text
//! rpn_score = clamp((1 - rpn_value / rpn_max) * 100, 0, 100)
//! oee_score = clamp(A * P * Q / 10^4, OEE_MIN, OEE_MAX)
//! index     = rpn_score * W_rpn + oee_score * W_oee
//! ```
//!
//! All scores are rounded to two decimals. The index then maps to a
//! status, a five-band severity tier, and a recommendation list.

mod recommendations;

pub use recommendations::recommendations_for;

use tracing::debug;

use crate::availability::availability_rate;
use crate::config::{AvailabilityConfig, HealthConfig};
use crate::types::{HealthAssessment, HealthStatus, Observation, SeverityTier};

/// Round to `places` decimals.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Inverted RPN score (0-100, higher is better).
///
/// A non-positive `rpn_max` means there is no scale to invert against,
/// so the component gets no reliability credit.
pub fn rpn_score(rpn_value: f64, rpn_max: f64) -> f64 {
    if rpn_max <= 0.0 || !rpn_max.is_finite() || !rpn_value.is_finite() {
        return 0.0;
    }
    ((1.0 - rpn_value / rpn_max) * 100.0).clamp(0.0, 100.0)
}

/// OEE score from percentages. Non-finite inputs fall back to the floor.
///
/// Bounds are applied floor-then-ceiling so crossed bounds from an
/// unvalidated config cannot panic.
pub fn oee_score(availability: f64, performance: f64, quality: f64, config: &HealthConfig) -> f64 {
    let oee = availability * performance * quality / 10_000.0;
    if !oee.is_finite() {
        return config.oee_min;
    }
    oee.max(config.oee_min).min(config.oee_max)
}

/// Scores components against an observation window.
#[derive(Debug, Clone)]
pub struct HealthScorer {
    health: HealthConfig,
    availability: AvailabilityConfig,
}

impl HealthScorer {
    pub fn new(health: &HealthConfig, availability: &AvailabilityConfig) -> Self {
        Self {
            health: health.clone(),
            availability: availability.clone(),
        }
    }

    pub fn status(&self, health_index: f64) -> HealthStatus {
        if health_index >= self.health.threshold_good {
            HealthStatus::Healthy
        } else {
            HealthStatus::NeedsAttention
        }
    }

    /// Weighted index from the two component scores, clamped to 0-100.
    pub fn index(&self, rpn_score: f64, oee_score: f64) -> f64 {
        let index = rpn_score * self.health.rpn_weight + oee_score * self.health.oee_weight;
        round_to(index.clamp(0.0, 100.0), 2)
    }

    /// Score one component. Never fails: missing data uses documented
    /// defaults. The returned assessment carries no escalation; attaching
    /// one is the escalation trigger's job.
    pub fn assess(
        &self,
        component_name: &str,
        rpn_value: f64,
        rpn_max: f64,
        window: &[Observation],
    ) -> HealthAssessment {
        let availability = round_to(availability_rate(window, &self.availability), 2);

        let (performance, quality, oee) = match Observation::latest(window) {
            Some(latest) => {
                let p = sanitize_percent(latest.performance_rate);
                let q = sanitize_percent(latest.quality_rate);
                (p, q, oee_score(availability, p, q, &self.health))
            }
            None => (0.0, 0.0, self.health.oee_min),
        };

        let rpn = round_to(rpn_score(rpn_value, rpn_max), 2);
        let oee = round_to(oee, 2);
        let final_health_index = self.index(rpn, oee);
        let tier = SeverityTier::from_index(final_health_index);

        debug!(
            component = %component_name,
            rpn_score = rpn,
            oee_score = oee,
            availability,
            health_index = final_health_index,
            "Health scored"
        );

        HealthAssessment {
            component_name: component_name.to_string(),
            rpn_value,
            rpn_max,
            rpn_score: rpn,
            oee_score: oee,
            availability_rate: availability,
            performance_rate: performance,
            quality_rate: quality,
            final_health_index,
            status: self.status(final_health_index),
            severity_tier: tier,
            color: tier.color().to_string(),
            description: tier.description().to_string(),
            recommendations: recommendations_for(tier, component_name),
            escalation: None,
        }
    }
}

/// Controllers occasionally report NaN or slightly out-of-range rates.
fn sanitize_percent(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}
