//! Health types: HealthStatus, SeverityTier, HealthAssessment

use serde::{Deserialize, Serialize};

use super::EscalationRecord;

/// Binary status against the "good" threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HealthStatus {
    Healthy,
    NeedsAttention,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Healthy => write!(f, "Healthy"),
            Self::NeedsAttention => write!(f, "Needs Attention"),
        }
    }
}

/// Five-band display tier of the health index.
///
/// Thresholds:
/// - Excellent: 90-100
/// - Good: 80-89
/// - Fair: 70-79
/// - Poor: 50-69
/// - Critical: 0-49
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SeverityTier {
    Critical,
    Poor,
    Fair,
    Good,
    Excellent,
}

impl SeverityTier {
    pub fn from_index(health_index: f64) -> Self {
        if health_index >= 90.0 {
            Self::Excellent
        } else if health_index >= 80.0 {
            Self::Good
        } else if health_index >= 70.0 {
            Self::Fair
        } else if health_index >= 50.0 {
            Self::Poor
        } else {
            Self::Critical
        }
    }

    /// UI color as a hex string.
    pub const fn color(self) -> &'static str {
        match self {
            Self::Excellent => "#00AA00",
            Self::Good => "#00FF00",
            Self::Fair => "#AAFF00",
            Self::Poor => "#FFAA00",
            Self::Critical => "#FF0000",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Excellent => "Machine condition is excellent, no action required",
            Self::Good => "Machine condition is good, continue routine monitoring",
            Self::Fair => "Machine condition is normal, watch for a declining trend",
            Self::Poor => "Machine condition needs attention, plan maintenance",
            Self::Critical => "Machine condition is critical, perform maintenance immediately",
        }
    }
}

impl std::fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Critical => "Critical",
        };
        f.write_str(s)
    }
}

/// Composite health of one component, recomputed per request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthAssessment {
    pub component_name: String,
    pub rpn_value: f64,
    pub rpn_max: f64,
    /// Inverted RPN (0-100, higher is better)
    pub rpn_score: f64,
    pub oee_score: f64,
    pub availability_rate: f64,
    pub performance_rate: f64,
    pub quality_rate: f64,
    pub final_health_index: f64,
    pub status: HealthStatus,
    pub severity_tier: SeverityTier,
    pub color: String,
    pub description: String,
    pub recommendations: Vec<String>,
    /// Present only when the index fell below the critical threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escalation: Option<EscalationRecord>,
}
