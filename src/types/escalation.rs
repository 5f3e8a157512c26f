//! Escalation types: Shift, EscalationRecord, DurationEstimate

use serde::{Deserialize, Serialize};

// ============================================================================
// Shift
// ============================================================================

/// One of the three fixed 8-hour production shifts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(into = "u8", try_from = "u8")]
pub enum Shift {
    /// 06:00-14:00
    Morning,
    /// 14:00-22:00
    Afternoon,
    /// 22:00-06:00
    Night,
}

impl Shift {
    pub const fn number(self) -> u8 {
        match self {
            Self::Morning => 1,
            Self::Afternoon => 2,
            Self::Night => 3,
        }
    }

    /// Parse a panel-reported shift value. Integral floats (`2.0`) are
    /// accepted because the panel historically sent shifts as floats.
    pub fn from_value(value: f64) -> Option<Self> {
        if value.fract() != 0.0 {
            return None;
        }
        match value as i64 {
            1 => Some(Self::Morning),
            2 => Some(Self::Afternoon),
            3 => Some(Self::Night),
            _ => None,
        }
    }

    /// Shift for a local wall-clock hour (0-23).
    pub const fn from_hour(hour: u32) -> Self {
        match hour {
            6..=13 => Self::Morning,
            14..=21 => Self::Afternoon,
            _ => Self::Night,
        }
    }
}

impl From<Shift> for u8 {
    fn from(shift: Shift) -> Self {
        shift.number()
    }
}

impl TryFrom<u8> for Shift {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_value(f64::from(value)).ok_or_else(|| format!("invalid shift number: {value}"))
    }
}

impl std::fmt::Display for Shift {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ============================================================================
// Cascade provenance
// ============================================================================

/// Which step of the reason cascade produced the extracted reason.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ReasonSource {
    ErrorMessage,
    FailureReason,
    DowntimeReason,
    ComponentDefault,
    Generic,
}

/// Which step of the shift cascade produced the shift.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ShiftSource {
    Shift,
    CurrentShift,
    WallClock,
}

// ============================================================================
// Duration estimate
// ============================================================================

/// Which adjustment policy the blend step applied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum BlendBranch {
    /// Raw prediction far below baseline, pulled up toward it
    PulledTowardBaseline,
    /// Raw prediction far above baseline, capped
    Capped,
    /// Raw prediction plausible, weighted toward the model
    Weighted,
    /// No model output, baseline only
    BaselineOnly,
}

/// How much the estimate leans on the statistical model.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Confidence {
    /// The model answered and was blended in
    High,
    /// Baseline only
    Medium,
}

impl Confidence {
    pub const fn from_model_answer(answered: bool) -> Self {
        if answered {
            Self::High
        } else {
            Self::Medium
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Calibrated maintenance duration with its calibration trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DurationEstimate {
    /// Final duration in minutes, bounded and rounded to 0.1
    pub minutes: f64,
    /// e.g. "9 jam 20 menit"
    pub formatted: String,
    /// Canonical (translated) reason the estimate is based on
    pub reason: String,
    pub severity: u8,
    pub category: Option<String>,
    pub base_duration: f64,
    pub category_multiplier: f64,
    pub shift_multiplier: f64,
    pub health_multiplier: f64,
    /// Rule-based baseline, bounded and rounded to 0.1
    pub baseline: f64,
    /// Model output after clamping negatives to zero, if the model answered
    pub raw_prediction: Option<f64>,
    pub branch: BlendBranch,
    pub adjustment_applied: bool,
    pub confidence: Confidence,
}

/// Outcome of the estimation step attached to an escalation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EstimateOutcome {
    Estimated(DurationEstimate),
    Failed { message: String },
}

impl EstimateOutcome {
    pub fn estimate(&self) -> Option<&DurationEstimate> {
        match self {
            Self::Estimated(e) => Some(e),
            Self::Failed { .. } => None,
        }
    }
}

/// Automatic escalation attached to a critical health assessment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EscalationRecord {
    pub triggered: bool,
    pub threshold: f64,
    pub extracted_reason: String,
    pub reason_source: ReasonSource,
    pub shift: Shift,
    pub shift_source: ShiftSource,
    pub duration_estimate: EstimateOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_serializes_as_label() {
        assert_eq!(serde_json::to_string(&Confidence::High).unwrap(), "\"High\"");
        assert_eq!(Confidence::from_model_answer(false), Confidence::Medium);
    }

    #[test]
    fn shift_hour_bands() {
        assert_eq!(Shift::from_hour(6), Shift::Morning);
        assert_eq!(Shift::from_hour(13), Shift::Morning);
        assert_eq!(Shift::from_hour(14), Shift::Afternoon);
        assert_eq!(Shift::from_hour(21), Shift::Afternoon);
        assert_eq!(Shift::from_hour(22), Shift::Night);
        assert_eq!(Shift::from_hour(0), Shift::Night);
        assert_eq!(Shift::from_hour(5), Shift::Night);
    }

    #[test]
    fn shift_from_panel_values() {
        assert_eq!(Shift::from_value(2.0), Some(Shift::Afternoon));
        assert_eq!(Shift::from_value(2.5), None);
        assert_eq!(Shift::from_value(4.0), None);
        assert_eq!(Shift::from_value(-1.0), None);
    }

    #[test]
    fn shift_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Shift::Night).unwrap(), "3");
        let parsed: Shift = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, Shift::Morning);
        assert!(serde_json::from_str::<Shift>("7").is_err());
    }
}
