//! Blending the statistical prediction with the rule-based baseline.
//!
//! The statistical model is trained on historical logs and tends to be
//! overly optimistic for severe failures and occasionally runs away on
//! rare reasons. The blend keeps it anchored to the baseline:
//!
//! | raw prediction | result |
//! |---|---|
//! | `raw < low_ratio × b` | `low_baseline_weight × b + (1 - low_baseline_weight) × raw` |
//! | `raw > high_ratio × b` | `cap_factor × b` |
//! | otherwise | `baseline_weight × b + (1 - baseline_weight) × raw` |
//! | no prediction | `b` |

use crate::config::EstimatorConfig;
use crate::types::BlendBranch;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blend {
    pub minutes: f64,
    pub branch: BlendBranch,
}

/// Blend `raw` (already clamped to >= 0) into `baseline`. The result is
/// not yet bounded.
pub fn blend(baseline: f64, raw: Option<f64>, config: &EstimatorConfig) -> Blend {
    let Some(raw) = raw else {
        return Blend {
            minutes: baseline,
            branch: BlendBranch::BaselineOnly,
        };
    };

    if raw < config.low_ratio * baseline {
        let w = config.low_baseline_weight;
        Blend {
            minutes: w * baseline + (1.0 - w) * raw,
            branch: BlendBranch::PulledTowardBaseline,
        }
    } else if raw > config.high_ratio * baseline {
        Blend {
            minutes: config.cap_factor * baseline,
            branch: BlendBranch::Capped,
        }
    } else {
        let w = config.baseline_weight;
        Blend {
            minutes: w * baseline + (1.0 - w) * raw,
            branch: BlendBranch::Weighted,
        }
    }
}

/// Human-readable duration, e.g. "9 jam 20 menit" or "45 menit".
pub fn format_duration(minutes: f64) -> String {
    let total = minutes.max(0.0);
    let hours = (total / 60.0).floor() as u64;
    let remaining = (total % 60.0).floor() as u64;
    if hours > 0 {
        format!("{hours} jam {remaining} menit")
    } else {
        format!("{remaining} menit")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branches() {
        let cfg = EstimatorConfig::default();
        let b = blend(100.0, Some(10.0), &cfg);
        assert_eq!(b.branch, BlendBranch::PulledTowardBaseline);
        assert!((b.minutes - 73.0).abs() < 1e-9, "Blend: {}", b.minutes);

        let b = blend(100.0, Some(301.0), &cfg);
        assert_eq!(b.branch, BlendBranch::Capped);
        assert!((b.minutes - 250.0).abs() < 1e-9, "Blend: {}", b.minutes);

        let b = blend(100.0, Some(200.0), &cfg);
        assert_eq!(b.branch, BlendBranch::Weighted);
        assert!((b.minutes - 160.0).abs() < 1e-9, "Blend: {}", b.minutes);

        let b = blend(100.0, None, &cfg);
        assert_eq!(b.branch, BlendBranch::BaselineOnly);
        assert_eq!(b.minutes, 100.0);
    }

    #[test]
    fn test_ratio_edges_are_weighted() {
        let cfg = EstimatorConfig::default();
        assert_eq!(blend(100.0, Some(30.0), &cfg).branch, BlendBranch::Weighted);
        assert_eq!(blend(100.0, Some(300.0), &cfg).branch, BlendBranch::Weighted);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(560.2), "9 jam 20 menit");
        assert_eq!(format_duration(45.0), "45 menit");
        assert_eq!(format_duration(60.0), "1 jam 0 menit");
        assert_eq!(format_duration(10.0), "10 menit");
    }
}
