//! Maintenance recommendations per severity tier.
//!
//! The four upper tiers share fixed lists. The Critical tier adds a
//! stage-specific checklist built from each stage's dominant FMEA failure
//! modes, because "do maintenance now" is only useful with a starting point.

use crate::types::{MachineComponent, SeverityTier};

const EXCELLENT: &[&str] = &[
    "Continue normal operation",
    "Keep periodic monitoring on schedule",
    "Record current performance as a benchmark",
];

const GOOD: &[&str] = &[
    "Continue operation with routine monitoring",
    "Review the weekly performance trend",
    "Keep standard spare parts ready",
];

const FAIR: &[&str] = &[
    "Increase monitoring frequency",
    "Analyze the declining performance trend",
    "Plan preventive maintenance",
];

const POOR: &[&str] = &[
    "Schedule maintenance as soon as possible",
    "Identify the root cause of the degradation",
    "Prepare critical spare parts",
    "Consider backup equipment",
];

const CRITICAL: &[&str] = &[
    "URGENT: stop operation if necessary",
    "Perform maintenance immediately",
    "Investigate the root cause thoroughly",
    "Prepare replacement parts",
    "Activate the emergency procedure",
];

const GENERIC_INSPECTION: &[&str] = &[
    "Inspect all moving parts for wear",
    "Check sensor readings against calibration",
    "Verify lubrication and fastener torque",
];

const fn stage_checklist(component: MachineComponent) -> &'static [&'static str] {
    match component {
        MachineComponent::PreFeeder => &[
            "Clean or replace worn pre-feeder rollers",
            "Check sheet alignment sensors for misalignment",
            "Clear paper jams and inspect the sheet path",
        ],
        MachineComponent::Feeder => &[
            "Check suction pressure and vacuum pump condition",
            "Realign feed guides to stop skewed feeding",
            "Inspect feeder belts and pneumatic lines",
        ],
        MachineComponent::Printing => &[
            "Inspect and clean anilox rollers for wear",
            "Recalibrate print registration sensors",
            "Check ink viscosity and doctor blade condition",
        ],
        MachineComponent::Slotter => &[
            "Sharpen or replace slotter blades",
            "Check slotter head alignment and vibration",
            "Verify slot dimensions against the job spec sheet",
        ],
        MachineComponent::Stacker => &[
            "Reduce stacking speed until stacks hold",
            "Clean counting sensors",
            "Inspect stacker conveyor and batch tables",
        ],
    }
}

/// Recommendations for a tier and component.
///
/// `component_name` is matched by case-insensitive substring (pre-feeder
/// before feeder); names outside the line get a generic inspection list.
pub fn recommendations_for(tier: SeverityTier, component_name: &str) -> Vec<String> {
    let base = match tier {
        SeverityTier::Excellent => EXCELLENT,
        SeverityTier::Good => GOOD,
        SeverityTier::Fair => FAIR,
        SeverityTier::Poor => POOR,
        SeverityTier::Critical => CRITICAL,
    };

    let mut out: Vec<String> = base.iter().map(|s| (*s).to_string()).collect();
    if tier == SeverityTier::Critical {
        let checklist = MachineComponent::from_name(component_name)
            .map_or(GENERIC_INSPECTION, stage_checklist);
        out.extend(checklist.iter().map(|s| (*s).to_string()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upper_tiers_ignore_component() {
        assert_eq!(
            recommendations_for(SeverityTier::Good, "Printing"),
            recommendations_for(SeverityTier::Good, "Feeder")
        );
        assert_eq!(recommendations_for(SeverityTier::Excellent, "x").len(), 3);
    }

    #[test]
    fn test_critical_is_stage_specific() {
        let recs = recommendations_for(SeverityTier::Critical, "Pre-Feeder Unit");
        assert!(recs.iter().any(|r| r.contains("pre-feeder rollers")), "{:?}", recs);
        let recs = recommendations_for(SeverityTier::Critical, "feeder");
        assert!(recs.iter().any(|r| r.contains("suction")), "{:?}", recs);
    }

    #[test]
    fn test_critical_unknown_component_gets_generic_checklist() {
        let recs = recommendations_for(SeverityTier::Critical, "Gluer");
        assert!(recs[0].starts_with("URGENT"));
        assert!(recs.iter().any(|r| r.contains("moving parts")));
    }
}
