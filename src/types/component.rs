//! Machine stages of the flexo folder-gluer line

use serde::{Deserialize, Serialize};

/// A stage of the production line, in material-flow order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MachineComponent {
    #[serde(rename = "Pre-Feeder")]
    PreFeeder,
    Feeder,
    Printing,
    Slotter,
    Stacker,
}

impl MachineComponent {
    pub const ALL: [Self; 5] = [
        Self::PreFeeder,
        Self::Feeder,
        Self::Printing,
        Self::Slotter,
        Self::Stacker,
    ];

    pub const fn display_name(self) -> &'static str {
        match self {
            Self::PreFeeder => "Pre-Feeder",
            Self::Feeder => "Feeder",
            Self::Printing => "Printing",
            Self::Slotter => "Slotter",
            Self::Stacker => "Stacker",
        }
    }

    /// Match a free-form component name by case-insensitive substring.
    ///
    /// "pre-feeder" is tested before "feeder" so `"Pre-Feeder Unit"` does not
    /// resolve to the feeder. Returns `None` for names outside the line.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        if lower.contains("pre-feeder") || lower.contains("prefeeder") || lower.contains("pre feeder") {
            Some(Self::PreFeeder)
        } else if lower.contains("feeder") {
            Some(Self::Feeder)
        } else if lower.contains("printing") || lower.contains("print") {
            Some(Self::Printing)
        } else if lower.contains("slotter") || lower.contains("sloter") {
            Some(Self::Slotter)
        } else if lower.contains("stacker") {
            Some(Self::Stacker)
        } else {
            None
        }
    }

    /// Failure code assumed for this stage when an escalation has no
    /// operator-reported reason. Codes are in the estimator's vocabulary.
    pub const fn default_failure_code(self) -> &'static str {
        match self {
            Self::PreFeeder => "FEEDER MEKANIK",
            Self::Feeder => "FEEDER TROUBLE",
            Self::Printing => "PRINTING BLUR",
            Self::Slotter => "SLOTTER LARI",
            Self::Stacker => "STACKER JAM",
        }
    }
}

impl std::fmt::Display for MachineComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pre_feeder_wins_over_feeder() {
        assert_eq!(MachineComponent::from_name("Pre-Feeder"), Some(MachineComponent::PreFeeder));
        assert_eq!(MachineComponent::from_name("PRE FEEDER belt"), Some(MachineComponent::PreFeeder));
        assert_eq!(MachineComponent::from_name("feeder"), Some(MachineComponent::Feeder));
    }

    #[test]
    fn unknown_names_are_unmatched() {
        assert_eq!(MachineComponent::from_name("Die Cut"), None);
        assert_eq!(MachineComponent::from_name(""), None);
    }

    #[test]
    fn display_round_trips_through_from_name() {
        for component in MachineComponent::ALL {
            assert_eq!(MachineComponent::from_name(component.display_name()), Some(component));
        }
    }
}
