//! Failure category classification.

use serde::{Deserialize, Serialize};

use super::normalize_reason;

/// Broad failure family, each with a typical repair-time multiplier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    Printing,
    Mechanical,
    Electrical,
    Feeder,
    Quality,
}

impl FailureCategory {
    /// Match order. A reason that fits several families takes the first.
    pub const ALL: [Self; 5] = [
        Self::Printing,
        Self::Mechanical,
        Self::Electrical,
        Self::Feeder,
        Self::Quality,
    ];

    pub const fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Printing => &["PRINTING", "PRINT", "TINTA", "WARNA", "REGISTER", "ANILOX"],
            Self::Mechanical => &["MEKANIK", "BEARING", "GEAR", "PECAH", "AUS", "PNEUMATIC"],
            Self::Electrical => &["ELEKTRIK", "LISTRIK", "SENSOR", "WIRING", "MOTOR"],
            Self::Feeder => &["FEEDER", "VACUUM", "BELT", "CONVEYOR", "FEEDING"],
            Self::Quality => &["BLUR", "BOTAK", "LARI", "MIRING", "CACAT", "REJECT"],
        }
    }

    pub const fn multiplier(self) -> f64 {
        match self {
            Self::Printing => 1.4,
            Self::Mechanical => 1.6,
            Self::Electrical => 1.5,
            Self::Feeder => 1.3,
            Self::Quality => 1.2,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Printing => "printing",
            Self::Mechanical => "mechanical",
            Self::Electrical => "electrical",
            Self::Feeder => "feeder",
            Self::Quality => "quality",
        }
    }

    /// Classify a reason by keyword substring. `None` means general.
    pub fn classify(reason: &str) -> Option<Self> {
        let key = normalize_reason(reason);
        Self::ALL
            .into_iter()
            .find(|c| c.keywords().iter().any(|kw| key.contains(*kw)))
    }
}

impl std::fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
