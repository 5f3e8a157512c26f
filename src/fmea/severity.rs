//! FMEA severity lookup and base maintenance durations.

use super::normalize_reason;

/// Severity used when neither the exact table nor any pattern matches.
pub const DEFAULT_SEVERITY: u8 = 5;

/// Severities from the line's FMEA worksheet, keyed by defect description.
const EXACT_SEVERITY: &[(&str, u8)] = &[
    ("PRINTING BOTAK", 9),
    ("PRINTING DOUBLE", 8),
    ("PRINTING BLUR", 7),
    ("PRINT BLOBOR", 9),
    ("CREASING MIRING", 8),
    ("CREASING PECAH", 9),
    ("CREASING LARI", 7),
    ("SLOTTER PECAH", 9),
    ("SLOTTER LARI", 6),
    ("SLOTER LARI", 6),
    ("DIECUT TIDAK PUTUS", 8),
    ("DIECUT PECAH", 9),
    ("FEEDER TROUBLE", 7),
    ("FEEDER ELEKTRIK", 8),
    ("FEEDER MEKANIK", 7),
    ("GANTI ORDER", 1),
    ("MAINTENANCE", 5),
    ("SETUP", 1),
];

/// Keyword fallback, scanned from most to least severe. First hit wins.
const SEVERITY_PATTERNS: &[(u8, &[&str])] = &[
    (10, &["EXPLOSION", "FIRE", "SAFETY"]),
    (9, &["PECAH", "CRACK", "BROKEN", "TOTAL_FAILURE", "REGISTER_GESER"]),
    (8, &["ELEKTRIK", "ELECTRICAL", "MEKANIK", "MECHANICAL", "SENSOR_ERROR"]),
    (7, &["PRINTING", "QUALITY", "DEFECT", "LARI", "MIRING"]),
    (6, &["FEEDER", "VACUUM", "CONVEYOR", "FEEDING"]),
    (5, &["ADJUSTMENT", "SETTING", "CLEANING"]),
    (4, &["MINOR_REPAIR", "OPERATOR_REPAIR"]),
    (3, &["SETUP", "CHANGEOVER", "MOUNTING"]),
    (2, &["BREAK", "ISTIRAHAT", "SCHEDULED"]),
    (1, &["MEETING", "BRIEFING", "PRAYER"]),
];

/// How a severity was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeverityMatch {
    Exact(u8),
    Pattern { severity: u8, keyword: &'static str },
    Default,
}

impl SeverityMatch {
    pub const fn severity(self) -> u8 {
        match self {
            Self::Exact(s) | Self::Pattern { severity: s, .. } => s,
            Self::Default => DEFAULT_SEVERITY,
        }
    }
}

/// Resolve the FMEA severity of a reason: exact table, then keyword
/// patterns, then [`DEFAULT_SEVERITY`].
pub fn severity_for(reason: &str) -> SeverityMatch {
    let key = normalize_reason(reason);

    if let Some(&(_, s)) = EXACT_SEVERITY.iter().find(|(k, _)| *k == key) {
        return SeverityMatch::Exact(s);
    }

    for &(severity, keywords) in SEVERITY_PATTERNS {
        if let Some(&keyword) = keywords.iter().find(|kw| key.contains(**kw)) {
            return SeverityMatch::Pattern { severity, keyword };
        }
    }

    SeverityMatch::Default
}

/// Typical intervention length for a severity level (minutes).
pub const fn base_duration_minutes(severity: u8) -> f64 {
    match severity {
        1 => 15.0,
        2 => 30.0,
        3 => 60.0,
        4 => 90.0,
        6 => 180.0,
        7 => 240.0,
        8 => 360.0,
        9 => 480.0,
        10 => 720.0,
        _ => 120.0,
    }
}
