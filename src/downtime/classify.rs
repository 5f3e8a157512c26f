//! Episode classification: stage, severity and downtime type.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::state::OpenEpisode;
use crate::config::{DowntimeConfig, StageTiebreak};
use crate::types::{DowntimeSeverity, DowntimeType, MachineComponent, MachineStatus};

/// Stages left when no metric points anywhere specific.
const TIEBREAK_STAGES: [MachineComponent; 2] = [MachineComponent::Slotter, MachineComponent::Stacker];

/// Attributes an episode to a line stage from the metrics that opened it.
///
/// Quality collapse points at the printing unit; a performance collapse
/// points at the feed (hard drop) or pre-feed (moderate drop). The rest is
/// decided by the configured tie-break policy. The classifier is stateful
/// so that round-robin alternates across one scan.
#[derive(Debug)]
pub struct StageClassifier {
    quality_threshold: f64,
    feed_stage_performance: f64,
    pre_feed_stage_performance: f64,
    tiebreak: Tiebreak,
}

#[derive(Debug)]
enum Tiebreak {
    RoundRobin { next: usize },
    Random(StdRng),
}

impl StageClassifier {
    pub fn new(config: &DowntimeConfig) -> Self {
        let tiebreak = match config.stage_tiebreak {
            StageTiebreak::RoundRobin => Tiebreak::RoundRobin { next: 0 },
            StageTiebreak::Random => Tiebreak::Random(StdRng::from_entropy()),
        };
        Self::with_tiebreak(config, tiebreak)
    }

    /// Random tie-break with a fixed seed, for reproducible replays.
    pub fn seeded(config: &DowntimeConfig, seed: u64) -> Self {
        Self::with_tiebreak(config, Tiebreak::Random(StdRng::seed_from_u64(seed)))
    }

    fn with_tiebreak(config: &DowntimeConfig, tiebreak: Tiebreak) -> Self {
        Self {
            quality_threshold: config.quality_threshold,
            feed_stage_performance: config.feed_stage_performance,
            pre_feed_stage_performance: config.pre_feed_stage_performance,
            tiebreak,
        }
    }

    pub fn classify(&mut self, opened: &OpenEpisode) -> MachineComponent {
        if opened.trigger_quality < self.quality_threshold {
            MachineComponent::Printing
        } else if opened.trigger_performance < self.feed_stage_performance {
            MachineComponent::Feeder
        } else if opened.trigger_performance < self.pre_feed_stage_performance {
            MachineComponent::PreFeeder
        } else {
            match &mut self.tiebreak {
                Tiebreak::RoundRobin { next } => {
                    let stage = TIEBREAK_STAGES[*next % TIEBREAK_STAGES.len()];
                    *next += 1;
                    stage
                }
                Tiebreak::Random(rng) => TIEBREAK_STAGES[rng.gen_range(0..TIEBREAK_STAGES.len())],
            }
        }
    }
}

/// Severity from episode length and the status that opened it.
///
/// | Trigger status | critical | high | medium | low |
/// |---|---|---|---|---|
/// | Error | > 120 min | > 60 min | otherwise | never |
/// | Maintenance | never | never | >= 60 min | < 60 min |
/// | anything else | > 180 min | > 90 min | > 30 min | otherwise |
pub const fn classify_severity(duration_minutes: i64, trigger: MachineStatus) -> DowntimeSeverity {
    match trigger {
        MachineStatus::Error => {
            if duration_minutes > 120 {
                DowntimeSeverity::Critical
            } else if duration_minutes > 60 {
                DowntimeSeverity::High
            } else {
                DowntimeSeverity::Medium
            }
        }
        MachineStatus::Maintenance => {
            if duration_minutes < 60 {
                DowntimeSeverity::Low
            } else {
                DowntimeSeverity::Medium
            }
        }
        _ => {
            if duration_minutes > 180 {
                DowntimeSeverity::Critical
            } else if duration_minutes > 90 {
                DowntimeSeverity::High
            } else if duration_minutes > 30 {
                DowntimeSeverity::Medium
            } else {
                DowntimeSeverity::Low
            }
        }
    }
}

/// Only episodes opened by a maintenance status are planned.
pub const fn classify_type(trigger: MachineStatus) -> DowntimeType {
    match trigger {
        MachineStatus::Maintenance => DowntimeType::Preventive,
        _ => DowntimeType::Reactive,
    }
}
