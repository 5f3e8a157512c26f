//! Two-state downtime scan: `Normal` and `InDowntime`.
//!
//! Transitions:
//! - `Normal` + degraded observation: open an episode (no output)
//! - `InDowntime` + healthy observation: close the episode (emit it)
//! - everything else: stay put
//!
//! The opening observation's status and metrics are frozen into the
//! episode; later degraded samples do not change how it is classified.

use chrono::{DateTime, Utc};

use crate::config::DowntimeConfig;
use crate::types::{MachineStatus, Observation};

/// Entry guard thresholds. The exit guard is its exact inverse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DowntimeGuard {
    pub performance_threshold: f64,
    pub quality_threshold: f64,
}

impl DowntimeGuard {
    pub fn from_config(config: &DowntimeConfig) -> Self {
        Self {
            performance_threshold: config.performance_threshold,
            quality_threshold: config.quality_threshold,
        }
    }

    /// True when the observation counts as downtime.
    pub fn is_degraded(&self, obs: &Observation) -> bool {
        obs.performance_rate < self.performance_threshold
            || obs.quality_rate < self.quality_threshold
            || !obs.machine_status.is_running()
    }
}

/// Snapshot of the observation that opened an episode.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenEpisode {
    pub start: DateTime<Utc>,
    pub trigger_status: MachineStatus,
    pub trigger_performance: f64,
    pub trigger_quality: f64,
}

impl OpenEpisode {
    fn open(obs: &Observation) -> Self {
        Self {
            start: obs.timestamp,
            trigger_status: obs.machine_status,
            trigger_performance: obs.performance_rate,
            trigger_quality: obs.quality_rate,
        }
    }
}

/// An episode with both ends known.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedEpisode {
    pub opened: OpenEpisode,
    pub end: DateTime<Utc>,
}

impl ClosedEpisode {
    /// Whole minutes, rounded to nearest.
    pub fn duration_minutes(&self) -> i64 {
        let secs = (self.end - self.opened.start).num_milliseconds().max(0) as f64 / 1000.0;
        (secs / 60.0).round() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ScanState {
    #[default]
    Normal,
    InDowntime(OpenEpisode),
}

impl ScanState {
    /// Feed one observation (in chronological order). Returns the next
    /// state and the episode closed by this observation, if any.
    pub fn step(self, obs: &Observation, guard: &DowntimeGuard) -> (Self, Option<ClosedEpisode>) {
        let degraded = guard.is_degraded(obs);
        match (self, degraded) {
            (Self::Normal, true) => (Self::InDowntime(OpenEpisode::open(obs)), None),
            (Self::Normal, false) => (Self::Normal, None),
            (Self::InDowntime(opened), false) => (
                Self::Normal,
                Some(ClosedEpisode {
                    opened,
                    end: obs.timestamp,
                }),
            ),
            (state @ Self::InDowntime(_), true) => (state, None),
        }
    }

    /// Close an episode still open when the window ran out, ending at `now`.
    pub fn finish(self, now: DateTime<Utc>) -> Option<ClosedEpisode> {
        match self {
            Self::Normal => None,
            Self::InDowntime(opened) => {
                // A "now" behind the last sample would yield end < start
                let end = now.max(opened.start);
                Some(ClosedEpisode { opened, end })
            }
        }
    }
}
