//! Downtime Interval Detector
//!
//! Reconstructs discrete downtime episodes from a flat observation log with
//! an explicit two-state machine (see [`state`]). Each closed episode is
//! attributed to a line stage, given a severity and a type, and emitted as a
//! [`DowntimeEvent`]. An episode still open when the window ends becomes an
//! `ongoing` event that ends at the caller's "now".

pub mod classify;
pub mod state;
mod summary;

pub use classify::{classify_severity, classify_type, StageClassifier};
pub use state::{ClosedEpisode, DowntimeGuard, OpenEpisode, ScanState};
pub use summary::summarize;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::DowntimeConfig;
use crate::types::{DowntimeEvent, DowntimeStatus, MachineComponent, Observation};

/// Scans observation windows for downtime episodes.
#[derive(Debug, Clone)]
pub struct DowntimeDetector {
    config: DowntimeConfig,
    guard: DowntimeGuard,
    seed: Option<u64>,
}

impl DowntimeDetector {
    pub fn new(config: &DowntimeConfig) -> Self {
        Self {
            config: config.clone(),
            guard: DowntimeGuard::from_config(config),
            seed: None,
        }
    }

    /// Make the random stage tie-break reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn classifier(&self) -> StageClassifier {
        match self.seed {
            Some(seed) if self.config.stage_tiebreak == crate::config::StageTiebreak::Random => {
                StageClassifier::seeded(&self.config, seed)
            }
            _ => StageClassifier::new(&self.config),
        }
    }

    /// Every episode in the window, newest first.
    ///
    /// The window is sorted chronologically before scanning, so sources may
    /// hand it over newest-first.
    pub fn detect(&self, window: &[Observation], now: DateTime<Utc>) -> Vec<DowntimeEvent> {
        let ordered = Observation::chronological(window);

        let mut classifier = self.classifier();
        let mut events = Vec::new();
        let mut state = ScanState::Normal;

        for obs in ordered {
            let (next, closed) = state.step(obs, &self.guard);
            state = next;
            if let Some(episode) = closed {
                events.push(build_event(&episode, &mut classifier, DowntimeStatus::Resolved));
            }
        }

        if let Some(episode) = state.finish(now) {
            events.push(build_event(&episode, &mut classifier, DowntimeStatus::Ongoing));
        }

        debug!(samples = window.len(), episodes = events.len(), "Downtime scan complete");

        events.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        events
    }

    /// Events filtered by component and capped at `limit`, newest first.
    ///
    /// `component_filter` is matched case-insensitively; `None` or `"all"`
    /// keeps every stage. A filter naming no known stage matches nothing.
    /// A `limit` of `None` uses the configured default.
    pub fn list_events(
        &self,
        window: &[Observation],
        now: DateTime<Utc>,
        component_filter: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<DowntimeEvent> {
        let filter = ComponentFilter::parse(component_filter);
        let limit = limit.unwrap_or(self.config.default_limit);
        self.detect(window, now)
            .into_iter()
            .filter(|e| filter.matches(e.component))
            .take(limit)
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentFilter {
    All,
    Only(MachineComponent),
    Nothing,
}

impl ComponentFilter {
    fn parse(filter: Option<&str>) -> Self {
        match filter.map(str::trim) {
            None => Self::All,
            Some(f) if f.is_empty() || f.eq_ignore_ascii_case("all") => Self::All,
            Some(f) => MachineComponent::from_name(f).map_or(Self::Nothing, Self::Only),
        }
    }

    fn matches(self, component: MachineComponent) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => c == component,
            Self::Nothing => false,
        }
    }
}

fn build_event(
    episode: &ClosedEpisode,
    classifier: &mut StageClassifier,
    status: DowntimeStatus,
) -> DowntimeEvent {
    let opened = &episode.opened;
    let duration_minutes = episode.duration_minutes();
    let component = classifier.classify(opened);
    let metrics = format!(
        "Status: {} (P:{:.1}% Q:{:.1}%)",
        opened.trigger_status, opened.trigger_performance, opened.trigger_quality
    );

    let (reason, notes) = match status {
        DowntimeStatus::Resolved => (
            format!("{component} downtime detected - {metrics}"),
            format!(
                "Detected from machine logs. Performance: {:.1}%, Quality: {:.1}%, Status: {}",
                opened.trigger_performance, opened.trigger_quality, opened.trigger_status
            ),
        ),
        DowntimeStatus::Ongoing => (
            format!("{component} downtime ongoing - {metrics}"),
            "Downtime is currently ongoing. Waiting for resolution.".to_string(),
        ),
    };

    DowntimeEvent {
        id: format!("DT-{}", opened.start.timestamp_millis().rem_euclid(100_000)),
        start_time: opened.start,
        end_time: episode.end,
        duration_minutes,
        component,
        reason,
        severity: classify_severity(duration_minutes, opened.trigger_status),
        event_type: classify_type(opened.trigger_status),
        status,
        trigger_status: opened.trigger_status,
        trigger_performance: opened.trigger_performance,
        trigger_quality: opened.trigger_quality,
        notes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DowntimeSeverity, DowntimeType, MachineStatus};
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
    }

    fn at(minute: i64, status: MachineStatus, perf: f64, qual: f64) -> Observation {
        Observation::new(t0() + Duration::minutes(minute), status, perf, qual)
    }

    fn detector() -> DowntimeDetector {
        DowntimeDetector::new(&DowntimeConfig::default())
    }

    #[test]
    fn test_empty_window() {
        assert!(detector().detect(&[], t0()).is_empty());
    }

    #[test]
    fn test_single_error_dip() {
        let window = vec![
            at(0, MachineStatus::Running, 85.0, 95.0),
            at(5, MachineStatus::Error, 10.0, 95.0),
            at(50, MachineStatus::Running, 85.0, 95.0),
        ];
        let events = detector().detect(&window, t0() + Duration::hours(2));
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.duration_minutes, 45);
        assert_eq!(e.component, MachineComponent::Feeder);
        assert_eq!(e.severity, DowntimeSeverity::Medium);
        assert_eq!(e.event_type, DowntimeType::Reactive);
        assert_eq!(e.status, DowntimeStatus::Resolved);
        assert_eq!(e.reason, "Feeder downtime detected - Status: Error (P:10.0% Q:95.0%)");
    }

    #[test]
    fn test_id_from_start_millis() {
        let window = vec![
            at(0, MachineStatus::Maintenance, 0.0, 0.0),
            at(10, MachineStatus::Running, 85.0, 95.0),
        ];
        let events = detector().detect(&window, t0());
        let expected = format!("DT-{}", t0().timestamp_millis() % 100_000);
        assert_eq!(events[0].id, expected);
    }

    #[test]
    fn test_duplicate_timestamps_order_invariant() {
        let mut window = vec![
            at(0, MachineStatus::Running, 90.0, 95.0),
            at(0, MachineStatus::Error, 5.0, 90.0),
            at(10, MachineStatus::Running, 90.0, 95.0),
        ];
        let forward = detector().detect(&window, t0() + Duration::minutes(30));
        window.reverse();
        let backward = detector().detect(&window, t0() + Duration::minutes(30));

        assert_eq!(forward, backward);
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].duration_minutes, 10);
        assert_eq!(forward[0].trigger_status, MachineStatus::Error);
    }

    #[test]
    fn test_zero_duration_event_is_emitted() {
        let window = vec![
            at(0, MachineStatus::Stopped, 85.0, 95.0),
            at(0, MachineStatus::Running, 85.0, 95.0),
        ];
        let events = detector().detect(&window, t0());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].duration_minutes, 0);
    }

    #[test]
    fn test_filter_and_limit() {
        let window = vec![
            at(0, MachineStatus::Error, 10.0, 95.0),  // Feeder
            at(10, MachineStatus::Running, 85.0, 95.0),
            at(20, MachineStatus::Error, 85.0, 5.0),  // Printing
            at(30, MachineStatus::Running, 85.0, 95.0),
            at(40, MachineStatus::Error, 15.0, 95.0), // Feeder
            at(50, MachineStatus::Running, 85.0, 95.0),
        ];
        let d = detector();
        let now = t0() + Duration::hours(1);
        assert_eq!(d.list_events(&window, now, Some("all"), None).len(), 3);
        let feeders = d.list_events(&window, now, Some("FEEDER"), None);
        assert_eq!(feeders.len(), 2);
        assert!(feeders[0].start_time > feeders[1].start_time);
        assert_eq!(d.list_events(&window, now, None, Some(1)).len(), 1);
        assert!(d.list_events(&window, now, Some("die cut"), None).is_empty());
    }
}
