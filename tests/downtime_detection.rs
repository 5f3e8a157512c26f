//! Downtime Detection Tests
//!
//! Replays a shift's worth of controller samples through the detector and
//! checks the reconstructed episodes, their classification and the summary.

use chrono::{DateTime, Duration, TimeZone, Utc};
use flexotwin::config::DowntimeConfig;
use flexotwin::downtime::{summarize, DowntimeDetector};
use flexotwin::types::{
    DowntimeSeverity, DowntimeStatus, DowntimeType, MachineComponent, MachineStatus, Observation,
};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap()
}

fn at(minute: i64, status: MachineStatus, perf: f64, qual: f64) -> Observation {
    Observation::new(t0() + Duration::minutes(minute), status, perf, qual)
}

/// Three episodes: a feeder error, planned maintenance and an unresolved stop.
fn shift_log() -> Vec<Observation> {
    vec![
        at(0, MachineStatus::Running, 88.0, 97.0),
        at(10, MachineStatus::Error, 5.0, 90.0),
        at(40, MachineStatus::Error, 0.0, 90.0),
        at(80, MachineStatus::Running, 85.0, 96.0),
        at(100, MachineStatus::Maintenance, 60.0, 95.0),
        at(145, MachineStatus::Running, 87.0, 98.0),
        at(200, MachineStatus::Stopped, 40.0, 90.0),
    ]
}

fn now() -> DateTime<Utc> {
    t0() + Duration::minutes(260)
}

fn detector() -> DowntimeDetector {
    DowntimeDetector::new(&DowntimeConfig::default())
}

#[test]
fn reconstructs_every_episode_newest_first() {
    let events = detector().detect(&shift_log(), now());
    assert_eq!(events.len(), 3);

    let stop = &events[0];
    assert_eq!(stop.status, DowntimeStatus::Ongoing);
    assert_eq!(stop.component, MachineComponent::PreFeeder);
    assert_eq!(stop.duration_minutes, 60);
    assert_eq!(stop.end_time, now());
    assert_eq!(stop.severity, DowntimeSeverity::Medium);
    assert_eq!(stop.reason, "Pre-Feeder downtime ongoing - Status: Stopped (P:40.0% Q:90.0%)");
    assert_eq!(stop.notes, "Downtime is currently ongoing. Waiting for resolution.");

    let maintenance = &events[1];
    assert_eq!(maintenance.status, DowntimeStatus::Resolved);
    assert_eq!(maintenance.component, MachineComponent::Slotter);
    assert_eq!(maintenance.duration_minutes, 45);
    assert_eq!(maintenance.severity, DowntimeSeverity::Low);
    assert_eq!(maintenance.event_type, DowntimeType::Preventive);

    let error = &events[2];
    assert_eq!(error.component, MachineComponent::Feeder);
    assert_eq!(error.duration_minutes, 70);
    assert_eq!(error.severity, DowntimeSeverity::High);
    assert_eq!(error.event_type, DowntimeType::Reactive);
    assert_eq!(error.trigger_performance, 5.0, "Episode keeps the opening sample's metrics");
    assert_eq!(
        error.notes,
        "Detected from machine logs. Performance: 5.0%, Quality: 90.0%, Status: Error"
    );
}

#[test]
fn input_order_does_not_matter() {
    let mut reversed = shift_log();
    reversed.reverse();
    assert_eq!(detector().detect(&reversed, now()), detector().detect(&shift_log(), now()));
}

#[test]
fn event_ids_derive_from_start_time() {
    let events = detector().detect(&shift_log(), now());
    let start_ms = (t0() + Duration::minutes(10)).timestamp_millis();
    assert_eq!(events[2].id, format!("DT-{}", start_ms.rem_euclid(100_000)));
}

#[test]
fn filter_and_limit() {
    let d = detector();
    let log = shift_log();

    let slotter = d.list_events(&log, now(), Some("slotter"), None);
    assert_eq!(slotter.len(), 1);
    assert_eq!(slotter[0].component, MachineComponent::Slotter);

    assert_eq!(d.list_events(&log, now(), Some("all"), None).len(), 3);
    assert_eq!(d.list_events(&log, now(), None, Some(2)).len(), 2);
    assert!(d.list_events(&log, now(), Some("Gluer"), None).is_empty());
}

#[test]
fn healthy_log_has_no_events() {
    let log: Vec<Observation> = (0..60).map(|m| at(m, MachineStatus::Running, 90.0, 98.0)).collect();
    assert!(detector().detect(&log, now()).is_empty());
}

#[test]
fn quality_collapse_points_at_printing() {
    let log = vec![
        at(0, MachineStatus::Running, 80.0, 10.0),
        at(20, MachineStatus::Running, 80.0, 95.0),
    ];
    let events = detector().detect(&log, now());
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].component, MachineComponent::Printing);
    assert_eq!(events[0].duration_minutes, 20);
}

#[test]
fn summary_over_shift() {
    let events = detector().detect(&shift_log(), now());
    let summary = summarize(&events);

    assert_eq!(summary.count, 3);
    assert_eq!(summary.total_duration, 175);
    assert_eq!(summary.average_duration, 58.33);
    assert_eq!(summary.counts_by_severity[&DowntimeSeverity::Critical], 0);
    assert_eq!(summary.counts_by_severity[&DowntimeSeverity::High], 1);
    assert_eq!(summary.counts_by_type[&DowntimeType::Preventive], 1);
    assert_eq!(summary.counts_by_type[&DowntimeType::Reactive], 2);
    assert_eq!(summary.counts_by_component[&MachineComponent::Feeder].total_duration, 70);
}
