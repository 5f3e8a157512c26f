//! Aggregate statistics over a list of downtime events.

use statrs::statistics::Statistics;
use std::collections::BTreeMap;

use crate::types::{
    ComponentDowntime, DowntimeEvent, DowntimeSeverity, DowntimeSummary, DowntimeType, MachineComponent,
};

/// Summarize events into counts and durations.
///
/// Severity and type counts are zero-filled so every key is always present.
/// The average is rounded to two decimals and is 0 for an empty list.
pub fn summarize(events: &[DowntimeEvent]) -> DowntimeSummary {
    let mut counts_by_severity: BTreeMap<DowntimeSeverity, usize> =
        DowntimeSeverity::ALL.iter().map(|s| (*s, 0)).collect();
    let mut counts_by_type: BTreeMap<DowntimeType, usize> =
        [DowntimeType::Preventive, DowntimeType::Reactive].iter().map(|t| (*t, 0)).collect();
    let mut counts_by_component: BTreeMap<MachineComponent, ComponentDowntime> = BTreeMap::new();

    for event in events {
        *counts_by_severity.entry(event.severity).or_default() += 1;
        *counts_by_type.entry(event.event_type).or_default() += 1;
        let per = counts_by_component.entry(event.component).or_default();
        per.count += 1;
        per.total_duration += event.duration_minutes;
    }

    let total_duration: i64 = events.iter().map(|e| e.duration_minutes).sum();
    let average_duration = if events.is_empty() {
        0.0
    } else {
        let durations: Vec<f64> = events.iter().map(|e| e.duration_minutes as f64).collect();
        (durations.iter().mean() * 100.0).round() / 100.0
    };

    DowntimeSummary {
        count: events.len(),
        total_duration,
        average_duration,
        counts_by_severity,
        counts_by_type,
        counts_by_component,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DowntimeStatus, MachineStatus};
    use chrono::Utc;

    fn event(component: MachineComponent, minutes: i64, severity: DowntimeSeverity, event_type: DowntimeType) -> DowntimeEvent {
        let now = Utc::now();
        DowntimeEvent {
            id: "DT-1".to_string(),
            start_time: now,
            end_time: now,
            duration_minutes: minutes,
            component,
            reason: String::new(),
            severity,
            event_type,
            status: DowntimeStatus::Resolved,
            trigger_status: MachineStatus::Error,
            trigger_performance: 0.0,
            trigger_quality: 0.0,
            notes: String::new(),
        }
    }

    #[test]
    fn test_empty_summary_is_zero_filled() {
        let s = summarize(&[]);
        assert_eq!(s.count, 0);
        assert_eq!(s.total_duration, 0);
        assert_eq!(s.average_duration, 0.0);
        assert_eq!(s.counts_by_severity.len(), 4);
        assert!(s.counts_by_severity.values().all(|c| *c == 0));
        assert_eq!(s.counts_by_type.len(), 2);
        assert!(s.counts_by_component.is_empty());
    }

    #[test]
    fn test_summary_aggregates() {
        let events = vec![
            event(MachineComponent::Feeder, 10, DowntimeSeverity::Low, DowntimeType::Reactive),
            event(MachineComponent::Feeder, 20, DowntimeSeverity::Medium, DowntimeType::Reactive),
            event(MachineComponent::Printing, 5, DowntimeSeverity::Low, DowntimeType::Preventive),
        ];
        let s = summarize(&events);
        assert_eq!(s.count, 3);
        assert_eq!(s.total_duration, 35);
        assert_eq!(s.average_duration, 11.67);
        assert_eq!(s.counts_by_severity[&DowntimeSeverity::Low], 2);
        assert_eq!(s.counts_by_severity[&DowntimeSeverity::Critical], 0);
        assert_eq!(s.counts_by_type[&DowntimeType::Preventive], 1);
        let feeder = s.counts_by_component[&MachineComponent::Feeder];
        assert_eq!(feeder.count, 2);
        assert_eq!(feeder.total_duration, 30);
    }
}
