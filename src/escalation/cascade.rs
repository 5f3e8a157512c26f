//! Reason and shift extraction cascades.
//!
//! Both cascades read only the latest observation of the window. Older
//! samples describe conditions that may already have been resolved, so a
//! missing field on the latest sample falls through to the static
//! defaults rather than to history.

use chrono::{DateTime, FixedOffset, Timelike, Utc};

use crate::types::{MachineComponent, Observation, ReasonSource, Shift, ShiftSource};

/// Reason used when nothing else is known.
pub const GENERIC_REASON: &str = "GENERAL_BREAKDOWN";

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Extract the most specific failure reason available.
///
/// Order: `error_message`, `failure_reason`, `downtime_reason` of the
/// latest observation, the component's default failure code, then
/// [`GENERIC_REASON`].
pub fn extract_reason(window: &[Observation], component_name: &str) -> (String, ReasonSource) {
    if let Some(latest) = Observation::latest(window) {
        let reported = [
            (ReasonSource::ErrorMessage, latest.error_message.as_ref()),
            (ReasonSource::FailureReason, latest.failure_reason.as_ref()),
            (ReasonSource::DowntimeReason, latest.downtime_reason.as_ref()),
        ];
        if let Some((source, reason)) = reported
            .into_iter()
            .find_map(|(source, field)| non_blank(field).map(|r| (source, r)))
        {
            return (reason.to_string(), source);
        }
    }

    match MachineComponent::from_name(component_name) {
        Some(component) => (component.default_failure_code().to_string(), ReasonSource::ComponentDefault),
        None => (GENERIC_REASON.to_string(), ReasonSource::Generic),
    }
}

/// Resolve the production shift.
///
/// Order: `shift`, `current_shift` of the latest observation, then the
/// plant wall-clock hour of `now`. Reported values outside 1-3 are skipped.
pub fn extract_shift(window: &[Observation], now: DateTime<Utc>, utc_offset_hours: i32) -> (Shift, ShiftSource) {
    if let Some(latest) = Observation::latest(window) {
        if let Some(shift) = latest.shift.and_then(Shift::from_value) {
            return (shift, ShiftSource::Shift);
        }
        if let Some(shift) = latest.current_shift.and_then(Shift::from_value) {
            return (shift, ShiftSource::CurrentShift);
        }
    }

    (Shift::from_hour(plant_hour(now, utc_offset_hours)), ShiftSource::WallClock)
}

/// Hour of day (0-23) on the plant clock.
pub fn plant_hour(now: DateTime<Utc>, utc_offset_hours: i32) -> u32 {
    FixedOffset::east_opt(utc_offset_hours * 3600)
        .map_or_else(|| now.hour(), |offset| now.with_timezone(&offset).hour())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MachineStatus;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 1, 0, 0).unwrap()
    }

    fn obs(minute: i64) -> Observation {
        Observation::new(t0() + Duration::minutes(minute), MachineStatus::Error, 10.0, 90.0)
    }

    #[test]
    fn test_latest_observation_wins_over_history() {
        let mut old = obs(0);
        old.error_message = Some("CRACK".to_string());
        old.shift = Some(3.0);
        let mut new = obs(300);
        new.machine_status = MachineStatus::Running;
        new.downtime_reason = Some("waiting for material".to_string());
        let window = [old, new];

        let (reason, source) = extract_reason(&window, "Feeder");
        assert_eq!(reason, "waiting for material");
        assert_eq!(source, ReasonSource::DowntimeReason);

        // 06:00 UTC is 13:00 at UTC+7
        let (shift, source) = extract_shift(&window, t0() + Duration::minutes(300), 7);
        assert_eq!(shift, Shift::Morning);
        assert_eq!(source, ShiftSource::WallClock);
    }

    #[test]
    fn test_error_message_outranks_other_fields() {
        let mut o = obs(0);
        o.error_message = Some("FEEDER_JAM".to_string());
        o.failure_reason = Some("CREASING_CRACK".to_string());
        o.downtime_reason = Some("waiting for material".to_string());
        assert_eq!(extract_reason(&[o], "Feeder"), ("FEEDER_JAM".to_string(), ReasonSource::ErrorMessage));
    }

    #[test]
    fn test_blank_fields_are_skipped() {
        let mut o = obs(0);
        o.error_message = Some("   ".to_string());
        o.failure_reason = Some("CREASING_CRACK".to_string());
        let (reason, source) = extract_reason(&[o], "Slotter");
        assert_eq!(reason, "CREASING_CRACK");
        assert_eq!(source, ReasonSource::FailureReason);
    }

    #[test]
    fn test_component_default_then_generic() {
        let (reason, source) = extract_reason(&[obs(0)], "Printing Unit");
        assert_eq!(reason, "PRINTING BLUR");
        assert_eq!(source, ReasonSource::ComponentDefault);

        let (reason, source) = extract_reason(&[], "Gluer");
        assert_eq!(reason, GENERIC_REASON);
        assert_eq!(source, ReasonSource::Generic);
    }

    #[test]
    fn test_shift_cascade() {
        let mut a = obs(0);
        a.current_shift = Some(3.0);
        a.shift = Some(7.0); // invalid, skipped
        let (shift, source) = extract_shift(&[a.clone()], t0(), 7);
        assert_eq!(shift, Shift::Night);
        assert_eq!(source, ShiftSource::CurrentShift);

        a.shift = Some(2.0);
        let (shift, source) = extract_shift(&[a], t0(), 7);
        assert_eq!(shift, Shift::Afternoon);
        assert_eq!(source, ShiftSource::Shift);
    }

    #[test]
    fn test_older_shift_is_ignored() {
        let mut old = obs(0);
        old.shift = Some(3.0);
        let (_, source) = extract_shift(&[old, obs(5)], t0(), 7);
        assert_eq!(source, ShiftSource::WallClock);
    }

    #[test]
    fn test_wall_clock_uses_plant_offset() {
        // 01:00 UTC is 08:00 at UTC+7
        let (shift, source) = extract_shift(&[], t0(), 7);
        assert_eq!(shift, Shift::Morning);
        assert_eq!(source, ShiftSource::WallClock);
        // ...and still night at UTC
        assert_eq!(extract_shift(&[], t0(), 0).0, Shift::Night);
    }
}
