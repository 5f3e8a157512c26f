//! Availability Calculator
//!
//! Time-weighted availability: the share of elapsed wall-clock time the
//! machine spent `Running`. Each interval between two consecutive
//! observations is credited to the status of the earlier one, so a
//! dense burst of samples never outweighs a long quiet stretch.

use tracing::debug;

use crate::config::AvailabilityConfig;
use crate::types::Observation;

/// Compute availability (0-100%) over an observation window.
///
/// The window may arrive in any order (sources typically return it
/// newest-first); it is sorted chronologically before walking.
///
/// # Edge cases
///
/// - Empty window: `config.default_rate`
/// - Single observation: 100 if it is `Running`, else 0
/// - All timestamps identical (zero elapsed time): `config.default_rate`
pub fn availability_rate(window: &[Observation], config: &AvailabilityConfig) -> f64 {
    match window {
        [] => return config.default_rate,
        [only] => return if only.machine_status.is_running() { 100.0 } else { 0.0 },
        _ => {}
    }

    let ordered = Observation::chronological(window);

    let mut uptime = 0.0;
    let mut total_time = 0.0;
    for pair in ordered.windows(2) {
        let elapsed = seconds_between(pair[0], pair[1]);
        total_time += elapsed;
        if pair[0].machine_status.is_running() {
            uptime += elapsed;
        }
    }

    if total_time <= 0.0 {
        debug!(samples = window.len(), "Window spans zero seconds, using default availability");
        return config.default_rate;
    }

    let rate = (uptime / total_time * 100.0).clamp(0.0, 100.0);
    debug!(uptime_secs = uptime, total_secs = total_time, rate, "Availability computed");
    rate
}

fn seconds_between(earlier: &Observation, later: &Observation) -> f64 {
    let delta = later.timestamp - earlier.timestamp;
    // Millisecond resolution keeps sub-second sampling meaningful
    delta.num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MachineStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn obs(minute: i64, status: MachineStatus) -> Observation {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        Observation::new(t0 + Duration::minutes(minute), status, 85.0, 95.0)
    }

    #[test]
    fn test_empty_window_uses_default() {
        let rate = availability_rate(&[], &AvailabilityConfig::default());
        assert_eq!(rate, 95.0);
    }

    #[test]
    fn test_single_observation() {
        let cfg = AvailabilityConfig::default();
        assert_eq!(availability_rate(&[obs(0, MachineStatus::Running)], &cfg), 100.0);
        assert_eq!(availability_rate(&[obs(0, MachineStatus::Error)], &cfg), 0.0);
    }

    #[test]
    fn test_time_weighted_not_row_count() {
        // 10 min running, then three quick error samples spanning 1 min, then running
        let window = vec![
            obs(0, MachineStatus::Running),
            obs(10, MachineStatus::Error),
            obs(10, MachineStatus::Error),
            obs(11, MachineStatus::Error),
            obs(12, MachineStatus::Running),
        ];
        let rate = availability_rate(&window, &AvailabilityConfig::default());
        // 10 of 12 minutes running
        assert!((rate - 83.333).abs() < 0.01, "Rate: {}", rate);
    }

    #[test]
    fn test_order_invariant() {
        let mut window = vec![
            obs(0, MachineStatus::Running),
            obs(5, MachineStatus::Stopped),
            obs(20, MachineStatus::Running),
            obs(30, MachineStatus::Idle),
        ];
        let cfg = AvailabilityConfig::default();
        let forward = availability_rate(&window, &cfg);
        window.reverse();
        let backward = availability_rate(&window, &cfg);
        assert_eq!(forward, backward);
        assert!((forward - 50.0).abs() < 1e-9, "Rate: {}", forward);
    }

    #[test]
    fn test_duplicate_timestamps_order_invariant() {
        // Running and Error share minute 0; the down status owns 0-10
        let mut window = vec![
            obs(0, MachineStatus::Running),
            obs(0, MachineStatus::Error),
            obs(10, MachineStatus::Running),
            obs(20, MachineStatus::Running),
        ];
        let cfg = AvailabilityConfig::default();
        let forward = availability_rate(&window, &cfg);
        window.reverse();
        assert_eq!(availability_rate(&window, &cfg), forward);
        window.swap(2, 3);
        assert_eq!(availability_rate(&window, &cfg), forward);
        assert!((forward - 50.0).abs() < 1e-9, "Rate: {}", forward);
    }

    #[test]
    fn test_identical_timestamps_use_default() {
        let window = vec![obs(0, MachineStatus::Error), obs(0, MachineStatus::Running)];
        assert_eq!(availability_rate(&window, &AvailabilityConfig::default()), 95.0);
    }
}
