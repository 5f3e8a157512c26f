//! System-wide default constants.
//!
//! Centralises the documented defaults used by the config `Default` impls.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Health Index
// ============================================================================

/// Weight of the inverted RPN score in the health index.
pub const RPN_WEIGHT: f64 = 0.4;

/// Weight of the OEE score in the health index.
pub const OEE_WEIGHT: f64 = 0.6;

/// Index at or above which a component is reported `Healthy`.
pub const HEALTH_THRESHOLD_GOOD: f64 = 70.0;

/// Index below which a maintenance escalation is raised.
pub const CRITICAL_THRESHOLD: f64 = 40.0;

/// Lower OEE bound, also the conservative fallback when no data exists.
pub const OEE_MIN: f64 = 0.0;

pub const OEE_MAX: f64 = 100.0;

// ============================================================================
// Availability
// ============================================================================

/// Availability assumed when the window spans no wall-clock time (%).
pub const DEFAULT_AVAILABILITY_RATE: f64 = 95.0;

// ============================================================================
// Downtime Detection
// ============================================================================

/// Performance rate below which an observation counts as downtime (%).
pub const DOWNTIME_PERFORMANCE_THRESHOLD: f64 = 20.0;

/// Quality rate below which an observation counts as downtime (%).
pub const DOWNTIME_QUALITY_THRESHOLD: f64 = 20.0;

/// Performance below this at episode start points at the feeder (%).
pub const FEED_STAGE_PERFORMANCE: f64 = 30.0;

/// Performance below this at episode start points at the pre-feeder (%).
pub const PRE_FEED_STAGE_PERFORMANCE: f64 = 50.0;

/// Default cap on returned downtime events.
pub const DOWNTIME_EVENT_LIMIT: usize = 50;

// ============================================================================
// Maintenance Duration Estimator
// ============================================================================

/// Shortest realistic intervention (minutes).
pub const MIN_DURATION_MINUTES: f64 = 10.0;

/// Longest realistic intervention, two full shifts (minutes).
pub const MAX_DURATION_MINUTES: f64 = 960.0;

/// Timeout for a single statistical estimator call (milliseconds).
pub const ESTIMATOR_TIMEOUT_MS: u64 = 2_000;

/// Raw predictions below `ratio × baseline` are considered too optimistic.
pub const BLEND_LOW_RATIO: f64 = 0.3;

/// Raw predictions above `ratio × baseline` are considered runaway.
pub const BLEND_HIGH_RATIO: f64 = 3.0;

/// Runaway predictions are replaced by `cap × baseline`.
pub const BLEND_CAP_FACTOR: f64 = 2.5;

/// Baseline share when pulling an optimistic prediction up.
pub const BLEND_LOW_BASELINE_WEIGHT: f64 = 0.7;

/// Baseline share when the prediction is in the plausible range.
pub const BLEND_BASELINE_WEIGHT: f64 = 0.4;

// ============================================================================
// Plant
// ============================================================================

/// Plant local time offset used to derive the shift from the wall clock.
/// The reference line runs on Western Indonesian Time (UTC+7).
pub const PLANT_UTC_OFFSET_HOURS: i32 = 7;
