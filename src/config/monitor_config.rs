//! Monitor Configuration - All scoring thresholds as operator-tunable TOML values
//!
//! Every constant of the scoring pipeline is a field in this module. Each
//! struct implements `Default` with the documented values from
//! [`super::defaults`], so behaviour is unchanged when no config file exists.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FLEXOTWIN_CONFIG";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "flexotwin.toml";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one monitored machine.
///
/// Load with `MonitorConfig::load()` which searches:
/// 1. `$FLEXOTWIN_CONFIG` env var
/// 2. `./flexotwin.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MonitorConfig {
    /// Machine identification and plant clock
    #[serde(default)]
    pub machine: MachineInfo,

    /// Health index weights and thresholds
    #[serde(default)]
    pub health: HealthConfig,

    #[serde(default)]
    pub availability: AvailabilityConfig,

    /// Downtime state machine guards and stage classification
    #[serde(default)]
    pub downtime: DowntimeConfig,

    /// Maintenance duration calibration
    #[serde(default)]
    pub estimator: EstimatorConfig,

    /// Risk priority catalog, one entry per component
    #[serde(default)]
    pub components: Vec<ComponentRisk>,
}

impl MonitorConfig {
    /// Load configuration using the standard search order:
    /// 1. `$FLEXOTWIN_CONFIG` environment variable
    /// 2. `./flexotwin.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), machine = %config.machine.name, "Loaded monitor config from FLEXOTWIN_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from FLEXOTWIN_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "FLEXOTWIN_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(machine = %config.machine.name, "Loaded monitor config from ./flexotwin.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./flexotwin.toml, using defaults");
                }
            }
        }

        info!("No flexotwin.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::ParseStr(source) => ConfigError::Parse { path: path.to_path_buf(), source },
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are reported as warnings and never fail the load.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents).map_err(ConfigError::ParseStr)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;
        std::fs::write(path, contents)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        info!(path = %path.display(), "Monitor config saved");
        Ok(())
    }

    /// Validate all values for internal consistency.
    ///
    /// Rules:
    /// - Health weights must sum to 1.0
    /// - Critical threshold must not exceed the good threshold
    /// - OEE and duration bounds must be ordered
    /// - Blend ratios must be ordered and weights within [0, 1]
    /// - Component names must be unique
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        let h = &self.health;
        let weight_sum = h.rpn_weight + h.oee_weight;
        if !weight_sum.is_finite() || (weight_sum - 1.0).abs() > 1e-3 {
            errors.push(format!(
                "health.rpn_weight + health.oee_weight must sum to 1.0, got {weight_sum:.3}"
            ));
        }
        if h.rpn_weight < 0.0 || h.oee_weight < 0.0 {
            errors.push("health weights must be non-negative".to_string());
        }
        if h.critical_threshold > h.threshold_good {
            errors.push(format!(
                "health.critical_threshold ({:.1}) must be <= threshold_good ({:.1})",
                h.critical_threshold, h.threshold_good
            ));
        }
        Self::check_ordered(h.oee_min, h.oee_max, "health.oee", &mut errors);

        let d = &self.downtime;
        if d.feed_stage_performance > d.pre_feed_stage_performance {
            errors.push(format!(
                "downtime.feed_stage_performance ({:.1}) must be <= pre_feed_stage_performance ({:.1})",
                d.feed_stage_performance, d.pre_feed_stage_performance
            ));
        }
        if d.default_limit == 0 {
            errors.push("downtime.default_limit must be > 0".to_string());
        }

        let e = &self.estimator;
        Self::check_ordered(
            e.min_duration_minutes,
            e.max_duration_minutes,
            "estimator.duration",
            &mut errors,
        );
        Self::check_ordered(e.low_ratio, e.high_ratio, "estimator.ratio", &mut errors);
        if e.timeout_ms == 0 {
            errors.push("estimator.timeout_ms must be > 0".to_string());
        }

        let mut seen = HashSet::new();
        for c in &self.components {
            if !seen.insert(c.name.to_lowercase()) {
                errors.push(format!("components: duplicate component '{}'", c.name));
            }
        }

        let (range_errors, range_warnings) = super::validation::validate_ranges(self);
        errors.extend(range_errors);
        for w in &range_warnings {
            warn!("{}", w);
        }

        // Reject NaN/Inf in any value (sweep all f64 fields via serialization)
        if let Ok(value) = toml::Value::try_from(self) {
            for key in super::validation::non_finite_keys(&value, "") {
                errors.push(format!("{key} must be a finite number"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_ordered(low: f64, high: f64, name: &str, errors: &mut Vec<String>) {
        // NaN comparisons silently pass
        if !low.is_finite() || !high.is_finite() {
            errors.push(format!("{name}: values must be finite (got min={low}, max={high})"));
            return;
        }
        if low >= high {
            errors.push(format!("{name}: min ({low:.3}) must be < max ({high:.3})"));
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },

    #[error("Config parse error ({}): {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },

    #[error("Config parse error: {0}")]
    ParseStr(toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),

    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Machine Info
// ============================================================================

/// Identification metadata, plus the plant clock used for shift derivation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MachineInfo {
    #[serde(default = "default_machine_name")]
    pub name: String,

    /// Production line / plant area
    #[serde(default)]
    pub line: String,

    /// Offset of plant local time from UTC, in hours
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
}

fn default_machine_name() -> String {
    "FLEXO-1".to_string()
}
fn default_utc_offset() -> i32 {
    defaults::PLANT_UTC_OFFSET_HOURS
}

impl Default for MachineInfo {
    fn default() -> Self {
        Self {
            name: default_machine_name(),
            line: String::new(),
            utc_offset_hours: default_utc_offset(),
        }
    }
}

// ============================================================================
// Health
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthConfig {
    #[serde(default = "default_rpn_weight")]
    pub rpn_weight: f64,

    #[serde(default = "default_oee_weight")]
    pub oee_weight: f64,

    /// Index at or above which status is Healthy
    #[serde(default = "default_threshold_good")]
    pub threshold_good: f64,

    /// Index below which an escalation is raised
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: f64,

    #[serde(default = "default_oee_min")]
    pub oee_min: f64,

    #[serde(default = "default_oee_max")]
    pub oee_max: f64,
}

fn default_rpn_weight() -> f64 { defaults::RPN_WEIGHT }
fn default_oee_weight() -> f64 { defaults::OEE_WEIGHT }
fn default_threshold_good() -> f64 { defaults::HEALTH_THRESHOLD_GOOD }
fn default_critical_threshold() -> f64 { defaults::CRITICAL_THRESHOLD }
fn default_oee_min() -> f64 { defaults::OEE_MIN }
fn default_oee_max() -> f64 { defaults::OEE_MAX }

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            rpn_weight: default_rpn_weight(),
            oee_weight: default_oee_weight(),
            threshold_good: default_threshold_good(),
            critical_threshold: default_critical_threshold(),
            oee_min: default_oee_min(),
            oee_max: default_oee_max(),
        }
    }
}

// ============================================================================
// Availability
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityConfig {
    /// Returned when the window is empty or spans zero seconds
    #[serde(default = "default_availability_rate")]
    pub default_rate: f64,
}

fn default_availability_rate() -> f64 { defaults::DEFAULT_AVAILABILITY_RATE }

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self { default_rate: default_availability_rate() }
    }
}

// ============================================================================
// Downtime
// ============================================================================

/// How an episode is attributed when no metric points at a specific stage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StageTiebreak {
    /// Alternate Slotter, Stacker, Slotter, ... within one scan
    #[default]
    RoundRobin,
    /// Pick uniformly at random
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DowntimeConfig {
    /// Entry guard: performance below this is downtime (%)
    #[serde(default = "default_performance_threshold")]
    pub performance_threshold: f64,

    /// Entry guard: quality below this is downtime (%)
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,

    /// Performance below this at episode start attributes it to the feeder
    #[serde(default = "default_feed_stage")]
    pub feed_stage_performance: f64,

    /// Performance below this at episode start attributes it to the pre-feeder
    #[serde(default = "default_pre_feed_stage")]
    pub pre_feed_stage_performance: f64,

    #[serde(default)]
    pub stage_tiebreak: StageTiebreak,

    /// Event cap when the caller does not supply one
    #[serde(default = "default_event_limit")]
    pub default_limit: usize,
}

fn default_performance_threshold() -> f64 { defaults::DOWNTIME_PERFORMANCE_THRESHOLD }
fn default_quality_threshold() -> f64 { defaults::DOWNTIME_QUALITY_THRESHOLD }
fn default_feed_stage() -> f64 { defaults::FEED_STAGE_PERFORMANCE }
fn default_pre_feed_stage() -> f64 { defaults::PRE_FEED_STAGE_PERFORMANCE }
fn default_event_limit() -> usize { defaults::DOWNTIME_EVENT_LIMIT }

impl Default for DowntimeConfig {
    fn default() -> Self {
        Self {
            performance_threshold: default_performance_threshold(),
            quality_threshold: default_quality_threshold(),
            feed_stage_performance: default_feed_stage(),
            pre_feed_stage_performance: default_pre_feed_stage(),
            stage_tiebreak: StageTiebreak::default(),
            default_limit: default_event_limit(),
        }
    }
}

// ============================================================================
// Estimator
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimatorConfig {
    /// Timeout for one statistical estimator call (ms)
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_min_duration")]
    pub min_duration_minutes: f64,

    #[serde(default = "default_max_duration")]
    pub max_duration_minutes: f64,

    /// raw < low_ratio × baseline is "too optimistic"
    #[serde(default = "default_low_ratio")]
    pub low_ratio: f64,

    /// raw > high_ratio × baseline is "runaway"
    #[serde(default = "default_high_ratio")]
    pub high_ratio: f64,

    /// Runaway predictions become cap_factor × baseline
    #[serde(default = "default_cap_factor")]
    pub cap_factor: f64,

    /// Baseline share when pulling an optimistic prediction up
    #[serde(default = "default_low_baseline_weight")]
    pub low_baseline_weight: f64,

    /// Baseline share in the plausible range
    #[serde(default = "default_baseline_weight")]
    pub baseline_weight: f64,
}

fn default_timeout_ms() -> u64 { defaults::ESTIMATOR_TIMEOUT_MS }
fn default_min_duration() -> f64 { defaults::MIN_DURATION_MINUTES }
fn default_max_duration() -> f64 { defaults::MAX_DURATION_MINUTES }
fn default_low_ratio() -> f64 { defaults::BLEND_LOW_RATIO }
fn default_high_ratio() -> f64 { defaults::BLEND_HIGH_RATIO }
fn default_cap_factor() -> f64 { defaults::BLEND_CAP_FACTOR }
fn default_low_baseline_weight() -> f64 { defaults::BLEND_LOW_BASELINE_WEIGHT }
fn default_baseline_weight() -> f64 { defaults::BLEND_BASELINE_WEIGHT }

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            min_duration_minutes: default_min_duration(),
            max_duration_minutes: default_max_duration(),
            low_ratio: default_low_ratio(),
            high_ratio: default_high_ratio(),
            cap_factor: default_cap_factor(),
            low_baseline_weight: default_low_baseline_weight(),
            baseline_weight: default_baseline_weight(),
        }
    }
}

impl EstimatorConfig {
    pub const fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.timeout_ms)
    }

    /// Bound a duration to the realistic range.
    ///
    /// Never panics on an unvalidated config: with crossed bounds the upper
    /// one wins.
    pub fn bound(&self, minutes: f64) -> f64 {
        minutes.max(self.min_duration_minutes).min(self.max_duration_minutes)
    }
}

// ============================================================================
// Component Catalog
// ============================================================================

/// FMEA risk priority number of one component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComponentRisk {
    pub name: String,
    pub rpn_value: f64,
}
