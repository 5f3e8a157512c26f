//! FlexoTwin: Machine Health Intelligence
//!
//! Health scoring, downtime reconstruction and maintenance escalation for a
//! corrugated-board flexo line (Pre-Feeder → Feeder → Printing → Slotter →
//! Stacker).
//!
//! ## Architecture
//!
//! - **Health Scorer**: Composite index from inverted FMEA RPN and live OEE
//! - **Downtime Detector**: Two-state scan of the observation log into episodes
//! - **Escalation Trigger**: Reason/shift extraction below the critical threshold
//! - **Duration Estimator**: Rule-based baseline blended with a statistical model
//! - **Machine Monitor**: Request-level facade wiring the above together

pub mod config;
pub mod types;
pub mod fmea;
pub mod availability;
pub mod downtime;
pub mod health;
pub mod estimator;
pub mod escalation;
pub mod monitor;

// Re-export configuration
pub use config::{ConfigError, MonitorConfig};

// Re-export commonly used types
pub use types::{
    Confidence, DowntimeEvent, DowntimeSummary, DurationEstimate, EscalationRecord, HealthAssessment,
    HealthStatus, MachineComponent, MachineStatus, Observation, SeverityTier, Shift,
};

// Re-export pipeline components
pub use downtime::DowntimeDetector;
pub use escalation::EscalationTrigger;
pub use estimator::{DurationEstimator, EstimatorError, StatisticalEstimator};
pub use health::HealthScorer;
pub use monitor::{MachineMonitor, MonitorError};
