//! Monitor Configuration Module
//!
//! Per-machine configuration loaded from TOML files, replacing hardcoded
//! scoring thresholds with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `FLEXOTWIN_CONFIG` environment variable (path to TOML file)
//! 2. `flexotwin.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! The config is an explicit value handed to each component at
//! construction; there is no process-wide instance.
//!
//! ```ignore
//! let config = Arc::new(MonitorConfig::load());
//! let monitor = MachineMonitor::new(config, source, catalog, estimator);
//! ```

mod monitor_config;
pub mod defaults;
pub mod validation;

pub use monitor_config::*;
