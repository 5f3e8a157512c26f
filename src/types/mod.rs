//! Shared data structures for machine health monitoring
//!
//! This module defines the core types flowing through the scoring pipeline:
//! - Observation (controller status samples, externally supplied)
//! - MachineComponent (stages of the production line)
//! - DowntimeEvent, DowntimeSummary (reconstructed downtime history)
//! - HealthAssessment (composite RPN/OEE health index)
//! - EscalationRecord, DurationEstimate (automatic maintenance escalation)
//!
//! Every derived type is created fresh per request; nothing here is persisted.

mod observation;
mod component;
mod downtime;
mod health;
mod escalation;

pub use observation::*;
pub use component::*;
pub use downtime::*;
pub use health::*;
pub use escalation::*;
