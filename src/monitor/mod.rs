//! Machine Monitor
//!
//! Request-level facade over the scoring pipeline. Each call takes a window
//! of observations (passed in, or fetched from an [`ObservationSource`]) and
//! recomputes everything from scratch:
//!
//! ```text
//! window ──► HealthScorer ──► EscalationTrigger ──► HealthAssessment
//!        └─► DowntimeDetector ──► DowntimeEvent[] ──► DowntimeSummary
//! ```
//!
//! Nothing is cached between calls, so concurrent requests share only the
//! read-only configuration and the injected collaborators.

pub mod catalog;
pub mod source;

pub use catalog::{RiskCatalog, RiskPriority, StaticRiskCatalog};
pub use source::{InMemorySource, ObservationSource, SourceError};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::downtime::{summarize, DowntimeDetector};
use crate::escalation::EscalationTrigger;
use crate::estimator::{DurationEstimator, StatisticalEstimator};
use crate::health::HealthScorer;
use crate::types::{DowntimeEvent, DowntimeSummary, HealthAssessment, Observation};

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Unknown component '{0}'")]
    UnknownComponent(String),

    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Everything known about the machine for one window.
#[derive(Debug, Clone, Serialize)]
pub struct MachineSnapshot {
    pub machine: String,
    pub generated_at: DateTime<Utc>,
    pub samples: usize,
    pub assessments: Vec<HealthAssessment>,
    pub downtime_events: Vec<DowntimeEvent>,
    pub downtime_summary: DowntimeSummary,
}

pub struct MachineMonitor {
    config: Arc<MonitorConfig>,
    source: Arc<dyn ObservationSource>,
    catalog: Arc<dyn RiskCatalog>,
    scorer: HealthScorer,
    detector: DowntimeDetector,
    trigger: EscalationTrigger,
}

impl std::fmt::Debug for MachineMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineMonitor")
            .field("machine", &self.config.machine.name)
            .field("source", &self.source.source_name())
            .field("components", &self.catalog.components())
            .finish_non_exhaustive()
    }
}

impl MachineMonitor {
    pub fn new(
        config: Arc<MonitorConfig>,
        source: Arc<dyn ObservationSource>,
        catalog: Arc<dyn RiskCatalog>,
        estimator: Arc<dyn StatisticalEstimator>,
    ) -> Self {
        // An invalid config is reported, not rejected
        if let Err(e) = config.validate() {
            warn!(machine = %config.machine.name, error = %e, "Monitor started with an invalid config");
        }
        let scorer = HealthScorer::new(&config.health, &config.availability);
        let detector = DowntimeDetector::new(&config.downtime);
        let trigger = EscalationTrigger::new(
            config.health.critical_threshold,
            config.machine.utc_offset_hours,
            DurationEstimator::new(estimator, &config.estimator),
        );
        Self {
            config,
            source,
            catalog,
            scorer,
            detector,
            trigger,
        }
    }

    /// Pin the random stage tie-break to a seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.detector = self.detector.with_seed(seed);
        self
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Score one component against an explicit RPN and window.
    pub async fn compute_health(
        &self,
        component_name: &str,
        rpn_value: f64,
        rpn_max: f64,
        window: &[Observation],
    ) -> HealthAssessment {
        self.compute_health_at(component_name, rpn_value, rpn_max, window, Utc::now())
            .await
    }

    /// As [`Self::compute_health`], with `now` used for the wall-clock shift.
    pub async fn compute_health_at(
        &self,
        component_name: &str,
        rpn_value: f64,
        rpn_max: f64,
        window: &[Observation],
        now: DateTime<Utc>,
    ) -> HealthAssessment {
        let mut assessment = self.scorer.assess(component_name, rpn_value, rpn_max, window);
        assessment.escalation = self.trigger.evaluate(&assessment, window, now).await;
        assessment
    }

    /// Score a catalogued component.
    pub async fn assess_component(
        &self,
        component_name: &str,
        window: &[Observation],
        now: DateTime<Utc>,
    ) -> Result<HealthAssessment, MonitorError> {
        let priority = self
            .catalog
            .risk_priority(component_name)
            .ok_or_else(|| MonitorError::UnknownComponent(component_name.to_string()))?;
        Ok(self
            .compute_health_at(component_name, priority.rpn_value, priority.rpn_max, window, now)
            .await)
    }

    /// Score every catalogued component concurrently, in catalog order.
    pub async fn assess_components(
        &self,
        window: &[Observation],
        now: DateTime<Utc>,
    ) -> Result<Vec<HealthAssessment>, MonitorError> {
        let names = self.catalog.components();
        let futures = names.iter().map(|name| self.assess_component(name, window, now));
        join_all(futures).await.into_iter().collect()
    }

    /// Fetch the latest `limit` observations and score one component.
    pub async fn assess_latest(&self, component_name: &str, limit: usize) -> Result<HealthAssessment, MonitorError> {
        let window = self.source.latest(limit).await?;
        debug!(
            source = self.source.source_name(),
            component = component_name,
            samples = window.len(),
            "Window fetched"
        );
        self.assess_component(component_name, &window, Utc::now()).await
    }

    // ========================================================================
    // Downtime
    // ========================================================================

    /// Downtime events in the window, newest first. An episode still open
    /// at the end of the window is reported as ongoing until now.
    pub fn list_downtime_events(
        &self,
        window: &[Observation],
        component_filter: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<DowntimeEvent> {
        self.list_downtime_events_at(window, component_filter, limit, Utc::now())
    }

    pub fn list_downtime_events_at(
        &self,
        window: &[Observation],
        component_filter: Option<&str>,
        limit: Option<usize>,
        now: DateTime<Utc>,
    ) -> Vec<DowntimeEvent> {
        self.detector.list_events(window, now, component_filter, limit)
    }

    pub fn summarize_downtime(&self, events: &[DowntimeEvent]) -> DowntimeSummary {
        summarize(events)
    }

    // ========================================================================
    // Snapshot
    // ========================================================================

    /// Score every component and reconstruct downtime for one window.
    pub async fn snapshot(&self, window: &[Observation], now: DateTime<Utc>) -> Result<MachineSnapshot, MonitorError> {
        let assessments = self.assess_components(window, now).await?;
        let downtime_events = self.detector.detect(window, now);
        let downtime_summary = summarize(&downtime_events);

        let escalated = assessments.iter().filter(|a| a.escalation.is_some()).count();
        info!(
            machine = %self.config.machine.name,
            samples = window.len(),
            components = assessments.len(),
            escalated,
            downtime_events = downtime_events.len(),
            "Snapshot computed"
        );

        Ok(MachineSnapshot {
            machine: self.config.machine.name.clone(),
            generated_at: now,
            samples: window.len(),
            assessments,
            downtime_events,
            downtime_summary,
        })
    }

    /// Snapshot over the latest `limit` observations from the source.
    pub async fn snapshot_latest(&self, limit: usize, now: DateTime<Utc>) -> Result<MachineSnapshot, MonitorError> {
        let window = self.source.latest(limit).await?;
        self.snapshot(&window, now).await
    }
}
