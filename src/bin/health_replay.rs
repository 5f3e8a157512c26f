//! Health Replay
//!
//! Replays a recorded observation log through the FlexoTwin pipeline and
//! prints the results as JSON.
//!
//! Usage:
//!   health-replay --observations data/line1.json snapshot
//!   health-replay --observations data/line1.json health --component Feeder
//!   health-replay --observations data/line1.json downtime --component slotter --limit 10
//!   health-replay estimate --reason FEEDER_JAM --shift 2 --health-index 35
//!   health-replay init-config flexotwin.toml

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use flexotwin::config::MonitorConfig;
use flexotwin::estimator::{DurationEstimator, EstimationInput, FixedEstimator, NullEstimator, StatisticalEstimator};
use flexotwin::monitor::{InMemorySource, MachineMonitor, StaticRiskCatalog};
use flexotwin::types::{Observation, SensorConditions, Shift};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "health-replay")]
#[command(about = "Replay a FlexoTwin observation log and print health, downtime and escalation results")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file. Falls back to $FLEXOTWIN_CONFIG, then
    /// ./flexotwin.toml, then built-in defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Answer every statistical estimate with this many minutes instead of
    /// running without a model
    #[arg(long, value_name = "MINUTES")]
    fixed_estimate: Option<f64>,

    #[command(flatten)]
    replay: ReplayArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct ReplayArgs {
    /// JSON array of observations
    #[arg(long, value_name = "FILE")]
    observations: Option<PathBuf>,

    /// Evaluation time (RFC 3339). Defaults to the newest observation, or now
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Seed for the random stage tie-break
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every catalogued component and reconstruct downtime
    Snapshot,

    /// Score a single component
    Health {
        #[arg(long)]
        component: String,

        /// Override the catalog RPN
        #[arg(long, requires = "rpn_max")]
        rpn: Option<f64>,

        #[arg(long)]
        rpn_max: Option<f64>,
    },

    /// List downtime events, newest first
    Downtime {
        /// Stage name, or "all"
        #[arg(long)]
        component: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// Estimate a maintenance duration without an observation log
    Estimate {
        #[arg(long)]
        reason: String,

        /// Shift number (1-3)
        #[arg(long)]
        shift: Option<u8>,

        #[arg(long)]
        health_index: Option<f64>,
    },

    /// Write the default configuration to a file
    InitConfig { path: PathBuf },
}

fn load_config(path: Option<&Path>) -> Result<MonitorConfig> {
    match path {
        Some(p) => MonitorConfig::load_from_file(p).with_context(|| format!("loading config {}", p.display())),
        None => Ok(MonitorConfig::load()),
    }
}

fn load_source(path: Option<&Path>) -> Result<InMemorySource> {
    let Some(path) = path else {
        bail!("--observations is required for this command");
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let source = InMemorySource::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;
    info!(path = %path.display(), samples = source.len(), "Observation log loaded");
    Ok(source)
}

/// Load the observation log and build a monitor over it.
fn open_replay(
    args: &ReplayArgs,
    config: Arc<MonitorConfig>,
    estimator: Arc<dyn StatisticalEstimator>,
) -> Result<(MachineMonitor, Vec<Observation>, DateTime<Utc>)> {
    let source = load_source(args.observations.as_deref())?;
    let now = args.now.or_else(|| source.newest()).unwrap_or_else(Utc::now);
    let window = source.observations().to_vec();

    let catalog = Arc::new(StaticRiskCatalog::from_config(&config.components));
    let mut monitor = MachineMonitor::new(config, Arc::new(source), catalog, estimator);
    if let Some(seed) = args.seed {
        monitor = monitor.with_seed(seed);
    }
    Ok((monitor, window, now))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let config = Arc::new(load_config(args.config.as_deref())?);

    let estimator: Arc<dyn StatisticalEstimator> = match args.fixed_estimate {
        Some(minutes) => Arc::new(FixedEstimator(minutes)),
        None => Arc::new(NullEstimator),
    };

    match args.command {
        Command::InitConfig { path } => {
            config.save_to_file(&path)?;
            info!(path = %path.display(), "Configuration written");
        }
        Command::Estimate {
            reason,
            shift,
            health_index,
        } => {
            let shift = match shift {
                Some(s) => Some(Shift::from_value(f64::from(s)).with_context(|| format!("invalid shift {s}"))?),
                None => None,
            };
            let input = EstimationInput {
                reason,
                shift,
                health_index,
                sensors: SensorConditions::default(),
            };
            let estimate = DurationEstimator::new(estimator, &config.estimator).estimate(&input).await?;
            print_json(&estimate)?;
        }
        Command::Snapshot => {
            let (monitor, window, now) = open_replay(&args.replay, config, estimator)?;
            print_json(&monitor.snapshot(&window, now).await?)?;
        }
        Command::Health {
            component,
            rpn,
            rpn_max,
        } => {
            let (monitor, window, now) = open_replay(&args.replay, config, estimator)?;
            let assessment = match (rpn, rpn_max) {
                (Some(rpn), Some(rpn_max)) => monitor.compute_health_at(&component, rpn, rpn_max, &window, now).await,
                _ => monitor.assess_component(&component, &window, now).await?,
            };
            print_json(&assessment)?;
        }
        Command::Downtime { component, limit } => {
            let (monitor, window, now) = open_replay(&args.replay, config, estimator)?;
            let events = monitor.list_downtime_events_at(&window, component.as_deref(), limit, now);
            let summary = monitor.summarize_downtime(&events);
            print_json(&serde_json::json!({ "events": events, "summary": summary }))?;
        }
    }

    Ok(())
}
