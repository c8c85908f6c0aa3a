//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use debounce::{DebounceConfig, DebounceStats, Debouncer, InFlightPolicy};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Config file to start from
    pub config: Option<PathBuf>,
    /// Overrides `quiet_period_ms`
    pub quiet_ms: Option<u64>,
    /// Overrides `in_flight`
    pub policy: Option<InFlightPolicy>,
    /// Print a JSON report instead of coloured text
    pub json: bool,
}

impl GlobalOptions {
    /// Build the effective config: file (or defaults), then flag overrides
    pub fn resolve(&self) -> Result<DebounceConfig> {
        let mut config = match &self.config {
            Some(path) => DebounceConfig::load(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => DebounceConfig::default(),
        };

        if let Some(quiet_ms) = self.quiet_ms {
            config.quiet_period_ms = quiet_ms;
        }
        if let Some(policy) = self.policy {
            config.in_flight = policy;
        }

        config.validate().context("Invalid configuration value")?;
        Ok(config)
    }
}

/// Debounced echo action plus an execution counter
///
/// Stands in for an arbitrary wrapped function: it reports the payload it
/// ran with and returns it unchanged.
pub struct TrackedInvoker {
    pub debouncer: Debouncer<String, String>,
    executions: Arc<AtomicU64>,
}

impl TrackedInvoker {
    pub fn new(config: &DebounceConfig, echo: bool) -> Result<Self> {
        let executions = Arc::new(AtomicU64::new(0));
        let counter = executions.clone();

        let debouncer = Debouncer::from_config(config, move |value: String| {
            counter.fetch_add(1, Ordering::SeqCst);
            if echo {
                println!("  {} {}", "executed with:".green(), value.bold());
            }
            value
        })
        .context("Failed to create debounced invoker")?;

        Ok(Self {
            debouncer,
            executions,
        })
    }

    /// Number of times the action has run
    pub fn executions(&self) -> u64 {
        self.executions.load(Ordering::SeqCst)
    }
}

/// Timing for one phase of calls
#[derive(Debug, Clone, Copy)]
pub struct PhasePlan {
    /// Index of the first call (labels continue across phases)
    pub first_index: usize,
    pub calls: usize,
    /// Gap between consecutive calls
    pub gap: Duration,
    /// Wait after the last call before counting executions
    pub settle: Duration,
}

/// Outcome of one phase
#[derive(Debug, Clone, Serialize)]
pub struct PhaseReport {
    pub phase: String,
    pub calls: usize,
    pub gap_ms: u64,
    /// What each `submit` handed back (last completed result)
    pub returned: Vec<Option<String>>,
    /// Executions that happened during this phase
    pub executions: u64,
}

/// Full command output
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub config: DebounceConfig,
    pub phases: Vec<PhaseReport>,
    pub total_executions: u64,
    pub stats: DebounceStats,
}

/// Submit `plan.calls` payloads with `plan.gap` between them, then settle
pub async fn run_phase(
    invoker: &TrackedInvoker,
    phase: &str,
    plan: PhasePlan,
    echo: bool,
) -> PhaseReport {
    let before = invoker.executions();
    let mut returned = Vec::with_capacity(plan.calls.min(1024));

    for offset in 0..plan.calls {
        let payload = format!("Call {}", plan.first_index.saturating_add(offset));
        let result = invoker.debouncer.submit(payload.clone());
        if echo {
            println!(
                "{} returned: {}",
                payload.cyan(),
                result.as_deref().unwrap_or("None").dimmed()
            );
        }
        returned.push(result);
        tokio::time::sleep(plan.gap).await;
    }

    tokio::time::sleep(plan.settle).await;

    PhaseReport {
        phase: phase.to_string(),
        calls: plan.calls,
        gap_ms: plan.gap.as_millis() as u64,
        returned,
        executions: invoker.executions() - before,
    }
}

/// Print the final report as text or JSON
pub fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", text);
        return Ok(());
    }

    println!();
    for phase in &report.phases {
        println!(
            "{} {} calls, {}ms apart -> {} execution(s)",
            format!("[{}]", phase.phase).yellow(),
            phase.calls,
            phase.gap_ms,
            phase.executions.to_string().bold()
        );
    }
    println!(
        "{}: {}",
        "Total actual executions".bold(),
        report.total_executions
    );
    println!(
        "  {} submitted, {} superseded, {} ignored, {} faulted",
        report.stats.submitted,
        report.stats.superseded,
        report.stats.ignored,
        report.stats.faulted
    );
    Ok(())
}
