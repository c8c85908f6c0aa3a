//! Calls spaced beyond the quiet period
//!
//! Each call gets its own quiet period, so every payload executes.

use crate::util::{self, GlobalOptions, PhasePlan, RunReport, TrackedInvoker};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::time::Duration;
use tracing::warn;

pub async fn run(options: &GlobalOptions, calls: usize, gap_ms: u64, settle_ms: u64) -> Result<()> {
    let config = options.resolve()?;
    let echo = !options.json;

    if gap_ms <= config.quiet_period_ms {
        warn!(
            "Gap {}ms does not exceed the quiet period {}ms; calls may collapse",
            gap_ms, config.quiet_period_ms
        );
    }

    let invoker = TrackedInvoker::new(&config, echo)?;
    if echo {
        println!("{}", "Testing with calls spaced beyond debounce time...".bold());
    }

    let plan = PhasePlan {
        first_index: 0,
        calls,
        gap: Duration::from_millis(gap_ms),
        settle: Duration::from_millis(settle_ms),
    };
    let phase = util::run_phase(&invoker, "spaced", plan, echo).await;

    let report = RunReport {
        config,
        total_executions: invoker.executions(),
        stats: invoker.debouncer.stats(),
        phases: vec![phase],
    };
    util::print_report(&report, options.json)
}
