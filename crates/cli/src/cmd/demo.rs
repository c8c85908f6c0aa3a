//! Burst then spaced calls against one shared invoker

use crate::util::{self, GlobalOptions, PhasePlan, RunReport, TrackedInvoker};
use anyhow::Result;
use owo_colors::OwoColorize;
use std::time::Duration;
use tracing::info;

/// Calls in the burst phase
const BURST_CALLS: usize = 5;

/// Calls in the spaced phase
const SPACED_CALLS: usize = 3;

pub async fn run(options: &GlobalOptions) -> Result<()> {
    let config = options.resolve()?;
    let echo = !options.json;
    let quiet = config.quiet_period();

    info!("Running demo (quiet period: {:?}, policy: {})", quiet, config.in_flight);
    let invoker = TrackedInvoker::new(&config, echo)?;

    // Burst: gaps at a fifth of the quiet period
    if echo {
        println!("{}", "Making multiple calls quickly...".bold());
    }
    let burst = PhasePlan {
        first_index: 0,
        calls: BURST_CALLS,
        gap: quiet / 5,
        settle: quiet + quiet / 2,
    };
    let burst_report = util::run_phase(&invoker, "burst", burst, echo).await;

    // Spaced: gaps at one and a half quiet periods
    if echo {
        println!("\n{}", "Testing with calls spaced beyond debounce time...".bold());
    }
    let spaced = PhasePlan {
        first_index: BURST_CALLS,
        calls: SPACED_CALLS,
        gap: quiet + quiet / 2,
        settle: quiet + quiet / 2,
    };
    let spaced_report = util::run_phase(&invoker, "spaced", spaced, echo).await;

    let report = RunReport {
        config,
        total_executions: invoker.executions(),
        stats: invoker.debouncer.stats(),
        phases: vec![burst_report, spaced_report],
    };
    util::print_report(&report, options.json)
}
