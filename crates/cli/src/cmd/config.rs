//! Configuration inspection command

use crate::util::GlobalOptions;
use anyhow::Result;
use debounce::DebounceConfig;
use owo_colors::OwoColorize;

/// Print the annotated example config
pub async fn run_example() -> Result<()> {
    print!("{}", DebounceConfig::example());
    Ok(())
}

/// Print the effective config after file and flag overrides
pub async fn run_show(options: &GlobalOptions) -> Result<()> {
    let config = options.resolve()?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    let source = match &options.config {
        Some(path) => path.display().to_string(),
        None => "(defaults)".to_string(),
    };
    println!("{}", "Debounce Configuration".bold());
    println!("{}: {}\n", "Source".dimmed(), source.dimmed());
    println!(
        "  {} = {} {}",
        "quiet_period_ms".cyan(),
        config.quiet_period_ms,
        format!("({:?})", config.quiet_period()).dimmed()
    );
    println!("  {} = \"{}\"", "in_flight".cyan(), config.in_flight);

    println!("\n{}", "Valid Ranges:".bold());
    println!("  quiet_period_ms: 0-3,600,000");
    println!("  in_flight: reschedule | ignore");
    Ok(())
}
