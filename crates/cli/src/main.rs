//! Hush CLI - hush command

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cli_lib::{cmd, GlobalOptions};
use debounce::InFlightPolicy;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Hush - collapse bursts of calls into one deferred execution
#[derive(Parser)]
#[command(name = "hush")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// TOML config file (quiet_period_ms, in_flight)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Quiet period in milliseconds (overrides config)
    #[arg(long, global = true)]
    quiet_ms: Option<u64>,

    /// Submissions during a running call: reschedule or ignore
    #[arg(long, global = true)]
    policy: Option<InFlightPolicy>,

    /// Print a JSON report
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rapid calls inside the quiet period (expect one execution)
    Burst {
        /// Number of calls
        #[arg(long, default_value = "5")]
        calls: usize,
        /// Milliseconds between calls
        #[arg(long, default_value = "200")]
        gap_ms: u64,
        /// Milliseconds to wait after the last call
        #[arg(long, default_value = "1500")]
        settle_ms: u64,
    },
    /// Calls spaced beyond the quiet period (expect one execution each)
    Spaced {
        /// Number of calls
        #[arg(long, default_value = "3")]
        calls: usize,
        /// Milliseconds between calls
        #[arg(long, default_value = "1500")]
        gap_ms: u64,
        /// Milliseconds to wait after the last call
        #[arg(long, default_value = "1500")]
        settle_ms: u64,
    },
    /// Burst then spaced calls against one invoker
    Demo,
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print an annotated example config
    Example,
    /// Print the effective config
    Show,
}

impl From<GlobalArgs> for GlobalOptions {
    fn from(args: GlobalArgs) -> Self {
        Self {
            config: args.config,
            quiet_ms: args.quiet_ms,
            policy: args.policy,
            json: args.json,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (RUST_LOG, stderr so reports stay parseable)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = GlobalOptions::from(cli.global);

    match cli.command {
        Commands::Burst { calls, gap_ms, settle_ms } => {
            cmd::burst::run(&options, calls, gap_ms, settle_ms).await
        }
        Commands::Spaced { calls, gap_ms, settle_ms } => {
            cmd::spaced::run(&options, calls, gap_ms, settle_ms).await
        }
        Commands::Demo => cmd::demo::run(&options).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Example => cmd::config::run_example().await,
            ConfigCommands::Show => cmd::config::run_show(&options).await,
        },
    }
}
