//! Debounced invocation for Hush
//!
//! This crate wraps an action so that bursts of calls collapse into one:
//! - Latest-payload-wins deferred execution after a quiet period
//! - Cancel-and-reschedule on every submission (tokio timers)
//! - Deterministic handling of submissions during a running execution
//! - TOML configuration

pub mod config;
pub mod debounce;
pub mod error;
pub mod policy;

// Re-exports
pub use config::{check_quiet_period, quiet_period_from_secs_f64, DebounceConfig};
pub use debounce::{debounce, DebounceStats, Debouncer};
pub use error::{DebounceError, Result};
pub use policy::InFlightPolicy;
