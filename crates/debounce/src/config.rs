//! Debouncer configuration
//!
//! Loaded from TOML; every key is optional and falls back to its default:
//!
//! ```toml
//! quiet_period_ms = 1000
//! in_flight = "reschedule"
//! ```

use crate::error::{DebounceError, Result};
use crate::policy::InFlightPolicy;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Upper bound on the quiet period (one hour)
pub const MAX_QUIET_PERIOD_MS: u64 = 60 * 60 * 1000;

/// Default quiet period (one second)
pub const DEFAULT_QUIET_PERIOD_MS: u64 = 1000;

/// Debouncer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Quiet period in milliseconds (default: 1000)
    #[serde(default = "default_quiet_period_ms")]
    pub quiet_period_ms: u64,

    /// Behaviour for submissions during an in-flight execution
    #[serde(default)]
    pub in_flight: InFlightPolicy,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            quiet_period_ms: DEFAULT_QUIET_PERIOD_MS,
            in_flight: InFlightPolicy::default(),
        }
    }
}

fn default_quiet_period_ms() -> u64 {
    DEFAULT_QUIET_PERIOD_MS
}

impl DebounceConfig {
    /// Parse and validate a config from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: DebounceConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.quiet_period_ms > MAX_QUIET_PERIOD_MS {
            return Err(DebounceError::InvalidArgument(format!(
                "quiet_period_ms must be in 0-{} (got {})",
                MAX_QUIET_PERIOD_MS, self.quiet_period_ms
            )));
        }
        Ok(())
    }

    /// Quiet period as a `Duration`
    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.quiet_period_ms)
    }

    /// Render as TOML
    pub fn to_toml_string(&self) -> String {
        // Two plain scalar fields; serialization cannot fail
        toml::to_string(self).unwrap_or_default()
    }

    /// Annotated example config
    pub fn example() -> &'static str {
        r#"# Hush debouncer configuration

# Minimum stretch of inactivity before the pending call fires.
# Valid range: 0-3600000 (0 = fire on the next scheduler tick)
quiet_period_ms = 1000

# What a submission does while the action is already running:
#   "reschedule" - start a new quiet period, fire after the running call
#   "ignore"     - drop the submission
in_flight = "reschedule"
"#
    }
}

/// Convert a possibly-negative seconds value into a quiet period
///
/// Rejects negative, NaN and infinite inputs, as well as anything past
/// [`MAX_QUIET_PERIOD_MS`].
pub fn quiet_period_from_secs_f64(secs: f64) -> Result<Duration> {
    if !secs.is_finite() {
        return Err(DebounceError::InvalidArgument(format!(
            "quiet period must be finite (got {})",
            secs
        )));
    }
    if secs < 0.0 {
        return Err(DebounceError::InvalidArgument(format!(
            "quiet period must be non-negative (got {}s)",
            secs
        )));
    }
    if secs > (MAX_QUIET_PERIOD_MS / 1000) as f64 {
        return Err(DebounceError::InvalidArgument(format!(
            "quiet period must be at most {}ms (got {}s)",
            MAX_QUIET_PERIOD_MS, secs
        )));
    }
    let period = Duration::from_secs_f64(secs);
    check_quiet_period(period)?;
    Ok(period)
}

/// Reject quiet periods past [`MAX_QUIET_PERIOD_MS`]
pub fn check_quiet_period(period: Duration) -> Result<()> {
    if period > Duration::from_millis(MAX_QUIET_PERIOD_MS) {
        return Err(DebounceError::InvalidArgument(format!(
            "quiet period must be at most {}ms (got {:?})",
            MAX_QUIET_PERIOD_MS, period
        )));
    }
    Ok(())
}
