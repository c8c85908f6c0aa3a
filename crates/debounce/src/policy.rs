//! What a submission does while the action is already executing

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Policy for submissions that arrive after a fire has passed its point of
/// no return (the payload has been taken and the action is running).
///
/// A pending fire that has not started yet is always cancelled by a newer
/// submission, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InFlightPolicy {
    /// Start a new quiet period; the resulting fire waits for the running
    /// execution to finish and then runs with the latest payload.
    #[default]
    Reschedule,
    /// Drop the submission. Nothing is scheduled and the call returns the
    /// last completed result.
    Ignore,
}

impl InFlightPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InFlightPolicy::Reschedule => "reschedule",
            InFlightPolicy::Ignore => "ignore",
        }
    }
}

impl fmt::Display for InFlightPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InFlightPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reschedule" => Ok(InFlightPolicy::Reschedule),
            "ignore" => Ok(InFlightPolicy::Ignore),
            other => Err(format!(
                "unknown in-flight policy '{}' (expected 'reschedule' or 'ignore')",
                other
            )),
        }
    }
}
