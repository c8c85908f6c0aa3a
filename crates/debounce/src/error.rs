//! Error types for the debounced invoker

use thiserror::Error;

/// Errors raised while building a [`Debouncer`](crate::Debouncer) or loading its config
///
/// `submit` itself never fails; faults inside the wrapped action are
/// reported through logging and [`DebounceStats`](crate::DebounceStats).
#[derive(Debug, Error)]
pub enum DebounceError {
    /// Quiet period or config value out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No tokio runtime to schedule timers on
    #[error("no tokio runtime available (construct inside a runtime or pass a Handle)")]
    NoRuntime,

    /// Malformed TOML config
    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),

    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for debounce operations
pub type Result<T> = std::result::Result<T, DebounceError>;
