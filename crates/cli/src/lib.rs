//! Hush CLI library
//!
//! Command implementations and helpers behind the `hush` binary.

pub mod cmd;
pub mod util;

pub use util::GlobalOptions;
