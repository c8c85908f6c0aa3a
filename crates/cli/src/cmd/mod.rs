//! CLI command implementations

pub mod burst;
pub mod config;
pub mod demo;
pub mod spaced;
