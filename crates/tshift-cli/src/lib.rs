//! Log time-shift detector CLI library.
//!
//! This crate provides the CLI interface, configuration, log sources and
//! report rendering around `tshift-core`.

mod cli;
pub mod commands;
mod config;
pub mod source;

pub use cli::Cli;
pub use config::{Config, Fudge};
