//! Command line interface
//!
//! Argument definitions and command execution for the `dm-api` binary.

pub mod args;
pub mod commands;

pub use args::{Cli, Command};
pub use commands::{Output, resolve_settings, run};
