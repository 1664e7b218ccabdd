//! storeprobe CLI library
//!
//! Command-line front end for the storeprobe scenario catalogue.

#![warn(missing_docs)]

mod app;
mod commands;
mod error;
pub mod logging;
mod output;

pub use app::{execute, Verdict};
pub use commands::{Cli, ColorArg, Commands, FormatArg, ListArgs, RunArgs, SuiteArg};
pub use error::{CliError, CliResult};
pub use output::{render_catalogue, render_report};
