//! Volt CLI library.
//!
//! This library provides the pieces of the `volt` command-line tool: argument
//! parsing, configuration loading, mention input reading, and output
//! formatting. The binary wires them around [`volt_enricher::Pipeline`].

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;

pub use cli::{Cli, ReportFormat};
pub use error::{CliError, Result};
pub use output::Formatter;
