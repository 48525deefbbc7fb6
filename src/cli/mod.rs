//! CLI layer.
//!
//! Provides the command-line interface using clap: serve the HTTP API,
//! ask one-off questions, run battles, fetch raw records, and write the
//! default prompt templates.

pub mod commands;
pub mod parser;

pub use commands::execute;
pub use parser::{Cli, Commands};
