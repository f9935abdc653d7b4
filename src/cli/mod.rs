//! CLI module
//!
//! Argument parsing, subcommand handling, and logging setup.

pub mod commands;
mod logging;

pub use commands::{Args, Command, ConfigSubcommand, handle_config_command};
pub use logging::init_logging;
