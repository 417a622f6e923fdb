//! polycli: one entry point for many independent tools.
//!
//! The crate assembles the command tree ([`cli::command_tree`]), resolves
//! configuration from flags, environment, config file and defaults
//! ([`config::resolve`]), sets up logging once ([`logging::init`]) and runs the
//! matched command ([`dispatch::run`]).

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod exitcode;
pub mod logging;
pub mod registry;
pub mod util;
