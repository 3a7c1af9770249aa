//! pmrag CLI library
//!
//! Argument definitions, logging setup, the composition root and one module per
//! subcommand. `main.rs` only parses, loads the config and dispatches.

pub mod cli;
pub mod commands;
pub mod factories;
pub mod logging;
pub mod output;
