//! CLI module for the 20-20-20 timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and the terminal/JSON renderers

pub mod commands;
pub mod display;

pub use commands::{Cli, Commands, RunArgs};
pub use display::{progress_bar, status_line, Display, JsonRenderer, TerminalRenderer};
