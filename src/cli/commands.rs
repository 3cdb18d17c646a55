//! Command definitions for the 20-20-20 timer CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::notification::sanitize_message;
use crate::types::{
    TimerConfig, DEFAULT_BREAK_MESSAGE, DEFAULT_DURATION_MINUTES, MAX_DURATION_MINUTES,
    MIN_DURATION_MINUTES,
};

// ============================================================================
// CLI Structure
// ============================================================================

/// 20-20-20 Timer CLI - An eye-strain break reminder
#[derive(Parser, Debug)]
#[command(
    name = "twenty",
    version,
    about = "20-20-20ルールの休憩リマインダー",
    long_about = "20分ごとに、20フィート（約6メートル）先を20秒間見るよう知らせるタイマー。\n\
                  ターミナル上で動作し、デスクトップ通知またはアラートと音でお知らせします。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run an interactive timer session
    Run(RunArgs),

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Run Command Arguments
// ============================================================================

/// Arguments for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Countdown length in minutes (1-60)
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_DURATION_MINUTES,
        value_parser = clap::value_parser!(u32).range(i64::from(MIN_DURATION_MINUTES)..=i64::from(MAX_DURATION_MINUTES))
    )]
    pub minutes: u32,

    /// Countdown length in seconds, for short test runs
    #[arg(
        long,
        hide = true,
        conflicts_with = "minutes",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub seconds: Option<u32>,

    /// Break instruction shown when the countdown finishes
    #[arg(long, value_parser = parse_message)]
    pub message: Option<String>,

    /// Disable the audio cue
    #[arg(long)]
    pub no_sound: bool,

    /// Audio file to play instead of the built-in chime
    #[arg(long, value_name = "PATH", conflicts_with = "no_sound")]
    pub sound_file: Option<PathBuf>,

    /// Ask for desktop notification permission at startup
    #[arg(long)]
    pub notify: bool,

    /// Never use desktop notifications, only the terminal alert
    #[arg(long, conflicts_with = "notify")]
    pub no_notify: bool,

    /// Start counting immediately
    #[arg(short, long)]
    pub autostart: bool,

    /// Exit after the first finished countdown
    #[arg(long)]
    pub once: bool,

    /// Print updates as JSON lines
    #[arg(long)]
    pub json: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            minutes: DEFAULT_DURATION_MINUTES,
            seconds: None,
            message: None,
            no_sound: false,
            sound_file: None,
            notify: false,
            no_notify: false,
            autostart: false,
            once: false,
            json: false,
        }
    }
}

impl RunArgs {
    /// Resolves the arguments into a session configuration.
    pub fn to_config(&self) -> TimerConfig {
        let config = TimerConfig {
            message: self
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_BREAK_MESSAGE.to_string()),
            sound: !self.no_sound,
            sound_file: self.sound_file.clone(),
            notifications: !self.no_notify,
            request_permission: self.notify,
            autostart: self.autostart,
            exit_on_finish: self.once,
            ..TimerConfig::default()
        };

        match self.seconds {
            Some(seconds) => config.with_seconds(seconds),
            None => config.with_minutes(self.minutes),
        }
    }
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Sanitizes the break message.
///
/// Falls back to the default message when nothing printable remains.
fn parse_message(s: &str) -> Result<String, String> {
    Ok(sanitize_message(s).unwrap_or_else(|| DEFAULT_BREAK_MESSAGE.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
