//! Core data types for the 20-20-20 timer.
//!
//! This module defines the data structures used for:
//! - Timer state and its phase machine
//! - Notification permission state
//! - Snapshots handed to renderers
//! - Timer configuration with validation

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default countdown length in minutes (the first "20" of 20-20-20).
pub const DEFAULT_DURATION_MINUTES: u32 = 20;

/// Smallest accepted duration in minutes for user input.
pub const MIN_DURATION_MINUTES: u32 = 1;

/// Largest accepted duration in minutes for user input.
pub const MAX_DURATION_MINUTES: u32 = 60;

/// Break instruction shown when the countdown finishes.
pub const DEFAULT_BREAK_MESSAGE: &str =
    "20分経過しました。20フィート（約6メートル）先を20秒間見て、目を休めましょう。";

// ============================================================================
// TimerPhase
// ============================================================================

/// Represents the current phase of the timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerPhase {
    /// Configured and waiting to start
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Countdown suspended, remaining time preserved
    Paused,
    /// Countdown reached zero
    Finished,
}

impl TimerPhase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "idle",
            TimerPhase::Running => "running",
            TimerPhase::Paused => "paused",
            TimerPhase::Finished => "finished",
        }
    }

    /// Returns the label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            TimerPhase::Idle => "待機中",
            TimerPhase::Running => "実行中",
            TimerPhase::Paused => "一時停止中",
            TimerPhase::Finished => "完了",
        }
    }

    /// Returns true if `start()` is accepted from this phase.
    pub fn can_start(&self) -> bool {
        !matches!(self, TimerPhase::Running)
    }
}

// ============================================================================
// NotificationPermission
// ============================================================================

/// Whether the rich notification channel may be used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationPermission {
    /// The user allowed notifications
    Granted,
    /// The user refused, or the channel is unavailable
    Denied,
    /// Not asked yet
    #[default]
    Default,
}

impl NotificationPermission {
    /// Returns the string representation of the permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationPermission::Granted => "granted",
            NotificationPermission::Denied => "denied",
            NotificationPermission::Default => "default",
        }
    }

    /// Returns the label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            NotificationPermission::Granted => "許可済み",
            NotificationPermission::Denied => "拒否",
            NotificationPermission::Default => "未確認",
        }
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, NotificationPermission::Granted)
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// Countdown state owned by the timer engine.
///
/// Fields are private so every mutation goes through the transition methods,
/// which keep `0 <= remaining <= total` and tie the notification guard to
/// the `Finished` phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    total_seconds: u32,
    remaining_seconds: u32,
    phase: TimerPhase,
    notified_for_this_run: bool,
}

impl TimerState {
    /// Creates an idle state for the given duration.
    ///
    /// Callers must pass a duration of at least one second.
    pub fn new(total_seconds: u32) -> Self {
        Self {
            total_seconds,
            remaining_seconds: total_seconds,
            phase: TimerPhase::Idle,
            notified_for_this_run: false,
        }
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn notified_for_this_run(&self) -> bool {
        self.notified_for_this_run
    }

    /// Returns true if the timer is counting down.
    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    /// Returns true if the countdown ran to completion.
    pub fn is_finished(&self) -> bool {
        self.phase == TimerPhase::Finished
    }

    /// Starts or resumes the countdown.
    ///
    /// A finished countdown is reset first, so pressing start again begins
    /// a new cycle.
    pub fn start(&mut self) {
        if self.phase == TimerPhase::Finished {
            self.reset(None);
        }
        self.phase = TimerPhase::Running;
    }

    /// Pauses a running countdown. Other phases are left untouched.
    pub fn pause(&mut self) {
        if self.phase == TimerPhase::Running {
            self.phase = TimerPhase::Paused;
        }
    }

    /// Returns to `Idle` with a full countdown, optionally with a new duration.
    pub fn reset(&mut self, total_seconds: Option<u32>) {
        if let Some(total) = total_seconds {
            self.total_seconds = total;
        }
        self.remaining_seconds = self.total_seconds;
        self.phase = TimerPhase::Idle;
        self.notified_for_this_run = false;
    }

    /// Decrements the countdown by one second.
    ///
    /// Returns true if this tick moved the timer into `Finished`.
    pub fn tick(&mut self) -> bool {
        if self.phase != TimerPhase::Running {
            return false;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::Finished;
            self.notified_for_this_run = false;
            return true;
        }
        false
    }

    /// Records that the finish notification went out for this run.
    pub fn mark_notified(&mut self) {
        if self.phase == TimerPhase::Finished {
            self.notified_for_this_run = true;
        }
    }

    /// Fraction of the countdown already elapsed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        let fraction = 1.0 - f64::from(self.remaining_seconds) / f64::from(self.total_seconds);
        fraction.clamp(0.0, 1.0)
    }
}

// ============================================================================
// Snapshot
// ============================================================================

/// Immutable read of the timer handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Seconds left
    #[serde(rename = "remaining")]
    pub remaining_seconds: u32,
    /// Configured countdown length
    #[serde(rename = "totalDuration")]
    pub total_seconds: u32,
    /// Current phase
    pub phase: TimerPhase,
    /// Elapsed fraction in `[0, 1]`
    pub progress: f64,
    /// Current notification permission
    #[serde(rename = "permissionState")]
    pub permission: NotificationPermission,
}

impl Snapshot {
    /// Builds a snapshot from the timer state and the current permission.
    pub fn capture(state: &TimerState, permission: NotificationPermission) -> Self {
        Self {
            remaining_seconds: state.remaining_seconds(),
            total_seconds: state.total_seconds(),
            phase: state.phase(),
            progress: state.progress(),
            permission,
        }
    }

    /// Remaining time as `MM:SS`.
    pub fn clock(&self) -> String {
        format_clock(self.remaining_seconds)
    }
}

/// Formats seconds as zero-padded `MM:SS`.
///
/// Minutes are never truncated: 6000 seconds renders as `100:00`.
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

// ============================================================================
// TimerConfig
// ============================================================================

/// Resolved settings for one timer session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Countdown length in seconds
    pub duration_seconds: u32,
    /// Break instruction used by notifications and alerts
    pub message: String,
    /// Whether to play the audio cue
    pub sound: bool,
    /// Audio file to play instead of the built-in chime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_file: Option<PathBuf>,
    /// Whether the rich notification channel may be used at all
    pub notifications: bool,
    /// Ask for notification permission at startup
    pub request_permission: bool,
    /// Start counting immediately
    pub autostart: bool,
    /// Leave the session after the first finished countdown
    pub exit_on_finish: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            duration_seconds: DEFAULT_DURATION_MINUTES * 60,
            message: DEFAULT_BREAK_MESSAGE.to_string(),
            sound: true,
            sound_file: None,
            notifications: true,
            request_permission: false,
            autostart: false,
            exit_on_finish: false,
        }
    }
}

impl TimerConfig {
    /// Sets the countdown length in minutes.
    pub fn with_minutes(mut self, minutes: u32) -> Self {
        self.duration_seconds = minutes.saturating_mul(60);
        self
    }

    /// Sets the countdown length in seconds.
    pub fn with_seconds(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if self.duration_seconds == 0 {
            return Err("タイマー時間は1秒以上を指定してください".to_string());
        }
        if self.message.trim().is_empty() {
            return Err("休憩メッセージは空にできません".to_string());
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
