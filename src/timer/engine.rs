//! Countdown engine for the 20-20-20 timer.
//!
//! This module provides the core timer functionality:
//! - State transitions (Idle → Running ⇄ Paused → Finished)
//! - One-second countdown steps driven by the host's ticker
//! - Exactly one finish notification per completed countdown
//! - Snapshot events for renderers

use std::rc::Rc;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::types::{NotificationPermission, Snapshot, TimerPhase, TimerState, DEFAULT_BREAK_MESSAGE};

use super::error::TimerError;

// ============================================================================
// Notifier
// ============================================================================

/// Receiver of the "countdown reached zero" event.
pub trait Notifier {
    /// Delivers the break reminder. Must not fail or block the engine.
    fn notify_finished(&self, message: &str);

    /// Returns the current notification permission, for snapshots.
    fn permission_state(&self) -> NotificationPermission;
}

impl<T: Notifier + ?Sized> Notifier for Rc<T> {
    fn notify_finished(&self, message: &str) {
        (**self).notify_finished(message)
    }

    fn permission_state(&self) -> NotificationPermission {
        (**self).permission_state()
    }
}

/// Mock notifier for testing.
#[derive(Debug, Default)]
pub struct MockNotifier {
    messages: Mutex<Vec<String>>,
    permission: Mutex<NotificationPermission>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_permission(&self, permission: NotificationPermission) {
        *self.permission.lock().unwrap() = permission;
    }

    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.messages.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for MockNotifier {
    fn notify_finished(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn permission_state(&self) -> NotificationPermission {
        *self.permission.lock().unwrap()
    }
}

// ============================================================================
// TimerEvent
// ============================================================================

/// What caused a snapshot to be emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerEvent {
    /// Engine created
    Mounted,
    /// Countdown started from Idle or Finished
    Started,
    /// Countdown resumed from Paused
    Resumed,
    /// Countdown paused
    Paused,
    /// Countdown reset to a full, idle countdown
    Reset,
    /// Duration changed
    Reconfigured,
    /// One second elapsed
    Tick,
    /// Countdown reached zero and the reminder was dispatched
    Finished,
    /// Host asked for the current state
    Refreshed,
}

/// A snapshot together with the event that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerUpdate {
    pub event: TimerEvent,
    pub snapshot: Snapshot,
}

// ============================================================================
// TimerEngine
// ============================================================================

/// Checks that a duration is a positive number of seconds that fits the state.
pub fn validate_duration(seconds: i64) -> Result<u32, TimerError> {
    u32::try_from(seconds)
        .ok()
        .filter(|seconds| *seconds >= 1)
        .ok_or(TimerError::InvalidDuration(seconds))
}

/// Timer engine that owns the countdown state and fires the finish reminder.
///
/// The engine never schedules anything itself; the host calls [`tick`]
/// once per elapsed second while the phase is `Running`.
///
/// [`tick`]: TimerEngine::tick
pub struct TimerEngine {
    state: TimerState,
    message: String,
    notifier: Box<dyn Notifier>,
    event_tx: mpsc::UnboundedSender<TimerUpdate>,
}

impl TimerEngine {
    /// Creates an idle engine for the given duration.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidDuration` if `total_seconds` is zero.
    pub fn new(
        total_seconds: u32,
        notifier: Box<dyn Notifier>,
        event_tx: mpsc::UnboundedSender<TimerUpdate>,
    ) -> Result<Self, TimerError> {
        let total_seconds = validate_duration(i64::from(total_seconds))?;
        let engine = Self {
            state: TimerState::new(total_seconds),
            message: DEFAULT_BREAK_MESSAGE.to_string(),
            notifier,
            event_tx,
        };
        engine.emit(TimerEvent::Mounted);
        Ok(engine)
    }

    /// Replaces the break instruction passed to the notifier.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Starts the countdown.
    ///
    /// Accepted from `Idle`, `Paused` and `Finished`; a finished countdown
    /// restarts from its full duration. Returns false when already running.
    pub fn start(&mut self) -> bool {
        let previous = self.state.phase();
        if !previous.can_start() {
            debug!("Start ignored, timer already running");
            return false;
        }

        self.state.start();
        let event = if previous == TimerPhase::Paused {
            TimerEvent::Resumed
        } else {
            TimerEvent::Started
        };
        debug!(from = previous.as_str(), "Timer started");
        self.emit(event);
        true
    }

    /// Pauses a running countdown. Returns false (no-op) from any other phase.
    pub fn pause(&mut self) -> bool {
        if !self.state.is_running() {
            debug!(phase = self.state.phase().as_str(), "Pause ignored");
            return false;
        }

        self.state.pause();
        debug!(remaining = self.state.remaining_seconds(), "Timer paused");
        self.emit(TimerEvent::Paused);
        true
    }

    /// Pauses when running, starts otherwise.
    pub fn toggle(&mut self) -> bool {
        if self.state.is_running() {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Advances the countdown by one second.
    ///
    /// Ignored unless running. Returns true when this tick finished the
    /// countdown; the reminder has already been dispatched by then.
    pub fn tick(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }

        let finished = self.state.tick();
        if finished {
            self.dispatch_finished();
            self.emit(TimerEvent::Finished);
        } else {
            self.emit(TimerEvent::Tick);
        }
        finished
    }

    fn dispatch_finished(&mut self) {
        if self.state.notified_for_this_run() {
            return;
        }
        debug!("Countdown finished, dispatching reminder");
        self.notifier.notify_finished(&self.message);
        self.state.mark_notified();
    }

    /// Returns to a full, idle countdown, optionally with a new duration.
    ///
    /// # Errors
    ///
    /// Returns `TimerError::InvalidDuration` for a non-positive duration;
    /// the state is left unchanged.
    pub fn reset(&mut self, duration_seconds: Option<i64>) -> Result<(), TimerError> {
        let duration = duration_seconds.map(validate_duration).transpose()?;

        self.state.reset(duration);
        debug!(total = self.state.total_seconds(), "Timer reset");
        self.emit(TimerEvent::Reset);
        Ok(())
    }

    /// Changes the countdown length.
    ///
    /// Outside `Running` the countdown is also reset to the new length.
    ///
    /// # Errors
    ///
    /// - `TimerError::InvalidDuration` for a non-positive duration
    /// - `TimerError::ReconfigureWhileRunning` while counting down
    pub fn reconfigure(&mut self, duration_seconds: i64) -> Result<(), TimerError> {
        let duration = validate_duration(duration_seconds)?;
        if self.state.is_running() {
            return Err(TimerError::ReconfigureWhileRunning);
        }

        self.state.reset(Some(duration));
        debug!(total = duration, "Timer reconfigured");
        self.emit(TimerEvent::Reconfigured);
        Ok(())
    }

    /// Emits the current snapshot without changing state.
    pub fn refresh(&self) {
        self.emit(TimerEvent::Refreshed);
    }

    /// Returns a snapshot of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state, self.notifier.permission_state())
    }

    /// Returns a reference to the current timer state.
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Returns true if the countdown is running.
    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Returns the break instruction.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn emit(&self, event: TimerEvent) {
        let update = TimerUpdate {
            event,
            snapshot: self.snapshot(),
        };
        if self.event_tx.send(update).is_err() {
            debug!(?event, "No renderer attached, update dropped");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
