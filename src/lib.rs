//! 20-20-20 Timer Library
//!
//! This library provides the core functionality for the 20-20-20 eye-strain
//! break reminder. It includes:
//! - Countdown engine with exactly-once finish notification
//! - Notification gateway (desktop notification, terminal alert, audio cue)
//! - Terminal host driving the engine from user commands
//! - CLI command parsing and display utilities
//! - Type definitions for configuration and state

pub mod cli;
pub mod host;
pub mod notification;
pub mod sound;
pub mod timer;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{NotificationPermission, Snapshot, TimerConfig, TimerPhase, TimerState};

pub use timer::{MockNotifier, Notifier, TimerEngine, TimerError, TimerEvent, TimerUpdate};

pub use notification::{
    AlertPresenter, DesktopNotifier, MockAlertPresenter, MockNotificationSender,
    NotificationError, NotificationGateway, NotificationSender, PermissionRequester,
    PermissionStore, TerminalAlert,
};

pub use sound::{MockSoundPlayer, RodioSoundPlayer, SoundError, SoundPlayer, SoundSource};

pub use host::{run_session, HostCommand, MockRenderer, Renderer, TimerHost};
