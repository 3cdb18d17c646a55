//! Break reminder delivery.
//!
//! This module turns a finished countdown into something the user notices:
//!
//! - A desktop notification when permission has been granted
//! - A terminal alert when it has not, or when sending fails
//! - A short audio cue in every case
//!
//! # Example
//!
//! ```rust,no_run
//! use twenty_twenty::notification::{
//!     DesktopNotifier, NotificationGateway, PermissionStore, TerminalAlert,
//! };
//! use twenty_twenty::sound::try_create_player;
//! use twenty_twenty::types::NotificationPermission;
//!
//! # async fn demo() {
//! let gateway = NotificationGateway::new(
//!     DesktopNotifier::new().with_fallback(TerminalAlert),
//!     TerminalAlert,
//!     try_create_player(),
//!     PermissionStore::new(NotificationPermission::Default),
//! );
//!
//! let permission = gateway.request_permission().await;
//! gateway.notify_finished("20フィート先を20秒間見ましょう");
//! # let _ = permission;
//! # }
//! ```

mod alert;
mod content;
mod desktop;
pub mod error;
mod permission;

use tracing::{debug, warn};

pub use self::alert::{render_alert, AlertPresenter, MockAlertPresenter, TerminalAlert};
pub use self::content::{
    create_break_reminder_content, sanitize_message, NotificationContent,
    NotificationContentBuilder, APP_NAME, BREAK_TITLE,
};
pub use self::desktop::DesktopNotifier;
pub use self::error::NotificationError;
pub use self::permission::PermissionStore;

use crate::sound::{SoundPlayer, SoundSource};
use crate::timer::Notifier;
use crate::types::NotificationPermission;

// ============================================================================
// Channel traits
// ============================================================================

/// Rich notification channel.
#[allow(async_fn_in_trait)]
pub trait NotificationSender {
    /// Asks the user (or platform) for permission to show notifications.
    async fn request_permission(&self) -> Result<NotificationPermission, NotificationError>;

    /// Shows a notification.
    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError>;
}

/// Anything that can run the user-driven permission request.
#[allow(async_fn_in_trait)]
pub trait PermissionRequester {
    async fn request_permission(&self) -> NotificationPermission;
}

// ============================================================================
// NotificationGateway
// ============================================================================

/// Dispatches the break reminder through the best available channel.
///
/// The gateway keeps no record of what it has sent. Calling
/// [`notify_finished`] twice shows two reminders; the timer engine is what
/// guarantees one call per finished countdown.
///
/// [`notify_finished`]: NotificationGateway::notify_finished
pub struct NotificationGateway<N, A, S> {
    sender: N,
    alert: A,
    sound: Option<S>,
    sound_source: SoundSource,
    permissions: PermissionStore,
}

impl<N, A, S> NotificationGateway<N, A, S>
where
    N: NotificationSender,
    A: AlertPresenter,
    S: SoundPlayer,
{
    /// Creates a gateway. Pass `None` as `sound` to skip the audio cue.
    pub fn new(sender: N, alert: A, sound: Option<S>, permissions: PermissionStore) -> Self {
        Self {
            sender,
            alert,
            sound,
            sound_source: SoundSource::default(),
            permissions,
        }
    }

    /// Sets the audio cue played on every reminder.
    #[must_use]
    pub fn with_sound_source(mut self, source: SoundSource) -> Self {
        self.sound_source = source;
        self
    }

    /// Returns the current permission without side effects.
    pub fn permission_state(&self) -> NotificationPermission {
        self.permissions.get()
    }

    /// Asks for notification permission and records the answer.
    ///
    /// Failures are logged and reported as `Denied`; they never propagate.
    pub async fn request_permission(&self) -> NotificationPermission {
        let current = self.permissions.get();
        if current.is_granted() {
            debug!("Notification permission already granted");
            return current;
        }

        let permission = match self.sender.request_permission().await {
            Ok(permission) => permission,
            Err(e) => {
                warn!("{}。{}", e, e.suggestion());
                NotificationPermission::Denied
            }
        };

        debug!(permission = permission.as_str(), "Notification permission updated");
        self.permissions.set(permission);
        permission
    }

    /// Shows the break reminder and plays the audio cue.
    ///
    /// Uses a desktop notification when permission is granted, falling back
    /// to the terminal alert when it is not or when sending fails. Audio
    /// failures are logged and ignored.
    pub fn notify_finished(&self, message: &str) {
        let content = create_break_reminder_content(message);
        let permission = self.permissions.get();

        if permission.is_granted() {
            match self.sender.send(&content) {
                Ok(()) => debug!("Break reminder sent as desktop notification"),
                Err(e) => {
                    warn!("{}、アラートで通知します", e);
                    self.show_alert(&content);
                }
            }
        } else {
            debug!(
                permission = permission.as_str(),
                "Notification permission not granted, using alert"
            );
            self.show_alert(&content);
        }

        self.play_cue();
    }

    fn show_alert(&self, content: &NotificationContent) {
        if let Err(e) = self.alert.alert(&content.title, &content.body) {
            warn!("Failed to show alert: {}", e);
        }
    }

    fn play_cue(&self) {
        let Some(player) = &self.sound else {
            return;
        };
        if !player.is_available() {
            debug!("Audio output unavailable, skipping break cue");
            return;
        }
        if let Err(e) = player.play(&self.sound_source) {
            warn!("{}。{}", e, e.suggestion());
        }
    }

    pub fn sender(&self) -> &N {
        &self.sender
    }

    pub fn alert(&self) -> &A {
        &self.alert
    }

    pub fn sound(&self) -> Option<&S> {
        self.sound.as_ref()
    }
}

impl<N, A, S> Notifier for NotificationGateway<N, A, S>
where
    N: NotificationSender,
    A: AlertPresenter,
    S: SoundPlayer,
{
    fn notify_finished(&self, message: &str) {
        NotificationGateway::notify_finished(self, message)
    }

    fn permission_state(&self) -> NotificationPermission {
        NotificationGateway::permission_state(self)
    }
}

impl<N, A, S> PermissionRequester for NotificationGateway<N, A, S>
where
    N: NotificationSender,
    A: AlertPresenter,
    S: SoundPlayer,
{
    async fn request_permission(&self) -> NotificationPermission {
        NotificationGateway::request_permission(self).await
    }
}

// ============================================================================
// MockNotificationSender
// ============================================================================

/// Mock notification channel for testing.
#[derive(Debug)]
pub struct MockNotificationSender {
    notifications: std::sync::Mutex<Vec<NotificationContent>>,
    permission_response: std::sync::Mutex<Option<NotificationPermission>>,
    permission_requests: std::sync::atomic::AtomicUsize,
    should_fail: std::sync::atomic::AtomicBool,
}

impl Default for MockNotificationSender {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNotificationSender {
    /// Creates a mock that grants permission when asked.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notifications: std::sync::Mutex::new(Vec::new()),
            permission_response: std::sync::Mutex::new(Some(NotificationPermission::Granted)),
            permission_requests: std::sync::atomic::AtomicUsize::new(0),
            should_fail: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Sets the answer to permission requests; `None` makes the request fail.
    pub fn set_permission_response(&self, response: Option<NotificationPermission>) {
        *self.permission_response.lock().unwrap() = response;
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    /// Number of attempted sends, failed ones included.
    #[must_use]
    pub fn notification_count(&self) -> usize {
        self.notifications.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_notifications(&self) -> Vec<NotificationContent> {
        self.notifications.lock().unwrap().clone()
    }

    #[must_use]
    pub fn permission_request_count(&self) -> usize {
        self.permission_requests
            .load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl NotificationSender for MockNotificationSender {
    async fn request_permission(&self) -> Result<NotificationPermission, NotificationError> {
        self.permission_requests
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        let response = *self.permission_response.lock().unwrap();
        response.ok_or_else(|| NotificationError::NotAvailable("Mock failure".to_string()))
    }

    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        self.notifications.lock().unwrap().push(content.clone());
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(NotificationError::SendFailed("Mock failure".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
