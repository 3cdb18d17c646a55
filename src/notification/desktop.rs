//! Desktop notifications through `notify-rust`.

use std::sync::Arc;

use notify_rust::{Notification, Timeout};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::types::NotificationPermission;

use super::alert::AlertPresenter;
use super::content::{NotificationContent, APP_NAME};
use super::error::NotificationError;
use super::NotificationSender;

type SharedAlert = Arc<dyn AlertPresenter + Send + Sync>;

/// Sends notifications to the platform notification service.
///
/// Showing a notification is a blocking call on the session bus, so
/// [`send`](NotificationSender::send) hands it to the blocking pool and
/// returns at once. A delivery that fails after that point goes to the
/// fallback alert set with [`with_fallback`](Self::with_fallback).
#[derive(Clone, Default)]
pub struct DesktopNotifier {
    fallback: Option<SharedAlert>,
}

impl DesktopNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the alert shown when background delivery fails.
    #[must_use]
    pub fn with_fallback(mut self, alert: impl AlertPresenter + Send + Sync + 'static) -> Self {
        self.fallback = Some(Arc::new(alert));
        self
    }
}

impl std::fmt::Debug for DesktopNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopNotifier")
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl NotificationSender for DesktopNotifier {
    /// On freedesktop systems permission means a notification server
    /// answers on the session bus. Other platforms prompt on first delivery,
    /// so the request resolves to granted.
    async fn request_permission(&self) -> Result<NotificationPermission, NotificationError> {
        #[cfg(all(unix, not(target_os = "macos")))]
        {
            let info = tokio::task::spawn_blocking(notify_rust::get_server_information)
                .await
                .map_err(|e| NotificationError::AuthorizationFailed(e.to_string()))?
                .map_err(|e| NotificationError::NotAvailable(e.to_string()))?;
            debug!(
                server = %info.name,
                vendor = %info.vendor,
                version = %info.version,
                "Notification server found"
            );
        }

        Ok(NotificationPermission::Granted)
    }

    /// Queues the notification on the blocking pool.
    ///
    /// Fails only when no tokio runtime is running, in which case the caller
    /// shows its own fallback.
    fn send(&self, content: &NotificationContent) -> Result<(), NotificationError> {
        let handle =
            Handle::try_current().map_err(|e| NotificationError::SendFailed(e.to_string()))?;

        let shown = content.clone();
        let task = handle.spawn_blocking(move || show_desktop(&shown));

        let content = content.clone();
        let fallback = self.fallback.clone();
        handle.spawn(async move {
            let result = task
                .await
                .unwrap_or_else(|e| Err(NotificationError::SendFailed(e.to_string())));
            finish_delivery(result, &content, fallback.as_deref());
        });

        debug!("Desktop notification queued");
        Ok(())
    }
}

fn show_desktop(content: &NotificationContent) -> Result<(), NotificationError> {
    Notification::new()
        .appname(APP_NAME)
        .summary(&content.title)
        .body(&content.body)
        .timeout(Timeout::Default)
        .show()
        .map(|_| ())
        .map_err(|e| NotificationError::SendFailed(e.to_string()))
}

/// Logs the outcome of a background delivery and alerts on failure.
fn finish_delivery<A>(
    result: Result<(), NotificationError>,
    content: &NotificationContent,
    fallback: Option<&A>,
) where
    A: AlertPresenter + ?Sized,
{
    let Err(e) = result else {
        debug!("Desktop notification shown");
        return;
    };

    warn!("{}。{}", e, e.suggestion());
    let Some(alert) = fallback else {
        return;
    };
    if let Err(e) = alert.alert(&content.title, &content.body) {
        warn!("Failed to show alert: {}", e);
    }
}
