//! Notification system error types.
//!
//! None of these errors are fatal: the gateway logs them and falls back to
//! the terminal alert.

use thiserror::Error;

/// Errors that can occur in the notification system.
#[derive(Debug, Error)]
pub enum NotificationError {
    /// Failed to ask for notification permission.
    #[error("通知許可の取得に失敗しました: {0}")]
    AuthorizationFailed(String),

    /// Failed to send a notification.
    #[error("通知の送信に失敗しました: {0}")]
    SendFailed(String),

    /// No notification service is reachable on this system.
    #[error("通知サービスが利用できません: {0}")]
    NotAvailable(String),
}

impl NotificationError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::AuthorizationFailed(_) => {
                "システム設定で通知を許可してから `n` で再度リクエストしてください"
            }
            Self::SendFailed(_) => "通知センターを確認してください",
            Self::NotAvailable(_) => "通知デーモンが起動しているか確認してください",
        }
    }
}
