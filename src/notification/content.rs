//! Notification content construction.

/// Application name reported to the notification server.
pub const APP_NAME: &str = "twenty-twenty";

/// Title used for the break reminder.
pub const BREAK_TITLE: &str = "👀 20-20-20 休憩タイム";

/// Maximum length for break messages in notifications.
const MAX_MESSAGE_LENGTH: usize = 200;

/// Title and body of one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

/// Builder for constructing notification content.
#[derive(Debug, Default)]
pub struct NotificationContentBuilder {
    title: String,
    body: String,
}

impl NotificationContentBuilder {
    /// Creates a new notification content builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the notification title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Sets the notification body text.
    #[must_use]
    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Builds and returns the notification content.
    #[must_use]
    pub fn build(self) -> NotificationContent {
        NotificationContent {
            title: self.title,
            body: self.body,
        }
    }
}

/// Sanitizes a break message for use in notifications.
///
/// Returns None if nothing printable remains.
pub fn sanitize_message(message: &str) -> Option<String> {
    let sanitized: String = message
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_MESSAGE_LENGTH)
        .collect();
    let trimmed = sanitized.trim();

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Creates the break reminder content for a finished countdown.
#[must_use]
pub fn create_break_reminder_content(message: &str) -> NotificationContent {
    NotificationContentBuilder::new()
        .title(BREAK_TITLE)
        .body(message)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let content = NotificationContentBuilder::new()
            .title("title")
            .body("body")
            .build();
        assert_eq!(content.title, "title");
        assert_eq!(content.body, "body");
    }

    #[test]
    fn test_break_reminder_content() {
        let content = create_break_reminder_content("遠くを見ましょう");
        assert_eq!(content.title, BREAK_TITLE);
        assert_eq!(content.body, "遠くを見ましょう");
    }

    #[test]
    fn test_sanitize_message_valid() {
        assert_eq!(
            sanitize_message("目を休めましょう"),
            Some("目を休めましょう".to_string())
        );
    }

    #[test]
    fn test_sanitize_message_truncates_long() {
        let long = "a".repeat(300);
        let result = sanitize_message(&long).unwrap();
        assert_eq!(result.chars().count(), MAX_MESSAGE_LENGTH);
    }

    #[test]
    fn test_sanitize_message_removes_control_chars() {
        assert_eq!(
            sanitize_message("look\n\r\taway"),
            Some("lookaway".to_string())
        );
    }

    #[test]
    fn test_sanitize_message_empty() {
        assert!(sanitize_message("").is_none());
        assert!(sanitize_message("\n\t").is_none());
        assert!(sanitize_message("   ").is_none());
    }
}
