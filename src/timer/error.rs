//! Timer engine error types.

use thiserror::Error;

/// Errors returned by timer reconfiguration.
///
/// A rejected operation never mutates the timer state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Duration was zero, negative, or too large.
    #[error("無効なタイマー時間です: {0}秒（1秒以上を指定してください）")]
    InvalidDuration(i64),

    /// Duration changes are not accepted while counting down.
    #[error("実行中のタイマーの時間は変更できません")]
    ReconfigureWhileRunning,
}

impl TimerError {
    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::InvalidDuration(_) => "1以上の値を入力してください",
            Self::ReconfigureWhileRunning => "一時停止するかリセットしてから変更してください",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TimerError::InvalidDuration(-5);
        assert!(err.to_string().contains("-5"));

        let err = TimerError::ReconfigureWhileRunning;
        assert!(err.to_string().contains("実行中"));
    }

    #[test]
    fn test_suggestion() {
        assert!(TimerError::ReconfigureWhileRunning
            .suggestion()
            .contains("一時停止"));
    }
}
