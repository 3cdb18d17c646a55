//! Audio cue error types.
//!
//! Audio failures never reach the timer: the notification gateway logs
//! them and carries on.

use std::path::PathBuf;

use thiserror::Error;

/// How the player reacts to a failed cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// The configured file is unusable; play the built-in chime instead
    PlayChime,
    /// Audio output itself failed; skip the cue
    SkipCue,
}

/// Errors from opening the output device or playing a cue.
#[derive(Debug, Error)]
pub enum SoundError {
    #[error("オーディオデバイスが利用できません: {0}")]
    DeviceNotAvailable(String),

    #[error("サウンドファイルを開けません: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("対応していないサウンド形式です: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("サウンドファイルを読み込めません: {0}")]
    DecodeError(String),

    #[error("オーディオ出力を開けません: {0}")]
    StreamError(String),

    #[error("サウンドを再生できません: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns the recovery the player applies for this error.
    #[must_use]
    pub fn recovery(&self) -> Recovery {
        match self {
            Self::FileNotFound(_) | Self::UnsupportedFormat(_) | Self::DecodeError(_) => {
                Recovery::PlayChime
            }
            Self::DeviceNotAvailable(_) | Self::StreamError(_) | Self::PlaybackError(_) => {
                Recovery::SkipCue
            }
        }
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) | Self::StreamError(_) => {
                "音を鳴らさない場合は --no-sound を指定してください"
            }
            Self::FileNotFound(_) => "--sound-file のパスを確認してください。内蔵チャイムを使います",
            Self::UnsupportedFormat(_) => "wav / mp3 / flac / ogg ファイルを指定してください",
            Self::DecodeError(_) => "ファイルが壊れていないか確認してください",
            Self::PlaybackError(_) => "次の休憩でもう一度試します",
        }
    }
}
