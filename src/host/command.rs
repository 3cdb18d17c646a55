//! Line-oriented user commands for the interactive session.

use std::str::FromStr;

use thiserror::Error;

/// One user action forwarded to the timer host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Start or resume the countdown
    Start,
    /// Pause the countdown
    Pause,
    /// Pause when running, start otherwise
    Toggle,
    /// Reset, optionally to a new duration in minutes
    Reset(Option<i64>),
    /// Change the duration in minutes
    Reconfigure(i64),
    /// Ask for desktop notification permission
    RequestPermission,
    /// Show the current state
    Status,
    /// Show the command list
    Help,
    /// Leave the session
    Quit,
}

/// Command reference shown by `help`, as (keys, description).
pub const COMMAND_HELP: &[(&str, &str)] = &[
    ("s, start", "タイマーを開始／再開"),
    ("p, pause", "タイマーを一時停止"),
    ("t, Enter", "開始と一時停止を切り替え"),
    ("r, reset [分]", "タイマーをリセット（時間も変更可）"),
    ("d, duration <分>", "タイマー時間を変更（1-60分）"),
    ("n, notify", "デスクトップ通知の許可をリクエスト"),
    ("?, status", "現在の状態を表示"),
    ("h, help", "このヘルプを表示"),
    ("q, quit", "終了"),
];

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("不明なコマンドです: {0}（h でヘルプを表示）")]
    Unknown(String),

    #[error("{0} には分数を指定してください")]
    MissingArgument(&'static str),

    #[error("数値を指定してください: {0}")]
    InvalidNumber(String),

    #[error("引数が多すぎます: {0}")]
    TooManyArguments(String),
}

impl FromStr for HostCommand {
    type Err = CommandParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(HostCommand::Toggle);
        };
        let argument = words.next();
        if let Some(extra) = words.next() {
            return Err(CommandParseError::TooManyArguments(extra.to_string()));
        }

        let command = match name.to_lowercase().as_str() {
            "s" | "start" => HostCommand::Start,
            "p" | "pause" => HostCommand::Pause,
            "t" | "toggle" => HostCommand::Toggle,
            "r" | "reset" => {
                return Ok(HostCommand::Reset(argument.map(parse_minutes).transpose()?));
            }
            "d" | "duration" => {
                let minutes = argument.ok_or(CommandParseError::MissingArgument("duration"))?;
                return Ok(HostCommand::Reconfigure(parse_minutes(minutes)?));
            }
            "n" | "notify" => HostCommand::RequestPermission,
            "?" | "status" => HostCommand::Status,
            "h" | "help" => HostCommand::Help,
            "q" | "quit" | "exit" => HostCommand::Quit,
            other => return Err(CommandParseError::Unknown(other.to_string())),
        };

        match argument {
            Some(extra) => Err(CommandParseError::TooManyArguments(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn parse_minutes(word: &str) -> Result<i64, CommandParseError> {
    word.parse::<i64>()
        .map_err(|_| CommandParseError::InvalidNumber(word.to_string()))
}
