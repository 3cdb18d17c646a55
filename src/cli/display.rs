//! Display utilities for the 20-20-20 timer CLI.
//!
//! This module provides formatted output for:
//! - Error messages
//! - Session header and summary
//! - The live status line (`TerminalRenderer`)
//! - Machine-readable updates (`JsonRenderer`)

use std::io::{self, Write};

use serde_json::json;
use tracing::debug;

use crate::host::{Renderer, COMMAND_HELP};
use crate::timer::{TimerEvent, TimerUpdate};
use crate::sound::SoundSource;
use crate::types::{format_clock, NotificationPermission, Snapshot, TimerConfig};

/// Width of the progress bar in the status line.
pub const PROGRESS_BAR_WIDTH: usize = 20;

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Shows the session header.
    pub fn show_session_header(config: &TimerConfig, sound: &SoundSource) {
        println!("20-20-20 タイマー");
        println!("─────────────────────────────");
        println!("タイマー時間: {}", format_clock(config.duration_seconds));
        println!(
            "デスクトップ通知: {}",
            if config.notifications { "有効" } else { "無効" }
        );
        println!("音: {}", sound_label(config, sound));
        println!("h でコマンド一覧を表示します");
        println!();
    }

    /// Shows the summary printed when the session ends.
    pub fn show_goodbye(snapshot: &Snapshot) {
        println!();
        println!(
            "終了しました（{} / 残り {}）",
            snapshot.phase.label(),
            snapshot.clock()
        );
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("エラー: {}", message);
    }
}

/// Describes the break cue for the session header.
pub fn sound_label(config: &TimerConfig, sound: &SoundSource) -> String {
    if !config.sound {
        return "無効".to_string();
    }
    sound
        .path()
        .map_or_else(|| "内蔵チャイム".to_string(), |path| path.display().to_string())
}

/// Renders `[####----]` for a progress fraction.
pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = (progress.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

/// Formats the one-line status: phase, clock, progress bar and percentage.
pub fn status_line(snapshot: &Snapshot) -> String {
    format!(
        "{} {} {} {:>3}%",
        snapshot.phase.label(),
        snapshot.clock(),
        progress_bar(snapshot.progress, PROGRESS_BAR_WIDTH),
        (snapshot.progress * 100.0).round() as u32
    )
}

fn event_message(update: &TimerUpdate) -> Option<String> {
    let message = match update.event {
        TimerEvent::Mounted | TimerEvent::Tick => return None,
        TimerEvent::Started => "▶ タイマーを開始しました".to_string(),
        TimerEvent::Resumed => "▶ タイマーを再開しました".to_string(),
        TimerEvent::Paused => "|| タイマーを一時停止しました".to_string(),
        TimerEvent::Reset => "↺ タイマーをリセットしました".to_string(),
        TimerEvent::Reconfigured => format!(
            "⚙ タイマー時間を {} に変更しました",
            format_clock(update.snapshot.total_seconds)
        ),
        TimerEvent::Finished => "✔ 休憩の時間です（s で次のタイマーを開始）".to_string(),
        TimerEvent::Refreshed => format!(
            "状態: {} / 残り {} / 通知: {}",
            update.snapshot.phase.label(),
            update.snapshot.clock(),
            update.snapshot.permission.label()
        ),
    };
    Some(message)
}

// ============================================================================
// TerminalRenderer
// ============================================================================

/// Human-readable renderer: a carriage-return status line plus one line
/// per transition.
#[derive(Debug)]
pub struct TerminalRenderer<W: Write> {
    out: W,
    status_shown: bool,
}

impl TerminalRenderer<io::Stdout> {
    /// Creates a renderer writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            status_shown: false,
        }
    }

    /// Returns the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn message(&mut self, message: &str) {
        let result = self.end_status().and_then(|()| writeln!(self.out, "{}", message));
        self.finish(result);
    }

    fn status(&mut self, snapshot: &Snapshot) {
        let result = write!(self.out, "\r\x1b[K{}", status_line(snapshot));
        self.status_shown = true;
        self.finish(result);
    }

    fn end_status(&mut self) -> io::Result<()> {
        if self.status_shown {
            self.status_shown = false;
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn finish(&mut self, result: io::Result<()>) {
        if let Err(e) = result.and_then(|()| self.out.flush()) {
            debug!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, update: &TimerUpdate) {
        if let Some(message) = event_message(update) {
            self.message(&message);
        }
        self.status(&update.snapshot);
    }

    fn permission_changed(&mut self, permission: NotificationPermission, snapshot: &Snapshot) {
        let message = match permission {
            NotificationPermission::Granted => "デスクトップ通知が許可されました",
            NotificationPermission::Denied => {
                "デスクトップ通知を利用できません。ターミナルのアラートで通知します"
            }
            NotificationPermission::Default => "デスクトップ通知の許可は未確認です",
        };
        self.message(message);
        self.status(snapshot);
    }

    fn rejected(&mut self, reason: &str) {
        self.message(&format!("エラー: {}", reason));
    }

    fn help(&mut self) {
        let mut text = String::from("コマンド一覧:");
        for (keys, description) in COMMAND_HELP {
            text.push_str(&format!("\n  {:<18} {}", keys, description));
        }
        self.message(&text);
    }
}

// ============================================================================
// JsonRenderer
// ============================================================================

/// Machine-readable renderer: one JSON object per line.
#[derive(Debug)]
pub struct JsonRenderer<W: Write> {
    out: W,
}

impl JsonRenderer<io::Stdout> {
    /// Creates a renderer writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.out
    }

    fn line<T: serde::Serialize>(&mut self, value: &T) {
        let result = serde_json::to_writer(&mut self.out, value)
            .map_err(io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            debug!("Failed to write JSON line: {}", e);
        }
    }
}

impl<W: Write> Renderer for JsonRenderer<W> {
    fn render(&mut self, update: &TimerUpdate) {
        self.line(update);
    }

    fn permission_changed(&mut self, permission: NotificationPermission, snapshot: &Snapshot) {
        self.line(&json!({
            "event": "permission",
            "permission": permission,
            "snapshot": snapshot,
        }));
    }

    fn rejected(&mut self, reason: &str) {
        self.line(&json!({ "event": "rejected", "reason": reason }));
    }

    fn help(&mut self) {
        let commands: Vec<_> = COMMAND_HELP
            .iter()
            .map(|(keys, description)| json!({ "keys": keys, "description": description }))
            .collect();
        self.line(&json!({ "event": "help", "commands": commands }));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TimerPhase;

    fn snapshot(remaining: u32, total: u32, phase: TimerPhase) -> Snapshot {
        Snapshot {
            remaining_seconds: remaining,
            total_seconds: total,
            phase,
            progress: 1.0 - f64::from(remaining) / f64::from(total),
            permission: NotificationPermission::Default,
        }
    }

    fn update(event: TimerEvent, snapshot: Snapshot) -> TimerUpdate {
        TimerUpdate { event, snapshot }
    }

    // ------------------------------------------------------------------------
    // Status Line Tests
    // ------------------------------------------------------------------------

    mod status_line_tests {
        use super::*;

        #[test]
        fn test_progress_bar_empty() {
            assert_eq!(progress_bar(0.0, 4), "[----]");
        }

        #[test]
        fn test_progress_bar_full() {
            assert_eq!(progress_bar(1.0, 4), "[####]");
        }

        #[test]
        fn test_progress_bar_clamps() {
            assert_eq!(progress_bar(1.7, 4), "[####]");
            assert_eq!(progress_bar(-0.5, 4), "[----]");
        }

        #[test]
        fn test_progress_bar_partial() {
            assert_eq!(progress_bar(0.5, 10), "[#####-----]");
        }

        #[test]
        fn test_status_line() {
            let line = status_line(&snapshot(720, 1200, TimerPhase::Running));
            assert_eq!(line, "実行中 12:00 [########------------]  40%");
        }

        #[test]
        fn test_sound_label() {
            let config = TimerConfig::default();
            assert_eq!(sound_label(&config, &SoundSource::chime()), "内蔵チャイム");
            assert_eq!(
                sound_label(&config, &SoundSource::file("/sounds/bell.wav")),
                "/sounds/bell.wav"
            );

            let muted = TimerConfig {
                sound: false,
                ..TimerConfig::default()
            };
            assert_eq!(sound_label(&muted, &SoundSource::chime()), "無効");
        }

        #[test]
        fn test_status_line_finished() {
            let line = status_line(&snapshot(0, 60, TimerPhase::Finished));
            assert!(line.starts_with("完了 00:00"));
            assert!(line.ends_with("100%"));
        }
    }

    // ------------------------------------------------------------------------
    // TerminalRenderer Tests
    // ------------------------------------------------------------------------

    mod terminal_renderer_tests {
        use super::*;

        fn output(renderer: &TerminalRenderer<Vec<u8>>) -> String {
            String::from_utf8(renderer.get_ref().clone()).unwrap()
        }

        #[test]
        fn test_tick_rewrites_status_line() {
            let mut renderer = TerminalRenderer::new(Vec::new());
            renderer.render(&update(
                TimerEvent::Tick,
                snapshot(59, 60, TimerPhase::Running),
            ));
            renderer.render(&update(
                TimerEvent::Tick,
                snapshot(58, 60, TimerPhase::Running),
            ));

            let out = output(&renderer);
            assert!(!out.contains('\n'));
            assert_eq!(out.matches('\r').count(), 2);
            assert!(out.ends_with(&status_line(&snapshot(58, 60, TimerPhase::Running))));
        }

        #[test]
        fn test_transition_prints_message_line() {
            let mut renderer = TerminalRenderer::new(Vec::new());
            renderer.render(&update(
                TimerEvent::Mounted,
                snapshot(60, 60, TimerPhase::Idle),
            ));
            renderer.render(&update(
                TimerEvent::Started,
                snapshot(60, 60, TimerPhase::Running),
            ));

            let out = output(&renderer);
            assert!(out.contains("\n▶ タイマーを開始しました\n"));
        }

        #[test]
        fn test_reconfigured_mentions_duration() {
            let mut renderer = TerminalRenderer::new(Vec::new());
            renderer.render(&update(
                TimerEvent::Reconfigured,
                snapshot(300, 300, TimerPhase::Idle),
            ));
            assert!(output(&renderer).contains("05:00 に変更しました"));
        }

        #[test]
        fn test_rejected_and_help() {
            let mut renderer = TerminalRenderer::new(Vec::new());
            renderer.rejected("だめです");
            renderer.help();

            let out = output(&renderer);
            assert!(out.contains("エラー: だめです"));
            assert!(out.contains("コマンド一覧"));
            assert!(out.contains("q, quit"));
        }

        #[test]
        fn test_permission_changed() {
            let mut renderer = TerminalRenderer::new(Vec::new());
            renderer.permission_changed(
                NotificationPermission::Granted,
                &snapshot(60, 60, TimerPhase::Idle),
            );
            assert!(output(&renderer).contains("許可されました"));
        }
    }

    // ------------------------------------------------------------------------
    // JsonRenderer Tests
    // ------------------------------------------------------------------------

    mod json_renderer_tests {
        use super::*;

        fn lines(renderer: &JsonRenderer<Vec<u8>>) -> Vec<serde_json::Value> {
            String::from_utf8(renderer.get_ref().clone())
                .unwrap()
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }

        #[test]
        fn test_update_line() {
            let mut renderer = JsonRenderer::new(Vec::new());
            renderer.render(&update(
                TimerEvent::Tick,
                snapshot(30, 60, TimerPhase::Running),
            ));

            let lines = lines(&renderer);
            assert_eq!(lines.len(), 1);
            assert_eq!(lines[0]["event"], "tick");
            assert_eq!(lines[0]["snapshot"]["remaining"], 30);
            assert_eq!(lines[0]["snapshot"]["totalDuration"], 60);
            assert_eq!(lines[0]["snapshot"]["phase"], "running");
            assert_eq!(lines[0]["snapshot"]["progress"], 0.5);
        }

        #[test]
        fn test_permission_and_rejection_lines() {
            let mut renderer = JsonRenderer::new(Vec::new());
            renderer.permission_changed(
                NotificationPermission::Denied,
                &snapshot(60, 60, TimerPhase::Idle),
            );
            renderer.rejected("nope");

            let lines = lines(&renderer);
            assert_eq!(lines[0]["event"], "permission");
            assert_eq!(lines[0]["permission"], "denied");
            assert_eq!(lines[1]["event"], "rejected");
            assert_eq!(lines[1]["reason"], "nope");
        }

        #[test]
        fn test_help_line_lists_commands() {
            let mut renderer = JsonRenderer::new(Vec::new());
            renderer.help();

            let lines = lines(&renderer);
            let commands = lines[0]["commands"].as_array().unwrap();
            assert_eq!(commands.len(), COMMAND_HELP.len());
        }
    }
}
