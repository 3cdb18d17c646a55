//! Production wiring of one interactive timer session.

use std::rc::Rc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::cli::{Display, JsonRenderer, TerminalRenderer};
use crate::notification::{DesktopNotifier, NotificationGateway, PermissionStore, TerminalAlert};
use crate::sound::{resolve_sound, try_create_player};
use crate::timer::TimerEngine;
use crate::types::{NotificationPermission, Snapshot, TimerConfig};

use super::command::HostCommand;
use super::input::spawn_stdin_reader;
use super::TimerHost;

/// Runs one timer session on the terminal until the user quits.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the input reader
/// cannot be started.
pub async fn run_session(config: TimerConfig, json: bool) -> Result<Snapshot> {
    config.validate().map_err(anyhow::Error::msg)?;

    let initial_permission = if config.notifications {
        NotificationPermission::Default
    } else {
        NotificationPermission::Denied
    };

    let player = if config.sound {
        try_create_player()
    } else {
        None
    };

    let sound_source = resolve_sound(config.sound_file.as_deref());
    let gateway = Rc::new(
        NotificationGateway::new(
            DesktopNotifier::new().with_fallback(TerminalAlert),
            TerminalAlert,
            player,
            PermissionStore::new(initial_permission),
        )
        .with_sound_source(sound_source.clone()),
    );

    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let engine = TimerEngine::new(
        config.duration_seconds,
        Box::new(Rc::clone(&gateway)),
        update_tx,
    )?
    .with_message(config.message.clone());

    let (command_tx, command_rx) = mpsc::unbounded_channel();
    if config.notifications && config.request_permission {
        command_tx.send(HostCommand::RequestPermission)?;
    }
    if config.autostart {
        command_tx.send(HostCommand::Start)?;
    }

    spawn_stdin_reader(command_tx.clone()).context("入力の読み取りを開始できませんでした")?;
    spawn_interrupt_forwarder(command_tx);

    debug!(?config, "Session starting");
    let snapshot = if json {
        TimerHost::new(engine, update_rx, gateway, JsonRenderer::stdout())
            .exit_on_finish(config.exit_on_finish)
            .run(command_rx)
            .await
    } else {
        Display::show_session_header(&config, &sound_source);
        let snapshot = TimerHost::new(engine, update_rx, gateway, TerminalRenderer::stdout())
            .exit_on_finish(config.exit_on_finish)
            .run(command_rx)
            .await;
        Display::show_goodbye(&snapshot);
        snapshot
    };

    Ok(snapshot)
}

/// Forwards Ctrl-C to the host as `Quit`.
fn spawn_interrupt_forwarder(commands: mpsc::UnboundedSender<HostCommand>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                debug!("Interrupt received");
                let _ = commands.send(HostCommand::Quit);
            }
            Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}
