//! Terminal host driving the timer engine.
//!
//! This module provides:
//! - `command`: line-oriented user commands
//! - `input`: stdin command reader
//! - `session`: wiring of the production gateway, renderer and host
//!
//! The host owns the engine, the tick handle and at most one in-flight
//! permission request, and multiplexes them with user commands in a
//! single-threaded `select!` loop.

pub mod command;
pub mod input;
pub mod session;

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::notification::PermissionRequester;
use crate::timer::{next_tick, Ticker, TimerEngine, TimerError, TimerUpdate};
use crate::types::{NotificationPermission, Snapshot, MAX_DURATION_MINUTES};

pub use command::{CommandParseError, HostCommand, COMMAND_HELP};
pub use input::{read_commands, spawn_stdin_reader};
pub use session::run_session;

// ============================================================================
// Renderer
// ============================================================================

/// Presentation of engine updates and host feedback.
pub trait Renderer {
    /// Shows one engine update.
    fn render(&mut self, update: &TimerUpdate);

    /// Shows the outcome of a permission request.
    fn permission_changed(&mut self, permission: NotificationPermission, snapshot: &Snapshot);

    /// Reports a command the host or engine refused.
    fn rejected(&mut self, reason: &str);

    /// Shows the command reference.
    fn help(&mut self);
}

/// What a [`MockRenderer`] was asked to show.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderRecord {
    Update(TimerUpdate),
    Permission(NotificationPermission),
    Rejected(String),
    Help,
}

/// Mock renderer for testing. Clones share one log.
#[derive(Debug, Clone, Default)]
pub struct MockRenderer {
    records: Rc<RefCell<Vec<RenderRecord>>>,
}

impl MockRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> Vec<RenderRecord> {
        self.records.borrow().clone()
    }

    /// Returns only the engine updates, in order.
    #[must_use]
    pub fn updates(&self) -> Vec<TimerUpdate> {
        self.records
            .borrow()
            .iter()
            .filter_map(|record| match record {
                RenderRecord::Update(update) => Some(update.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn rejections(&self) -> Vec<String> {
        self.records
            .borrow()
            .iter()
            .filter_map(|record| match record {
                RenderRecord::Rejected(reason) => Some(reason.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Renderer for MockRenderer {
    fn render(&mut self, update: &TimerUpdate) {
        self.records
            .borrow_mut()
            .push(RenderRecord::Update(update.clone()));
    }

    fn permission_changed(&mut self, permission: NotificationPermission, _snapshot: &Snapshot) {
        self.records
            .borrow_mut()
            .push(RenderRecord::Permission(permission));
    }

    fn rejected(&mut self, reason: &str) {
        self.records
            .borrow_mut()
            .push(RenderRecord::Rejected(reason.to_string()));
    }

    fn help(&mut self) {
        self.records.borrow_mut().push(RenderRecord::Help);
    }
}

// ============================================================================
// TimerHost
// ============================================================================

type PermissionRequest = Pin<Box<dyn Future<Output = NotificationPermission>>>;

/// Converts user-entered minutes to engine seconds.
///
/// Durations above the maximum are refused here; non-positive values are
/// passed through for the engine to reject.
pub fn minutes_to_seconds(minutes: i64) -> Result<i64, String> {
    if minutes > i64::from(MAX_DURATION_MINUTES) {
        return Err(format!(
            "タイマー時間は{}分以内で指定してください: {}",
            MAX_DURATION_MINUTES, minutes
        ));
    }
    Ok(minutes.saturating_mul(60))
}

/// Event loop owning one engine, one gateway handle and one renderer.
pub struct TimerHost<G, R> {
    engine: TimerEngine,
    updates: mpsc::UnboundedReceiver<TimerUpdate>,
    gateway: Rc<G>,
    renderer: R,
    exit_on_finish: bool,
}

impl<G, R> TimerHost<G, R>
where
    G: PermissionRequester + 'static,
    R: Renderer,
{
    /// Creates a host around an engine and the receiver of its updates.
    pub fn new(
        engine: TimerEngine,
        updates: mpsc::UnboundedReceiver<TimerUpdate>,
        gateway: Rc<G>,
        renderer: R,
    ) -> Self {
        Self {
            engine,
            updates,
            gateway,
            renderer,
            exit_on_finish: false,
        }
    }

    /// Ends the loop once the countdown finishes.
    #[must_use]
    pub fn exit_on_finish(mut self, exit: bool) -> Self {
        self.exit_on_finish = exit;
        self
    }

    /// Runs until `Quit`, until every command sender is dropped, or until
    /// the countdown finishes when `exit_on_finish` is set.
    ///
    /// Returns the final snapshot.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<HostCommand>) -> Snapshot {
        let mut ticker: Option<Ticker> = None;
        let mut pending: Option<PermissionRequest> = None;
        self.flush();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    None | Some(HostCommand::Quit) => {
                        debug!("Host quitting");
                        break;
                    }
                    Some(HostCommand::RequestPermission) => {
                        if pending.is_none() {
                            pending = Some(self.permission_request());
                        } else {
                            debug!("Permission request already in flight");
                        }
                    }
                    Some(command) => self.handle(command),
                },
                () = next_tick(&mut ticker) => {
                    self.engine.tick();
                }
                permission = await_permission(&mut pending) => {
                    pending = None;
                    info!(permission = permission.as_str(), "Notification permission resolved");
                    let snapshot = self.engine.snapshot();
                    self.renderer.permission_changed(permission, &snapshot);
                }
            }

            self.sync_ticker(&mut ticker);
            self.flush();

            if self.exit_on_finish && self.engine.state().is_finished() {
                debug!("Countdown finished, host exiting");
                break;
            }
        }

        drop(ticker);
        self.flush();
        self.engine.snapshot()
    }

    fn handle(&mut self, command: HostCommand) {
        match command {
            HostCommand::Start => {
                if !self.engine.start() {
                    self.renderer.rejected("タイマーはすでに動作中です");
                }
            }
            HostCommand::Pause => {
                if !self.engine.pause() {
                    self.renderer.rejected("タイマーは動作していません");
                }
            }
            HostCommand::Toggle => {
                self.engine.toggle();
            }
            HostCommand::Reset(minutes) => {
                let seconds = match minutes.map(minutes_to_seconds).transpose() {
                    Ok(seconds) => seconds,
                    Err(reason) => return self.renderer.rejected(&reason),
                };
                if let Err(e) = self.engine.reset(seconds) {
                    self.reject(&e);
                }
            }
            HostCommand::Reconfigure(minutes) => {
                let seconds = match minutes_to_seconds(minutes) {
                    Ok(seconds) => seconds,
                    Err(reason) => return self.renderer.rejected(&reason),
                };
                if let Err(e) = self.engine.reconfigure(seconds) {
                    self.reject(&e);
                }
            }
            HostCommand::Status => self.engine.refresh(),
            HostCommand::Help => self.renderer.help(),
            HostCommand::RequestPermission | HostCommand::Quit => {}
        }
    }

    fn reject(&mut self, error: &TimerError) {
        debug!("Command rejected: {}", error);
        self.renderer
            .rejected(&format!("{}（{}）", error, error.suggestion()));
    }

    fn permission_request(&self) -> PermissionRequest {
        let gateway = Rc::clone(&self.gateway);
        Box::pin(async move { gateway.request_permission().await })
    }

    /// Holds a ticker exactly while the engine is running.
    fn sync_ticker(&self, ticker: &mut Option<Ticker>) {
        match (self.engine.is_running(), ticker.is_some()) {
            (true, false) => *ticker = Some(Ticker::start()),
            (false, true) => *ticker = None,
            _ => {}
        }
    }

    fn flush(&mut self) {
        while let Ok(update) = self.updates.try_recv() {
            self.renderer.render(&update);
        }
    }

    /// Returns the engine.
    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }
}

async fn await_permission(pending: &mut Option<PermissionRequest>) -> NotificationPermission {
    match pending {
        Some(request) => request.as_mut().await,
        None => std::future::pending().await,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::{
        MockAlertPresenter, MockNotificationSender, NotificationGateway, PermissionStore,
    };
    use crate::sound::MockSoundPlayer;
    use crate::timer::TimerEvent;
    use crate::types::TimerPhase;
    use tokio::time::{sleep, Duration};

    type TestGateway = NotificationGateway<MockNotificationSender, MockAlertPresenter, MockSoundPlayer>;

    struct Harness {
        gateway: Rc<TestGateway>,
        renderer: MockRenderer,
        host: TimerHost<TestGateway, MockRenderer>,
    }

    fn harness(total_seconds: u32) -> Harness {
        let gateway = Rc::new(NotificationGateway::new(
            MockNotificationSender::new(),
            MockAlertPresenter::new(),
            Some(MockSoundPlayer::new()),
            PermissionStore::default(),
        ));
        let (tx, rx) = mpsc::unbounded_channel();
        let engine = TimerEngine::new(total_seconds, Box::new(Rc::clone(&gateway)), tx).unwrap();
        let renderer = MockRenderer::new();
        let host = TimerHost::new(engine, rx, Rc::clone(&gateway), renderer.clone());
        Harness {
            gateway,
            renderer,
            host,
        }
    }

    fn events(renderer: &MockRenderer) -> Vec<TimerEvent> {
        renderer.updates().iter().map(|u| u.event).collect()
    }

    // ------------------------------------------------------------------------
    // Minutes Conversion Tests
    // ------------------------------------------------------------------------

    mod minutes_tests {
        use super::*;

        #[test]
        fn test_converts_minutes() {
            assert_eq!(minutes_to_seconds(1), Ok(60));
            assert_eq!(minutes_to_seconds(60), Ok(3600));
        }

        #[test]
        fn test_passes_non_positive_through() {
            assert_eq!(minutes_to_seconds(0), Ok(0));
            assert_eq!(minutes_to_seconds(-5), Ok(-300));
            assert_eq!(minutes_to_seconds(i64::MIN), Ok(i64::MIN));
        }

        #[test]
        fn test_rejects_above_maximum() {
            assert!(minutes_to_seconds(61).is_err());
        }
    }

    // ------------------------------------------------------------------------
    // Loop Tests
    // ------------------------------------------------------------------------

    mod loop_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_quit_immediately_returns_idle_snapshot() {
            let h = harness(60);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(HostCommand::Quit).unwrap();

            let snapshot = h.host.run(rx).await;

            assert_eq!(snapshot.phase, TimerPhase::Idle);
            assert_eq!(snapshot.remaining_seconds, 60);
            assert_eq!(events(&h.renderer), vec![TimerEvent::Mounted]);
        }

        #[tokio::test(start_paused = true)]
        async fn test_closed_channel_ends_loop() {
            let h = harness(60);
            let (tx, rx) = mpsc::unbounded_channel::<HostCommand>();
            drop(tx);

            let snapshot = h.host.run(rx).await;
            assert_eq!(snapshot.phase, TimerPhase::Idle);
        }

        #[tokio::test(start_paused = true)]
        async fn test_runs_to_finish_and_notifies_once() {
            let h = harness(3);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(HostCommand::Start).unwrap();

            let snapshot = h.host.exit_on_finish(true).run(rx).await;

            assert_eq!(snapshot.phase, TimerPhase::Finished);
            assert_eq!(snapshot.remaining_seconds, 0);
            assert_eq!(h.gateway.alert().alert_count(), 1);
            assert_eq!(h.gateway.sound().unwrap().play_count(), 1);
            assert_eq!(
                events(&h.renderer),
                vec![
                    TimerEvent::Mounted,
                    TimerEvent::Started,
                    TimerEvent::Tick,
                    TimerEvent::Tick,
                    TimerEvent::Finished,
                ]
            );
            drop(tx);
        }

        #[tokio::test(start_paused = true)]
        async fn test_pause_stops_ticks() {
            let h = harness(10);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(HostCommand::Start).unwrap();

            tokio::spawn(async move {
                sleep(Duration::from_millis(2500)).await;
                tx.send(HostCommand::Pause).unwrap();
                sleep(Duration::from_secs(30)).await;
                tx.send(HostCommand::Quit).unwrap();
            });

            let snapshot = h.host.run(rx).await;

            assert_eq!(snapshot.phase, TimerPhase::Paused);
            assert_eq!(snapshot.remaining_seconds, 8);
            assert_eq!(h.gateway.alert().alert_count(), 0);
        }

        #[tokio::test(start_paused = true)]
        async fn test_status_emits_refresh() {
            let h = harness(60);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(HostCommand::Status).unwrap();
            tx.send(HostCommand::Help).unwrap();
            tx.send(HostCommand::Quit).unwrap();

            h.host.run(rx).await;

            assert_eq!(
                events(&h.renderer),
                vec![TimerEvent::Mounted, TimerEvent::Refreshed]
            );
            assert!(h.renderer.records().contains(&RenderRecord::Help));
        }
    }

    // ------------------------------------------------------------------------
    // Rejection Tests
    // ------------------------------------------------------------------------

    mod rejection_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_reconfigure_while_running_is_rejected() {
            let h = harness(600);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(HostCommand::Start).unwrap();
            tx.send(HostCommand::Reconfigure(5)).unwrap();
            tx.send(HostCommand::Quit).unwrap();

            let snapshot = h.host.run(rx).await;

            assert_eq!(snapshot.total_seconds, 600);
            assert_eq!(snapshot.phase, TimerPhase::Running);
            assert_eq!(h.renderer.rejections().len(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_invalid_minutes_leave_state_untouched() {
            let h = harness(600);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(HostCommand::Reconfigure(0)).unwrap();
            tx.send(HostCommand::Reconfigure(61)).unwrap();
            tx.send(HostCommand::Reset(Some(-1))).unwrap();
            tx.send(HostCommand::Quit).unwrap();

            let snapshot = h.host.run(rx).await;

            assert_eq!(snapshot.total_seconds, 600);
            assert_eq!(h.renderer.rejections().len(), 3);
            assert_eq!(events(&h.renderer), vec![TimerEvent::Mounted]);
        }

        #[tokio::test(start_paused = true)]
        async fn test_reconfigure_when_paused_resets() {
            let h = harness(600);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(HostCommand::Start).unwrap();
            tx.send(HostCommand::Pause).unwrap();
            tx.send(HostCommand::Reconfigure(5)).unwrap();
            tx.send(HostCommand::Quit).unwrap();

            let snapshot = h.host.run(rx).await;

            assert_eq!(snapshot.phase, TimerPhase::Idle);
            assert_eq!(snapshot.total_seconds, 300);
            assert_eq!(snapshot.remaining_seconds, 300);
        }

        #[tokio::test(start_paused = true)]
        async fn test_pause_when_idle_is_reported() {
            let h = harness(60);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(HostCommand::Pause).unwrap();
            tx.send(HostCommand::Quit).unwrap();

            h.host.run(rx).await;
            assert_eq!(h.renderer.rejections().len(), 1);
        }
    }

    // ------------------------------------------------------------------------
    // Permission Tests
    // ------------------------------------------------------------------------

    mod permission_tests {
        use super::*;

        #[tokio::test(start_paused = true)]
        async fn test_permission_request_updates_snapshot() {
            let h = harness(60);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(HostCommand::RequestPermission).unwrap();

            tokio::spawn(async move {
                sleep(Duration::from_millis(100)).await;
                tx.send(HostCommand::Quit).unwrap();
            });

            let snapshot = h.host.run(rx).await;

            assert_eq!(snapshot.permission, NotificationPermission::Granted);
            assert!(h
                .renderer
                .records()
                .contains(&RenderRecord::Permission(NotificationPermission::Granted)));
            assert_eq!(h.gateway.sender().permission_request_count(), 1);
        }

        #[tokio::test(start_paused = true)]
        async fn test_granted_finish_uses_desktop_notification() {
            let h = harness(2);
            let (tx, rx) = mpsc::unbounded_channel();
            tx.send(HostCommand::RequestPermission).unwrap();
            tx.send(HostCommand::Start).unwrap();

            let snapshot = h.host.exit_on_finish(true).run(rx).await;

            assert_eq!(snapshot.phase, TimerPhase::Finished);
            assert_eq!(h.gateway.sender().notification_count(), 1);
            assert_eq!(h.gateway.alert().alert_count(), 0);
            drop(tx);
        }
    }
}
