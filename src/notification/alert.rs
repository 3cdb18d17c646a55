//! Fallback alert shown when the rich notification path is unavailable.

use std::io::{self, Write};

/// Presents the break reminder directly to the user.
pub trait AlertPresenter {
    /// Shows the alert.
    ///
    /// # Errors
    ///
    /// Returns an error if the alert could not be written.
    fn alert(&self, title: &str, message: &str) -> io::Result<()>;
}

/// Alert written to the terminal's stderr with a bell.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalAlert;

impl AlertPresenter for TerminalAlert {
    fn alert(&self, title: &str, message: &str) -> io::Result<()> {
        let mut out = io::stderr().lock();
        out.write_all(render_alert(title, message).as_bytes())?;
        out.flush()
    }
}

/// Renders the alert banner: bell, ruled frame, title and message.
#[must_use]
pub fn render_alert(title: &str, message: &str) -> String {
    let rule = "━".repeat(40);
    format!("\x07\n{rule}\n  {title}\n  {message}\n{rule}\n")
}

/// Mock alert presenter for testing.
#[derive(Debug, Default)]
pub struct MockAlertPresenter {
    alerts: std::sync::Mutex<Vec<(String, String)>>,
    should_fail: std::sync::atomic::AtomicBool,
}

impl MockAlertPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail
            .store(should_fail, std::sync::atomic::Ordering::SeqCst);
    }

    #[must_use]
    pub fn alert_count(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }

    #[must_use]
    pub fn get_alerts(&self) -> Vec<(String, String)> {
        self.alerts.lock().unwrap().clone()
    }
}

impl AlertPresenter for MockAlertPresenter {
    fn alert(&self, title: &str, message: &str) -> io::Result<()> {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
        if self.should_fail.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "Mock failure"));
        }
        Ok(())
    }
}
