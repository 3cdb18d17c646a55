//! One-second tick scheduling.
//!
//! A [`Ticker`] is the timer resource held by the host loop while the
//! countdown runs. Dropping it cancels every future tick.

use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};
use tracing::debug;

/// Period between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Cancellable repeating one-second tick.
#[derive(Debug)]
pub struct Ticker {
    interval: Interval,
}

impl Ticker {
    /// Acquires a ticker whose first tick fires one period from now.
    pub fn start() -> Self {
        Self::with_period(TICK_PERIOD)
    }

    /// Acquires a ticker with a custom period.
    pub fn with_period(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        // Missed ticks are delivered late rather than dropped so the
        // countdown keeps pace with elapsed time.
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        debug!("Tick scheduler acquired");
        Self { interval }
    }

    /// Waits for the next tick.
    pub async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        debug!("Tick scheduler released");
    }
}

/// Waits for the next tick of an optional ticker.
///
/// Never completes when no ticker is held, which disables the branch in a
/// `select!` loop.
pub async fn next_tick(ticker: &mut Option<Ticker>) {
    match ticker {
        Some(ticker) => ticker.tick().await,
        None => std::future::pending::<()>().await,
    }
}
