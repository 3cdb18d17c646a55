//! Timer module for the 20-20-20 timer.
//!
//! - `engine`: countdown state machine and finish dispatch
//! - `ticker`: cancellable one-second tick handle
//! - `error`: reconfiguration errors

pub mod engine;
pub mod error;
pub mod ticker;

pub use engine::{validate_duration, MockNotifier, Notifier, TimerEngine, TimerEvent, TimerUpdate};
pub use error::TimerError;
pub use ticker::{next_tick, Ticker, TICK_PERIOD};
