//! Audio cue played alongside the break reminder.
//!
//! The cue is either a short synthesized chime or a user-supplied audio file.
//! Playback is detached: `play` returns as soon as the sound is queued.
//!
//! ```rust,no_run
//! use twenty_twenty::sound::{try_create_player, SoundPlayer, SoundSource};
//!
//! if let Some(player) = try_create_player() {
//!     let _ = player.play(&SoundSource::chime());
//! }
//! ```

mod error;
mod player;
mod source;

use std::cell::{Cell, RefCell};

pub use error::{Recovery, SoundError};
pub use player::{try_create_player, RodioSoundPlayer};
pub use source::{resolve_sound, SoundSource, SUPPORTED_EXTENSIONS};

/// Something that can play the break cue.
pub trait SoundPlayer {
    /// Queues the cue and returns without waiting for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the cue could not be queued.
    fn play(&self, source: &SoundSource) -> Result<(), SoundError>;

    /// Returns false when the output device has gone away.
    fn is_available(&self) -> bool;
}

impl SoundPlayer for RodioSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        RodioSoundPlayer::play(self, source)
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Mock sound player for testing. Records every attempted cue.
#[derive(Debug)]
pub struct MockSoundPlayer {
    plays: RefCell<Vec<SoundSource>>,
    available: Cell<bool>,
    should_fail: Cell<bool>,
}

impl Default for MockSoundPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSoundPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            plays: RefCell::new(Vec::new()),
            available: Cell::new(true),
            should_fail: Cell::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.set(should_fail);
    }

    /// Number of attempted plays, failed ones included.
    #[must_use]
    pub fn play_count(&self) -> usize {
        self.plays.borrow().len()
    }

    #[must_use]
    pub fn get_play_calls(&self) -> Vec<SoundSource> {
        self.plays.borrow().clone()
    }
}

impl SoundPlayer for MockSoundPlayer {
    fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        self.plays.borrow_mut().push(source.clone());
        if self.should_fail.get() {
            return Err(SoundError::PlaybackError("mock failure".to_string()));
        }
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.get()
    }
}
