//! Sound source selection.
//!
//! The break cue is either a short chime synthesized at playback time or an
//! audio file chosen by the user.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// File extensions rodio can decode with its default features.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg"];

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SoundSource {
    /// Two-tone sine chime generated in memory.
    #[default]
    Chime,
    /// An audio file on disk.
    File {
        /// The full path to the sound file.
        path: PathBuf,
    },
}

impl SoundSource {
    /// Creates the built-in chime source.
    #[must_use]
    pub fn chime() -> Self {
        Self::Chime
    }

    /// Creates a file source without validation.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Creates a file source after checking the file exists and has a
    /// supported extension.
    ///
    /// # Errors
    ///
    /// - `SoundError::FileNotFound` if the path is not a file
    /// - `SoundError::UnsupportedFormat` for an unknown extension
    pub fn file_validated(path: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let path = path.into();
        if !path.is_file() {
            return Err(SoundError::FileNotFound(path));
        }
        if !has_supported_extension(&path) {
            return Err(SoundError::UnsupportedFormat(path));
        }
        Ok(Self::File { path })
    }

    /// Returns the file path if this is a file source.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } => Some(path),
            Self::Chime => None,
        }
    }
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(ext))
        })
        .unwrap_or(false)
}

/// Picks the configured sound, falling back to the chime when the file is
/// unusable.
#[must_use]
pub fn resolve_sound(path: Option<&Path>) -> SoundSource {
    match path {
        None => SoundSource::Chime,
        Some(path) => match SoundSource::file_validated(path) {
            Ok(source) => source,
            Err(e) => {
                tracing::warn!("{}。{}", e, e.suggestion());
                SoundSource::Chime
            }
        },
    }
}
