//! User-facing error kinds.
//!
//! Both kinds are recoverable: they are reported at the boundary of the key
//! event that triggered them and never end the process.

use thiserror::Error;

use crate::media::MediaError;
use crate::model::ContentHandle;
use crate::share::ShareError;

#[derive(Error, Debug)]
pub enum SoundboardError {
    /// The clip could not be loaded or restarted. The audio slot is idle afterwards.
    #[error("Could not play {handle}: {source}")]
    AcquireFailed {
        handle: ContentHandle,
        #[source]
        source: MediaError,
    },
    /// Resolving or sharing the clip failed. Playback is untouched.
    #[error("Could not share \"{title}\": {source}")]
    ShareFailed {
        title: String,
        #[source]
        source: ShareError,
    },
}

impl SoundboardError {
    /// Short message for the error overlay.
    pub fn user_message(&self) -> String {
        match self {
            Self::AcquireFailed { handle, .. } => {
                format!("Could not play {handle}. Press Enter to try again.")
            }
            Self::ShareFailed { title, .. } => {
                format!("Could not share \"{title}\". Please try again.")
            }
        }
    }
}
