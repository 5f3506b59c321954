//! Media service contract
//!
//! The playback controller never talks to an audio library directly. It goes
//! through [`MediaService`], which hands out owned player resources and
//! notifies when one of them runs out of audio.
//!
//! - `assets`: resolves content handles to files in the assets directory

mod assets;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

use crate::model::ContentHandle;

pub use assets::AssetResolver;

/// Callback invoked (on an arbitrary thread) when a player finishes its clip.
pub type FinishedCallback = Box<dyn Fn() + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Audio asset not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to decode {handle}: {reason}")]
    Decode { handle: ContentHandle, reason: String },
    #[error("Audio output unavailable: {0}")]
    Output(String),
}

/// Host facility that turns content handles into live players.
///
/// `play` starts a freshly loaded player. `restart` plays an already loaded
/// player from the top of its clip; completion markers queued before the
/// restart never fire. Both may touch the source or the device and can fail.
/// `pause` and `unload` cannot.
pub trait MediaService: Send + Sync + 'static {
    type Player: Send + 'static;

    fn load(&self, handle: &ContentHandle) -> Result<Self::Player, MediaError>;

    fn play(&self, player: &Self::Player) -> Result<(), MediaError>;

    fn restart(&self, player: &Self::Player) -> Result<(), MediaError>;

    fn pause(&self, player: &Self::Player);

    fn unload(&self, player: Self::Player);

    /// Register interest in the end of `player`'s clip. The callback stops
    /// firing once the returned subscription is cancelled or dropped.
    fn on_finished(&self, player: &Self::Player, callback: FinishedCallback) -> Subscription;
}

/// Cancellable interest in a player's completion signal.
#[derive(Debug)]
pub struct Subscription {
    active: Arc<AtomicBool>,
}

impl Subscription {
    pub fn new() -> Self {
        Self {
            active: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Wrap `callback` so it becomes inert once this subscription is cancelled.
    pub fn guard(&self, callback: FinishedCallback) -> FinishedCallback {
        let active = Arc::clone(&self.active);
        Box::new(move || {
            if active.load(Ordering::Acquire) {
                callback();
            }
        })
    }

    pub fn cancel(&self) {
        self.active.store(false, Ordering::Release);
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

impl Default for Subscription {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
