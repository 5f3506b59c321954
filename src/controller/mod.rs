//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives playback and sharing.
//! It is organized into submodules by responsibility:
//!
//! - `input`: Key event handling
//! - `playback`: The playback state machine around the single audio slot
//! - `share`: Share requests
//! - `player_events`: Completion signal listener

mod input;
mod playback;
mod share;
mod player_events;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::media::MediaService;
use crate::model::AppModel;
use crate::share::ShareService;

pub use playback::{PlaybackController, PlaybackEvent};

pub struct AppController<M: MediaService, S: ShareService> {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) playback: Arc<PlaybackController<M>>,
    pub(crate) share: Arc<S>,
    share_dialog_title: String,
}

impl<M: MediaService, S: ShareService> Clone for AppController<M, S> {
    fn clone(&self) -> Self {
        Self {
            model: Arc::clone(&self.model),
            playback: Arc::clone(&self.playback),
            share: Arc::clone(&self.share),
            share_dialog_title: self.share_dialog_title.clone(),
        }
    }
}

impl<M: MediaService, S: ShareService> AppController<M, S> {
    pub fn new(
        model: Arc<Mutex<AppModel>>,
        playback: Arc<PlaybackController<M>>,
        share: Arc<S>,
        share_dialog_title: String,
    ) -> Self {
        Self {
            model,
            playback,
            share,
            share_dialog_title,
        }
    }

    /// Release the audio slot before exit.
    pub async fn shutdown(&self) {
        self.playback.shutdown().await;
        let model = self.model.lock().await;
        model.set_playback_state(self.playback.state().await).await;
    }
}
