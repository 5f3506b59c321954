//! Completion signal listener

use tokio::sync::mpsc::UnboundedReceiver;

use crate::media::MediaService;
use crate::share::ShareService;
use super::{AppController, PlaybackEvent};

impl<M: MediaService, S: ShareService> AppController<M, S> {
    pub fn start_player_event_listener(&self, mut events: UnboundedReceiver<PlaybackEvent>) {
        let controller = self.clone();
        tracing::info!("Starting player event listener");

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if controller.model.lock().await.should_quit().await {
                    tracing::debug!("Player event listener shutting down");
                    break;
                }
                controller.apply_player_event(event).await;
            }
        });
    }

    pub(crate) async fn apply_player_event(&self, event: PlaybackEvent) {
        tracing::trace!(?event, "Player event");
        self.playback.handle_event(event).await;
        let model = self.model.lock().await;
        model.set_playback_state(self.playback.state().await).await;
    }
}
