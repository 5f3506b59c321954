//! Playback control: the state machine around the single audio slot

use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

use crate::error::SoundboardError;
use crate::media::{MediaError, MediaService, Subscription};
use crate::model::{ActiveClip, AudioEntry, ContentHandle, PlaybackSession, PlaybackState};
use crate::share::ShareService;

use super::AppController;

/// Signals coming back from the media service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The player acquired as `generation` ran out of audio.
    Finished { generation: u64 },
}

/// Owns the application's only playback session.
///
/// Requests are serialized on the session lock, so a request made while a
/// clip is being swapped waits until the swap settles.
pub struct PlaybackController<M: MediaService> {
    media: Arc<M>,
    session: Mutex<PlaybackSession<M::Player>>,
    events: mpsc::UnboundedSender<PlaybackEvent>,
}

impl<M: MediaService> PlaybackController<M> {
    pub fn new(media: Arc<M>) -> (Self, mpsc::UnboundedReceiver<PlaybackEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let controller = Self {
            media,
            session: Mutex::new(PlaybackSession::new()),
            events,
        };
        (controller, rx)
    }

    pub async fn state(&self) -> PlaybackState {
        self.session.lock().await.state()
    }

    /// Play/pause toggle for `entry`. The loaded clip pauses when playing and
    /// plays again from the top when paused; any other entry replaces it.
    pub async fn request(&self, entry: &AudioEntry) -> Result<PlaybackState, SoundboardError> {
        let mut session = self.session.lock().await;

        match session.active_for(&entry.handle).map(|clip| clip.is_playing) {
            Some(true) => {
                if let Some(clip) = session.active_for(&entry.handle) {
                    self.media.pause(&clip.player);
                    clip.is_playing = false;
                }
                tracing::info!(id = entry.id, title = %entry.title, "Paused");
                return Ok(session.state());
            }
            Some(false) => return self.restart(&mut session, entry),
            None => {}
        }

        self.release(&mut session);

        let player = match self.acquire(&entry.handle).await {
            Ok(player) => player,
            Err(source) => {
                tracing::error!(id = entry.id, handle = %entry.handle, error = %source, "Acquire failed");
                return Err(SoundboardError::AcquireFailed {
                    handle: entry.handle.clone(),
                    source,
                });
            }
        };

        let generation = session.next_generation();
        let subscription = self.subscribe(&player, generation);

        if let Err(source) = self.media.play(&player) {
            subscription.cancel();
            self.media.unload(player);
            tracing::error!(id = entry.id, handle = %entry.handle, error = %source, "Playback start failed");
            return Err(SoundboardError::AcquireFailed {
                handle: entry.handle.clone(),
                source,
            });
        }

        session.activate(ActiveClip {
            handle: entry.handle.clone(),
            player,
            generation,
            is_playing: true,
            subscription,
        });
        tracing::info!(id = entry.id, title = %entry.title, generation, "Playing");
        Ok(session.state())
    }

    /// Apply a media signal. Signals from replaced players are dropped.
    pub async fn handle_event(&self, event: PlaybackEvent) -> PlaybackState {
        let mut session = self.session.lock().await;
        match event {
            PlaybackEvent::Finished { generation } => {
                if session.mark_finished(generation) {
                    tracing::debug!(generation, "Clip finished");
                } else {
                    tracing::trace!(generation, "Ignoring stale or redundant finish signal");
                }
            }
        }
        session.state()
    }

    /// Release the active player, if any. The session stays usable.
    pub async fn shutdown(&self) {
        let mut session = self.session.lock().await;
        self.release(&mut session);
        tracing::debug!("Playback session torn down");
    }

    /// Play the loaded clip from its first sample under a new generation, so
    /// a finish signal from the previous run cannot pause it.
    fn restart(
        &self,
        session: &mut PlaybackSession<M::Player>,
        entry: &AudioEntry,
    ) -> Result<PlaybackState, SoundboardError> {
        let generation = session.next_generation();
        let Some(clip) = session.active_for(&entry.handle) else {
            return Ok(session.state());
        };

        let subscription = self.subscribe(&clip.player, generation);
        match self.media.restart(&clip.player) {
            Ok(()) => {
                // Replacing the old subscription cancels it.
                clip.subscription = subscription;
                clip.generation = generation;
                clip.is_playing = true;
                tracing::info!(id = entry.id, title = %entry.title, generation, "Restarted");
                Ok(session.state())
            }
            Err(source) => {
                subscription.cancel();
                self.release(session);
                tracing::error!(id = entry.id, error = %source, "Restart failed, session released");
                Err(SoundboardError::AcquireFailed {
                    handle: entry.handle.clone(),
                    source,
                })
            }
        }
    }

    fn subscribe(&self, player: &M::Player, generation: u64) -> Subscription {
        let events = self.events.clone();
        self.media.on_finished(
            player,
            Box::new(move || {
                // The receiver is gone only during shutdown.
                let _ = events.send(PlaybackEvent::Finished { generation });
            }),
        )
    }

    fn release(&self, session: &mut PlaybackSession<M::Player>) {
        if let Some(clip) = session.release() {
            tracing::debug!(handle = %clip.handle, generation = clip.generation, "Releasing player");
            self.media.unload(clip.player);
        }
    }

    async fn acquire(&self, handle: &ContentHandle) -> Result<M::Player, MediaError> {
        let media = Arc::clone(&self.media);
        let handle = handle.clone();
        // Decoder setup does blocking file I/O.
        tokio::task::spawn_blocking(move || media.load(&handle))
            .await
            .map_err(|e| MediaError::Output(format!("loader task failed: {e}")))?
    }
}

impl<M: MediaService, S: ShareService> AppController<M, S> {
    /// Play/pause toggle for the selected card.
    pub async fn toggle_selected(&self) {
        let selected = self.model.lock().await.get_selected_entry().await;
        let Some(entry) = selected else {
            tracing::debug!("Toggle requested with nothing selected");
            return;
        };

        let result = self.playback.request(&entry).await;

        // Read the session under the model lock so the mirror follows session order.
        let model = self.model.lock().await;
        model.set_playback_state(self.playback.state().await).await;
        if let Err(e) = result {
            model.set_error(e.user_message()).await;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Call, FakeMedia};
    use super::*;

    fn entry(id: u32, title: &str, asset: &str) -> AudioEntry {
        AudioEntry::new(id, title, asset)
    }

    fn setup() -> (
        Arc<FakeMedia>,
        PlaybackController<FakeMedia>,
        mpsc::UnboundedReceiver<PlaybackEvent>,
    ) {
        let media = Arc::new(FakeMedia::default());
        let (controller, rx) = PlaybackController::new(Arc::clone(&media));
        (media, controller, rx)
    }

    /// The handle is present exactly when a player is alive.
    fn assert_invariant(state: &PlaybackState, media: &FakeMedia) {
        let live = media.live_players();
        assert!(live <= 1, "more than one live player");
        assert_eq!(state.active_handle().is_some(), live == 1);
    }

    #[tokio::test]
    async fn first_request_loads_and_plays() {
        let (media, controller, _rx) = setup();
        let e1 = entry(1, "Andá a la cancha bobo", "andalacancha.mp3");

        let state = controller.request(&e1).await.unwrap();

        assert_eq!(state, PlaybackState::Playing(e1.handle.clone()));
        assert_eq!(media.calls(), vec![Call::Load("andalacancha.mp3".into()), Call::Play(1)]);
        assert_invariant(&state, &media);
    }

    #[tokio::test]
    async fn switching_entries_releases_previous_player() {
        let (media, controller, _rx) = setup();
        let e1 = entry(1, "Andá a la cancha bobo", "andalacancha.mp3");
        let e2 = entry(2, "Y bien amigos", "ybienamigos.mp3");

        controller.request(&e1).await.unwrap();
        let state = controller.request(&e2).await.unwrap();

        assert_eq!(state, PlaybackState::Playing(e2.handle.clone()));
        assert_eq!(
            media.calls(),
            vec![
                Call::Load("andalacancha.mp3".into()),
                Call::Play(1),
                Call::Unload(1),
                Call::Load("ybienamigos.mp3".into()),
                Call::Play(2),
            ]
        );
        assert_invariant(&state, &media);
    }

    #[tokio::test]
    async fn repeated_requests_toggle_play_and_pause() {
        let (media, controller, _rx) = setup();
        let e1 = entry(1, "Tatan tatan", "tatantatan.mp3");

        let first = controller.request(&e1).await.unwrap();
        let second = controller.request(&e1).await.unwrap();
        let third = controller.request(&e1).await.unwrap();

        assert_eq!(second, PlaybackState::Paused(e1.handle.clone()));
        assert_eq!(first, third);
        // Toggling never reloads; playing again starts the same player over.
        assert_eq!(
            media.calls(),
            vec![
                Call::Load("tatantatan.mp3".into()),
                Call::Play(1),
                Call::Pause(1),
                Call::Restart(1),
            ]
        );
        assert_invariant(&third, &media);
    }

    #[tokio::test]
    async fn same_handle_under_different_id_counts_as_same_clip() {
        let (media, controller, _rx) = setup();
        let original = entry(1, "Tatan tatan", "tatantatan.mp3");
        let alias = entry(42, "Tatan (alias)", "tatantatan.mp3");

        controller.request(&original).await.unwrap();
        let state = controller.request(&alias).await.unwrap();

        assert_eq!(state, PlaybackState::Paused(original.handle.clone()));
        assert_eq!(media.live_players(), 1);
    }

    #[tokio::test]
    async fn finish_signal_pauses_active_clip() {
        let (media, controller, mut rx) = setup();
        let e1 = entry(1, "Pisala Pomelo", "pisalapomelo.mp3");
        controller.request(&e1).await.unwrap();

        media.finish(1);
        let event = rx.recv().await.unwrap();
        let state = controller.handle_event(event).await;

        assert_eq!(state, PlaybackState::Paused(e1.handle.clone()));
        // Resource is kept; the next request starts it over without reloading.
        assert_invariant(&state, &media);
        let state = controller.request(&e1).await.unwrap();
        assert_eq!(state, PlaybackState::Playing(e1.handle.clone()));
        assert_eq!(media.calls().last(), Some(&Call::Restart(1)));
        assert_eq!(media.calls().iter().filter(|c| matches!(c, Call::Load(_))).count(), 1);
    }

    #[tokio::test]
    async fn finish_from_before_restart_does_not_pause_new_run() {
        let (media, controller, mut rx) = setup();
        let e1 = entry(1, "Y bien amigos", "ybienamigos.mp3");
        controller.request(&e1).await.unwrap();
        controller.request(&e1).await.unwrap();

        // The first run ends while paused; its signal is still queued.
        media.finish(1);
        let in_flight = rx.recv().await.unwrap();

        controller.request(&e1).await.unwrap();
        let state = controller.handle_event(in_flight).await;
        assert_eq!(state, PlaybackState::Playing(e1.handle.clone()));

        // The restarted run reports its own end.
        media.finish(1);
        let event = rx.recv().await.unwrap();
        let state = controller.handle_event(event).await;
        assert_eq!(state, PlaybackState::Paused(e1.handle.clone()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn finish_signal_while_paused_is_a_no_op() {
        let (media, controller, mut rx) = setup();
        let e1 = entry(1, "Que la chupen", "maradonachupen.mp3");
        controller.request(&e1).await.unwrap();
        controller.request(&e1).await.unwrap();

        media.finish(1);
        let event = rx.recv().await.unwrap();
        let state = controller.handle_event(event).await;

        assert_eq!(state, PlaybackState::Paused(e1.handle.clone()));
    }

    #[tokio::test]
    async fn stale_finish_signal_is_discarded() {
        let (media, controller, mut rx) = setup();
        let e1 = entry(1, "Quinteros Madrid", "golquinteros.mp3");
        let e2 = entry(2, "Somos Montiel", "somostodosmontiel.mp3");

        controller.request(&e1).await.unwrap();
        controller.request(&e2).await.unwrap();

        // The replaced player's subscription is cancelled, so nothing is sent.
        media.finish(1);
        assert!(rx.try_recv().is_err());

        // A signal that was already in flight is dropped by generation.
        let state = controller
            .handle_event(PlaybackEvent::Finished { generation: 1 })
            .await;
        assert_eq!(state, PlaybackState::Playing(e2.handle.clone()));
    }

    #[tokio::test]
    async fn failed_load_from_idle_stays_idle() {
        let (media, controller, _rx) = setup();
        let e1 = entry(1, "Ramón tití", "ramontiti.mp3");
        media.fail_loading("ramontiti.mp3");

        let err = controller.request(&e1).await.unwrap_err();

        assert!(matches!(err, SoundboardError::AcquireFailed { ref handle, .. } if *handle == e1.handle));
        let state = controller.state().await;
        assert_eq!(state, PlaybackState::Idle);
        assert_eq!(media.live_players(), 0);
    }

    #[tokio::test]
    async fn failed_load_while_playing_other_clip_ends_idle() {
        let (media, controller, _rx) = setup();
        let e1 = entry(1, "Cositas lindas", "cositaslindas.m4a");
        let e2 = entry(2, "Ramón tití", "ramontiti.mp3");
        media.fail_loading("ramontiti.mp3");

        controller.request(&e1).await.unwrap();
        assert!(controller.request(&e2).await.is_err());

        let state = controller.state().await;
        assert_eq!(state, PlaybackState::Idle);
        assert_invariant(&state, &media);

        // Retrying after the asset is fixed works.
        media.failing_loads.lock().clear();
        let state = controller.request(&e2).await.unwrap();
        assert_eq!(state, PlaybackState::Playing(e2.handle.clone()));
    }

    #[tokio::test]
    async fn partial_player_is_released_when_start_fails() {
        let (media, controller, _rx) = setup();
        let e1 = entry(1, "Anda payá", "quemirasbobo.mp3");
        *media.fail_next_play.lock() = true;

        let err = controller.request(&e1).await.unwrap_err();

        assert!(matches!(err, SoundboardError::AcquireFailed { .. }));
        assert_eq!(
            media.calls(),
            vec![Call::Load("quemirasbobo.mp3".into()), Call::Unload(1)]
        );
        assert_eq!(controller.state().await, PlaybackState::Idle);
    }

    #[tokio::test]
    async fn failed_restart_releases_session() {
        let (media, controller, _rx) = setup();
        let e1 = entry(1, "Anda payá", "quemirasbobo.mp3");
        controller.request(&e1).await.unwrap();
        controller.request(&e1).await.unwrap();

        *media.fail_next_play.lock() = true;
        assert!(controller.request(&e1).await.is_err());

        let state = controller.state().await;
        assert_eq!(state, PlaybackState::Idle);
        assert_invariant(&state, &media);
    }

    #[tokio::test]
    async fn shutdown_releases_active_player() {
        let (media, controller, _rx) = setup();
        controller
            .request(&entry(1, "Y bien amigos", "ybienamigos.mp3"))
            .await
            .unwrap();

        controller.shutdown().await;

        assert_eq!(controller.state().await, PlaybackState::Idle);
        assert_eq!(media.live_players(), 0);
        // Shutting down an idle session is harmless.
        controller.shutdown().await;
        assert_eq!(media.live_players(), 0);
    }
}
