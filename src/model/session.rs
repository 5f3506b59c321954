//! The single audio slot

use crate::media::Subscription;
use super::catalog::ContentHandle;

/// Observable state of the audio slot.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Idle,
    Playing(ContentHandle),
    Paused(ContentHandle),
}

impl PlaybackState {
    pub fn active_handle(&self) -> Option<&ContentHandle> {
        match self {
            Self::Idle => None,
            Self::Playing(handle) | Self::Paused(handle) => Some(handle),
        }
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing(_))
    }

    pub fn is_playing_handle(&self, handle: &ContentHandle) -> bool {
        matches!(self, Self::Playing(active) if active == handle)
    }
}

/// A loaded clip. Handle, player and completion subscription live and die together.
pub struct ActiveClip<P> {
    pub handle: ContentHandle,
    pub player: P,
    pub generation: u64,
    pub is_playing: bool,
    pub subscription: Subscription,
}

/// The application's only playback session.
pub struct PlaybackSession<P> {
    active: Option<ActiveClip<P>>,
    last_generation: u64,
}

impl<P> PlaybackSession<P> {
    pub fn new() -> Self {
        Self {
            active: None,
            last_generation: 0,
        }
    }

    pub fn state(&self) -> PlaybackState {
        match &self.active {
            None => PlaybackState::Idle,
            Some(clip) if clip.is_playing => PlaybackState::Playing(clip.handle.clone()),
            Some(clip) => PlaybackState::Paused(clip.handle.clone()),
        }
    }

    /// The loaded clip, if it is the one addressed by `handle`.
    pub fn active_for(&mut self, handle: &ContentHandle) -> Option<&mut ActiveClip<P>> {
        self.active.as_mut().filter(|clip| clip.handle == *handle)
    }

    pub fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    pub fn activate(&mut self, clip: ActiveClip<P>) {
        debug_assert!(self.active.is_none(), "previous clip must be released first");
        self.active = Some(clip);
    }

    /// Detach the loaded clip. Its subscription is cancelled before it is handed back.
    pub fn release(&mut self) -> Option<ActiveClip<P>> {
        let clip = self.active.take()?;
        clip.subscription.cancel();
        Some(clip)
    }

    /// Apply a completion signal. Returns false when the signal is stale or
    /// the clip was already paused.
    pub fn mark_finished(&mut self, generation: u64) -> bool {
        match self.active.as_mut() {
            Some(clip) if clip.generation == generation && clip.is_playing => {
                clip.is_playing = false;
                true
            }
            _ => false,
        }
    }
}

impl<P> Default for PlaybackSession<P> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip(session: &mut PlaybackSession<()>, asset: &str) -> ActiveClip<()> {
        ActiveClip {
            handle: ContentHandle::new(asset),
            player: (),
            generation: session.next_generation(),
            is_playing: true,
            subscription: Subscription::new(),
        }
    }

    #[test]
    fn starts_idle() {
        let mut session = PlaybackSession::<()>::new();
        assert_eq!(session.state(), PlaybackState::Idle);
        assert!(!session.mark_finished(1));
    }

    #[test]
    fn state_reflects_active_clip() {
        let mut session = PlaybackSession::new();
        let c = clip(&mut session, "a.mp3");
        session.activate(c);
        assert_eq!(session.state(), PlaybackState::Playing(ContentHandle::new("a.mp3")));

        if let Some(active) = session.active_for(&ContentHandle::new("a.mp3")) {
            active.is_playing = false;
        }
        assert_eq!(session.state(), PlaybackState::Paused(ContentHandle::new("a.mp3")));
    }

    #[test]
    fn release_cancels_subscription_and_goes_idle() {
        let mut session = PlaybackSession::new();
        let c = clip(&mut session, "a.mp3");
        session.activate(c);

        let released = session.release().expect("clip was active");
        assert!(!released.subscription.is_active());
        assert_eq!(session.state(), PlaybackState::Idle);
        assert!(session.release().is_none());
    }

    #[test]
    fn finished_signal_only_applies_to_current_generation() {
        let mut session = PlaybackSession::new();
        let first = clip(&mut session, "a.mp3");
        let stale = first.generation;
        session.activate(first);
        session.release();

        let second = clip(&mut session, "b.mp3");
        let current = second.generation;
        session.activate(second);

        assert!(!session.mark_finished(stale));
        assert!(session.state().is_playing());
        assert!(session.mark_finished(current));
        assert_eq!(session.state(), PlaybackState::Paused(ContentHandle::new("b.mp3")));
        assert!(!session.mark_finished(current));
    }

    #[test]
    fn active_for_matches_on_handle() {
        let mut session = PlaybackSession::new();
        let c = clip(&mut session, "a.mp3");
        session.activate(c);
        assert!(session.active_for(&ContentHandle::new("a.mp3")).is_some());
        assert!(session.active_for(&ContentHandle::new("b.mp3")).is_none());
    }
}
