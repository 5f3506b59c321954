//! Rodio-backed media service
//!
//! Every player gets its own [`Sink`] on the shared output stream. The end of a
//! clip is detected by queueing an [`EmptyCallback`] source right behind the
//! decoder: when the sink reaches it, the clip is over.

use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use parking_lot::Mutex;
use rodio::source::EmptyCallback;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use crate::media::{AssetResolver, FinishedCallback, MediaError, MediaService, Subscription};
use crate::model::ContentHandle;

/// Open the default output device. The returned stream must outlive every player.
pub fn open_default_output() -> Result<(OutputStream, OutputStreamHandle), MediaError> {
    OutputStream::try_default().map_err(|e| MediaError::Output(e.to_string()))
}

/// Completion plumbing shared between a player and the markers in its queue.
///
/// Each queued clip gets its own epoch; only the marker of the latest one may
/// reach the callback.
#[derive(Default)]
struct Completion {
    callback: Mutex<Option<FinishedCallback>>,
    armed: AtomicU64,
}

impl Completion {
    fn marker(self: &Arc<Self>) -> impl Fn() + Send + 'static {
        let epoch = self.armed.fetch_add(1, Ordering::AcqRel) + 1;
        let completion = Arc::clone(self);
        move || {
            if completion.armed.load(Ordering::Acquire) != epoch {
                return;
            }
            if let Some(callback) = completion.callback.lock().as_ref() {
                callback();
            }
        }
    }
}

pub struct RodioPlayer {
    sink: Mutex<Sink>,
    handle: ContentHandle,
    path: PathBuf,
    completion: Arc<Completion>,
}

impl RodioPlayer {
    fn new(sink: Sink, handle: ContentHandle, path: PathBuf) -> Self {
        Self {
            sink: Mutex::new(sink),
            handle,
            path,
            completion: Arc::new(Completion::default()),
        }
    }
}

/// Media service over one output stream. Without an output device every load
/// fails, which the controller reports like any other unplayable clip.
pub struct RodioMediaService {
    output: Option<OutputStreamHandle>,
    assets: AssetResolver,
}

impl RodioMediaService {
    pub fn new(output: Option<OutputStreamHandle>, assets: AssetResolver) -> Self {
        Self { output, assets }
    }

    /// A paused sink on the output device.
    fn new_sink(&self) -> Result<Sink, MediaError> {
        let output = self
            .output
            .as_ref()
            .ok_or_else(|| MediaError::Output("no audio output device".to_string()))?;
        let sink = Sink::try_new(output).map_err(|e| MediaError::Output(e.to_string()))?;
        sink.pause();
        Ok(sink)
    }

    /// Queue the decoded clip followed by the completion marker.
    fn append_clip(sink: &Sink, player: &RodioPlayer) -> Result<(), MediaError> {
        let path = &player.path;
        let file = File::open(path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => MediaError::NotFound(path.to_path_buf()),
            _ => MediaError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

        let decoder = Decoder::new(BufReader::new(file)).map_err(|e| MediaError::Decode {
            handle: player.handle.clone(),
            reason: e.to_string(),
        })?;
        sink.append(decoder);
        sink.append(EmptyCallback::<f32>::new(Box::new(player.completion.marker())));
        Ok(())
    }

    /// Put `sink`, holding the clip from its first sample, in place of the
    /// player's current sink. The old sink is stopped.
    fn requeue(player: &RodioPlayer, sink: Sink) -> Result<(), MediaError> {
        Self::append_clip(&sink, player)?;
        let old = std::mem::replace(&mut *player.sink.lock(), sink);
        old.stop();
        Ok(())
    }
}

impl MediaService for RodioMediaService {
    type Player = RodioPlayer;

    fn load(&self, handle: &ContentHandle) -> Result<RodioPlayer, MediaError> {
        let path = self.assets.path_for(handle);
        let sink = self.new_sink()?;
        let player = RodioPlayer::new(sink, handle.clone(), path);

        let queued = Self::append_clip(&player.sink.lock(), &player);
        if let Err(err) = queued {
            player.sink.lock().stop();
            return Err(err);
        }

        tracing::debug!(handle = %handle, path = %player.path.display(), "Clip loaded");
        Ok(player)
    }

    fn play(&self, player: &RodioPlayer) -> Result<(), MediaError> {
        player.sink.lock().play();
        Ok(())
    }

    fn restart(&self, player: &RodioPlayer) -> Result<(), MediaError> {
        let sink = self.new_sink()?;
        Self::requeue(player, sink)?;
        player.sink.lock().play();
        tracing::debug!(handle = %player.handle, "Clip restarted");
        Ok(())
    }

    fn pause(&self, player: &RodioPlayer) {
        player.sink.lock().pause();
    }

    fn unload(&self, player: RodioPlayer) {
        player.completion.callback.lock().take();
        player.sink.lock().stop();
        tracing::debug!(handle = %player.handle, "Clip unloaded");
    }

    fn on_finished(&self, player: &RodioPlayer, callback: FinishedCallback) -> Subscription {
        let subscription = Subscription::new();
        *player.completion.callback.lock() = Some(subscription.guard(callback));
        subscription
    }
}
