//! Share requests

use crate::error::SoundboardError;
use crate::model::AudioEntry;
use crate::share::{ShareOptions, ShareOutcome, ShareService};
use crate::media::MediaService;

use super::AppController;

/// Resolve `entry` to a local file and hand it to the share service.
///
/// Either step failing is reported as [`SoundboardError::ShareFailed`].
pub async fn share_entry<S: ShareService>(
    service: &S,
    entry: &AudioEntry,
    dialog_title: &str,
) -> Result<ShareOutcome, SoundboardError> {
    let failed = |source| SoundboardError::ShareFailed {
        title: entry.title.clone(),
        source,
    };

    let path = service.resolve_local_path(&entry.handle).await.map_err(failed)?;
    let options = ShareOptions::for_handle(&entry.handle, dialog_title);
    service.present_share_sheet(&path, &options).await.map_err(failed)
}

impl<M: MediaService, S: ShareService> AppController<M, S> {
    pub async fn share_selected(&self) {
        let selected = self.model.lock().await.get_selected_entry().await;
        let Some(entry) = selected else {
            return;
        };

        tracing::debug!(id = entry.id, title = %entry.title, "Share requested");

        match share_entry(self.share.as_ref(), &entry, &self.share_dialog_title).await {
            Ok(outcome) => {
                tracing::info!(id = entry.id, path = %outcome.path.display(), "Clip shared");
                let model = self.model.lock().await;
                model
                    .set_notice(format!("Shared \"{}\" ({})", entry.title, outcome.path.display()))
                    .await;
            }
            Err(e) => {
                tracing::error!(id = entry.id, error = %e, "Share failed");
                let model = self.model.lock().await;
                model.set_error(e.user_message()).await;
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeShare;
    use super::*;
    use crate::share::{DEFAULT_DIALOG_TITLE, ShareError};
    use std::path::Path;

    fn entry() -> AudioEntry {
        AudioEntry::new(3, "Cositas lindas", "cositaslindas.m4a")
    }

    #[tokio::test]
    async fn shares_resolved_path_with_options() {
        let share = FakeShare::default();

        let outcome = share_entry(&share, &entry(), DEFAULT_DIALOG_TITLE).await.unwrap();

        assert_eq!(outcome.path, Path::new("/cache/cositaslindas.m4a"));
        let presented = share.presented.lock();
        assert_eq!(presented.len(), 1);
        assert_eq!(presented[0].1.mime_type, "audio/mp4");
        assert_eq!(presented[0].1.dialog_title, "Share audio file");
    }

    #[tokio::test]
    async fn resolve_failure_maps_to_share_failed() {
        let share = FakeShare::default();
        *share.fail_resolve.lock() = true;

        let err = share_entry(&share, &entry(), DEFAULT_DIALOG_TITLE).await.unwrap_err();

        assert!(matches!(
            err,
            SoundboardError::ShareFailed { source: ShareError::Missing(_), .. }
        ));
        assert!(share.presented.lock().is_empty());
    }

    #[tokio::test]
    async fn present_failure_maps_to_share_failed() {
        let share = FakeShare::default();
        *share.fail_present.lock() = true;

        let err = share_entry(&share, &entry(), DEFAULT_DIALOG_TITLE).await.unwrap_err();

        assert!(matches!(
            err,
            SoundboardError::ShareFailed { source: ShareError::Command(_), ref title } if title == "Cositas lindas"
        ));
    }
}
