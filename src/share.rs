//! Share service contract and the desktop implementation
//!
//! Sharing is two steps: make the clip available as a plain local file, then
//! hand that file to whatever the platform uses as a share sheet.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;

use crate::media::AssetResolver;
use crate::model::ContentHandle;

pub const DEFAULT_DIALOG_TITLE: &str = "Share audio file";
const AUDIO_UTI: &str = "public.audio";

#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Audio asset not found: {0}")]
    Missing(PathBuf),
    #[error("Failed to materialize {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to launch share command: {0}")]
    Spawn(#[source] io::Error),
    #[error("Share command failed: {0}")]
    Command(String),
}

/// What the share sheet is told about the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareOptions {
    pub mime_type: String,
    pub uti: String,
    pub dialog_title: String,
}

impl ShareOptions {
    pub fn for_handle(handle: &ContentHandle, dialog_title: &str) -> Self {
        Self {
            mime_type: mime_type_for(handle).to_string(),
            uti: AUDIO_UTI.to_string(),
            dialog_title: dialog_title.to_string(),
        }
    }
}

pub fn mime_type_for(handle: &ContentHandle) -> &'static str {
    match AssetResolver::extension(handle).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("m4a") | Some("mp4") | Some("aac") => "audio/mp4",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        _ => "application/octet-stream",
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShareOutcome {
    pub path: PathBuf,
}

/// Host facility for handing a clip to other applications.
pub trait ShareService: Send + Sync + 'static {
    fn resolve_local_path(
        &self,
        handle: &ContentHandle,
    ) -> impl Future<Output = Result<PathBuf, ShareError>> + Send;

    fn present_share_sheet(
        &self,
        path: &Path,
        options: &ShareOptions,
    ) -> impl Future<Output = Result<ShareOutcome, ShareError>> + Send;
}

/// Copies clips into a share directory and opens them with the platform file
/// manager, or with a configured command.
#[derive(Clone, Debug)]
pub struct SystemShareService {
    assets: AssetResolver,
    share_dir: PathBuf,
    command: Option<Vec<String>>,
}

impl SystemShareService {
    pub fn new(assets: AssetResolver, share_dir: impl Into<PathBuf>, command: Option<Vec<String>>) -> Self {
        Self {
            assets,
            share_dir: share_dir.into(),
            command,
        }
    }

    fn command_line(&self, path: &Path, options: &ShareOptions) -> Vec<String> {
        match &self.command {
            Some(template) => expand_template(template, path, options),
            None => platform_opener(path),
        }
    }
}

impl ShareService for SystemShareService {
    async fn resolve_local_path(&self, handle: &ContentHandle) -> Result<PathBuf, ShareError> {
        let source = self.assets.path_for(handle);
        let expected_len = match tokio::fs::metadata(&source).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(ShareError::Missing(source)),
            Err(e) => {
                return Err(ShareError::Io {
                    path: source,
                    source: e,
                });
            }
        };

        let target = self.share_dir.join(handle.as_str());
        match tokio::fs::metadata(&target).await {
            Ok(meta) if meta.len() == expected_len => {
                tracing::debug!(path = %target.display(), "Shared copy already present");
                return Ok(target);
            }
            Ok(meta) => {
                tracing::warn!(
                    path = %target.display(),
                    len = meta.len(),
                    expected = expected_len,
                    "Replacing incomplete shared copy"
                );
            }
            Err(_) => {}
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|source| ShareError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // Copy under a scratch name and rename, so the target only ever holds a whole file.
        let partial = partial_path(&target);
        if let Err(e) = tokio::fs::copy(&source, &partial).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(ShareError::Io {
                path: partial,
                source: e,
            });
        }
        tokio::fs::rename(&partial, &target).await.map_err(|source| ShareError::Io {
            path: target.clone(),
            source,
        })?;

        tracing::debug!(from = %source.display(), to = %target.display(), "Materialized clip for sharing");
        Ok(target)
    }

    async fn present_share_sheet(&self, path: &Path, options: &ShareOptions) -> Result<ShareOutcome, ShareError> {
        let argv = self.command_line(path, options);
        let Some((program, args)) = argv.split_first() else {
            return Err(ShareError::Command("empty share command".to_string()));
        };

        tracing::debug!(program = %program, ?args, title = %options.dialog_title, "Launching share command");

        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(ShareError::Spawn)?;

        if !status.success() {
            return Err(ShareError::Command(status.to_string()));
        }

        Ok(ShareOutcome {
            path: path.to_path_buf(),
        })
    }
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    target.with_file_name(name)
}

/// Substitute `{path}`, `{mime}` and `{title}` in a configured command.
fn expand_template(template: &[String], path: &Path, options: &ShareOptions) -> Vec<String> {
    let path = path.display().to_string();
    template
        .iter()
        .map(|arg| {
            arg.replace("{path}", &path)
                .replace("{mime}", &options.mime_type)
                .replace("{title}", &options.dialog_title)
        })
        .collect()
}

fn platform_opener(path: &Path) -> Vec<String> {
    if cfg!(target_os = "macos") {
        vec!["open".to_string(), "-R".to_string(), path.display().to_string()]
    } else if cfg!(target_os = "windows") {
        vec!["explorer".to_string(), format!("/select,{}", path.display())]
    } else {
        // xdg-open has no "reveal", so open the containing folder.
        let folder = path.parent().unwrap_or(path);
        vec!["xdg-open".to_string(), folder.display().to_string()]
    }
}
