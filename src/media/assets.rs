//! Asset lookup for bundled clips

use std::path::{Path, PathBuf};

use crate::model::ContentHandle;

/// Maps content handles onto files below the assets directory.
#[derive(Clone, Debug)]
pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, handle: &ContentHandle) -> PathBuf {
        self.root.join(handle.as_str())
    }

    /// Lowercased extension of the asset, used for format hints and MIME types.
    pub fn extension(handle: &ContentHandle) -> Option<String> {
        Path::new(handle.as_str())
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
    }
}
