//! The clip catalog and search filtering

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use serde::Deserialize;
use thiserror::Error;

/// Opaque reference to a bundled clip (its file name inside the assets directory).
///
/// Equality on the handle is what decides whether two requests address the
/// same clip.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContentHandle(Arc<str>);

impl ContentHandle {
    pub fn new(asset: impl Into<Arc<str>>) -> Self {
        Self(asset.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioEntry {
    pub id: u32,
    pub title: String,
    pub handle: ContentHandle,
}

impl AudioEntry {
    pub fn new(id: u32, title: impl Into<String>, asset: &str) -> Self {
        Self {
            id,
            title: title.into(),
            handle: ContentHandle::new(asset),
        }
    }
}

/// Catalog entry as written in the config file.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct CatalogEntryConfig {
    pub id: u32,
    pub title: String,
    pub file: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Duplicate catalog id {0}")]
    DuplicateId(u32),
    #[error("Catalog entry {0} has an empty title")]
    EmptyTitle(u32),
}

const BUILTIN_CLIPS: &[(u32, &str, &str)] = &[
    (1, "Andá a la cancha bobo", "andalacancha.mp3"),
    (2, "Y bien amigos", "ybienamigos.mp3"),
    (3, "Cositas lindas", "cositaslindas.m4a"),
    (4, "Quinteros Madrid", "golquinteros.mp3"),
    (5, "Que la chupen", "maradonachupen.mp3"),
    (6, "Tatan tatan", "tatantatan.mp3"),
    (7, "Pisala Pomelo", "pisalapomelo.mp3"),
    (8, "Anda payá", "quemirasbobo.mp3"),
    (9, "Ramón tití", "ramontiti.mp3"),
    (10, "Somos Montiel", "somostodosmontiel.mp3"),
];

/// Immutable list of clips, built once at startup.
#[derive(Clone, Debug)]
pub struct Catalog {
    entries: Vec<AudioEntry>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_CLIPS
                .iter()
                .map(|(id, title, file)| AudioEntry::new(*id, *title, file))
                .collect(),
        }
    }

    pub fn from_entries(entries: Vec<AudioEntry>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::new();
        for entry in &entries {
            if !seen.insert(entry.id) {
                return Err(CatalogError::DuplicateId(entry.id));
            }
            if entry.title.trim().is_empty() {
                return Err(CatalogError::EmptyTitle(entry.id));
            }
        }
        Ok(Self { entries })
    }

    pub fn from_config(entries: &[CatalogEntryConfig]) -> Result<Self, CatalogError> {
        Self::from_entries(
            entries
                .iter()
                .map(|e| AudioEntry::new(e.id, e.title.clone(), &e.file))
                .collect(),
        )
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[AudioEntry] {
        &self.entries
    }

    pub fn title_for(&self, handle: &ContentHandle) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.handle == *handle)
            .map(|e| e.title.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn filter(&self, query: &str) -> Vec<AudioEntry> {
        filter(&self.entries, query).into_iter().cloned().collect()
    }
}

/// Entries whose title contains `query`, ignoring case, in catalog order.
pub fn filter<'a>(entries: &'a [AudioEntry], query: &str) -> Vec<&'a AudioEntry> {
    if query.is_empty() {
        return entries.iter().collect();
    }
    let needle = query.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.title.to_lowercase().contains(&needle))
        .collect()
}
