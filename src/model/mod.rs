//! Model module - Application state and data types
//!
//! This module contains all the data structures and state management for the application.
//! It is organized into submodules by responsibility:
//!
//! - `types`: Core type definitions (focus, UI state, grid movement)
//! - `catalog`: The clip catalog and the search filter
//! - `session`: The single playback session and its observable state
//! - `app_model`: Main application model with state management methods

mod types;
mod catalog;
mod session;
mod app_model;

// Re-export all public types for convenient access
pub use types::{ActiveSection, GridMove, UiState};

pub use catalog::{AudioEntry, Catalog, CatalogEntryConfig, ContentHandle};

pub use session::{ActiveClip, PlaybackSession, PlaybackState};

pub use app_model::AppModel;
