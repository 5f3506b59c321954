//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (truncation, grid scrolling)
//! - `layout`: Top bar (search input, now playing)
//! - `grid`: The clip grid
//! - `status`: Status bar
//! - `overlays`: Error notification, share notice, help popup

mod utils;
mod layout;
mod grid;
mod status;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{AudioEntry, PlaybackState, UiState};

pub struct AppView;

impl AppView {
    pub fn render(
        frame: &mut Frame,
        playback: &PlaybackState,
        ui_state: &UiState,
        entries: &[AudioEntry],
        now_playing_title: Option<&str>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + now playing
                Constraint::Min(0),    // Clip grid
                Constraint::Length(3), // Status bar
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state, playback, now_playing_title);

        grid::render_grid(frame, chunks[1], ui_state, entries, playback);

        status::render_status_bar(frame, chunks[2], playback, now_playing_title);

        if ui_state.notice.is_some() {
            overlays::render_notice(frame, ui_state);
        }

        // Error notification overlay (if there's an error)
        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        // Help popup overlay (if open)
        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
