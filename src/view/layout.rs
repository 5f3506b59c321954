//! Top bar rendering (search input, now playing)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, PlaybackState, UiState};
use super::utils::truncate_string;

const NOW_PLAYING_WIDTH: u16 = 32;

pub fn render_top_bar(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    playback: &PlaybackState,
    now_playing_title: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),                    // Search input
            Constraint::Length(NOW_PLAYING_WIDTH), // Now playing
        ])
        .split(area);

    let focused = ui_state.active_section == ActiveSection::Search;
    let search_style = if focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if ui_state.search_query.is_empty() && !focused {
        "Search clips... (/)".to_string()
    } else if focused {
        format!("{}_", ui_state.search_query)
    } else {
        ui_state.search_query.clone()
    };

    let search = Paragraph::new(search_text).style(search_style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search ")
            .padding(Padding::horizontal(1))
            .border_style(if focused {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            }),
    );
    frame.render_widget(search, chunks[0]);

    let label = match (playback, now_playing_title) {
        (PlaybackState::Idle, _) | (_, None) => "Nothing playing".to_string(),
        (PlaybackState::Playing(_), Some(title)) => format!("▶ {}", title),
        (PlaybackState::Paused(_), Some(title)) => format!("⏸ {}", title),
    };
    let inner_width = NOW_PLAYING_WIDTH.saturating_sub(4) as usize;

    let now_playing = Paragraph::new(truncate_string(&label, inner_width))
        .style(Style::default().fg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Now Playing ")
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(now_playing, chunks[1]);
}
