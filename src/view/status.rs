//! Status bar rendering

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::PlaybackState;

pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    playback: &PlaybackState,
    now_playing_title: Option<&str>,
) {
    let (status_text, color) = match (playback, now_playing_title) {
        (PlaybackState::Playing(_), Some(title)) => (format!(" ▶ Playing: {}", title), Color::Green),
        (PlaybackState::Paused(_), Some(title)) => (format!(" ⏸  Paused: {}", title), Color::Yellow),
        _ => (" No clip playing".to_string(), Color::DarkGray),
    };

    let hints = " Enter play/pause | S share | / search | H help | Q quit ";

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title_bottom(Line::from(hints).right_aligned()),
        );

    frame.render_widget(status, area);
}
