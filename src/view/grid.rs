//! Clip grid rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, AudioEntry, PlaybackState, UiState};
use super::utils::{truncate_string, visible_row_window};

const CARD_HEIGHT: u16 = 4;

pub fn render_grid(
    frame: &mut Frame,
    area: Rect,
    ui_state: &UiState,
    entries: &[AudioEntry],
    playback: &PlaybackState,
) {
    let is_focused = ui_state.active_section == ActiveSection::Grid;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Clips ({}) ", entries.len()))
        .border_style(border_style);

    if entries.is_empty() {
        let empty = Paragraph::new(format!("No clips match \"{}\"", ui_state.search_query))
            .style(Style::default().fg(Color::DarkGray))
            .block(block.padding(Padding::horizontal(1)));
        frame.render_widget(empty, area);
        return;
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = ui_state.grid_columns.max(1);
    let total_rows = entries.len().div_ceil(columns);
    let capacity = (inner.height / CARD_HEIGHT) as usize;
    if capacity == 0 {
        return;
    }
    let selected = ui_state.selected.min(entries.len() - 1);
    let window = visible_row_window(selected / columns, total_rows, capacity);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(window.clone().map(|_| Constraint::Length(CARD_HEIGHT)))
        .split(inner);

    for (row_area, row) in row_areas.iter().zip(window) {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..columns).map(|_| Constraint::Ratio(1, columns as u32)))
            .split(*row_area);

        for (col, cell) in cells.iter().enumerate() {
            let index = row * columns + col;
            if let Some(entry) = entries.get(index) {
                render_card(frame, *cell, entry, index == selected, is_focused, playback);
            }
        }
    }
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    entry: &AudioEntry,
    is_selected: bool,
    is_focused: bool,
    playback: &PlaybackState,
) {
    let is_playing = playback.is_playing_handle(&entry.handle);
    let is_loaded = playback.active_handle() == Some(&entry.handle);

    let border_style = if is_selected && is_focused {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if is_selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else if is_loaded {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title_width = area.width.saturating_sub(4) as usize;
    let title = format!(" {} ", truncate_string(&entry.title, title_width));

    let (play_icon, play_label) = if is_playing { ("⏸", "Pause") } else { ("▶", "Play") };
    let play_style = Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD);
    let share_style = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);

    let controls = Line::from(vec![
        Span::styled(format!("{} {}", play_icon, play_label), play_style),
        Span::raw("    "),
        Span::styled("⇪ Share", share_style),
    ]);

    let card = Paragraph::new(vec![Line::from(""), controls])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .title_alignment(Alignment::Center)
                .border_style(border_style),
        );
    frame.render_widget(card, area);
}
