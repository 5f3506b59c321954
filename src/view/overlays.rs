//! Overlay rendering (error notification, share notice, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::model::UiState;

fn centered_popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

/// Lines a message needs inside a popup of `inner_width` columns.
fn wrapped_line_count(message: &str, inner_width: u16) -> u16 {
    let inner_width = inner_width.max(1) as usize;
    message.chars().count().div_ceil(inner_width).max(1) as u16
}

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        let popup_width = 52.min(area.width.saturating_sub(4));
        let lines = wrapped_line_count(error_msg, popup_width.saturating_sub(4));
        let popup_height = (2 + lines).min(area.height.saturating_sub(4));
        let popup_area = centered_popup(area, popup_width, popup_height);

        // Clear the area behind the popup first
        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

/// Non-blocking notice pinned above the status bar.
pub fn render_notice(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref notice) = ui_state.notice {
        let area = frame.area();
        let width = 60.min(area.width.saturating_sub(2));
        let lines = wrapped_line_count(notice, width.saturating_sub(2));
        let height = (2 + lines).min(area.height);
        let popup_area = Rect {
            x: area.x + area.width.saturating_sub(width) / 2,
            y: area.y + area.height.saturating_sub(height + 3),
            width,
            height,
        };

        frame.render_widget(Clear, popup_area);
        let widget = Paragraph::new(notice.to_string())
            .style(Style::default().fg(Color::Green))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Green))
                    .title(" Shared ")
                    .style(Style::default().bg(Color::Black)),
            );
        frame.render_widget(widget, popup_area);
    }
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = [
        ("", "── Search ──"),
        ("Type", "Filter clips"),
        ("Backspace", "Delete character"),
        ("Esc", "Clear search"),
        ("Tab / ↓ / Enter", "Go to grid"),
        ("Ctrl+Q", "Quit"),
        ("", ""),
        ("", "── Grid ──"),
        ("← ↑ → ↓", "Move selection"),
        ("Enter / Space", "Play / Pause"),
        ("S", "Share clip"),
        ("/ or Tab", "Focus search"),
        ("Esc", "Clear search"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_height = (keybindings.len() as u16 + 2).min(area.height.saturating_sub(4));
    let popup_area = centered_popup(area, 56, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                // Section header or empty line
                Line::from(Span::styled(
                    format!("{:^36}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
