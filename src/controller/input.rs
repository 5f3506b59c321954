//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::media::MediaService;
use crate::model::{ActiveSection, GridMove};
use crate::share::ShareService;
use super::AppController;

impl<M: MediaService, S: ShareService> AppController<M, S> {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            };
        }

        let ui_state = model.get_ui_state().await;

        // Every keystroke in the search field refilters the grid
        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Enter => {
                    model.set_active_section(ActiveSection::Grid).await;
                }
                KeyCode::Esc => {
                    model.update_search_query(String::new()).await;
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                }
                KeyCode::Char(c) => {
                    // Q still quits even in search mode when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                        model.set_should_quit(true).await;
                    } else {
                        model.append_to_search(c).await;
                    }
                }
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('/') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            KeyCode::Up => {
                model.move_selection(GridMove::Up).await;
            }
            KeyCode::Down => {
                model.move_selection(GridMove::Down).await;
            }
            KeyCode::Left => {
                model.move_selection(GridMove::Left).await;
            }
            KeyCode::Right => {
                model.move_selection(GridMove::Right).await;
            }
            // Play/Pause toggle
            KeyCode::Enter | KeyCode::Char(' ') => {
                drop(model);
                self.toggle_selected().await;
            }
            // Share
            KeyCode::Char('s') | KeyCode::Char('S') => {
                drop(model);
                self.share_selected().await;
            }
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.toggle_help_popup().await;
            }
            KeyCode::Esc => {
                model.update_search_query(String::new()).await;
            }
            _ => {}
        }
        Ok(())
    }
}
