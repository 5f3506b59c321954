//! Core type definitions for the application

use std::time::Instant;

/// Which part of the screen receives key input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveSection {
    #[default]
    Search,
    Grid,
}

/// Direction for moving the grid selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridMove {
    Up,
    Down,
    Left,
    Right,
}

/// UI state for the application
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search_query: String,
    /// Index into the filtered view, not the catalog.
    pub selected: usize,
    pub grid_columns: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    pub notice: Option<String>,
    pub notice_timestamp: Option<Instant>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            active_section: ActiveSection::Search,
            search_query: String::new(),
            selected: 0,
            grid_columns: 2,
            error_message: None,
            error_timestamp: None,
            notice: None,
            notice_timestamp: None,
            show_help_popup: false,
        }
    }
}

impl UiState {
    /// Move the selection within a grid of `count` cards, staying in bounds.
    pub fn move_selection(&mut self, movement: GridMove, count: usize) {
        if count == 0 {
            self.selected = 0;
            return;
        }
        let columns = self.grid_columns.max(1);
        let current = self.selected.min(count - 1);
        self.selected = match movement {
            GridMove::Left => current.saturating_sub(1),
            GridMove::Right => (current + 1).min(count - 1),
            GridMove::Up => current.checked_sub(columns).unwrap_or(current),
            GridMove::Down => {
                if current + columns < count {
                    current + columns
                } else {
                    current
                }
            }
        };
    }

    pub fn clamp_selection(&mut self, count: usize) {
        self.selected = self.selected.min(count.saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(selected: usize, columns: usize) -> UiState {
        UiState {
            selected,
            grid_columns: columns,
            ..UiState::default()
        }
    }

    #[test]
    fn horizontal_moves_stay_in_bounds() {
        let mut ui = state(0, 2);
        ui.move_selection(GridMove::Left, 5);
        assert_eq!(ui.selected, 0);
        ui.move_selection(GridMove::Right, 5);
        assert_eq!(ui.selected, 1);

        let mut ui = state(4, 2);
        ui.move_selection(GridMove::Right, 5);
        assert_eq!(ui.selected, 4);
    }

    #[test]
    fn vertical_moves_jump_by_row() {
        let mut ui = state(1, 2);
        ui.move_selection(GridMove::Down, 5);
        assert_eq!(ui.selected, 3);
        // No card below index 3 in a 5-card, 2-column grid.
        ui.move_selection(GridMove::Down, 5);
        assert_eq!(ui.selected, 3);
        ui.move_selection(GridMove::Up, 5);
        assert_eq!(ui.selected, 1);
        ui.move_selection(GridMove::Up, 5);
        assert_eq!(ui.selected, 1);
    }

    #[test]
    fn empty_grid_resets_selection() {
        let mut ui = state(3, 2);
        ui.move_selection(GridMove::Down, 0);
        assert_eq!(ui.selected, 0);
    }

    #[test]
    fn clamp_pulls_selection_into_view() {
        let mut ui = state(8, 2);
        ui.clamp_selection(3);
        assert_eq!(ui.selected, 2);
        ui.clamp_selection(0);
        assert_eq!(ui.selected, 0);
    }
}
