//! Main application model with state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::catalog::{AudioEntry, Catalog};
use super::session::PlaybackState;
use super::types::{ActiveSection, GridMove, UiState};

const MESSAGE_TTL: Duration = Duration::from_secs(5);

/// Main application model containing all state
pub struct AppModel {
    catalog: Arc<Catalog>,
    playback_state: Arc<Mutex<PlaybackState>>,
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new(catalog: Catalog, grid_columns: usize) -> Self {
        let ui_state = UiState {
            grid_columns: grid_columns.max(1),
            ..UiState::default()
        };
        Self {
            catalog: Arc::new(catalog),
            playback_state: Arc::new(Mutex::new(PlaybackState::Idle)),
            ui_state: Arc::new(Mutex::new(ui_state)),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // ========================================================================
    // Playback mirror (the controller owns the real session)
    // ========================================================================

    pub async fn set_playback_state(&self, state: PlaybackState) {
        *self.playback_state.lock().await = state;
    }

    pub async fn get_playback_state(&self) -> PlaybackState {
        self.playback_state.lock().await.clone()
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    // ========================================================================
    // Search & Selection
    // ========================================================================

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        state.active_section = section;
    }

    /// Entries matching the current search query, in catalog order.
    pub async fn visible_entries(&self) -> Vec<AudioEntry> {
        let query = self.ui_state.lock().await.search_query.clone();
        self.catalog.filter(&query)
    }

    pub async fn get_selected_entry(&self) -> Option<AudioEntry> {
        let state = self.ui_state.lock().await;
        self.catalog.filter(&state.search_query).get(state.selected).cloned()
    }

    pub async fn update_search_query(&self, query: String) {
        let mut state = self.ui_state.lock().await;
        state.search_query = query;
        self.refilter(&mut state);
    }

    pub async fn append_to_search(&self, c: char) {
        let mut state = self.ui_state.lock().await;
        state.search_query.push(c);
        self.refilter(&mut state);
    }

    pub async fn backspace_search(&self) {
        let mut state = self.ui_state.lock().await;
        state.search_query.pop();
        self.refilter(&mut state);
    }

    fn refilter(&self, state: &mut UiState) {
        let count = self.catalog.filter(&state.search_query).len();
        state.clamp_selection(count);
    }

    pub async fn move_selection(&self, movement: GridMove) {
        let mut state = self.ui_state.lock().await;
        let count = self.catalog.filter(&state.search_query).len();
        state.move_selection(movement, count);
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn set_notice(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.notice = Some(message);
        state.notice_timestamp = Some(Instant::now());
    }

    pub async fn auto_clear_old_messages(&self) {
        let mut state = self.ui_state.lock().await;
        if state.error_timestamp.is_some_and(|t| t.elapsed() > MESSAGE_TTL) {
            state.error_message = None;
            state.error_timestamp = None;
        }
        if state.notice_timestamp.is_some_and(|t| t.elapsed() > MESSAGE_TTL) {
            state.notice = None;
            state.notice_timestamp = None;
        }
    }

    pub async fn toggle_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = !state.show_help_popup;
    }

    pub async fn hide_help_popup(&self) {
        let mut state = self.ui_state.lock().await;
        state.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> AppModel {
        AppModel::new(Catalog::builtin(), 2)
    }

    #[tokio::test]
    async fn typing_filters_live() {
        let model = model();
        for c in "bien".chars() {
            model.append_to_search(c).await;
        }
        let visible = model.visible_entries().await;
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);

        model.backspace_search().await;
        assert_eq!(model.get_ui_state().await.search_query, "bie");
    }

    #[tokio::test]
    async fn narrowing_search_clamps_selection() {
        let model = model();
        model.move_selection(GridMove::Down).await;
        model.move_selection(GridMove::Down).await;
        model.move_selection(GridMove::Right).await;
        assert_eq!(model.get_ui_state().await.selected, 5);

        model.update_search_query("amigos".to_string()).await;
        assert_eq!(model.get_ui_state().await.selected, 0);
        assert_eq!(model.get_selected_entry().await.map(|e| e.id), Some(2));
    }

    #[tokio::test]
    async fn selection_is_none_when_nothing_matches() {
        let model = model();
        model.update_search_query("no such clip".to_string()).await;
        assert!(model.get_selected_entry().await.is_none());
    }

    #[tokio::test]
    async fn fresh_errors_survive_auto_clear() {
        let model = model();
        model.set_error("boom".to_string()).await;
        model.auto_clear_old_messages().await;
        assert!(model.has_error().await);
        model.clear_error().await;
        assert!(!model.has_error().await);
    }

    #[tokio::test]
    async fn columns_are_at_least_one() {
        let model = AppModel::new(Catalog::builtin(), 0);
        assert_eq!(model.get_ui_state().await.grid_columns, 1);
    }
}
