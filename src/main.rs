mod audio;
mod config;
mod controller;
mod error;
mod logging;
mod media;
mod model;
mod share;
mod view;

use std::io;
use std::sync::Arc;
use anyhow::Result;
use std::time::Duration;
use tokio::sync::Mutex;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use audio::RodioMediaService;
use config::AppConfig;
use controller::{AppController, PlaybackController};
use media::{AssetResolver, MediaService};
use model::AppModel;
use share::{ShareService, SystemShareService};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    if let Err(e) = logging::init_logging(&config.log_dir) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== Soundboard Starting ===");

    let catalog = config.build_catalog()?;
    tracing::info!(
        clips = catalog.len(),
        assets = %config.assets_dir.display(),
        "Catalog loaded"
    );

    let model = Arc::new(Mutex::new(AppModel::new(catalog, config.grid_columns)));
    let assets = AssetResolver::new(&config.assets_dir);

    // The output stream has to stay alive (and on this thread) until exit
    let (_stream, output) = match audio::open_default_output() {
        Ok((stream, handle)) => (Some(stream), Some(handle)),
        Err(e) => {
            tracing::error!(error = %e, "Audio output unavailable");
            model.lock().await.set_error(format!("Audio init failed: {}", e)).await;
            (None, None)
        }
    };

    let media = Arc::new(RodioMediaService::new(output, assets.clone()));
    let share = Arc::new(SystemShareService::new(
        assets,
        &config.share_dir,
        config.share_command.clone(),
    ));

    let (playback, player_events) = PlaybackController::new(media);
    let controller = AppController::new(
        model.clone(),
        Arc::new(playback),
        share,
        config.share_dialog_title.clone(),
    );
    controller.start_player_event_listener(player_events);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model.clone(), controller.clone()).await;

    // Release the audio slot before the output stream goes away
    controller.shutdown().await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("Soundboard shutting down");
    Ok(())
}

async fn run_app<M: MediaService, S: ShareService>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: AppController<M, S>,
) -> io::Result<()> {
    loop {
        // Get current state
        let (playback, ui_state, entries, now_playing, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors and notices (after 5 seconds)
            model_guard.auto_clear_old_messages().await;

            let playback = model_guard.get_playback_state().await;
            let now_playing = playback
                .active_handle()
                .and_then(|handle| model_guard.catalog().title_for(handle))
                .map(str::to_string);

            (
                playback,
                model_guard.get_ui_state().await,
                model_guard.visible_entries().await,
                now_playing,
                model_guard.should_quit().await,
            )
        };

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, &entries, now_playing.as_deref());
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
