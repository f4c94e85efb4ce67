use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::app::App;
use crate::audio::MediaElement;
use crate::catalog::Catalog;
use crate::error::AppError;
use crate::mpris::ControlCmd;

mod event_loop;
mod logging;
mod mpris_sync;
mod settings;
mod startup;


pub fn run() -> Result<(), AppError> {
    let (settings, config_warning) = settings::load_settings();
    let log_file = logging::init(&settings.log);
    info!(log_file = ?log_file, "starting release-player");
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }

    let cli_path = env::args_os().nth(1).map(PathBuf::from);
    let source = settings.catalog_source(cli_path).inspect_err(|e| {
        error!(error = %e, "no catalog to load");
    })?;
    let catalog = Catalog::load(&source).inspect_err(|e| {
        error!(?source, error = %e, "failed to load catalog");
    })?;
    info!(?source, releases = catalog.len(), "catalog loaded");

    let media = MediaElement::spawn();
    let mut player = startup::apply_audio_defaults(&media, &settings);
    let mut app = App::new(catalog, settings.ui.language);
    startup::apply_ui_defaults(&mut app);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    mpris_sync::update_mpris(&mpris, &app, &player, &settings.ui.artist_name);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut player,
        &media,
        &mpris,
        &control_rx,
        &mut state,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!(error = %e, "event loop failed");
    }
    run_result
}
