use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{info, warn};

use crate::app::App;
use crate::logging;
use crate::mpris::ControlCmd;
use crate::playback::FallbackTimer;

mod event_loop;
mod mpris_sync;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();

    if let Some(path) = logging::init(&settings) {
        info!(log = %path.display(), "calmride starting");
    }
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let (media, media_rx) = startup::spawn_media(&settings);
    let mut controller = startup::build_controller(&settings, media)?;
    let playback_rx = controller.subscribe();
    let mut app = App::new(controller, settings.controls.seek_seconds);

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx.clone());

    mpris_sync::update_mpris(&mpris, &app);

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState {
        media_rx,
        playback_rx,
        control_tx,
        control_rx,
        timer: FallbackTimer::default(),
    };
    let run_result = event_loop::run(&mut terminal, &settings, &mut app, &mpris, &mut state);

    // Covers the error path; a normal quit already shut down with a fade.
    app.controller.shutdown(std::time::Duration::ZERO);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    run_result
}
