use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::Result;
use kumtanesi_core::{Config, HttpBackend};
use tracing_subscriber::EnvFilter;

mod app;
mod handler;
mod pane;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

/// Log to a file in the config directory; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<()> {
    let dir = Config::config_dir()?;
    std::fs::create_dir_all(&dir)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("kumtanesi.log"))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let (config, load_error) = Config::load();

    if let Err(err) = init_logging(&config) {
        eprintln!("Logging disabled: {}", err);
    }
    if let Some(err) = load_error {
        tracing::warn!(error = %err, "config unreadable, using defaults");
    }

    let backend = HttpBackend::new(&config.base_url, config.response_variant)?;
    tracing::info!(base_url = %backend.base_url(), "starting chat client");

    tui::install_panic_hook();
    let mut terminal = tui::init()?;

    let mut events = EventHandler::new();
    let mut app = App::new(backend, &config, events.sender());
    app.load_history();

    let result = run(&mut terminal, &mut app, &mut events).await;

    events.dispose();
    tui::restore()?;

    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }

    Ok(())
}
