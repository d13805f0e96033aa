mod app;
mod config;
mod error;
mod event;
mod games;
mod tui;
mod ui;

use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

use log::{error, info};

use app::App;
use config::ArcadeConfig;
use error::ArcadeError;
use event::CrosstermKeys;

const LOG_ENV: &str = "ASCIICADE_LOG";

/// The screen belongs to the game, so log records go to a file and only
/// when RUST_LOG asks for them.
fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    let path = std::env::var_os(LOG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("asciicade.log"));
    let Ok(file) = File::create(&path) else {
        return;
    };
    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
}

fn run(config: ArcadeConfig) -> Result<(), ArcadeError> {
    let mut terminal = tui::init()?;
    let result = App::new(config).run(&mut terminal, &mut CrosstermKeys);
    // Restore before reporting anything
    tui::restore(&mut terminal)?;
    result.map_err(ArcadeError::from)
}

fn main() -> ExitCode {
    init_logging();
    let config = ArcadeConfig::load();
    info!("[Main] Starting, frame time {:?}", config.frame());

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("[Main] {}", e);
            eprintln!("asciicade: {}", e);
            ExitCode::FAILURE
        }
    }
}
