mod terminal;

use std::fs::File;
use std::sync::Mutex;

use maze_chase::{AppError, Config};
use tracing_subscriber::EnvFilter;

const LOG_FILE_VAR: &str = "MAZE_CHASE_LOG";

fn main() -> Result<(), AppError> {
    init_logging()?;
    let config = Config::from_env()?;
    terminal::play(&config)
}

/// The alternate screen owns stdout and stderr, so logs only go to a file,
/// and only when one is named.
fn init_logging() -> Result<(), AppError> {
    let Some(path) = std::env::var_os(LOG_FILE_VAR) else {
        return Ok(());
    };
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
