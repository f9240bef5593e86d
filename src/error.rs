use std::io;

use thiserror::Error;

/// Startup configuration problems. Raised before a session starts, never mid-game.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least 2x2 cells, got {columns}x{rows}")]
    GridTooSmall { columns: usize, rows: usize },
    #[error("grid must be at most {max_columns}x{max_rows} cells, got {columns}x{rows}")]
    GridTooLarge {
        columns: usize,
        rows: usize,
        max_columns: usize,
        max_rows: usize,
    },
    #[error("{name} must be a positive integer, got {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}
