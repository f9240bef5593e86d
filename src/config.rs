use crate::error::ConfigError;

pub const DEFAULT_COLUMNS: usize = 33;
pub const DEFAULT_ROWS: usize = 25;
pub const DEFAULT_TICK_MS: u64 = 16;
pub const DEFAULT_RENDER_FPS: u64 = 120;
/// Largest grid a terminal can address: two columns per cell plus status rows
/// must fit in a `u16` screen coordinate.
pub const MAX_COLUMNS: usize = 1024;
pub const MAX_ROWS: usize = 1024;

const COLUMNS_VAR: &str = "MAZE_CHASE_COLS";
const ROWS_VAR: &str = "MAZE_CHASE_ROWS";
const TICK_MS_VAR: &str = "MAZE_CHASE_TICK_MS";
const FPS_VAR: &str = "MAZE_CHASE_FPS";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub columns: usize,
    pub rows: usize,
    pub tick_ms: u64,
    pub render_fps: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            tick_ms: DEFAULT_TICK_MS,
            render_fps: DEFAULT_RENDER_FPS,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset variables keep
    /// their defaults; set ones must parse as positive integers.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            columns: read_positive(&lookup, COLUMNS_VAR, defaults.columns as u64)? as usize,
            rows: read_positive(&lookup, ROWS_VAR, defaults.rows as u64)? as usize,
            tick_ms: read_positive(&lookup, TICK_MS_VAR, defaults.tick_ms)?,
            render_fps: read_positive(&lookup, FPS_VAR, defaults.render_fps)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.columns, self.rows)?;
        if self.columns > MAX_COLUMNS || self.rows > MAX_ROWS {
            return Err(ConfigError::GridTooLarge {
                columns: self.columns,
                rows: self.rows,
                max_columns: MAX_COLUMNS,
                max_rows: MAX_ROWS,
            });
        }
        Ok(())
    }
}

pub fn validate_dimensions(columns: usize, rows: usize) -> Result<(), ConfigError> {
    if columns < 2 || rows < 2 {
        return Err(ConfigError::GridTooSmall { columns, rows });
    }
    Ok(())
}

fn read_positive(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    let parsed = raw.trim().parse::<u64>().ok().filter(|v| *v > 0);
    parsed.ok_or(ConfigError::InvalidValue { name, value: raw })
}
