//! Simulation core for a two-player maze chase.
//!
//! A mouse and a cat race from the top-left corner to the goal in the
//! bottom-right corner of a freshly carved maze. Dogs appear and vanish along
//! the way; coins in dead ends grant a short shield against them. The core is
//! tick-driven and free of I/O: a front end feeds an [`InputSnapshot`] into
//! [`Session::tick`] and reads the session back for display.

pub mod config;
pub mod entity;
pub mod error;
pub mod grid;
pub mod hazard;
pub mod maze;
pub mod pickup;
pub mod session;

pub use config::Config;
pub use entity::{Entity, LifeState, Role};
pub use error::{AppError, ConfigError};
pub use grid::{Dir, Grid, Pos, Tile};
pub use hazard::{Hazard, HazardManager};
pub use maze::generate;
pub use pickup::PickupManager;
pub use session::{HeldKeys, InputSnapshot, Session, SessionState};
