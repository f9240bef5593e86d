//! Growing-tree maze carving.
//!
//! Cells at even coordinates are carved as rooms; the odd cell between two
//! rooms is opened when they are joined, so the result is a spanning tree over
//! the rooms. The goal corner is patched open afterwards.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::config::validate_dimensions;
use crate::error::ConfigError;
use crate::grid::{Dir, Grid, Pos};

/// Chance of extending the newest active cell instead of a random one.
/// Higher values give longer corridors, lower values more branching.
pub const NEWEST_BIAS: f64 = 0.5;

pub fn generate(columns: usize, rows: usize, rng: &mut impl Rng) -> Result<Grid, ConfigError> {
    validate_dimensions(columns, rows)?;
    Ok(carve(columns, rows, rng))
}

/// Carving proper. Callers must have validated the dimensions.
pub(crate) fn carve(columns: usize, rows: usize, rng: &mut impl Rng) -> Grid {
    let mut grid = Grid::filled(columns, rows);
    let origin = grid.origin();
    grid.open(origin);
    let mut active = vec![origin];

    while !active.is_empty() {
        let idx = select_active(active.len(), rng);
        let current = active[idx];

        let mut neighbors = Vec::new();
        for dir in Dir::ALL {
            if let Some(next) = grid.offset(current, dir, 2) {
                if !grid.is_open(next) {
                    neighbors.push((next, dir));
                }
            }
        }

        match neighbors.choose(rng) {
            Some(&(next, dir)) => {
                if let Some(between) = grid.offset(current, dir, 1) {
                    grid.open(between);
                }
                grid.open(next);
                active.push(next);
            }
            None => {
                active.remove(idx);
            }
        }
    }

    open_goal_pocket(&mut grid);
    grid.collect_open_cells();
    debug!(
        columns,
        rows,
        open_cells = grid.open_cells().len(),
        "maze carved"
    );
    grid
}

/// Picks which active cell to grow from: the newest one with probability
/// [`NEWEST_BIAS`], otherwise any of them uniformly.
pub fn select_active(len: usize, rng: &mut impl Rng) -> usize {
    debug_assert!(len > 0);
    if rng.gen_bool(NEWEST_BIAS) {
        len - 1
    } else {
        rng.gen_range(0..len)
    }
}

fn open_goal_pocket(grid: &mut Grid) {
    let goal = grid.goal();
    grid.open(goal);
    grid.open(Pos::new(goal.x - 1, goal.y));
    grid.open(Pos::new(goal.x, goal.y - 1));
}
