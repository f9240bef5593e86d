use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::grid::{Grid, Pos};

pub const MAX_PICKUPS: usize = 10;

/// Shield coins placed in dead ends.
#[derive(Clone, Debug, Default)]
pub struct PickupManager {
    pickups: Vec<Pos>,
}

impl PickupManager {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn with_pickups(pickups: Vec<Pos>) -> Self {
        Self { pickups }
    }

    pub fn pickups(&self) -> &[Pos] {
        &self.pickups
    }

    pub fn spawn(&mut self, grid: &Grid, rng: &mut impl Rng) {
        let candidates = dead_ends(grid);
        self.pickups = if candidates.len() > MAX_PICKUPS {
            candidates
                .choose_multiple(rng, MAX_PICKUPS)
                .copied()
                .collect()
        } else {
            candidates
        };
        debug!(pickups = self.pickups.len(), "pickups placed");
    }

    /// Removes the pickup at `pos`, returning whether one was there.
    pub fn consume(&mut self, pos: Pos) -> bool {
        match self.pickups.iter().position(|&p| p == pos) {
            Some(idx) => {
                self.pickups.swap_remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Interior open cells walled in on at least three sides.
pub fn dead_ends(grid: &Grid) -> Vec<Pos> {
    let mut cells = Vec::new();
    for y in 1..grid.height().saturating_sub(1) {
        for x in 1..grid.width().saturating_sub(1) {
            let pos = Pos::new(x, y);
            if grid.is_open(pos) && grid.wall_neighbors(pos) >= 3 {
                cells.push(pos);
            }
        }
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::generate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Comb: a corridor along row 1 with single-cell teeth hanging off it.
    fn comb(teeth: usize) -> Grid {
        let width = teeth * 2 + 1;
        let mut grid = Grid::filled(width, 4);
        for x in 1..width - 1 {
            grid.open(Pos::new(x, 1));
        }
        for tooth in 0..teeth {
            grid.open(Pos::new(tooth * 2 + 1, 2));
        }
        grid.collect_open_cells();
        grid
    }

    #[test]
    fn only_teeth_are_dead_ends() {
        let grid = comb(3);
        assert_eq!(
            dead_ends(&grid),
            vec![Pos::new(1, 2), Pos::new(3, 2), Pos::new(5, 2)]
        );
    }

    #[test]
    fn caps_at_ten() {
        let grid = comb(20);
        assert!(dead_ends(&grid).len() > MAX_PICKUPS);
        let mut rng = StdRng::seed_from_u64(4);
        let mut pickups = PickupManager::new();
        pickups.spawn(&grid, &mut rng);
        assert_eq!(pickups.pickups().len(), MAX_PICKUPS);

        let mut unique = pickups.pickups().to_vec();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), MAX_PICKUPS);
    }

    #[test]
    fn generated_mazes_never_exceed_cap() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut pickups = PickupManager::new();
        for (w, h) in [(5, 5), (21, 15), (61, 41)] {
            let grid = generate(w, h, &mut rng).unwrap();
            pickups.spawn(&grid, &mut rng);
            assert!(pickups.pickups().len() <= MAX_PICKUPS);
            let candidates = dead_ends(&grid);
            for &pos in pickups.pickups() {
                assert!(grid.is_open(pos));
                assert!(grid.wall_neighbors(pos) >= 3, "{pos:?} is not a dead end");
                assert!(candidates.contains(&pos));
                assert!(pos.x > 0 && pos.y > 0 && pos.x < w - 1 && pos.y < h - 1);
            }
        }
    }

    #[test]
    fn consume_removes_once() {
        let grid = comb(2);
        let mut rng = StdRng::seed_from_u64(1);
        let mut pickups = PickupManager::new();
        pickups.spawn(&grid, &mut rng);
        let target = pickups.pickups()[0];
        assert!(pickups.consume(target));
        assert!(!pickups.consume(target));
        assert!(!pickups.pickups().contains(&target));
    }
}
