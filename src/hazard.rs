use rand::Rng;
use tracing::{debug, trace};

use crate::grid::{Grid, Pos};

pub const HAZARD_COUNT: usize = 20;
pub const HAZARD_LIFETIME: u32 = 180;
pub const HAZARD_MIN_INITIAL_LIFETIME: u32 = 30;
pub const SPAWN_ATTEMPTS: usize = 50;
/// Side of the square kept hazard-free at the start and goal corners.
pub const SAFE_ZONE: usize = 3;
pub const FLICKER_TICKS: u32 = 60;
pub const FLICKER_PERIOD: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hazard {
    pub pos: Pos,
    pub remaining: u32,
}

impl Hazard {
    pub fn is_visible(&self) -> bool {
        is_visible(self.remaining)
    }

    pub fn remaining_fraction(&self) -> f32 {
        self.remaining as f32 / HAZARD_LIFETIME as f32
    }
}

/// Blink cue for hazards about to vanish: hidden on alternate 5-tick windows
/// during the last 60 ticks.
pub fn is_visible(remaining: u32) -> bool {
    !(remaining < FLICKER_TICKS && (remaining / FLICKER_PERIOD) % 2 == 0)
}

/// Fixed pool of hazard slots. A slot is empty only while a respawn keeps
/// failing; every tick retries it.
#[derive(Clone, Debug)]
pub struct HazardManager {
    slots: Vec<Option<Hazard>>,
    expired: Vec<usize>,
}

impl HazardManager {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
            expired: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn hazards(&self) -> impl Iterator<Item = &Hazard> + '_ {
        self.slots.iter().flatten()
    }

    pub fn occupies(&self, pos: Pos) -> bool {
        self.hazards().any(|hazard| hazard.pos == pos)
    }

    /// Refills every slot with staggered lifetimes so the first wave does not
    /// expire all at once.
    pub fn initialize(&mut self, grid: &Grid, rng: &mut impl Rng) {
        for idx in 0..self.slots.len() {
            self.slots[idx] = spawn(grid, rng).map(|pos| Hazard {
                pos,
                remaining: rng.gen_range(HAZARD_MIN_INITIAL_LIFETIME..=HAZARD_LIFETIME),
            });
        }
        debug!(hazards = self.len(), "hazards seeded");
    }

    pub fn tick(&mut self, grid: &Grid, rng: &mut impl Rng) {
        self.expired.clear();
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if let Some(hazard) = slot {
                hazard.remaining = hazard.remaining.saturating_sub(1);
                if hazard.remaining == 0 {
                    self.expired.push(idx);
                }
            }
        }
        for &idx in &self.expired {
            self.slots[idx] = None;
        }

        for slot in self.slots.iter_mut().filter(|slot| slot.is_none()) {
            *slot = spawn(grid, rng).map(|pos| Hazard {
                pos,
                remaining: HAZARD_LIFETIME,
            });
            if let Some(hazard) = slot {
                trace!(x = hazard.pos.x, y = hazard.pos.y, "hazard respawned");
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn set_slot(&mut self, idx: usize, hazard: Option<Hazard>) {
        self.slots[idx] = hazard;
    }
}

/// Samples cells with a gate that favours the far side of the maze. Returns
/// `None` once the attempt budget is spent.
fn spawn(grid: &Grid, rng: &mut impl Rng) -> Option<Pos> {
    let (width, height) = (grid.width(), grid.height());
    for _ in 0..SPAWN_ATTEMPTS {
        let pos = Pos::new(rng.gen_range(0..width), rng.gen_range(0..height));
        let weight = (pos.x + pos.y) as f64 / (width + height) as f64 + 0.1;
        if rng.gen::<f64>() >= weight {
            continue;
        }
        if !grid.is_open(pos) || in_safe_zone(grid, pos) {
            continue;
        }
        return Some(pos);
    }
    debug!("hazard spawn budget exhausted");
    None
}

fn in_safe_zone(grid: &Grid, pos: Pos) -> bool {
    let goal = grid.goal();
    let near_start = pos.x < SAFE_ZONE && pos.y < SAFE_ZONE;
    let near_goal = pos.x + SAFE_ZONE > goal.x && pos.y + SAFE_ZONE > goal.y;
    near_start || near_goal
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open_field(width: usize, height: usize) -> Grid {
        let mut grid = Grid::filled(width, height);
        for y in 0..height {
            for x in 0..width {
                grid.open(Pos::new(x, y));
            }
        }
        grid.collect_open_cells();
        grid
    }

    #[test]
    fn flicker_only_in_final_window() {
        assert!(is_visible(180));
        assert!(is_visible(60));
        assert!(is_visible(59));
        assert!(is_visible(55));
        assert!(!is_visible(50));
        assert!(!is_visible(54));
        assert!(is_visible(45));
        assert!(!is_visible(4));
        assert!(is_visible(5));
    }

    #[test]
    fn hazards_avoid_walls_and_safe_corners() {
        let mut grid = open_field(12, 12);
        let mut rng = StdRng::seed_from_u64(11);
        let mut hazards = HazardManager::new(HAZARD_COUNT);
        hazards.initialize(&grid, &mut rng);
        for hazard in hazards.hazards() {
            assert!(!in_safe_zone(&grid, hazard.pos));
            assert!(hazard.remaining >= HAZARD_MIN_INITIAL_LIFETIME);
            assert!(hazard.remaining <= HAZARD_LIFETIME);
        }

        grid = Grid::filled(12, 12);
        grid.open(Pos::new(0, 0));
        hazards.initialize(&grid, &mut rng);
        assert!(hazards.is_empty(), "no legal cell means nothing spawns");
    }

    #[test]
    fn safe_zone_is_three_by_three() {
        let grid = open_field(10, 8);
        assert!(in_safe_zone(&grid, Pos::new(2, 2)));
        assert!(!in_safe_zone(&grid, Pos::new(3, 0)));
        assert!(in_safe_zone(&grid, Pos::new(7, 5)));
        assert!(!in_safe_zone(&grid, Pos::new(6, 7)));
        assert!(!in_safe_zone(&grid, Pos::new(9, 4)));
    }

    #[test]
    fn expired_slots_respawn_with_full_lifetime() {
        let grid = open_field(12, 12);
        let mut rng = StdRng::seed_from_u64(5);
        let mut hazards = HazardManager::new(2);
        hazards.set_slot(
            0,
            Some(Hazard {
                pos: Pos::new(6, 6),
                remaining: 1,
            }),
        );
        hazards.set_slot(
            1,
            Some(Hazard {
                pos: Pos::new(7, 7),
                remaining: 10,
            }),
        );

        hazards.tick(&grid, &mut rng);

        let remaining: Vec<u32> = hazards.hazards().map(|h| h.remaining).collect();
        assert_eq!(remaining, vec![HAZARD_LIFETIME, 9]);
    }

    #[test]
    fn pool_size_is_conserved() {
        let grid = open_field(15, 15);
        let mut rng = StdRng::seed_from_u64(21);
        let mut hazards = HazardManager::new(HAZARD_COUNT);
        hazards.initialize(&grid, &mut rng);
        assert_eq!(hazards.len(), HAZARD_COUNT);
        for _ in 0..600 {
            hazards.tick(&grid, &mut rng);
            assert_eq!(hazards.len(), HAZARD_COUNT);
        }
    }
}
