//! Session state machine and the per-tick simulation step.

use rand::Rng;
use tracing::info;

use crate::entity::{Entity, Role};
use crate::error::ConfigError;
use crate::grid::{Dir, Grid};
use crate::hazard::{HazardManager, HAZARD_COUNT};
use crate::maze::{carve, generate};
use crate::pickup::PickupManager;

/// Direction keys held by one player this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl HeldKeys {
    pub fn only(dir: Dir) -> Self {
        let mut keys = Self::default();
        keys.set(dir, true);
        keys
    }

    pub fn set(&mut self, dir: Dir, held: bool) {
        match dir {
            Dir::Up => self.up = held,
            Dir::Down => self.down = held,
            Dir::Left => self.left = held,
            Dir::Right => self.right = held,
        }
    }

    pub fn is_held(&self, dir: Dir) -> bool {
        match dir {
            Dir::Up => self.up,
            Dir::Down => self.down,
            Dir::Left => self.left,
            Dir::Right => self.right,
        }
    }

    /// At most one direction per tick, in priority up, down, left, right.
    pub fn intent(&self) -> Option<Dir> {
        Dir::ALL.into_iter().find(|&dir| self.is_held(dir))
    }
}

/// Snapshot of all eight direction keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub mouse: HeldKeys,
    pub cat: HeldKeys,
}

impl InputSnapshot {
    pub fn keys(&self, role: Role) -> HeldKeys {
        match role {
            Role::Mouse => self.mouse,
            Role::Cat => self.cat,
        }
    }

    pub fn keys_mut(&mut self, role: Role) -> &mut HeldKeys {
        match role {
            Role::Mouse => &mut self.mouse,
            Role::Cat => &mut self.cat,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Resolved,
}

pub struct Session {
    columns: usize,
    rows: usize,
    grid: Grid,
    mouse: Entity,
    cat: Entity,
    hazards: HazardManager,
    pickups: PickupManager,
    state: SessionState,
    winner: Option<Role>,
}

impl Session {
    /// Builds an idle session. A first maze is carved so there is something to
    /// show behind the title screen.
    pub fn new(columns: usize, rows: usize, rng: &mut impl Rng) -> Result<Self, ConfigError> {
        Ok(Self {
            columns,
            rows,
            grid: generate(columns, rows, rng)?,
            mouse: Entity::new(Role::Mouse),
            cat: Entity::new(Role::Cat),
            hazards: HazardManager::new(HAZARD_COUNT),
            pickups: PickupManager::new(),
            state: SessionState::Idle,
            winner: None,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn winner(&self) -> Option<Role> {
        self.winner
    }

    pub fn hazards(&self) -> &HazardManager {
        &self.hazards
    }

    pub fn pickups(&self) -> &PickupManager {
        &self.pickups
    }

    pub fn entity(&self, role: Role) -> &Entity {
        match role {
            Role::Mouse => &self.mouse,
            Role::Cat => &self.cat,
        }
    }

    /// Entities in resolution order.
    pub fn entities(&self) -> [&Entity; 2] {
        [&self.mouse, &self.cat]
    }

    /// Starts a fresh round from Idle or Resolved. Returns false, doing
    /// nothing, while a round is in progress.
    pub fn start_or_restart(&mut self, rng: &mut impl Rng) -> bool {
        if self.state == SessionState::Active {
            return false;
        }
        self.grid = carve(self.columns, self.rows, rng);
        self.mouse.reset();
        self.cat.reset();
        self.hazards.initialize(&self.grid, rng);
        self.pickups.spawn(&self.grid, rng);
        self.winner = None;
        self.state = SessionState::Active;
        info!(
            columns = self.columns,
            rows = self.rows,
            open_cells = self.grid.open_cells().len(),
            hazards = self.hazards.len(),
            pickups = self.pickups.pickups().len(),
            "round started"
        );
        true
    }

    pub fn tick(&mut self, input: &InputSnapshot, rng: &mut impl Rng) {
        if self.state == SessionState::Active {
            self.simulate(input, rng);
        }
        self.mouse.advance_visual();
        self.cat.advance_visual();
    }

    fn simulate(&mut self, input: &InputSnapshot, rng: &mut impl Rng) {
        for entity in [&mut self.mouse, &mut self.cat] {
            entity.update(&self.grid, input.keys(entity.role()).intent());
        }
        self.hazards.tick(&self.grid, rng);

        for entity in [&mut self.mouse, &mut self.cat] {
            resolve_contacts(entity, &mut self.pickups, &self.hazards);
        }

        let goal = self.grid.goal();
        if let Some(winner) = [&self.mouse, &self.cat]
            .into_iter()
            .find(|entity| entity.pos() == goal)
            .map(|entity| entity.role())
        {
            info!(winner = winner.name(), "round resolved");
            self.winner = Some(winner);
            self.state = SessionState::Resolved;
        }
    }
}

/// Pickup first so a coin grabbed this tick already protects against the
/// hazard check below.
fn resolve_contacts(entity: &mut Entity, pickups: &mut PickupManager, hazards: &HazardManager) {
    if !entity.is_alive() {
        return;
    }
    if pickups.consume(entity.pos()) {
        info!(role = entity.role().name(), "shield picked up");
        entity.grant_shield();
    }
    if entity.shield() == 0 && hazards.occupies(entity.pos()) {
        entity.kill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{LifeState, SHIELD_TICKS};
    use crate::grid::Pos;
    use crate::hazard::Hazard;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn active_session(seed: u64) -> (Session, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut session = Session::new(11, 11, &mut rng).unwrap();
        assert!(session.start_or_restart(&mut rng));
        session.hazards = HazardManager::new(1);
        session.pickups = PickupManager::new();
        (session, rng)
    }

    fn pin_hazard(session: &mut Session, pos: Pos) {
        session.hazards.set_slot(
            0,
            Some(Hazard {
                pos,
                remaining: 1_000,
            }),
        );
    }

    #[test]
    fn intent_follows_priority() {
        let keys = HeldKeys {
            up: false,
            down: true,
            left: true,
            right: true,
        };
        assert_eq!(keys.intent(), Some(Dir::Down));
        let keys = HeldKeys {
            left: true,
            right: true,
            ..HeldKeys::default()
        };
        assert_eq!(keys.intent(), Some(Dir::Left));
        assert_eq!(HeldKeys::default().intent(), None);
        assert_eq!(HeldKeys::only(Dir::Up).intent(), Some(Dir::Up));
    }

    #[test]
    fn restart_is_ignored_mid_round() {
        let (mut session, mut rng) = active_session(1);
        let grid_before = session.grid().clone();
        assert!(!session.start_or_restart(&mut rng));
        assert_eq!(session.grid(), &grid_before);
        assert_eq!(session.state(), SessionState::Active);
    }

    #[test]
    fn idle_session_does_not_simulate() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = Session::new(9, 9, &mut rng).unwrap();
        let input = InputSnapshot {
            mouse: HeldKeys::only(Dir::Right),
            cat: HeldKeys::only(Dir::Down),
        };
        for _ in 0..20 {
            session.tick(&input, &mut rng);
        }
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.entity(Role::Mouse).pos(), Pos::new(0, 0));
        assert_eq!(session.entity(Role::Cat).pos(), Pos::new(0, 0));
    }

    #[test]
    fn mouse_wins_a_tie() {
        let (mut session, mut rng) = active_session(3);
        let goal = session.grid().goal();
        session.mouse.place(goal);
        session.cat.place(goal);
        session.tick(&InputSnapshot::default(), &mut rng);
        assert_eq!(session.state(), SessionState::Resolved);
        assert_eq!(session.winner(), Some(Role::Mouse));
    }

    #[test]
    fn cat_wins_alone() {
        let (mut session, mut rng) = active_session(4);
        let goal = session.grid().goal();
        session.cat.place(goal);
        session.tick(&InputSnapshot::default(), &mut rng);
        assert_eq!(session.winner(), Some(Role::Cat));
    }

    #[test]
    fn resolved_session_is_frozen_until_restart() {
        let (mut session, mut rng) = active_session(5);
        let goal = session.grid().goal();
        session.mouse.place(goal);
        session.tick(&InputSnapshot::default(), &mut rng);
        assert_eq!(session.state(), SessionState::Resolved);

        let input = InputSnapshot {
            mouse: HeldKeys::only(Dir::Up),
            cat: HeldKeys::only(Dir::Right),
        };
        for _ in 0..20 {
            session.tick(&input, &mut rng);
        }
        assert_eq!(session.entity(Role::Mouse).pos(), goal);
        assert_eq!(session.entity(Role::Cat).pos(), Pos::new(0, 0));

        assert!(session.start_or_restart(&mut rng));
        assert_eq!(session.state(), SessionState::Active);
        assert_eq!(session.winner(), None);
        assert_eq!(session.entity(Role::Mouse).pos(), Pos::new(0, 0));
    }

    #[test]
    fn shield_blocks_hazard_until_it_runs_out() {
        let (mut session, mut rng) = active_session(6);
        let spot = Pos::new(4, 4);
        session.mouse.place(spot);
        session.mouse.grant_shield();
        pin_hazard(&mut session, spot);

        for _ in 0..SHIELD_TICKS - 1 {
            session.tick(&InputSnapshot::default(), &mut rng);
            assert!(session.entity(Role::Mouse).is_alive());
        }
        assert_eq!(session.entity(Role::Mouse).shield(), 1);

        session.tick(&InputSnapshot::default(), &mut rng);
        assert_eq!(session.entity(Role::Mouse).life(), LifeState::Falling);
    }

    #[test]
    fn coin_grabbed_this_tick_protects_this_tick() {
        let (mut session, mut rng) = active_session(7);
        let spot = Pos::new(6, 6);
        session.cat.place(spot);
        session.pickups = PickupManager::with_pickups(vec![spot]);
        pin_hazard(&mut session, spot);

        session.tick(&InputSnapshot::default(), &mut rng);

        let cat = session.entity(Role::Cat);
        assert!(cat.is_alive());
        assert_eq!(cat.shield(), SHIELD_TICKS);
        assert!(session.pickups().pickups().is_empty());
    }

    #[test]
    fn unshielded_contact_kills_only_that_entity() {
        let (mut session, mut rng) = active_session(8);
        let spot = Pos::new(2, 6);
        session.cat.place(spot);
        pin_hazard(&mut session, spot);

        session.tick(&InputSnapshot::default(), &mut rng);

        assert_eq!(session.entity(Role::Cat).life(), LifeState::Falling);
        assert!(session.entity(Role::Mouse).is_alive());
        assert_eq!(session.state(), SessionState::Active);
    }
}
