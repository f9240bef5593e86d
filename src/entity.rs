use tracing::info;

use crate::grid::{Dir, Grid, Pos};

pub const MOVE_COOLDOWN_TICKS: u32 = 6;
pub const SHIELD_TICKS: u32 = 180;
/// Fraction of the remaining distance the draw position covers each tick.
pub const GLIDE_FACTOR: f32 = 0.4;
pub const FALL_IMPULSE: f32 = -0.5;
pub const FALL_GRAVITY: f32 = 0.8 / 30.0;
/// How far below the grid (in cells) a falling entity travels before respawning.
pub const FALL_MARGIN: f32 = 100.0 / 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Role {
    Mouse,
    Cat,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Mouse => "Mouse",
            Role::Cat => "Cat",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifeState {
    Alive,
    Falling,
}

/// One player-controlled actor. Grid position drives every rule; the draw
/// position is cosmetic and only chases it.
#[derive(Clone, Debug)]
pub struct Entity {
    role: Role,
    pos: Pos,
    draw_x: f32,
    draw_y: f32,
    life: LifeState,
    velocity_y: f32,
    cooldown: u32,
    shield: u32,
}

impl Entity {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            pos: Pos::new(0, 0),
            draw_x: 0.0,
            draw_y: 0.0,
            life: LifeState::Alive,
            velocity_y: 0.0,
            cooldown: 0,
            shield: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.role);
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn draw_pos(&self) -> (f32, f32) {
        (self.draw_x, self.draw_y)
    }

    pub fn life(&self) -> LifeState {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    pub fn cooldown(&self) -> u32 {
        self.cooldown
    }

    pub fn shield(&self) -> u32 {
        self.shield
    }

    pub fn is_shielded(&self) -> bool {
        self.shield > 0
    }

    pub fn grant_shield(&mut self) {
        self.shield = SHIELD_TICKS;
    }

    /// Starts the fall-out animation. Has no effect on an entity already falling.
    pub fn kill(&mut self) {
        if self.life == LifeState::Falling {
            return;
        }
        info!(role = self.role.name(), x = self.pos.x, y = self.pos.y, "entity caught");
        self.life = LifeState::Falling;
        self.velocity_y = FALL_IMPULSE;
    }

    pub fn update(&mut self, grid: &Grid, intent: Option<Dir>) {
        if self.life == LifeState::Falling {
            self.fall(grid);
            return;
        }

        self.shield = self.shield.saturating_sub(1);
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return;
        }

        let Some(dir) = intent else {
            return;
        };
        if !grid.can_move(self.pos, dir) {
            return;
        }
        if let Some(next) = grid.offset(self.pos, dir, 1) {
            self.pos = next;
            self.cooldown = MOVE_COOLDOWN_TICKS;
        }
    }

    pub fn advance_visual(&mut self) {
        if self.life == LifeState::Falling {
            return;
        }
        let (tx, ty) = (self.pos.x as f32, self.pos.y as f32);
        self.draw_x += (tx - self.draw_x) * GLIDE_FACTOR;
        self.draw_y += (ty - self.draw_y) * GLIDE_FACTOR;
    }

    fn fall(&mut self, grid: &Grid) {
        self.draw_y += self.velocity_y;
        self.velocity_y += FALL_GRAVITY;
        if self.draw_y > grid.height() as f32 + FALL_MARGIN {
            self.reset();
        }
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, pos: Pos) {
        self.pos = pos;
        self.draw_x = pos.x as f32;
        self.draw_y = pos.y as f32;
    }
}
