use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use maze_chase::{Dir, InputSnapshot, Role};

/// How long a key counts as held after its last press or repeat event when the
/// terminal cannot report releases.
const INPUT_HOLD_MS: u64 = 160;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Quit,
}

/// Turns key events into the held-key snapshot the simulation wants.
///
/// Terminals with the keyboard enhancement protocol report releases, so a key
/// stays down until released. Everywhere else a press is treated as held for
/// a short window that each auto-repeat event extends.
pub struct KeyHold {
    reports_release: bool,
    last_seen: [[Option<Instant>; 4]; 2],
}

impl KeyHold {
    pub fn new(reports_release: bool) -> Self {
        Self {
            reports_release,
            last_seen: [[None; 4]; 2],
        }
    }

    pub fn handle(&mut self, key: KeyEvent, now: Instant) -> Option<Command> {
        if let Some((role, dir)) = binding(key.code) {
            let slot = &mut self.last_seen[role_idx(role)][dir_idx(dir)];
            match key.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => *slot = Some(now),
                KeyEventKind::Release => *slot = None,
            }
            return None;
        }
        if key.kind == KeyEventKind::Release {
            return None;
        }
        match key.code {
            KeyCode::Char(' ') => Some(Command::Start),
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Command::Quit)
            }
            _ => None,
        }
    }

    pub fn snapshot(&self, now: Instant) -> InputSnapshot {
        let mut input = InputSnapshot::default();
        for role in [Role::Mouse, Role::Cat] {
            for dir in Dir::ALL {
                let held = match self.last_seen[role_idx(role)][dir_idx(dir)] {
                    Some(_) if self.reports_release => true,
                    Some(t) => now.duration_since(t) <= Duration::from_millis(INPUT_HOLD_MS),
                    None => false,
                };
                input.keys_mut(role).set(dir, held);
            }
        }
        input
    }
}

/// W/A/S/D steer the mouse, arrow keys the cat.
fn binding(code: KeyCode) -> Option<(Role, Dir)> {
    let bound = match code {
        KeyCode::Char('w') | KeyCode::Char('W') => (Role::Mouse, Dir::Up),
        KeyCode::Char('s') | KeyCode::Char('S') => (Role::Mouse, Dir::Down),
        KeyCode::Char('a') | KeyCode::Char('A') => (Role::Mouse, Dir::Left),
        KeyCode::Char('d') | KeyCode::Char('D') => (Role::Mouse, Dir::Right),
        KeyCode::Up => (Role::Cat, Dir::Up),
        KeyCode::Down => (Role::Cat, Dir::Down),
        KeyCode::Left => (Role::Cat, Dir::Left),
        KeyCode::Right => (Role::Cat, Dir::Right),
        _ => return None,
    };
    Some(bound)
}

fn role_idx(role: Role) -> usize {
    match role {
        Role::Mouse => 0,
        Role::Cat => 1,
    }
}

fn dir_idx(dir: Dir) -> usize {
    match dir {
        Dir::Up => 0,
        Dir::Down => 1,
        Dir::Left => 2,
        Dir::Right => 3,
    }
}
