use std::io::{self, Stdout, Write};
use std::time::Instant;

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use maze_chase::{Entity, Grid, Pos, Role, Session, SessionState, Tile};
use unicode_width::UnicodeWidthStr;

const CELL_W: usize = 2;
const STATUS_LINES: usize = 3;
const PROMPT_PERIOD_MS: u128 = 1000;
const PROMPT_VISIBLE_MS: u128 = 600;
/// Hazards below this share of their lifetime get a warning backdrop.
const HAZARD_WARNING_FRACTION: f32 = 1.0 / 3.0;

#[derive(Clone, Copy, PartialEq)]
enum Glyph {
    Mouse,
    Cat,
    Dog,
    Coin,
    Goal,
    Wall,
    Empty,
}

#[derive(Clone, Copy, PartialEq)]
struct Cell {
    glyph: Glyph,
    fg: Color,
    bg: Color,
}

impl Cell {
    const fn new(glyph: Glyph, fg: Color) -> Self {
        Self {
            glyph,
            fg,
            bg: Color::Reset,
        }
    }
}

/// Terminal drawing state: the last frame's cells and text, so only changes
/// are written.
pub struct Renderer {
    width: usize,
    height: usize,
    last: Vec<Cell>,
    last_text: Vec<String>,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
    started: Instant,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            last: vec![Cell::new(Glyph::Empty, Color::Reset); width * height],
            last_text: vec![String::new(); STATUS_LINES + 1],
            needs_full: true,
            origin_x: 0,
            origin_y: 1,
            started: Instant::now(),
        }
    }

    pub fn render(&mut self, stdout: &mut Stdout, session: &Session) -> io::Result<()> {
        // Oversized grids saturate so they hit the "too small" notice instead
        // of wrapping screen coordinates.
        let needed_w = u16::try_from(self.width * CELL_W).unwrap_or(u16::MAX);
        let needed_h = u16::try_from(self.height + STATUS_LINES + 1).unwrap_or(u16::MAX);

        stdout.queue(MoveTo(0, 0))?;
        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(Clear(ClearType::All))?;
            stdout.queue(Print(format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            )))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + 1;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
        }

        let frame = compose(session);
        for (idx, cell) in frame.into_iter().enumerate() {
            if self.needs_full || cell != self.last[idx] {
                self.last[idx] = cell;
                self.draw_cell(stdout, idx % self.width, idx / self.width, cell)?;
            }
        }

        let lines = self.text_lines(session);
        for (row, (mut text, color)) in lines.into_iter().enumerate() {
            truncate_to_width(&mut text, needed_w as usize);
            if self.needs_full || text != self.last_text[row] {
                let y = if row == 0 {
                    self.origin_y - 1
                } else {
                    self.origin_y + (self.height + row - 1) as u16
                };
                stdout.queue(MoveTo(self.origin_x, y))?;
                stdout.queue(Clear(ClearType::UntilNewLine))?;
                stdout.queue(SetForegroundColor(color))?;
                stdout.queue(Print(&text))?;
                stdout.queue(ResetColor)?;
                self.last_text[row] = text;
            }
        }
        self.needs_full = false;

        stdout.flush()?;
        Ok(())
    }

    fn draw_cell(&self, stdout: &mut Stdout, x: usize, y: usize, cell: Cell) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Mouse => "🐭",
            Glyph::Cat => "🐱",
            Glyph::Dog => "🐶",
            Glyph::Coin => "🪙",
            Glyph::Goal => "░░",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
        };
        stdout.queue(MoveTo(
            self.origin_x + (x * CELL_W) as u16,
            self.origin_y + y as u16,
        ))?;
        stdout.queue(SetForegroundColor(cell.fg))?;
        stdout.queue(SetBackgroundColor(cell.bg))?;
        stdout.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                stdout.queue(Print(' '))?;
            }
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }

    /// HUD line above the grid followed by the status lines below it.
    fn text_lines(&self, session: &Session) -> Vec<(String, Color)> {
        let mouse = session.entity(Role::Mouse);
        let cat = session.entity(Role::Cat);
        let hud = format!(
            "Mouse: {}  Cat: {}  Dogs: {}  Coins: {}",
            status_tag(mouse),
            status_tag(cat),
            session.hazards().len(),
            session.pickups().pickups().len()
        );

        let prompt_on = self.started.elapsed().as_millis() % PROMPT_PERIOD_MS < PROMPT_VISIBLE_MS;
        let prompt = if prompt_on && session.state() != SessionState::Active {
            "Press [SPACE] to start".to_string()
        } else {
            String::new()
        };

        let (banner, detail, banner_color) = match session.state() {
            SessionState::Idle => (
                "MAZE CHASE".to_string(),
                "Mouse W/A/S/D, Cat arrows. Coins shield you from dogs. Q quits.".to_string(),
                Color::White,
            ),
            SessionState::Active => (String::new(), String::new(), Color::White),
            SessionState::Resolved => {
                let winner = session.winner().unwrap_or(Role::Mouse);
                (
                    format!("{} wins!", winner.name()),
                    "Press [SPACE] for a new maze.".to_string(),
                    role_color(winner),
                )
            }
        };

        vec![
            (hud, Color::White),
            (banner, banner_color),
            (detail, Color::Yellow),
            (prompt, Color::White),
        ]
    }
}

fn truncate_to_width(text: &mut String, max: usize) {
    while UnicodeWidthStr::width(text.as_str()) > max {
        text.pop();
    }
}

fn status_tag(entity: &Entity) -> String {
    if !entity.is_alive() {
        "caught!".to_string()
    } else if entity.is_shielded() {
        format!("shield {:.1}s", entity.shield() as f32 / 60.0)
    } else {
        "ready".to_string()
    }
}

fn role_color(role: Role) -> Color {
    match role {
        Role::Mouse => Color::Blue,
        Role::Cat => Color::Red,
    }
}

/// Layers, bottom to top: tiles and goal, coins, dogs, mouse, cat.
fn compose(session: &Session) -> Vec<Cell> {
    let grid = session.grid();
    let width = grid.width();
    let mut frame = Vec::with_capacity(width * grid.height());
    for y in 0..grid.height() {
        for x in 0..width {
            let pos = Pos::new(x, y);
            let cell = if pos == grid.goal() {
                Cell::new(Glyph::Goal, Color::Green)
            } else {
                match grid.tile(pos) {
                    Tile::Wall => Cell::new(Glyph::Wall, Color::White),
                    Tile::Open => Cell::new(Glyph::Empty, Color::Reset),
                }
            };
            frame.push(cell);
        }
    }

    for &pos in session.pickups().pickups() {
        frame[pos.y * width + pos.x] = Cell::new(Glyph::Coin, Color::Yellow);
    }
    for hazard in session.hazards().hazards().filter(|h| h.is_visible()) {
        let mut cell = Cell::new(Glyph::Dog, Color::DarkYellow);
        if hazard.remaining_fraction() < HAZARD_WARNING_FRACTION {
            cell.bg = Color::DarkRed;
        }
        frame[hazard.pos.y * width + hazard.pos.x] = cell;
    }
    for entity in session.entities() {
        if let Some(pos) = draw_cell_of(grid, entity) {
            let glyph = match entity.role() {
                Role::Mouse => Glyph::Mouse,
                Role::Cat => Glyph::Cat,
            };
            let mut cell = Cell::new(glyph, role_color(entity.role()));
            if entity.is_alive() && entity.is_shielded() {
                cell.bg = Color::DarkCyan;
            }
            frame[pos.y * width + pos.x] = cell;
        }
    }
    frame
}

/// Nearest cell to the glide position, or `None` while a fall has carried the
/// entity outside the grid.
fn draw_cell_of(grid: &Grid, entity: &Entity) -> Option<Pos> {
    let (dx, dy) = entity.draw_pos();
    let (x, y) = (dx.round(), dy.round());
    if !grid.in_bounds(x as isize, y as isize) {
        return None;
    }
    Some(Pos::new(x as usize, y as usize))
}
