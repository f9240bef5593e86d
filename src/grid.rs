#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    /// Priority order used when several directions are held at once.
    pub const ALL: [Dir; 4] = [Dir::Up, Dir::Down, Dir::Left, Dir::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }
}

/// Rectangular wall/open layout. Only the maze generator writes cells; once a
/// grid is handed out it is read-only and replaced wholesale on restart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Vec<Tile>>,
    open_cells: Vec<Pos>,
}

impl Grid {
    pub(crate) fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![Tile::Wall; width]; height],
            open_cells: Vec::new(),
        }
    }

    pub(crate) fn open(&mut self, pos: Pos) {
        self.tiles[pos.y][pos.x] = Tile::Open;
    }

    pub(crate) fn collect_open_cells(&mut self) {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.tiles[y][x] == Tile::Open {
                    cells.push(Pos { x, y });
                }
            }
        }
        self.open_cells = cells;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn origin(&self) -> Pos {
        Pos::new(0, 0)
    }

    pub fn goal(&self) -> Pos {
        Pos::new(self.width - 1, self.height - 1)
    }

    /// Open cells in row-major order, captured when the maze was generated.
    pub fn open_cells(&self) -> &[Pos] {
        &self.open_cells
    }

    pub fn tile(&self, pos: Pos) -> Tile {
        self.tiles[pos.y][pos.x]
    }

    pub fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Out-of-bounds cells count as walls.
    pub fn is_open(&self, pos: Pos) -> bool {
        pos.x < self.width && pos.y < self.height && self.tiles[pos.y][pos.x] == Tile::Open
    }

    /// The in-bounds cell `distance` steps from `pos` in `dir`, whatever its tile.
    pub fn offset(&self, pos: Pos, dir: Dir, distance: isize) -> Option<Pos> {
        let (dx, dy) = dir.delta();
        let nx = pos.x as isize + dx * distance;
        let ny = pos.y as isize + dy * distance;
        if !self.in_bounds(nx, ny) {
            return None;
        }
        Some(Pos {
            x: nx as usize,
            y: ny as usize,
        })
    }

    pub fn can_move(&self, pos: Pos, dir: Dir) -> bool {
        self.offset(pos, dir, 1)
            .map(|next| self.is_open(next))
            .unwrap_or(false)
    }

    /// Number of orthogonal neighbours that are walls. Border sides count as walls.
    pub fn wall_neighbors(&self, pos: Pos) -> usize {
        Dir::ALL
            .iter()
            .filter(|&&dir| !self.can_move(pos, dir))
            .count()
    }
}
