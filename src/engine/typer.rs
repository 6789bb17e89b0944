//! Cell typing strategies evaluated once per cell when a board is built.

use serde::Deserialize;

use crate::types::CellType;

/// Classifies every cell of a board at construction time
pub trait CellTyper {
    fn cell_type(&self, x: i32, y: i32) -> CellType;
}

/// Named typers selectable from configuration
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TyperKind {
    /// Circular arena with its outer ring of valid cells marked spawn
    Circle,
    /// Circular arena with the leftmost and rightmost valid columns marked spawn
    Line,
    /// Every cell valid, nothing spawns
    Open,
}

impl TyperKind {
    pub fn build(&self, width: i32, height: i32) -> Box<dyn CellTyper> {
        match self {
            TyperKind::Circle => Box::new(CircleTyper::new(width, height)),
            TyperKind::Line => Box::new(LineTyper::new(width, height)),
            TyperKind::Open => Box::new(OpenTyper),
        }
    }
}

/// Every cell is valid and none spawn
#[derive(Debug, Clone, Copy)]
pub struct OpenTyper;

impl CellTyper for OpenTyper {
    fn cell_type(&self, _x: i32, _y: i32) -> CellType {
        CellType::Valid
    }
}

/// Precomputed column-major grid shared by the circular typers
#[derive(Debug, Clone)]
struct Grid {
    width: i32,
    height: i32,
    cells: Vec<CellType>,
}

impl Grid {
    /// Lays out a disc centred on the board. A cell is valid when its centre lies
    /// strictly inside a radius of half the (1-based) width.
    fn circle(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let radius = (width + 1) as f64 / 2.0;
        let centre_x = (width + 1) as f64 / 2.0;
        let centre_y = (height + 1) as f64 / 2.0;

        let mut cells = Vec::with_capacity((width * height) as usize);
        for x in 0..width {
            for y in 0..height {
                let dx = centre_x - (x + 1) as f64;
                let dy = centre_y - (y + 1) as f64;
                let valid = (dx * dx + dy * dy).sqrt() < radius;
                cells.push(if valid {
                    CellType::Valid
                } else {
                    CellType::Invalid
                });
            }
        }

        Grid {
            width,
            height,
            cells,
        }
    }

    fn get(&self, x: i32, y: i32) -> CellType {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return CellType::Invalid;
        }
        self.cells[(x * self.height + y) as usize]
    }

    fn set(&mut self, x: i32, y: i32, cell: CellType) {
        let idx = (x * self.height + y) as usize;
        self.cells[idx] = cell;
    }
}

/// Circular arena whose border ring spawns robots
#[derive(Debug, Clone)]
pub struct CircleTyper {
    grid: Grid,
}

impl CircleTyper {
    pub fn new(width: i32, height: i32) -> Self {
        let base = Grid::circle(width, height);
        let mut grid = base.clone();

        for x in 0..base.width {
            for y in 0..base.height {
                if Self::on_ring(&base, x, y) {
                    grid.set(x, y, CellType::Spawn);
                }
            }
        }

        CircleTyper { grid }
    }

    /// A valid cell touching the board edge or an invalid cell
    fn on_ring(base: &Grid, x: i32, y: i32) -> bool {
        if base.get(x, y) != CellType::Valid {
            return false;
        }
        [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)]
            .iter()
            .any(|&(nx, ny)| base.get(nx, ny) == CellType::Invalid)
    }
}

impl CellTyper for CircleTyper {
    fn cell_type(&self, x: i32, y: i32) -> CellType {
        self.grid.get(x, y)
    }
}

/// Circular arena with vertical spawn lines on either side
#[derive(Debug, Clone)]
pub struct LineTyper {
    grid: Grid,
}

impl LineTyper {
    pub fn new(width: i32, height: i32) -> Self {
        let mut grid = Grid::circle(width, height);

        let has_valid = |grid: &Grid, x: i32| (0..grid.height).any(|y| grid.get(x, y).is_occupiable());
        let leftmost = (0..grid.width).find(|&x| has_valid(&grid, x));
        let rightmost = (0..grid.width).rev().find(|&x| has_valid(&grid, x));

        for x in [leftmost, rightmost].into_iter().flatten() {
            for y in 0..grid.height {
                if grid.get(x, y) == CellType::Valid {
                    grid.set(x, y, CellType::Spawn);
                }
            }
        }

        LineTyper { grid }
    }
}

impl CellTyper for LineTyper {
    fn cell_type(&self, x: i32, y: i32) -> CellType {
        self.grid.get(x, y)
    }
}
