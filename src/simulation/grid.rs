//! Cells of the bounded square lattice and their neighbourhoods.

use crate::simulation::direction::Direction;
use serde::{Deserialize, Serialize};

/// A lattice coordinate. `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell one step away in `dir`.
    #[must_use]
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Whether the cell lies in `0..size` on both axes.
    #[must_use]
    pub const fn in_bounds(self, size: u32) -> bool {
        let n = size as i32;
        self.x >= 0 && self.y >= 0 && self.x < n && self.y < n
    }

    #[must_use]
    pub const fn chebyshev(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }

    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Coordinates as a plain pair, for export.
    #[must_use]
    pub const fn as_pair(self) -> (i32, i32) {
        (self.x, self.y)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const VON_NEUMANN_OFFSETS: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Adjacency radius used by the insulation rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Neighborhood {
    /// 8-connected: cells at Chebyshev distance 1, diagonals included.
    #[default]
    Moore,
    /// 4-connected: cells at Manhattan distance 1.
    VonNeumann,
}

impl Neighborhood {
    #[must_use]
    pub const fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Self::Moore => &MOORE_OFFSETS,
            Self::VonNeumann => &VON_NEUMANN_OFFSETS,
        }
    }

    /// Neighbours of `cell`, unfiltered by bounds.
    pub fn neighbors(self, cell: Cell) -> impl Iterator<Item = Cell> {
        self.offsets()
            .iter()
            .map(move |&(dx, dy)| Cell::new(cell.x + dx, cell.y + dy))
    }

    /// Whether two distinct cells touch under this neighbourhood.
    #[must_use]
    pub const fn adjacent(self, a: Cell, b: Cell) -> bool {
        match self {
            Self::Moore => a.chebyshev(b) == 1,
            Self::VonNeumann => a.manhattan(b) == 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_follows_heading() {
        let c = Cell::new(5, 5);
        assert_eq!(c.step(Direction::Up), Cell::new(5, 4));
        assert_eq!(c.step(Direction::Right), Cell::new(6, 5));
        assert_eq!(c.step(Direction::Down), Cell::new(5, 6));
        assert_eq!(c.step(Direction::Left), Cell::new(4, 5));
    }

    #[test]
    fn test_bounds() {
        assert!(Cell::new(0, 0).in_bounds(1));
        assert!(!Cell::new(1, 0).in_bounds(1));
        assert!(!Cell::new(-1, 2).in_bounds(3));
        assert!(Cell::new(2, 2).in_bounds(3));
        assert!(!Cell::new(2, 3).in_bounds(3));
    }

    #[test]
    fn test_neighbor_counts() {
        let c = Cell::new(3, 3);
        assert_eq!(Neighborhood::Moore.neighbors(c).count(), 8);
        assert_eq!(Neighborhood::VonNeumann.neighbors(c).count(), 4);
        assert!(Neighborhood::Moore.neighbors(c).all(|n| n.chebyshev(c) == 1));
        assert!(Neighborhood::VonNeumann
            .neighbors(c)
            .all(|n| n.manhattan(c) == 1));
    }

    #[test]
    fn test_diagonal_adjacency_depends_on_neighborhood() {
        let a = Cell::new(0, 0);
        let b = Cell::new(1, 1);
        assert!(Neighborhood::Moore.adjacent(a, b));
        assert!(!Neighborhood::VonNeumann.adjacent(a, b));
        assert!(!Neighborhood::Moore.adjacent(a, a));
    }

    #[test]
    fn test_display() {
        assert_eq!(Cell::new(3, -1).to_string(), "(3, -1)");
    }
}
