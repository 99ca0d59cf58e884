//! Cardinal headings and relative turns on the grid.
//!
//! Headings are ordered clockwise (Up, Right, Down, Left). `y` grows
//! downward, so `Up` moves to the previous row.

/// One of the four cardinal headings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

/// Heading change relative to the current direction. Reversal is not a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    /// Keep the current heading
    Straight,
    /// Rotate 90 degrees counter-clockwise
    Left,
    /// Rotate 90 degrees clockwise
    Right,
}

impl Direction {
    /// All headings in clockwise order.
    #[must_use]
    pub const fn all() -> [Direction; 4] {
        [Self::Up, Self::Right, Self::Down, Self::Left]
    }

    #[must_use]
    pub const fn turn_left(self) -> Self {
        match self {
            Self::Up => Self::Left,
            Self::Left => Self::Down,
            Self::Down => Self::Right,
            Self::Right => Self::Up,
        }
    }

    #[must_use]
    pub const fn turn_right(self) -> Self {
        match self {
            Self::Up => Self::Right,
            Self::Right => Self::Down,
            Self::Down => Self::Left,
            Self::Left => Self::Up,
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Applies a relative turn.
    #[must_use]
    pub const fn apply(self, turn: Turn) -> Self {
        match turn {
            Turn::Straight => self,
            Turn::Left => self.turn_left(),
            Turn::Right => self.turn_right(),
        }
    }

    /// Unit step `(dx, dy)` for this heading.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
        }
    }

    /// Glyph used by the terminal renderer for the agent.
    #[must_use]
    pub const fn arrow(self) -> char {
        match self {
            Self::Up => '^',
            Self::Right => '>',
            Self::Down => 'v',
            Self::Left => '<',
        }
    }
}

impl Turn {
    /// Returns all possible turns.
    #[must_use]
    pub const fn all() -> [Turn; 3] {
        [Turn::Straight, Turn::Left, Turn::Right]
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Up => "up",
            Self::Right => "right",
            Self::Down => "down",
            Self::Left => "left",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_left_and_right_are_inverse() {
        for dir in Direction::all() {
            assert_eq!(dir.turn_left().turn_right(), dir);
            assert_eq!(dir.turn_right().turn_left(), dir);
        }
    }

    #[test]
    fn test_four_right_turns_cycle() {
        for dir in Direction::all() {
            let back = dir.turn_right().turn_right().turn_right().turn_right();
            assert_eq!(back, dir);
        }
    }

    #[test]
    fn test_opposite_is_two_turns() {
        for dir in Direction::all() {
            assert_eq!(dir.opposite(), dir.turn_right().turn_right());
            assert_ne!(dir.opposite(), dir);
        }
    }

    #[test]
    fn test_no_turn_reverses() {
        for dir in Direction::all() {
            for turn in Turn::all() {
                assert_ne!(dir.apply(turn), dir.opposite());
            }
        }
    }

    #[test]
    fn test_deltas_are_unit_and_opposed() {
        for dir in Direction::all() {
            let (dx, dy) = dir.delta();
            assert_eq!(dx.abs() + dy.abs(), 1);
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn test_up_moves_to_previous_row() {
        assert_eq!(Direction::Up.delta(), (0, -1));
        assert_eq!(Direction::Right.turn_left(), Direction::Up);
    }
}
