use std::collections::HashSet;

use indexmap::IndexSet;
use thiserror::Error;

use crate::simulation::config::{ConfigError, TrailConfig};
use crate::simulation::direction::{Direction, Turn};
use crate::simulation::grid::Cell;
use crate::simulation::params::{LEFT_TURN_BIAS, START_JITTER};
use crate::simulation::rng::UniformSource;

/// Lifecycle of a trail. Both non-running states are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrailStatus {
    Running,
    /// No legal move remained in any non-reversing direction.
    Trapped,
    /// The configured step budget was used up.
    LengthReached,
}

impl TrailStatus {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

impl std::fmt::Display for TrailStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Running => "running",
            Self::Trapped => "trapped",
            Self::LengthReached => "length reached",
        };
        f.write_str(label)
    }
}

/// Misuse of the agent by its driver.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AgentError {
    #[error("step called after the trail terminated ({0})")]
    Terminated(TrailStatus),
}

/// What a grid cell holds from the trail's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Empty,
    /// On the path and recorded in the output trail
    Pellet,
    /// On the path but skipped as a sparsity gap
    Gap,
}

/// Where and how the agent starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartPose {
    pub cell: Cell,
    pub heading: Direction,
}

impl StartPose {
    /// Grid centre, facing right.
    #[must_use]
    pub const fn centered(grid_size: u32) -> Self {
        let mid = (grid_size / 2) as i32;
        Self {
            cell: Cell::new(mid, mid),
            heading: Direction::Right,
        }
    }

    /// A start within `START_JITTER` cells of the centre with a random heading.
    ///
    /// Consumes three draws: x offset, y offset, heading.
    #[must_use]
    pub fn jittered(grid_size: u32, source: &mut impl UniformSource) -> Self {
        let mid = (grid_size / 2) as i32;
        let max = grid_size as i32 - 1;
        let span = (2 * START_JITTER).unsigned_abs() as usize;
        let mut offset = || pick_index(source.next_uniform(), span) as i32 - START_JITTER;
        let x = (mid + offset()).clamp(0, max);
        let y = (mid + offset()).clamp(0, max);
        let heading = Direction::all()[pick_index(source.next_uniform(), 4)];
        Self {
            cell: Cell::new(x, y),
            heading,
        }
    }
}

/// Maps a uniform draw onto `0..len`.
fn pick_index(u: f64, len: usize) -> usize {
    ((u * len as f64) as usize).min(len - 1)
}

/// Report of a single `step()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepOutcome {
    /// Agent position after the step
    pub position: Cell,
    /// Agent heading after the step
    pub heading: Direction,
    /// The turn taken, `None` when the agent was trapped
    pub turn: Option<Turn>,
    /// Whether the new cell was recorded as a pellet
    pub pellet_placed: bool,
    /// Status after the step
    pub status: TrailStatus,
    /// Committed steps so far
    pub step: u32,
}

/// A random walker that lays a self-avoiding, self-insulated trail.
///
/// Each step the agent may turn 90 degrees (never reverse), moves one cell
/// if a legal cell exists, and records the cell as a pellet unless a
/// sparsity gap is drawn. A candidate is legal when it is inside the grid,
/// not already on the path, and touches no path cell other than the
/// agent's current one under the configured neighbourhood.
#[derive(Debug, Clone)]
pub struct TrailAgent<S> {
    config: TrailConfig,
    source: S,
    position: Cell,
    heading: Direction,
    steps: u32,
    status: TrailStatus,
    path: Vec<Cell>,
    occupied: HashSet<Cell>,
    pellets: IndexSet<Cell>,
}

impl<S: UniformSource> TrailAgent<S> {
    /// Creates an agent at the grid centre facing right.
    #[must_use]
    pub fn new(config: TrailConfig, source: S) -> Self {
        let start = StartPose::centered(config.grid_size());
        Self::build(config, start, source)
    }

    /// Creates an agent at an explicit start pose.
    ///
    /// # Errors
    /// Returns [`ConfigError::StartOutOfBounds`] if the start cell is off the grid.
    pub fn with_start(config: TrailConfig, start: StartPose, source: S) -> Result<Self, ConfigError> {
        if !start.cell.in_bounds(config.grid_size()) {
            return Err(ConfigError::StartOutOfBounds {
                x: start.cell.x,
                y: start.cell.y,
                grid_size: config.grid_size(),
            });
        }
        Ok(Self::build(config, start, source))
    }

    fn build(config: TrailConfig, start: StartPose, source: S) -> Self {
        let mut pellets = IndexSet::new();
        pellets.insert(start.cell);
        Self {
            config,
            source,
            position: start.cell,
            heading: start.heading,
            steps: 0,
            status: TrailStatus::Running,
            path: vec![start.cell],
            occupied: HashSet::from([start.cell]),
            pellets,
        }
    }

    /// Advances the agent by one cell.
    ///
    /// Draw order is fixed: turn decision, then a left/right coin only when
    /// both turns are legal and a turn is taken, then the gap decision
    /// after a move.
    ///
    /// # Errors
    /// Returns [`AgentError::Terminated`] once the trail has ended.
    pub fn step(&mut self) -> Result<StepOutcome, AgentError> {
        if self.status.is_terminal() {
            return Err(AgentError::Terminated(self.status));
        }

        let wants_turn = self.source.next_uniform() < self.config.tortuosity();

        let Some(turn) = self.choose_turn(wants_turn) else {
            self.status = TrailStatus::Trapped;
            return Ok(self.outcome(None, false));
        };

        self.heading = self.heading.apply(turn);
        self.position = self.position.step(self.heading);
        self.path.push(self.position);
        self.occupied.insert(self.position);

        let pellet_placed = self.source.next_uniform() >= self.config.sparsity();
        if pellet_placed {
            self.pellets.insert(self.position);
        }

        self.steps += 1;
        if self.config.max_length().limit() == Some(self.steps) {
            self.status = TrailStatus::LengthReached;
        }

        Ok(self.outcome(Some(turn), pellet_placed))
    }

    /// Steps until the trail terminates and returns the final status.
    pub fn run_to_end(&mut self) -> TrailStatus {
        while let Ok(outcome) = self.step() {
            if outcome.status.is_terminal() {
                break;
            }
        }
        self.status
    }

    fn choose_turn(&mut self, wants_turn: bool) -> Option<Turn> {
        let straight = self.turn_is_legal(Turn::Straight);
        if straight && !wants_turn {
            return Some(Turn::Straight);
        }

        let sideways = match (self.turn_is_legal(Turn::Left), self.turn_is_legal(Turn::Right)) {
            (true, true) => {
                if self.source.next_uniform() < LEFT_TURN_BIAS {
                    Some(Turn::Left)
                } else {
                    Some(Turn::Right)
                }
            }
            (true, false) => Some(Turn::Left),
            (false, true) => Some(Turn::Right),
            (false, false) => None,
        };

        sideways.or(straight.then_some(Turn::Straight))
    }

    fn turn_is_legal(&self, turn: Turn) -> bool {
        self.is_legal(self.position.step(self.heading.apply(turn)))
    }

    /// Whether the agent, standing where it is now, may move onto `candidate`.
    #[must_use]
    pub fn is_legal(&self, candidate: Cell) -> bool {
        candidate.in_bounds(self.config.grid_size())
            && !self.occupied.contains(&candidate)
            && self
                .config
                .neighborhood()
                .neighbors(candidate)
                .filter(|n| *n != self.position)
                .all(|n| !self.occupied.contains(&n))
    }

    fn outcome(&self, turn: Option<Turn>, pellet_placed: bool) -> StepOutcome {
        StepOutcome {
            position: self.position,
            heading: self.heading,
            turn,
            pellet_placed,
            status: self.status,
            step: self.steps,
        }
    }
}

impl<S> TrailAgent<S> {
    #[must_use]
    pub const fn config(&self) -> &TrailConfig {
        &self.config
    }

    #[must_use]
    pub const fn position(&self) -> Cell {
        self.position
    }

    #[must_use]
    pub const fn heading(&self) -> Direction {
        self.heading
    }

    #[must_use]
    pub const fn status(&self) -> TrailStatus {
        self.status
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Committed steps so far.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Recorded pellets in the order they were laid.
    #[must_use]
    pub const fn pellets(&self) -> &IndexSet<Cell> {
        &self.pellets
    }

    /// Every cell the agent has stood on, gaps included, in order.
    #[must_use]
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    #[must_use]
    pub fn cell_state(&self, cell: Cell) -> CellState {
        if self.pellets.contains(&cell) {
            CellState::Pellet
        } else if self.occupied.contains(&cell) {
            CellState::Gap
        } else {
            CellState::Empty
        }
    }

    /// Consumes the agent, yielding the pellets as `(x, y)` pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(i32, i32)> {
        self.pellets.into_iter().map(Cell::as_pair).collect()
    }
}
