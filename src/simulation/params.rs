//! Simulation defaults and limits.

pub const DEFAULT_GRID_SIZE: u32 = 32;
pub const DEFAULT_TORTUOSITY: f64 = 0.3;
pub const DEFAULT_SPARSITY: f64 = 0.2;
pub const DEFAULT_TRAIL_NAME: &str = "untitled_trail";

/// Largest accepted grid side. Keeps cell coordinates well inside `i32`.
pub const MAX_GRID_SIZE: u32 = 4096;

/// Half-width of the square around the centre used for jittered starts.
pub const START_JITTER: i32 = 2;

/// Coin threshold when both turns are legal: below it, turn left.
pub const LEFT_TURN_BIAS: f64 = 0.5;

/// Interactive tick interval in milliseconds.
pub const DEFAULT_TICK_MS: u64 = 33; // ~30 steps per second
