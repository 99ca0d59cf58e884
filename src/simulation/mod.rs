pub mod agent;
pub mod config;
pub mod direction;
pub mod grid;
pub mod params;
pub mod rng;

pub use agent::{AgentError, CellState, StartPose, StepOutcome, TrailAgent, TrailStatus};
pub use config::{ConfigError, TrailConfig, TrailLength, TrailSettings};
pub use direction::{Direction, Turn};
pub use grid::{Cell, Neighborhood};
pub use rng::{RandSource, ScriptedSource, SeededSource, UniformSource};
