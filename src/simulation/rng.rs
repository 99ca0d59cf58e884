//! Injectable randomness for the trail agent.
//!
//! The agent only ever needs uniform floats in `[0, 1)`, so the seam is a
//! single-method trait. `RandSource` adapts any `rand` generator; tests can
//! supply scripted sequences instead.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A source of uniform random values in `[0, 1)`.
pub trait UniformSource {
    fn next_uniform(&mut self) -> f64;
}

impl<S: UniformSource + ?Sized> UniformSource for &mut S {
    fn next_uniform(&mut self) -> f64 {
        (**self).next_uniform()
    }
}

/// Wraps a `rand` generator.
#[derive(Clone, Debug)]
pub struct RandSource<R> {
    rng: R,
}

impl<R: Rng> RandSource<R> {
    #[must_use]
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandSource<StdRng> {
    /// Deterministic source for reproducible trails.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> UniformSource for RandSource<R> {
    fn next_uniform(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Seeded source used by the driver and tests.
pub type SeededSource = RandSource<StdRng>;

/// Replays a fixed sequence of draws, cycling when exhausted.
///
/// Handy for reproducing a recorded walk or forcing a particular decision.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    values: Vec<f64>,
    cursor: usize,
}

impl ScriptedSource {
    /// An empty script replays `0.0` forever.
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Always returns `value`.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }

    /// Number of draws served so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.cursor
    }
}

impl UniformSource for ScriptedSource {
    fn next_uniform(&mut self) -> f64 {
        let value = if self.values.is_empty() {
            0.0
        } else {
            self.values[self.cursor % self.values.len()]
        };
        self.cursor += 1;
        value
    }
}
