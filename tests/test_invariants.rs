//! Property tests for the trail invariants.
//!
//! Every generated walk is checked against an independent brute-force
//! reading of the rules rather than the agent's own legality check.

use proptest::prelude::*;
use trail_rust::simulation::agent::{StepOutcome, TrailAgent, TrailStatus};
use trail_rust::simulation::config::{TrailConfig, TrailLength};
use trail_rust::simulation::direction::{Direction, Turn};
use trail_rust::simulation::grid::{Cell, Neighborhood};
use trail_rust::simulation::rng::SeededSource;

struct Run {
    start_heading: Direction,
    outcomes: Vec<StepOutcome>,
    pellet_counts: Vec<usize>,
    path: Vec<Cell>,
    pellets: Vec<Cell>,
    status: TrailStatus,
    steps: u32,
}

fn run_walk(config: TrailConfig, seed: u64) -> Run {
    let mut agent = TrailAgent::new(config, SeededSource::seeded(seed));
    let start_heading = agent.heading();
    let mut outcomes = Vec::new();
    let mut pellet_counts = vec![agent.pellets().len()];
    while let Ok(outcome) = agent.step() {
        outcomes.push(outcome);
        pellet_counts.push(agent.pellets().len());
    }
    Run {
        start_heading,
        outcomes,
        pellet_counts,
        path: agent.path().to_vec(),
        pellets: agent.pellets().iter().copied().collect(),
        status: agent.status(),
        steps: agent.steps(),
    }
}

fn touches(neighborhood: Neighborhood, a: Cell, b: Cell) -> bool {
    match neighborhood {
        Neighborhood::Moore => (a.x - b.x).abs() <= 1 && (a.y - b.y).abs() <= 1,
        Neighborhood::VonNeumann => (a.x - b.x).abs() + (a.y - b.y).abs() <= 1,
    }
}

/// Legality straight from the rules: on the grid, off the path, and not
/// touching any path cell except the current one.
fn brute_force_legal(path: &[Cell], size: u32, neighborhood: Neighborhood, candidate: Cell) -> bool {
    let n = size as i32;
    let current = *path.last().unwrap();
    let in_bounds = (0..n).contains(&candidate.x) && (0..n).contains(&candidate.y);
    in_bounds
        && !path.contains(&candidate)
        && path
            .iter()
            .filter(|&&c| c != current)
            .all(|&c| !touches(neighborhood, c, candidate))
}

fn neighborhood_strategy() -> impl Strategy<Value = Neighborhood> {
    prop_oneof![Just(Neighborhood::Moore), Just(Neighborhood::VonNeumann)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn prop_walk_respects_invariants(
        seed in any::<u64>(),
        size in 1u32..=16,
        tortuosity in 0.0f64..=1.0,
        sparsity in 0.0f64..=1.0,
        max_length in 0u32..120,
        neighborhood in neighborhood_strategy(),
    ) {
        let length = TrailLength::from_raw(i64::from(max_length)).unwrap();
        let config = TrailConfig::new(size, tortuosity, sparsity, length)
            .unwrap()
            .with_neighborhood(neighborhood);
        let run = run_walk(config, seed);

        // Bounds
        for cell in run.path.iter().chain(&run.pellets) {
            prop_assert!(cell.in_bounds(size), "{cell} outside {size}x{size}");
        }

        // Path moves one orthogonal cell at a time
        for pair in run.path.windows(2) {
            prop_assert_eq!(pair[0].manhattan(pair[1]), 1);
        }

        // No reversal between consecutive headings
        let mut heading = run.start_heading;
        for outcome in &run.outcomes {
            prop_assert_ne!(outcome.heading, heading.opposite());
            if let Some(turn) = outcome.turn {
                prop_assert_eq!(outcome.heading, heading.apply(turn));
            }
            heading = outcome.heading;
        }

        // Insulation over the full occupied path, gaps included
        for i in 0..run.path.len() {
            for j in (i + 2)..run.path.len() {
                prop_assert!(
                    !touches(neighborhood, run.path[i], run.path[j]),
                    "{} and {} touch at indices {} and {}",
                    run.path[i], run.path[j], i, j
                );
            }
        }

        // Pellets never shrink and follow path order
        for pair in run.pellet_counts.windows(2) {
            prop_assert!(pair[1] >= pair[0]);
        }
        let mut cursor = run.path.iter();
        for pellet in &run.pellets {
            prop_assert!(cursor.any(|c| c == pellet), "pellet {pellet} out of path order");
        }
        prop_assert_eq!(run.pellets.first(), run.path.first());

        // Termination
        prop_assert!(run.status.is_terminal());
        prop_assert_eq!(run.path.len(), run.steps as usize + 1);
        match length.limit() {
            Some(limit) => {
                prop_assert!(run.steps <= limit);
                prop_assert_eq!(run.status == TrailStatus::LengthReached, run.steps == limit);
            }
            None => {
                prop_assert_eq!(run.status, TrailStatus::Trapped);
            }
        }

        // A trap only happens when no candidate is legal
        if run.status == TrailStatus::Trapped {
            let position = *run.path.last().unwrap();
            for turn in Turn::all() {
                let candidate = position.step(heading.apply(turn));
                prop_assert!(!brute_force_legal(&run.path, size, neighborhood, candidate));
            }
        }
    }

    #[test]
    fn prop_same_seed_is_deterministic(
        seed in any::<u64>(),
        tortuosity in 0.0f64..=1.0,
        sparsity in 0.0f64..=1.0,
    ) {
        let config = TrailConfig::new(12, tortuosity, sparsity, TrailLength::Unbounded)
            .unwrap()
            .with_neighborhood(Neighborhood::VonNeumann);
        let a = run_walk(config.clone(), seed);
        let b = run_walk(config, seed);
        prop_assert_eq!(a.outcomes, b.outcomes);
        prop_assert_eq!(a.pellets, b.pellets);
    }
}

#[test]
fn test_every_committed_move_was_legal() {
    for seed in 0..40 {
        let config = TrailConfig::new(14, 0.5, 0.0, TrailLength::Unbounded)
            .unwrap()
            .with_neighborhood(Neighborhood::VonNeumann);
        let run = run_walk(config, seed);
        for k in 1..run.path.len() {
            assert!(
                brute_force_legal(&run.path[..k], 14, Neighborhood::VonNeumann, run.path[k]),
                "seed {seed}: move {k} to {} was illegal",
                run.path[k]
            );
        }
    }
}
