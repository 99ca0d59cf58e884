use crate::simulation::agent::{CellState, TrailAgent};
use crate::simulation::grid::Cell;
use rayon::prelude::*;

pub const EMPTY_CHAR: char = ' ';
pub const GAP_CHAR: char = '.';
pub const PELLET_CHAR: char = '#';

/// Grid cells covered by one terminal character along each axis.
///
/// The grid is shrunk uniformly so it fits `rows` x `cols`; small grids map
/// one cell to one character.
#[must_use]
pub fn cells_per_char(grid_size: usize, rows: usize, cols: usize) -> usize {
    if rows == 0 || cols == 0 {
        return 0;
    }
    grid_size.div_ceil(rows).max(grid_size.div_ceil(cols)).max(1)
}

/// Rasterises the trail into text rows.
///
/// Each character summarises a square block of cells: the agent's heading
/// arrow wins, then a pellet, then a gap.
#[must_use]
pub fn compute_trail_grid<S: Sync>(agent: &TrailAgent<S>, rows: usize, cols: usize) -> Vec<String> {
    let grid_size = agent.config().grid_size() as usize;
    let scale = cells_per_char(grid_size, rows, cols);
    if scale == 0 {
        return Vec::new();
    }
    let out_size = grid_size.div_ceil(scale);
    let position = agent.position();
    let arrow = agent.heading().arrow();

    // Use rayon to compute rows in parallel
    (0..out_size)
        .into_par_iter()
        .map(|r| {
            let mut line = String::with_capacity(out_size);
            for c in 0..out_size {
                let ys = r * scale..((r + 1) * scale).min(grid_size);
                let xs = c * scale..((c + 1) * scale).min(grid_size);

                let holds_agent = xs.contains(&(position.x as usize)) && ys.contains(&(position.y as usize));
                if holds_agent {
                    line.push(arrow);
                    continue;
                }

                let mut symbol = EMPTY_CHAR;
                'block: for y in ys {
                    for x in xs.clone() {
                        match agent.cell_state(Cell::new(x as i32, y as i32)) {
                            CellState::Pellet => {
                                symbol = PELLET_CHAR;
                                break 'block;
                            }
                            CellState::Gap => symbol = GAP_CHAR,
                            CellState::Empty => {}
                        }
                    }
                }
                line.push(symbol);
            }
            line
        })
        .collect()
}
