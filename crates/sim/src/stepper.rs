//! Explicit Euler diffusion-reaction stepping on the double-buffered grid.
//!
//! One sub-step reads every cell of the current buffer, writes every cell of
//! the scratch buffer, then swaps. Rows are computed in parallel with rayon;
//! each cell depends only on the current buffer, so the result is identical
//! to a serial sweep. Sub-steps themselves are strictly sequential.

use crate::controller::Parameters;
use crate::kinetics::Model;
use rayon::prelude::*;
use rd_engine_core::grid::GridStore;

/// Fixed time step. Time resolution lives in the diffusion and F/K magnitudes.
pub const DT: f64 = 1.0;
/// Sub-steps per tick at `sim_speed = 1.0`.
pub const STEPS_PER_SPEED_UNIT: f64 = 8.0;

/// Number of sub-steps one tick runs at `sim_speed`: `ceil(sim_speed * 8)`.
///
/// Zero, negative and NaN speeds run no sub-steps.
pub fn steps_for_speed(sim_speed: f64) -> usize {
    if sim_speed.is_nan() || sim_speed <= 0.0 {
        return 0;
    }
    (sim_speed * STEPS_PER_SPEED_UNIT).ceil() as usize
}

/// Runs `steps` sub-steps in order.
pub fn run(grid: &mut GridStore, model: Model, params: &Parameters, steps: usize) {
    for _ in 0..steps {
        sub_step(grid, model, params);
    }
}

/// Advances the grid by one sub-step and swaps buffers.
///
/// `new = clamp01(old + DT * (D * laplacian + reaction))` for both channels.
/// The clamp keeps unstable parameter combinations from diverging.
pub fn sub_step(grid: &mut GridStore, model: Model, params: &Parameters) {
    let n = grid.resolution();
    let f = params.feed;
    let k = params.kill;
    let da = params.diffusion_a;
    let db = params.diffusion_b;

    {
        let (current, scratch) = grid.split();
        let a_in = current.a.data();
        let b_in = current.b.data();

        scratch
            .a
            .data_mut()
            .par_chunks_mut(n)
            .zip(scratch.b.data_mut().par_chunks_mut(n))
            .enumerate()
            .for_each(|(y, (a_row, b_row))| {
                let rows = RowNeighbors::new(y, n);
                for x in 0..n {
                    let idx = y * n + x;
                    let a = a_in[idx];
                    let b = b_in[idx];
                    let lap_a = laplacian_9pt(a_in, x, &rows, n);
                    let lap_b = laplacian_9pt(b_in, x, &rows, n);
                    let (ra, rb) = model.reaction(a, b, f, k);
                    a_row[x] = (a + DT * (da * lap_a + ra)).clamp(0.0, 1.0);
                    b_row[x] = (b + DT * (db * lap_b + rb)).clamp(0.0, 1.0);
                }
            });
    }

    grid.swap();
}

/// Row offsets of the row above, the row itself and the row below, wrapped.
struct RowNeighbors {
    up: usize,
    mid: usize,
    down: usize,
}

impl RowNeighbors {
    fn new(y: usize, n: usize) -> Self {
        Self {
            up: wrap(y, -1, n) * n,
            mid: y * n,
            down: wrap(y, 1, n) * n,
        }
    }
}

/// 9-point Laplacian stencil.
///
/// ```text
///   0.05  0.2  0.05
///   0.2  -1.0  0.2
///   0.05  0.2  0.05
/// ```
#[inline]
fn laplacian_9pt(data: &[f64], x: usize, rows: &RowNeighbors, n: usize) -> f64 {
    let xm = wrap(x, -1, n);
    let xp = wrap(x, 1, n);

    let center = data[rows.mid + x];

    let orthogonal =
        data[rows.up + x] + data[rows.down + x] + data[rows.mid + xm] + data[rows.mid + xp];
    let diagonal =
        data[rows.up + xm] + data[rows.up + xp] + data[rows.down + xm] + data[rows.down + xp];

    0.2 * orthogonal + 0.05 * diagonal - center
}

/// Toroidal coordinate wrap: `(coord + offset) mod size`.
#[inline]
fn wrap(coord: usize, offset: isize, size: usize) -> usize {
    (coord as isize + offset).rem_euclid(size as isize) as usize
}
