//! Localized edits to one channel of the grid.
//!
//! Forcing follows the stepper's discipline: read the current buffer, write
//! every cell of the scratch buffer, swap. Cells outside the disc and the
//! untouched channel are copied through unchanged.

use glam::DVec2;
use rd_engine_core::error::EngineError;
use rd_engine_core::grid::{Channel, GridStore};
use serde::{Deserialize, Serialize};

/// Whether a force adds to or subtracts from the channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sign {
    #[default]
    Add,
    Subtract,
}

impl Sign {
    fn factor(self) -> f64 {
        match self {
            Sign::Add => 1.0,
            Sign::Subtract => -1.0,
        }
    }
}

/// Adds or subtracts `(1 - d/r)^2 * strength` to `channel` for every cell
/// whose toroidal distance `d` to `center` is below `radius`.
///
/// `center` and `radius` are in grid cells. A non-positive or NaN radius
/// leaves the grid untouched.
pub fn apply_force(
    grid: &mut GridStore,
    center: DVec2,
    radius: f64,
    strength: f64,
    channel: Channel,
    sign: Sign,
) -> Result<(), EngineError> {
    if radius.is_nan() || radius <= 0.0 {
        return Ok(());
    }
    let signed = strength * sign.factor();
    edit(grid, center, channel, |old, dist| {
        if dist < radius {
            let t = 1.0 - dist / radius;
            old + t * t * signed
        } else {
            old
        }
    })
}

/// Sets `channel` to 1.0 over the hard-edged disc `d <= radius`.
pub fn apply_stamp(
    grid: &mut GridStore,
    center: DVec2,
    radius: f64,
    channel: Channel,
) -> Result<(), EngineError> {
    if radius.is_nan() || radius <= 0.0 {
        return Ok(());
    }
    edit(grid, center, channel, |old, dist| if dist <= radius { 1.0 } else { old })
}

/// Rewrites `channel` cell by cell from the current buffer into scratch,
/// copies the other channel, then swaps.
fn edit<F>(grid: &mut GridStore, center: DVec2, channel: Channel, f: F) -> Result<(), EngineError>
where
    F: Fn(f64, f64) -> f64,
{
    let n = grid.resolution();
    let size = n as f64;
    let center = DVec2::new(center.x.rem_euclid(size), center.y.rem_euclid(size));

    {
        let (current, mut scratch) = grid.split();
        let other = match channel {
            Channel::A => Channel::B,
            Channel::B => Channel::A,
        };
        scratch.channel_mut(other).copy_from(current.channel(other))?;

        let src = current.channel(channel).data();
        let dst = scratch.channel_mut(channel).data_mut();
        for y in 0..n {
            let dy = toroidal_delta(y as f64, center.y, size);
            for x in 0..n {
                let dx = toroidal_delta(x as f64, center.x, size);
                let idx = y * n + x;
                let dist = (dx * dx + dy * dy).sqrt();
                dst[idx] = f(src[idx], dist).clamp(0.0, 1.0);
            }
        }
    }

    grid.swap();
    Ok(())
}

/// Shortest unsigned distance between two coordinates on a ring of `size`.
fn toroidal_delta(a: f64, b: f64, size: f64) -> f64 {
    let d = (a - b).abs() % size;
    d.min(size - d)
}

/// Kind of painting tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolKind {
    #[default]
    Brush,
    Eraser,
    Stamp,
}

/// A painting tool, supplied per forcing call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tool {
    pub kind: ToolKind,
    pub channel: Channel,
    /// Radius in grid cells.
    pub radius: f64,
    /// Peak amount added or removed, typically in [0, 1].
    pub strength: f64,
}

impl Default for Tool {
    fn default() -> Self {
        Self {
            kind: ToolKind::Brush,
            channel: Channel::B,
            radius: 8.0,
            strength: 0.5,
        }
    }
}

impl Tool {
    /// Brush adds, Eraser subtracts, Stamp sets a hard disc.
    pub fn apply(&self, grid: &mut GridStore, center: DVec2) -> Result<(), EngineError> {
        match self.kind {
            ToolKind::Brush => {
                apply_force(grid, center, self.radius, self.strength, self.channel, Sign::Add)
            }
            ToolKind::Eraser => apply_force(
                grid,
                center,
                self.radius,
                self.strength,
                self.channel,
                Sign::Subtract,
            ),
            ToolKind::Stamp => apply_stamp(grid, center, self.radius, self.channel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rd_engine_core::{SeedPattern, Xorshift64};

    fn empty(res: usize) -> GridStore {
        let mut grid = GridStore::allocate(res).unwrap();
        grid.seed(&SeedPattern::Empty, &mut Xorshift64::new(1)).unwrap();
        grid
    }

    #[test]
    fn force_peaks_at_center_and_decays_with_distance() {
        let mut g = empty(64);
        apply_force(&mut g, DVec2::new(32.0, 32.0), 20.0, 1.0, Channel::B, Sign::Add).unwrap();
        let b = g.current().b;
        assert_eq!(b.get(32, 32), 1.0);
        let mut last = b.get(32, 32);
        for d in 1..20 {
            let v = b.get(32 + d, 32);
            assert!(v < last, "not decreasing at distance {d}: {v} >= {last}");
            assert!(v > 0.0);
            last = v;
        }
        assert_eq!(b.get(52, 32), 0.0);
        assert_eq!(b.get(32, 55), 0.0);
    }

    #[test]
    fn force_matches_quadratic_falloff() {
        let mut g = empty(32);
        apply_force(&mut g, DVec2::new(10.0, 10.0), 8.0, 0.8, Channel::B, Sign::Add).unwrap();
        let expected = (1.0 - 4.0 / 8.0_f64).powi(2) * 0.8;
        assert!((g.current().b.get(14, 10) - expected).abs() < 1e-12);
    }

    #[test]
    fn force_wraps_across_edges() {
        let mut g = empty(32);
        apply_force(&mut g, DVec2::new(0.0, 0.0), 4.0, 1.0, Channel::B, Sign::Add).unwrap();
        let b = g.current().b;
        assert!(b.get(31, 0) > 0.0);
        assert!(b.get(0, 31) > 0.0);
        assert_eq!(b.get(31, 0), b.get(1, 0));
    }

    #[test]
    fn force_leaves_other_channel_untouched() {
        let mut g = empty(16);
        let before = g.current().a.clone();
        apply_force(&mut g, DVec2::new(8.0, 8.0), 5.0, 1.0, Channel::B, Sign::Add).unwrap();
        assert_eq!(*g.current().a, before);
    }

    #[test]
    fn subtract_clamps_at_zero() {
        let mut g = empty(16);
        apply_force(&mut g, DVec2::new(8.0, 8.0), 5.0, 3.0, Channel::A, Sign::Subtract).unwrap();
        let a = g.current().a;
        assert_eq!(a.get(8, 8), 0.0);
        assert_eq!(a.get(0, 0), 1.0);
    }

    #[test]
    fn non_positive_radius_is_a_no_op() {
        let mut g = empty(16);
        let before = g.current().b.clone();
        apply_force(&mut g, DVec2::new(8.0, 8.0), 0.0, 1.0, Channel::B, Sign::Add).unwrap();
        apply_stamp(&mut g, DVec2::new(8.0, 8.0), -2.0, Channel::B).unwrap();
        assert_eq!(*g.current().b, before);
    }

    #[test]
    fn stamp_sets_a_hard_disc() {
        let mut g = empty(32);
        apply_stamp(&mut g, DVec2::new(16.0, 16.0), 3.0, Channel::B).unwrap();
        let b = g.current().b;
        assert_eq!(b.get(16, 16), 1.0);
        assert_eq!(b.get(19, 16), 1.0);
        assert_eq!(b.get(18, 18), 1.0);
        assert_eq!(b.get(20, 16), 0.0);
        assert_eq!(b.get(19, 19), 0.0);
    }

    #[test]
    fn out_of_range_center_wraps() {
        let mut x = empty(16);
        let mut y = empty(16);
        apply_stamp(&mut x, DVec2::new(-2.0, 18.0), 2.0, Channel::B).unwrap();
        apply_stamp(&mut y, DVec2::new(14.0, 2.0), 2.0, Channel::B).unwrap();
        assert_eq!(*x.current().b, *y.current().b);
    }

    #[test]
    fn tool_dispatches_by_kind() {
        let mut g = empty(32);
        let brush = Tool {
            kind: ToolKind::Brush,
            channel: Channel::B,
            radius: 6.0,
            strength: 1.0,
        };
        brush.apply(&mut g, DVec2::new(16.0, 16.0)).unwrap();
        assert_eq!(g.current().b.get(16, 16), 1.0);

        let eraser = Tool {
            kind: ToolKind::Eraser,
            ..brush
        };
        eraser.apply(&mut g, DVec2::new(16.0, 16.0)).unwrap();
        assert_eq!(g.current().b.get(16, 16), 0.0);

        let stamp = Tool {
            kind: ToolKind::Stamp,
            radius: 2.0,
            ..brush
        };
        stamp.apply(&mut g, DVec2::new(5.0, 5.0)).unwrap();
        assert_eq!(g.current().b.get(7, 5), 1.0);
    }

    #[test]
    fn toroidal_delta_takes_the_short_way() {
        assert_eq!(toroidal_delta(1.0, 31.0, 32.0), 2.0);
        assert_eq!(toroidal_delta(31.0, 1.0, 32.0), 2.0);
        assert_eq!(toroidal_delta(5.0, 5.0, 32.0), 0.0);
        assert_eq!(toroidal_delta(0.0, 16.0, 32.0), 16.0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn force_keeps_values_in_unit_interval(
                cx in -50.0_f64..50.0,
                cy in -50.0_f64..50.0,
                radius in -5.0_f64..30.0,
                strength in -3.0_f64..3.0,
                subtract: bool,
            ) {
                let mut g = empty(16);
                let sign = if subtract { Sign::Subtract } else { Sign::Add };
                apply_force(&mut g, DVec2::new(cx, cy), radius, strength, Channel::B, sign).unwrap();
                let cells = g.current();
                for &v in cells.a.data().iter().chain(cells.b.data()) {
                    prop_assert!((0.0..=1.0).contains(&v));
                }
            }
        }
    }
}
