//! Initial conditions for the concentration field.
//!
//! Every pattern starts from the saturated substrate state (A = 1, B = 0)
//! and drops activator into selected cells. Randomness comes only from the
//! caller's [`Xorshift64`].

use crate::error::EngineError;
use crate::field::Field;
use crate::prng::Xorshift64;
use noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Activator concentration written into seeded cells.
const SEED_B: f64 = 1.0;
/// Substrate concentration left in seeded cells.
const SEED_A: f64 = 0.5;
/// Minimum radius of the central disc.
const MIN_CENTER_RADIUS: usize = 3;
/// Cells per scattered cluster (R² / this, at least [`MIN_CLUSTERS`]).
const CELLS_PER_CLUSTER: usize = 2048;
const MIN_CLUSTERS: usize = 4;
const CLUSTER_RADIUS_MIN: isize = 2;
const CLUSTER_RADIUS_MAX: isize = 4;

/// An initial condition for both channels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SeedPattern {
    /// Central activator disc plus scattered random clusters.
    #[default]
    Standard,
    /// Perlin noise thresholded into activator patches.
    Noise { scale: f64, threshold: f64 },
    /// Pure substrate, no activator anywhere.
    Empty,
}

impl SeedPattern {
    /// Noise pattern with the scale and threshold used by the CLI.
    pub fn noise() -> Self {
        SeedPattern::Noise {
            scale: 0.08,
            threshold: 0.35,
        }
    }

    /// Parses `"standard"`, `"noise"` or `"empty"`.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "standard" => Ok(SeedPattern::Standard),
            "noise" => Ok(SeedPattern::noise()),
            "empty" => Ok(SeedPattern::Empty),
            _ => Err(EngineError::UnknownPattern(name.to_string())),
        }
    }

    /// Writes this pattern into `a` and `b`, overwriting every cell.
    pub fn write(&self, a: &mut Field, b: &mut Field, rng: &mut Xorshift64) {
        a.fill(1.0);
        b.fill(0.0);
        match *self {
            SeedPattern::Standard => seed_standard(a, b, rng),
            SeedPattern::Noise { scale, threshold } => seed_noise(a, b, rng, scale, threshold),
            SeedPattern::Empty => {}
        }
    }
}

fn seed_standard(a: &mut Field, b: &mut Field, rng: &mut Xorshift64) {
    let w = a.width();
    let h = a.height();
    let side = w.min(h);

    let center_radius = (side / 12).max(MIN_CENTER_RADIUS) as isize;
    stamp_disc(a, b, (w / 2) as isize, (h / 2) as isize, center_radius);

    let clusters = (w * h / CELLS_PER_CLUSTER).max(MIN_CLUSTERS);
    let radius_span = (CLUSTER_RADIUS_MAX - CLUSTER_RADIUS_MIN + 1) as usize;
    for _ in 0..clusters {
        let cx = rng.next_usize(w) as isize;
        let cy = rng.next_usize(h) as isize;
        let r = CLUSTER_RADIUS_MIN + rng.next_usize(radius_span) as isize;
        stamp_disc(a, b, cx, cy, r);
    }
}

fn seed_noise(a: &mut Field, b: &mut Field, rng: &mut Xorshift64, scale: f64, threshold: f64) {
    let perlin = Perlin::new(rng.next_u64() as u32);
    // Offset keeps samples off the integer lattice, where Perlin is always 0.
    let offset = rng.next_range(0.1, 0.9);
    for y in 0..a.height() {
        for x in 0..a.width() {
            let n = perlin.get([x as f64 * scale + offset, y as f64 * scale + offset]);
            if n > threshold {
                a.set(x as isize, y as isize, SEED_A);
                b.set(x as isize, y as isize, SEED_B);
            }
        }
    }
}

/// Fills a disc of radius `r` around `(cx, cy)`; wraps toroidally at edges.
fn stamp_disc(a: &mut Field, b: &mut Field, cx: isize, cy: isize, r: isize) {
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy <= r * r {
                a.set(cx + dx, cy + dy, SEED_A);
                b.set(cx + dx, cy + dy, SEED_B);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(pattern: SeedPattern, res: usize, seed: u64) -> (Field, Field) {
        let mut a = Field::new(res, res).unwrap();
        let mut b = Field::new(res, res).unwrap();
        pattern.write(&mut a, &mut b, &mut Xorshift64::new(seed));
        (a, b)
    }

    #[test]
    fn standard_has_activator_at_center() {
        let (a, b) = seeded(SeedPattern::Standard, 64, 42);
        assert!((b.get(32, 32) - SEED_B).abs() < f64::EPSILON);
        assert!((a.get(32, 32) - SEED_A).abs() < f64::EPSILON);
    }

    #[test]
    fn standard_is_mostly_saturated_substrate() {
        let (a, b) = seeded(SeedPattern::Standard, 128, 42);
        let active = b.data().iter().filter(|&&v| v > 0.0).count();
        assert!(active > 0);
        assert!(active < b.data().len() / 4, "too much activator: {active}");
        let saturated = a.data().iter().filter(|&&v| v == 1.0).count();
        assert_eq!(saturated + active, a.data().len());
    }

    #[test]
    fn standard_is_deterministic_per_seed() {
        let (_, b1) = seeded(SeedPattern::Standard, 64, 5);
        let (_, b2) = seeded(SeedPattern::Standard, 64, 5);
        let (_, b3) = seeded(SeedPattern::Standard, 64, 6);
        assert_eq!(b1, b2);
        assert_ne!(b1, b3);
    }

    #[test]
    fn standard_works_on_tiny_grids() {
        let (_, b) = seeded(SeedPattern::Standard, 4, 1);
        assert!(b.data().iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn empty_has_no_activator() {
        let (a, b) = seeded(SeedPattern::Empty, 16, 1);
        assert!(a.data().iter().all(|&v| v == 1.0));
        assert!(b.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn noise_produces_some_patches() {
        let (_, b) = seeded(SeedPattern::noise(), 128, 11);
        let active = b.data().iter().filter(|&&v| v > 0.0).count();
        assert!(active > 0, "noise seed produced no activator");
        assert!(active < b.data().len(), "noise seed covered the whole grid");
    }

    #[test]
    fn write_overwrites_previous_contents() {
        let mut a = Field::filled(8, 8, 0.3).unwrap();
        let mut b = Field::filled(8, 8, 0.7).unwrap();
        SeedPattern::Empty.write(&mut a, &mut b, &mut Xorshift64::new(1));
        assert!(b.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn from_name_parses_known_patterns() {
        assert_eq!(
            SeedPattern::from_name("standard").unwrap(),
            SeedPattern::Standard
        );
        assert_eq!(SeedPattern::from_name("empty").unwrap(), SeedPattern::Empty);
        assert!(matches!(
            SeedPattern::from_name("noise").unwrap(),
            SeedPattern::Noise { .. }
        ));
        assert!(SeedPattern::from_name("checkerboard").is_err());
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(SeedPattern::noise()).unwrap();
        assert_eq!(json["type"], "noise");
        let back: SeedPattern = serde_json::from_value(json).unwrap();
        assert_eq!(back, SeedPattern::noise());
    }
}
