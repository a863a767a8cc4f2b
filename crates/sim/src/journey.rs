//! Autonomous trajectories through (F, K) parameter space.
//!
//! A [`Journey`] is one tagged struct covering every trajectory shape. All
//! shapes except the random walk are stateless functions of `phase`; the
//! random walk keeps its drifting target in `walk_target`. Every output is
//! clamped back into the parameter domain before it is returned.

use crate::controller::clamp_point;
use glam::DVec2;
use rd_engine_core::error::EngineError;
use rd_engine_core::prng::Xorshift64;
use serde::{Deserialize, Serialize};

/// Linear journey endpoints (Spirals → Coral).
const LINEAR_FROM: DVec2 = DVec2::new(0.018, 0.051);
const LINEAR_TO: DVec2 = DVec2::new(0.055, 0.062);

/// Circle traced by the circular journey. Its top edge leaves the K domain.
const CIRCLE_CENTER: DVec2 = DVec2::new(0.040, 0.060);
const CIRCLE_RADIUS: f64 = 0.025;

/// Figure-eight center and per-axis amplitudes.
const FIGURE8_CENTER: DVec2 = DVec2::new(0.040, 0.060);
const FIGURE8_AMPLITUDE: DVec2 = DVec2::new(0.020, 0.010);

/// Per-tick probability that the random walk picks a new target.
const WALK_REROLL_CHANCE: f64 = 0.02;
/// Region random-walk targets are drawn from.
const WALK_MIN: DVec2 = DVec2::new(0.010, 0.030);
const WALK_MAX: DVec2 = DVec2::new(0.090, 0.075);
/// Approach rate toward the target, per second of journey time.
const WALK_APPROACH_RATE: f64 = 0.8;

pub const MIN_SPEED: f64 = 0.01;
pub const MAX_SPEED: f64 = 10.0;

const JOURNEY_NAMES: &[&str] = &["none", "linear", "circular", "figure8", "random-walk"];

/// Shape of a journey.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JourneyKind {
    #[default]
    None,
    /// Sine-driven oscillation between two fixed points.
    Linear,
    /// A circle around a fixed center.
    Circular,
    /// Out-of-phase sinusoids on F and K (K at twice the frequency).
    #[serde(rename = "figure8")]
    Figure8,
    /// Exponential drift toward a randomly re-rolled target.
    RandomWalk,
}

impl JourneyKind {
    /// Parses `none`, `linear`, `circular`, `figure8` or `random-walk`.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "none" => Ok(JourneyKind::None),
            "linear" => Ok(JourneyKind::Linear),
            "circular" => Ok(JourneyKind::Circular),
            "figure8" => Ok(JourneyKind::Figure8),
            "random-walk" => Ok(JourneyKind::RandomWalk),
            _ => Err(EngineError::UnknownJourney(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            JourneyKind::None => "none",
            JourneyKind::Linear => "linear",
            JourneyKind::Circular => "circular",
            JourneyKind::Figure8 => "figure8",
            JourneyKind::RandomWalk => "random-walk",
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        JOURNEY_NAMES
    }
}

/// Journey state: shape, time accumulator, speed and random-walk target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Journey {
    kind: JourneyKind,
    phase: f64,
    speed: f64,
    position: DVec2,
    walk_target: DVec2,
}

impl Journey {
    /// Starts a journey at phase 0 from `start` = (F, K).
    pub fn new(kind: JourneyKind, speed: f64, start: DVec2) -> Self {
        let speed = if speed.is_nan() {
            1.0
        } else {
            speed.clamp(MIN_SPEED, MAX_SPEED)
        };
        Self {
            kind,
            phase: 0.0,
            speed,
            position: start,
            walk_target: start,
        }
    }

    pub fn kind(&self) -> JourneyKind {
        self.kind
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Where the random walk is currently heading.
    pub fn walk_target(&self) -> DVec2 {
        self.walk_target
    }

    /// Advances by `dt_ms` of wall time and returns the new clamped (F, K).
    ///
    /// Negative or NaN `dt_ms` is treated as zero so `phase` never decreases.
    pub fn advance(&mut self, dt_ms: f64, rng: &mut Xorshift64) -> DVec2 {
        let dt_s = if dt_ms > 0.0 { dt_ms / 1000.0 } else { 0.0 };
        let dphase = dt_s * self.speed;
        self.phase += dphase;
        let phase = self.phase;

        let point = match self.kind {
            JourneyKind::None => self.position,
            JourneyKind::Linear => {
                let t = (phase.sin() + 1.0) * 0.5;
                LINEAR_FROM.lerp(LINEAR_TO, t)
            }
            JourneyKind::Circular => {
                CIRCLE_CENTER + DVec2::new(phase.cos(), phase.sin()) * CIRCLE_RADIUS
            }
            JourneyKind::Figure8 => {
                FIGURE8_CENTER
                    + DVec2::new(phase.sin(), (2.0 * phase).sin()) * FIGURE8_AMPLITUDE
            }
            JourneyKind::RandomWalk => {
                if rng.chance(WALK_REROLL_CHANCE) {
                    self.walk_target = DVec2::new(
                        rng.next_range(WALK_MIN.x, WALK_MAX.x),
                        rng.next_range(WALK_MIN.y, WALK_MAX.y),
                    );
                }
                let blend = 1.0 - (-WALK_APPROACH_RATE * dphase).exp();
                self.position + (self.walk_target - self.position) * blend
            }
        };

        self.position = clamp_point(point);
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{FEED_MAX, KILL_MAX};

    fn in_domain(p: DVec2) -> bool {
        (0.0..=FEED_MAX).contains(&p.x) && (0.0..=KILL_MAX).contains(&p.y)
    }

    fn start() -> DVec2 {
        DVec2::new(0.0367, 0.0649)
    }

    #[test]
    fn names_round_trip() {
        for &name in JourneyKind::list_names() {
            assert_eq!(JourneyKind::from_name(name).unwrap().name(), name);
        }
        assert!(matches!(
            JourneyKind::from_name("zigzag"),
            Err(EngineError::UnknownJourney(_))
        ));
    }

    #[test]
    fn serde_names_match_cli_names() {
        for &name in JourneyKind::list_names() {
            let kind = JourneyKind::from_name(name).unwrap();
            assert_eq!(serde_json::to_value(kind).unwrap(), name);
        }
    }

    #[test]
    fn new_journey_starts_at_phase_zero_with_clamped_speed() {
        let j = Journey::new(JourneyKind::Linear, 100.0, start());
        assert_eq!(j.phase(), 0.0);
        assert_eq!(j.speed(), MAX_SPEED);
        assert_eq!(Journey::new(JourneyKind::Linear, 0.0, start()).speed(), MIN_SPEED);
    }

    #[test]
    fn phase_is_monotonic() {
        let mut rng = Xorshift64::new(1);
        let mut j = Journey::new(JourneyKind::Figure8, 1.5, start());
        let mut last = j.phase();
        for dt in [16.0, 0.0, -50.0, f64::NAN, 33.3] {
            j.advance(dt, &mut rng);
            assert!(j.phase() >= last);
            last = j.phase();
        }
        assert!((j.phase() - 1.5 * (0.016 + 0.0333)).abs() < 1e-12);
    }

    #[test]
    fn linear_stays_between_its_endpoints() {
        let mut rng = Xorshift64::new(1);
        let mut j = Journey::new(JourneyKind::Linear, 2.0, start());
        for _ in 0..500 {
            let p = j.advance(16.0, &mut rng);
            assert!(p.x >= LINEAR_FROM.x - 1e-12 && p.x <= LINEAR_TO.x + 1e-12);
            assert!(p.y >= LINEAR_FROM.y - 1e-12 && p.y <= LINEAR_TO.y + 1e-12);
        }
    }

    #[test]
    fn circular_keeps_its_radius_where_unclamped() {
        let mut rng = Xorshift64::new(1);
        let mut j = Journey::new(JourneyKind::Circular, 1.0, start());
        // Three quarters of a turn lands on the bottom of the circle.
        let p = j.advance(1000.0 * 1.5 * std::f64::consts::PI, &mut rng);
        assert!((p.distance(CIRCLE_CENTER) - CIRCLE_RADIUS).abs() < 1e-12);
    }

    #[test]
    fn circular_top_is_clamped_into_domain() {
        let mut rng = Xorshift64::new(1);
        let mut j = Journey::new(JourneyKind::Circular, 1.0, start());
        let p = j.advance(1000.0 * std::f64::consts::FRAC_PI_2, &mut rng);
        assert_eq!(p.y, KILL_MAX);
    }

    #[test]
    fn figure8_k_runs_at_twice_the_frequency() {
        let mut rng = Xorshift64::new(1);
        let mut j = Journey::new(JourneyKind::Figure8, 1.0, start());
        // At phase π/2, sin(phase) = 1 and sin(2·phase) = 0.
        let p = j.advance(1000.0 * std::f64::consts::FRAC_PI_2, &mut rng);
        assert!((p.x - (FIGURE8_CENTER.x + FIGURE8_AMPLITUDE.x)).abs() < 1e-12);
        assert!((p.y - FIGURE8_CENTER.y).abs() < 1e-12);
    }

    #[test]
    fn random_walk_moves_toward_its_target() {
        let mut rng = Xorshift64::new(5);
        let mut j = Journey::new(JourneyKind::RandomWalk, 1.0, start());
        let mut rerolled = false;
        for _ in 0..2000 {
            let before_target = j.walk_target();
            let before = j.position;
            let p = j.advance(16.0, &mut rng);
            if j.walk_target() != before_target {
                rerolled = true;
            } else {
                assert!(p.distance(j.walk_target()) <= before.distance(j.walk_target()) + 1e-15);
            }
        }
        assert!(rerolled, "target never re-rolled in 2000 ticks");
    }

    #[test]
    fn random_walk_is_deterministic_per_rng_seed() {
        let run = |seed| {
            let mut rng = Xorshift64::new(seed);
            let mut j = Journey::new(JourneyKind::RandomWalk, 1.0, start());
            (0..500).map(|_| j.advance(16.0, &mut rng)).last()
        };
        assert_eq!(run(9), run(9));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn kind() -> impl Strategy<Value = JourneyKind> {
            prop::sample::select(vec![
                JourneyKind::None,
                JourneyKind::Linear,
                JourneyKind::Circular,
                JourneyKind::Figure8,
                JourneyKind::RandomWalk,
            ])
        }

        proptest! {
            #[test]
            fn every_output_is_in_domain(
                k in kind(),
                speed in 0.0_f64..20.0,
                seed: u64,
                dts in prop::collection::vec(0.0_f64..200.0, 1..100),
            ) {
                let mut rng = Xorshift64::new(seed);
                let mut j = Journey::new(k, speed, start());
                for dt in dts {
                    let p = j.advance(dt, &mut rng);
                    prop_assert!(in_domain(p), "{k:?} produced {p}");
                }
            }
        }
    }
}
