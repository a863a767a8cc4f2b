//! Live simulation parameters and the state machine that mutates them.
//!
//! The controller is in exactly one of three modes: idle, easing toward a
//! target, or following a journey. Every mutation path clamps F and K into
//! their domain before publishing.

use crate::journey::{Journey, JourneyKind};
use glam::DVec2;
use log::debug;
use rd_engine_core::params::param_f64;
use rd_engine_core::prng::Xorshift64;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FEED_MIN: f64 = 0.0;
pub const FEED_MAX: f64 = 0.1;
pub const KILL_MIN: f64 = 0.0;
pub const KILL_MAX: f64 = 0.08;
pub const DIFFUSION_MIN: f64 = 0.0;
pub const DIFFUSION_MAX: f64 = 2.0;

/// Default ease duration in milliseconds.
pub const DEFAULT_EASE_MS: f64 = 1000.0;

/// Gray-Scott "Mitosis".
const DEFAULT_FEED: f64 = 0.0367;
const DEFAULT_KILL: f64 = 0.0649;
const DEFAULT_DIFFUSION_A: f64 = 1.0;
const DEFAULT_DIFFUSION_B: f64 = 0.5;

/// The live (feed, kill, diffusion) tuple.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Feed rate F, domain [0, 0.1].
    pub feed: f64,
    /// Kill rate K, domain [0, 0.08].
    pub kill: f64,
    /// Diffusion rate of channel A.
    pub diffusion_a: f64,
    /// Diffusion rate of channel B.
    pub diffusion_b: f64,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            feed: DEFAULT_FEED,
            kill: DEFAULT_KILL,
            diffusion_a: DEFAULT_DIFFUSION_A,
            diffusion_b: DEFAULT_DIFFUSION_B,
        }
    }
}

impl Parameters {
    /// Returns a copy with every field clamped into its domain.
    pub fn clamped(self) -> Self {
        Self {
            feed: clamp_or_min(self.feed, FEED_MIN, FEED_MAX),
            kill: clamp_or_min(self.kill, KILL_MIN, KILL_MAX),
            diffusion_a: clamp_or_min(self.diffusion_a, DIFFUSION_MIN, DIFFUSION_MAX),
            diffusion_b: clamp_or_min(self.diffusion_b, DIFFUSION_MIN, DIFFUSION_MAX),
        }
    }

    /// Reads `feed_rate`, `kill_rate`, `diffusion_a`, `diffusion_b` from a JSON
    /// object, falling back to `base` for missing keys, then clamps.
    pub fn from_json(params: &Value, base: Parameters) -> Self {
        Self {
            feed: param_f64(params, "feed_rate", base.feed),
            kill: param_f64(params, "kill_rate", base.kill),
            diffusion_a: param_f64(params, "diffusion_a", base.diffusion_a),
            diffusion_b: param_f64(params, "diffusion_b", base.diffusion_b),
        }
        .clamped()
    }

    /// (F, K) as a point in parameter space.
    pub fn point(&self) -> DVec2 {
        DVec2::new(self.feed, self.kill)
    }
}

/// NaN maps to the domain floor; everything else is clamped.
fn clamp_or_min(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() {
        min
    } else {
        v.clamp(min, max)
    }
}

/// Clamps an (F, K) point into the parameter domain.
pub fn clamp_point(p: DVec2) -> DVec2 {
    DVec2::new(
        clamp_or_min(p.x, FEED_MIN, FEED_MAX),
        clamp_or_min(p.y, KILL_MIN, KILL_MAX),
    )
}

/// An in-flight cubic ease-out between two (F, K) points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ease {
    from: DVec2,
    target: DVec2,
    elapsed_ms: f64,
    duration_ms: f64,
}

impl Ease {
    /// Progress in [0, 1], linear in elapsed time.
    pub fn progress(&self) -> f64 {
        (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
    }

    pub fn target(&self) -> DVec2 {
        self.target
    }
}

/// Cubic ease-out: `1 - (1 - p)^3`.
pub fn ease_out_cubic(progress: f64) -> f64 {
    let inv = 1.0 - progress.clamp(0.0, 1.0);
    1.0 - inv * inv * inv
}

/// What the controller is doing between ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Idle,
    Easing(Ease),
    Journeying(Journey),
}

/// Owns the live parameters and advances easing and journeys once per tick.
#[derive(Debug, Clone)]
pub struct ParameterController {
    params: Parameters,
    mode: Mode,
    rng: Xorshift64,
}

impl ParameterController {
    /// `rng` feeds random-walk journeys only.
    pub fn new(params: Parameters, rng: Xorshift64) -> Self {
        Self {
            params: params.clamped(),
            mode: Mode::Idle,
            rng,
        }
    }

    pub fn parameters(&self) -> Parameters {
        self.params
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The active journey, if any.
    pub fn journey(&self) -> Option<&Journey> {
        match &self.mode {
            Mode::Journeying(j) => Some(j),
            _ => None,
        }
    }

    pub fn is_easing(&self) -> bool {
        matches!(self.mode, Mode::Easing(_))
    }

    /// Sets F and K directly (clamped), cancelling any ease.
    ///
    /// A running journey keeps running and will move the point again on
    /// the next tick.
    pub fn set_immediate(&mut self, feed: f64, kill: f64) {
        if self.is_easing() {
            debug!("ease cancelled by immediate set");
            self.mode = Mode::Idle;
        }
        self.publish(DVec2::new(feed, kill));
    }

    /// Sets both diffusion rates (clamped). Does not touch the mode.
    pub fn set_diffusion(&mut self, diffusion_a: f64, diffusion_b: f64) {
        self.params.diffusion_a = clamp_or_min(diffusion_a, DIFFUSION_MIN, DIFFUSION_MAX);
        self.params.diffusion_b = clamp_or_min(diffusion_b, DIFFUSION_MIN, DIFFUSION_MAX);
    }

    /// Replaces the whole tuple (clamped), cancelling any ease.
    pub fn set_parameters(&mut self, params: Parameters) {
        self.set_diffusion(params.diffusion_a, params.diffusion_b);
        self.set_immediate(params.feed, params.kill);
    }

    /// Starts a cubic ease-out from the current (F, K) to the clamped target.
    ///
    /// Ends any journey. A non-positive duration applies the target at once.
    pub fn ease_to(&mut self, feed: f64, kill: f64, duration_ms: f64) {
        let target = clamp_point(DVec2::new(feed, kill));
        if duration_ms.is_nan() || duration_ms <= 0.0 {
            self.mode = Mode::Idle;
            self.publish(target);
            return;
        }
        debug!(
            "easing to F={:.4} K={:.4} over {duration_ms}ms",
            target.x, target.y
        );
        self.mode = Mode::Easing(Ease {
            from: self.params.point(),
            target,
            elapsed_ms: 0.0,
            duration_ms,
        });
    }

    /// Starts a journey at phase 0, cancelling any ease.
    /// `JourneyKind::None` stops the current journey instead.
    pub fn set_journey(&mut self, kind: JourneyKind, speed: f64) {
        if kind == JourneyKind::None {
            self.stop_journey();
            return;
        }
        let journey = Journey::new(kind, speed, self.params.point());
        debug!(
            "journey {} started at speed {}",
            kind.name(),
            journey.speed()
        );
        self.mode = Mode::Journeying(journey);
    }

    /// Stops a running journey; the parameters stay where it left them.
    pub fn stop_journey(&mut self) {
        if let Mode::Journeying(j) = self.mode {
            debug!("journey {} stopped at phase {:.3}", j.kind().name(), j.phase());
            self.mode = Mode::Idle;
        }
    }

    /// Advances easing or the journey by `dt_ms` and publishes the result.
    pub fn tick(&mut self, dt_ms: f64) {
        let dt_ms = if dt_ms > 0.0 { dt_ms } else { 0.0 };
        match &mut self.mode {
            Mode::Idle => {}
            Mode::Easing(ease) => {
                ease.elapsed_ms += dt_ms;
                let progress = ease.progress();
                let (from, target) = (ease.from, ease.target);
                if progress >= 1.0 {
                    self.mode = Mode::Idle;
                    self.publish(target);
                    debug!("ease complete");
                } else {
                    self.publish(from.lerp(target, ease_out_cubic(progress)));
                }
            }
            Mode::Journeying(journey) => {
                let point = journey.advance(dt_ms, &mut self.rng);
                self.publish(point);
            }
        }
    }

    fn publish(&mut self, point: DVec2) {
        let p = clamp_point(point);
        self.params.feed = p.x;
        self.params.kill = p.y;
    }
}
