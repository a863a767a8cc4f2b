//! Reaction terms for the supported models.
//!
//! Every model is presented through the same (F, K) dialect: F and K are
//! mapped internally onto the model's own kinetic constants, and the stored
//! channels are rescaled concentrations so that the model's interesting
//! states fit in [0, 1]. Channel A always holds the fast-diffusing species
//! (substrate or inhibitor) and channel B the rendered activator.

use rd_engine_core::error::EngineError;
use serde::{Deserialize, Serialize};

/// Brusselator concentration scale: X = 4·b, Y = 4·a.
const BRUSSELATOR_SCALE: f64 = 4.0;
/// Brusselator α per unit of F.
const BRUSSELATOR_ALPHA_PER_F: f64 = 40.0;
/// Brusselator β per unit of K.
const BRUSSELATOR_BETA_PER_K: f64 = 60.0;
/// Brusselator reaction time scale.
const BRUSSELATOR_RATE: f64 = 0.05;

/// Schnakenberg concentration scale: u = 2·b, v = 2·a.
const SCHNAKENBERG_SCALE: f64 = 2.0;
/// Schnakenberg `a` per unit of F.
const SCHNAKENBERG_A_PER_F: f64 = 2.0;
/// Schnakenberg `b` per unit of K.
const SCHNAKENBERG_B_PER_K: f64 = 12.0;
/// Schnakenberg reaction time scale (γ).
const SCHNAKENBERG_GAMMA: f64 = 0.02;

const MODEL_NAMES: &[&str] = &["gray-scott", "brusselator", "schnakenberg"];

/// A two-species reaction model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Model {
    /// `A + 2B → 3B`, A fed at F, B removed at F + K.
    #[default]
    GrayScott,
    /// Brusselator with activator X in B and inhibitor Y in A.
    Brusselator,
    /// Schnakenberg with activator u in B and substrate v in A.
    Schnakenberg,
}

impl Model {
    /// All models in display order.
    pub const ALL: [Model; 3] = [Model::GrayScott, Model::Brusselator, Model::Schnakenberg];

    /// Parses a kebab-case model name.
    ///
    /// Returns `EngineError::UnknownModel` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "gray-scott" => Ok(Model::GrayScott),
            "brusselator" => Ok(Model::Brusselator),
            "schnakenberg" => Ok(Model::Schnakenberg),
            _ => Err(EngineError::UnknownModel(name.to_string())),
        }
    }

    /// Kebab-case name, the inverse of [`Model::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            Model::GrayScott => "gray-scott",
            Model::Brusselator => "brusselator",
            Model::Schnakenberg => "schnakenberg",
        }
    }

    /// All recognized model names.
    pub fn list_names() -> &'static [&'static str] {
        MODEL_NAMES
    }

    /// Diffusion rates (A, B) the model's presets are tuned for.
    pub fn default_diffusion(self) -> (f64, f64) {
        match self {
            Model::GrayScott => (1.0, 0.5),
            Model::Brusselator => (1.0, 0.2),
            Model::Schnakenberg => (1.0, 0.05),
        }
    }

    /// Local rate of change `(da, db)` at one cell.
    #[inline]
    pub fn reaction(self, a: f64, b: f64, f: f64, k: f64) -> (f64, f64) {
        match self {
            Model::GrayScott => gray_scott(a, b, f, k),
            Model::Brusselator => brusselator(a, b, f, k),
            Model::Schnakenberg => schnakenberg(a, b, f, k),
        }
    }

    /// The spatially uniform fixed point `(a, b)` of the reaction at (F, K),
    /// in stored units (not clamped).
    ///
    /// Gray-Scott reports its trivial state (1, 0).
    pub fn homogeneous_state(self, f: f64, k: f64) -> (f64, f64) {
        match self {
            Model::GrayScott => (1.0, 0.0),
            Model::Brusselator => {
                let alpha = BRUSSELATOR_ALPHA_PER_F * f;
                let beta = BRUSSELATOR_BETA_PER_K * k;
                if alpha <= 0.0 {
                    return (0.0, 0.0);
                }
                (beta / alpha / BRUSSELATOR_SCALE, alpha / BRUSSELATOR_SCALE)
            }
            Model::Schnakenberg => {
                let sa = SCHNAKENBERG_A_PER_F * f;
                let sb = SCHNAKENBERG_B_PER_K * k;
                let u = sa + sb;
                if u <= 0.0 {
                    return (0.0, 0.0);
                }
                (sb / (u * u) / SCHNAKENBERG_SCALE, u / SCHNAKENBERG_SCALE)
            }
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Gray-Scott: `da = -ab² + F(1-a)`, `db = ab² - (K+F)b`.
fn gray_scott(a: f64, b: f64, f: f64, k: f64) -> (f64, f64) {
    let abb = a * b * b;
    (-abb + f * (1.0 - a), abb - (k + f) * b)
}

/// Brusselator: `X' = r(α - (β+1)X + X²Y)`, `Y' = r(βX - X²Y)`.
fn brusselator(a: f64, b: f64, f: f64, k: f64) -> (f64, f64) {
    let alpha = BRUSSELATOR_ALPHA_PER_F * f;
    let beta = BRUSSELATOR_BETA_PER_K * k;
    let x = BRUSSELATOR_SCALE * b;
    let y = BRUSSELATOR_SCALE * a;
    let xxy = x * x * y;
    let dx = BRUSSELATOR_RATE * (alpha - (beta + 1.0) * x + xxy);
    let dy = BRUSSELATOR_RATE * (beta * x - xxy);
    (dy / BRUSSELATOR_SCALE, dx / BRUSSELATOR_SCALE)
}

/// Schnakenberg: `u' = γ(a - u + u²v)`, `v' = γ(b - u²v)`.
fn schnakenberg(a: f64, b: f64, f: f64, k: f64) -> (f64, f64) {
    let sa = SCHNAKENBERG_A_PER_F * f;
    let sb = SCHNAKENBERG_B_PER_K * k;
    let u = SCHNAKENBERG_SCALE * b;
    let v = SCHNAKENBERG_SCALE * a;
    let uuv = u * u * v;
    let du = SCHNAKENBERG_GAMMA * (sa - u + uuv);
    let dv = SCHNAKENBERG_GAMMA * (sb - uuv);
    (dv / SCHNAKENBERG_SCALE, du / SCHNAKENBERG_SCALE)
}
