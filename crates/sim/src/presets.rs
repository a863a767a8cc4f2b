//! Named (F, K) pairs per model.
//!
//! The tables are static and ordered; the first entry is what a model loads
//! when it is selected. Gray-Scott values are the classic ones for the
//! 0.2/0.05 Laplacian with diffusion (1.0, 0.5). Brusselator and
//! Schnakenberg values sit inside the Turing band of their kinetic mapping
//! in [`crate::kinetics`], so each keeps spatial structure from the
//! standard seed.

use crate::kinetics::Model;
use rd_engine_core::error::EngineError;
use serde::Serialize;

/// A named point in (F, K) space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub feed: f64,
    pub kill: f64,
}

const fn preset(name: &'static str, feed: f64, kill: f64) -> Preset {
    Preset { name, feed, kill }
}

const GRAY_SCOTT: &[Preset] = &[
    preset("Mitosis", 0.0367, 0.0649),
    preset("Coral", 0.0545, 0.0620),
    preset("Spirals", 0.0180, 0.0510),
    preset("Solitons", 0.0300, 0.0620),
    preset("Worms", 0.0780, 0.0610),
    preset("Maze", 0.0290, 0.0570),
    preset("Waves", 0.0140, 0.0450),
    preset("Fingerprint", 0.0370, 0.0600),
];

const BRUSSELATOR: &[Preset] = &[
    preset("Spots", 0.0500, 0.0650),
    preset("Stripes", 0.0500, 0.0750),
    preset("Waves", 0.0250, 0.0500),
    // Past the Hopf onset but inside the Turing band: the initial
    // oscillation breaks into drifting fronts instead of synchronizing.
    preset("Spirals", 0.0225, 0.0450),
];

const SCHNAKENBERG: &[Preset] = &[
    preset("Spots", 0.0500, 0.0750),
    preset("Stripes", 0.0750, 0.0750),
    preset("Waves", 0.0200, 0.0750),
    preset("Spirals", 0.0100, 0.0500),
];

/// The ordered preset table for `model`.
pub fn presets(model: Model) -> &'static [Preset] {
    match model {
        Model::GrayScott => GRAY_SCOTT,
        Model::Brusselator => BRUSSELATOR,
        Model::Schnakenberg => SCHNAKENBERG,
    }
}

/// Looks up a preset by name, ignoring ASCII case.
///
/// Returns `EngineError::UnknownPreset` if the model has no such preset.
pub fn find_preset(model: Model, name: &str) -> Result<Preset, EngineError> {
    presets(model)
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
        .copied()
        .ok_or_else(|| EngineError::UnknownPreset {
            model: model.name().to_string(),
            name: name.to_string(),
        })
}
