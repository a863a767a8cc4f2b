#![deny(unsafe_code)]
//! Reaction-diffusion simulation.
//!
//! Two chemical species react and diffuse on a toroidal square lattice. The
//! [`Simulation`] ties together the double-buffered grid, one of three
//! kinetic [`Model`]s, the explicit-Euler [`stepper`], the [`forcing`]
//! operator for painting, and the [`ParameterController`] that eases and
//! animates (F, K) over time.
//!
//! One tick drains the [`CommandQueue`], advances easing or the active
//! journey, then runs `ceil(sim_speed * 8)` sequential sub-steps. The
//! rendered output is always channel B of the buffer finalized by the last
//! swap.

pub mod command;
pub mod controller;
pub mod forcing;
pub mod journey;
pub mod kinetics;
pub mod presets;
pub mod stepper;

pub use command::{Command, CommandQueue};
pub use controller::{Mode, ParameterController, Parameters};
pub use forcing::{Sign, Tool, ToolKind};
pub use journey::{Journey, JourneyKind};
pub use kinetics::Model;
pub use presets::Preset;

use glam::DVec2;
use log::{debug, info, warn};
use rd_engine_core::color::ColorConfig;
use rd_engine_core::error::EngineError;
use rd_engine_core::field::Field;
use rd_engine_core::grid::{Channel, GridStore};
use rd_engine_core::params::{param_f64, param_string, param_u64, param_usize};
use rd_engine_core::pixel::{self, Frame};
use rd_engine_core::prng::Xorshift64;
use rd_engine_core::seed::SeedPattern;
use rd_engine_core::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Default lattice side length.
pub const DEFAULT_RESOLUTION: usize = 256;
/// Default PRNG seed.
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_SIM_SPEED: f64 = 1.0;
pub const MAX_SIM_SPEED: f64 = 10.0;

/// PRNG stream for initial conditions.
const SEED_STREAM: u64 = 1;
/// PRNG stream for random-walk journeys.
const JOURNEY_STREAM: u64 = 2;

/// Construction-time settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub resolution: usize,
    pub model: Model,
    pub seed: u64,
    pub sim_speed: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            model: Model::GrayScott,
            seed: DEFAULT_SEED,
            sim_speed: DEFAULT_SIM_SPEED,
        }
    }
}

impl SimConfig {
    /// Reads `resolution`, `model`, `seed` and `sim_speed` from a JSON
    /// object, falling back to defaults for missing keys.
    ///
    /// Returns `EngineError::UnknownModel` for an unrecognized model name.
    pub fn from_json(params: &Value) -> Result<Self, EngineError> {
        let defaults = Self::default();
        Ok(Self {
            resolution: param_usize(params, "resolution", defaults.resolution),
            model: Model::from_name(&param_string(params, "model", defaults.model.name()))?,
            seed: param_u64(params, "seed", defaults.seed),
            sim_speed: param_f64(params, "sim_speed", defaults.sim_speed),
        })
    }
}

/// Parameters a model loads when it is selected: its first preset with its
/// default diffusion rates.
pub fn model_defaults(model: Model) -> Parameters {
    let (diffusion_a, diffusion_b) = model.default_diffusion();
    presets::presets(model)
        .first()
        .map_or_else(Parameters::default, |p| Parameters {
            feed: p.feed,
            kill: p.kill,
            diffusion_a,
            diffusion_b,
        })
}

fn clamp_sim_speed(speed: f64) -> f64 {
    if speed.is_nan() {
        0.0
    } else {
        speed.clamp(0.0, MAX_SIM_SPEED)
    }
}

/// A running reaction-diffusion simulation.
pub struct Simulation {
    grid: GridStore,
    model: Model,
    controller: ParameterController,
    sim_speed: f64,
    seed_rng: Xorshift64,
    queue: CommandQueue,
    tick_count: u64,
    sub_step_count: u64,
}

impl Simulation {
    /// Allocates the grid, loads the model's first preset and seeds the
    /// standard pattern.
    ///
    /// Returns `EngineError::InvalidDimensions` for a zero resolution and
    /// `EngineError::AllocationFailed` if the buffers cannot be reserved.
    pub fn new(config: SimConfig) -> Result<Self, EngineError> {
        let mut grid = GridStore::allocate(config.resolution)?;
        let mut seed_rng = Xorshift64::derive(config.seed, SEED_STREAM);
        grid.seed(&SeedPattern::Standard, &mut seed_rng)?;
        info!(
            "simulation ready: {} at {}x{}, seed {}",
            config.model, config.resolution, config.resolution, config.seed
        );
        Ok(Self {
            grid,
            model: config.model,
            controller: ParameterController::new(
                model_defaults(config.model),
                Xorshift64::derive(config.seed, JOURNEY_STREAM),
            ),
            sim_speed: clamp_sim_speed(config.sim_speed),
            seed_rng,
            queue: CommandQueue::new(),
            tick_count: 0,
            sub_step_count: 0,
        })
    }

    /// Reallocates at `resolution` and reseeds with the standard pattern.
    ///
    /// Switching model loads its first preset and default diffusion and ends
    /// any journey or ease. On error nothing changes.
    pub fn configure(&mut self, resolution: usize, model: Model) -> Result<(), EngineError> {
        let mut grid = GridStore::allocate(resolution)?;
        let mut rng = self.seed_rng.clone();
        grid.seed(&SeedPattern::Standard, &mut rng)?;

        if resolution != self.grid.resolution() {
            warn!(
                "resolution change {} -> {resolution} discards the current pattern",
                self.grid.resolution()
            );
        }
        self.grid = grid;
        self.seed_rng = rng;
        if model != self.model {
            self.model = model;
            self.controller.stop_journey();
            self.controller.set_parameters(model_defaults(model));
        }
        info!("configured {} at {resolution}x{resolution}", self.model);
        Ok(())
    }

    /// Overwrites both buffers with `pattern`.
    pub fn seed(&mut self, pattern: SeedPattern) -> Result<(), EngineError> {
        self.grid.seed(&pattern, &mut self.seed_rng)?;
        info!("reseeded with {pattern:?}");
        Ok(())
    }

    /// Sets F, K and both diffusion rates (all clamped) and cancels any ease.
    pub fn set_parameters(&mut self, feed: f64, kill: f64, diffusion_a: f64, diffusion_b: f64) {
        self.controller.set_parameters(Parameters {
            feed,
            kill,
            diffusion_a,
            diffusion_b,
        });
    }

    pub fn parameters(&self) -> Parameters {
        self.controller.parameters()
    }

    /// Eases F and K to the clamped target over `duration_ms` of tick time.
    pub fn ease_to_parameters(&mut self, feed: f64, kill: f64, duration_ms: f64) {
        self.controller.ease_to(feed, kill, duration_ms);
    }

    pub fn set_journey(&mut self, kind: JourneyKind, speed: f64) {
        self.controller.set_journey(kind, speed);
    }

    pub fn stop_journey(&mut self) {
        self.controller.stop_journey();
    }

    /// Sets the sub-step multiplier, clamped to [0, 10]. Zero pauses stepping.
    pub fn set_sim_speed(&mut self, speed: f64) {
        self.sim_speed = clamp_sim_speed(speed);
    }

    pub fn sim_speed(&self) -> f64 {
        self.sim_speed
    }

    /// Advances one animation frame and returns the number of sub-steps run.
    ///
    /// Pending commands are applied first, then easing or the journey moves
    /// the parameters, then the stepper runs with the published values.
    ///
    /// A failing command does not stop the ones queued after it. The first
    /// failure is returned once the queue is empty, and the tick does not step.
    pub fn tick(&mut self, dt_ms: f64) -> Result<usize, EngineError> {
        self.drain_commands()?;
        self.controller.tick(dt_ms);
        let steps = stepper::steps_for_speed(self.sim_speed);
        let params = self.controller.parameters();
        stepper::run(&mut self.grid, self.model, &params, steps);
        self.tick_count += 1;
        self.sub_step_count += steps as u64;
        Ok(steps)
    }

    /// Adds or subtracts a quadratic falloff bump centered on grid cell (x, y).
    pub fn apply_force(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        strength: f64,
        channel: Channel,
        sign: Sign,
    ) -> Result<(), EngineError> {
        forcing::apply_force(&mut self.grid, DVec2::new(x, y), radius, strength, channel, sign)
    }

    /// Sets `channel` to 1.0 over the disc of `radius` around (x, y).
    pub fn apply_stamp(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        channel: Channel,
    ) -> Result<(), EngineError> {
        forcing::apply_stamp(&mut self.grid, DVec2::new(x, y), radius, channel)
    }

    pub fn apply_tool(&mut self, tool: &Tool, x: f64, y: f64) -> Result<(), EngineError> {
        tool.apply(&mut self.grid, DVec2::new(x, y))
    }

    /// Renders channel B of the current buffer at `scale` pixels per cell.
    pub fn render_frame(&self, config: &ColorConfig, scale: usize) -> Result<Frame, EngineError> {
        pixel::render_frame(self.grid.current().b, config, scale)
    }

    /// The ordered preset table for `model`.
    pub fn presets(model: Model) -> &'static [Preset] {
        presets::presets(model)
    }

    /// Jumps to the named preset of the current model and ends any journey.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), EngineError> {
        let preset = presets::find_preset(self.model, name)?;
        self.controller.stop_journey();
        self.controller.set_immediate(preset.feed, preset.kill);
        info!("preset {} ({}, {})", preset.name, preset.feed, preset.kill);
        Ok(())
    }

    /// A handle other threads can post commands through.
    pub fn queue(&self) -> CommandQueue {
        self.queue.clone()
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn resolution(&self) -> usize {
        self.grid.resolution()
    }

    pub fn grid(&self) -> &GridStore {
        &self.grid
    }

    pub fn controller(&self) -> &ParameterController {
        &self.controller
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn sub_step_count(&self) -> u64 {
        self.sub_step_count
    }

    fn drain_commands(&mut self) -> Result<(), EngineError> {
        let commands = self.queue.drain();
        if commands.is_empty() {
            return Ok(());
        }
        debug!("applying {} queued commands", commands.len());
        let mut first_err = None;
        for command in commands {
            if let Err(e) = self.apply_command(command) {
                warn!("queued command failed: {e}");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn apply_command(&mut self, command: Command) -> Result<(), EngineError> {
        match command {
            Command::Force {
                x,
                y,
                radius,
                strength,
                channel,
                sign,
            } => self.apply_force(x, y, radius, strength, channel, sign)?,
            Command::Stamp {
                x,
                y,
                radius,
                channel,
            } => self.apply_stamp(x, y, radius, channel)?,
            Command::Tool { tool, x, y } => self.apply_tool(&tool, x, y)?,
            Command::SetParameters(p) => {
                self.set_parameters(p.feed, p.kill, p.diffusion_a, p.diffusion_b)
            }
            Command::EaseTo {
                feed,
                kill,
                duration_ms,
            } => self.ease_to_parameters(feed, kill, duration_ms),
            Command::SetJourney { kind, speed } => self.set_journey(kind, speed),
            Command::StopJourney => self.stop_journey(),
            Command::SetSimSpeed(speed) => self.set_sim_speed(speed),
            Command::ApplyPreset(name) => self.apply_preset(&name)?,
            Command::Reseed(pattern) => self.seed(pattern)?,
        }
        Ok(())
    }
}

impl Engine for Simulation {
    /// One sub-step at the current parameters; easing and journeys do not move.
    fn step(&mut self) -> Result<(), EngineError> {
        let params = self.controller.parameters();
        stepper::sub_step(&mut self.grid, self.model, &params);
        self.sub_step_count += 1;
        Ok(())
    }

    fn field(&self) -> &Field {
        self.grid.current().b
    }

    fn params(&self) -> Value {
        let p = self.controller.parameters();
        json!({
            "model": self.model.name(),
            "feed_rate": p.feed,
            "kill_rate": p.kill,
            "diffusion_a": p.diffusion_a,
            "diffusion_b": p.diffusion_b,
            "sim_speed": self.sim_speed,
            "resolution": self.grid.resolution(),
        })
    }

    fn param_schema(&self) -> Value {
        let defaults = model_defaults(self.model);
        json!({
            "feed_rate": {
                "type": "number",
                "default": defaults.feed,
                "min": controller::FEED_MIN,
                "max": controller::FEED_MAX,
                "description": "Feed rate (F)"
            },
            "kill_rate": {
                "type": "number",
                "default": defaults.kill,
                "min": controller::KILL_MIN,
                "max": controller::KILL_MAX,
                "description": "Kill rate (K)"
            },
            "diffusion_a": {
                "type": "number",
                "default": defaults.diffusion_a,
                "min": controller::DIFFUSION_MIN,
                "max": controller::DIFFUSION_MAX,
                "description": "Diffusion rate of channel A (substrate / inhibitor)"
            },
            "diffusion_b": {
                "type": "number",
                "default": defaults.diffusion_b,
                "min": controller::DIFFUSION_MIN,
                "max": controller::DIFFUSION_MAX,
                "description": "Diffusion rate of channel B (activator)"
            },
            "sim_speed": {
                "type": "number",
                "default": DEFAULT_SIM_SPEED,
                "min": 0.0,
                "max": MAX_SIM_SPEED,
                "description": "Sub-steps per tick, divided by 8"
            }
        })
    }
}
