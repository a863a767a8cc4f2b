#![deny(unsafe_code)]
//! CLI binary for the reaction-diffusion engine.
//!
//! Subcommands:
//! - `render` runs a model headless for N ticks and writes a PNG
//! - `presets` prints the preset table of one or every model
//! - `models` prints the available kinetic models

mod error;
mod snapshot;

use clap::{Parser, Subcommand};
use error::CliError;
use log::info;
use rd_engine_core::{ColorConfig, Engine, SeedPattern, Srgb};
use rd_engine_sim::{JourneyKind, Model, Parameters, SimConfig, Simulation};
use std::path::PathBuf;
use std::process;

/// Region threshold used for the pattern summary.
const REGION_THRESHOLD: f64 = 0.15;

#[derive(Parser)]
#[command(name = "rd-engine", about = "Reaction-diffusion pattern engine CLI")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a model for N ticks and write a PNG snapshot.
    Render {
        /// Kinetic model (gray-scott, brusselator, schnakenberg).
        #[arg(short, long, default_value = "gray-scott")]
        model: String,

        /// Preset name; defaults to the model's first preset.
        #[arg(short, long)]
        preset: Option<String>,

        /// Lattice side length in cells.
        #[arg(short, long, default_value_t = 256)]
        resolution: usize,

        /// Number of animation ticks.
        #[arg(short, long, default_value_t = 500)]
        ticks: usize,

        /// Simulation speed; each tick runs ceil(speed * 8) sub-steps.
        #[arg(long, default_value_t = 1.0)]
        speed: f64,

        /// Milliseconds of wall time each tick represents.
        #[arg(long, default_value_t = 16.0)]
        frame_ms: f64,

        /// Parameter journey (none, linear, circular, figure8, random-walk).
        #[arg(long, default_value = "none")]
        journey: String,

        /// Journey speed multiplier.
        #[arg(long, default_value_t = 1.0)]
        journey_speed: f64,

        /// PRNG seed for deterministic output.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Initial condition (standard, noise, empty).
        #[arg(long, default_value = "standard")]
        pattern: String,

        /// Color for activator = 0.
        #[arg(long, default_value = "#000000")]
        low: String,

        /// Color for activator = 1.
        #[arg(long, default_value = "#ffffff")]
        high: String,

        #[arg(long, default_value_t = 1.0)]
        contrast: f64,

        #[arg(long, default_value_t = 1.0)]
        brightness: f64,

        /// Output pixels per cell.
        #[arg(long, default_value_t = 1)]
        scale: usize,

        /// Parameter overrides as JSON (feed_rate, kill_rate, diffusion_a, diffusion_b).
        #[arg(long, default_value = "{}")]
        params: String,

        /// Output file path.
        #[arg(short, long, default_value = "output.png")]
        output: PathBuf,
    },
    /// List the presets of a model, or of every model.
    Presets {
        #[arg(short, long)]
        model: Option<String>,
    },
    /// List available models.
    Models,
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Models => {
            let models = Model::list_names();
            if cli.json {
                let info: Vec<_> = Model::ALL
                    .iter()
                    .map(|m| {
                        let (da, db) = m.default_diffusion();
                        serde_json::json!({"name": m.name(), "diffusion_a": da, "diffusion_b": db})
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("Models:");
                for name in models {
                    println!("  {name}");
                }
            }
        }
        Command::Presets { model } => {
            let models = match model {
                Some(name) => vec![Model::from_name(&name)?],
                None => Model::ALL.to_vec(),
            };
            if cli.json {
                let info: serde_json::Map<_, _> = models
                    .iter()
                    .map(|m| {
                        let presets = serde_json::to_value(Simulation::presets(*m))?;
                        Ok((m.name().to_string(), presets))
                    })
                    .collect::<Result<_, serde_json::Error>>()?;
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                for m in models {
                    println!("{m}:");
                    for p in Simulation::presets(m) {
                        println!("  {:<12} F={:.5} K={:.5}", p.name, p.feed, p.kill);
                    }
                }
            }
        }
        Command::Render {
            model,
            preset,
            resolution,
            ticks,
            speed,
            frame_ms,
            journey,
            journey_speed,
            seed,
            pattern,
            low,
            high,
            contrast,
            brightness,
            scale,
            params,
            output,
        } => {
            let params: serde_json::Value = serde_json::from_str(&params)
                .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;
            let model = Model::from_name(&model)?;
            let journey = JourneyKind::from_name(&journey)?;
            let pattern = SeedPattern::from_name(&pattern)?;
            let colors = ColorConfig {
                low: Srgb::from_hex(&low)?,
                high: Srgb::from_hex(&high)?,
                contrast,
                brightness,
            };

            let mut sim = Simulation::new(SimConfig {
                resolution,
                model,
                seed,
                sim_speed: speed,
            })?;
            if pattern != SeedPattern::Standard {
                sim.seed(pattern)?;
            }
            if let Some(name) = &preset {
                sim.apply_preset(name)?;
            }
            let p = Parameters::from_json(&params, sim.parameters());
            sim.set_parameters(p.feed, p.kill, p.diffusion_a, p.diffusion_b);
            sim.set_journey(journey, journey_speed);

            for _ in 0..ticks {
                sim.tick(frame_ms)?;
            }

            let frame = sim.render_frame(&colors, scale)?;
            snapshot::write_png(&frame, &output)?;

            let field = sim.field();
            let mean = field.mean();
            let regions = field.count_regions(REGION_THRESHOLD);
            let final_params = sim.parameters();
            info!(
                "{} sub-steps, activator mean {mean:.4}, {regions} regions",
                sim.sub_step_count()
            );

            if cli.json {
                let info = serde_json::json!({
                    "model": model.name(),
                    "resolution": resolution,
                    "ticks": ticks,
                    "sub_steps": sim.sub_step_count(),
                    "seed": seed,
                    "parameters": final_params,
                    "journey": journey.name(),
                    "activator_mean": mean,
                    "regions": regions,
                    "width": frame.width,
                    "height": frame.height,
                    "output": output.display().to_string(),
                });
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                eprintln!(
                    "rendered {model} ({resolution}x{resolution}, {ticks} ticks, seed {seed}, F={:.4} K={:.4}) -> {}",
                    final_params.feed,
                    final_params.kill,
                    output.display()
                );
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
