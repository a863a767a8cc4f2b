#![deny(unsafe_code)]
//! Core types for the reaction-diffusion engine.
//!
//! Provides the toroidal [`Field`], the double-buffered [`GridStore`],
//! initial-condition [`SeedPattern`]s, the [`Xorshift64`] PRNG, the two-stop
//! colorizer ([`ColorConfig`]) with RGBA [`Frame`] rendering, lenient JSON
//! parameter helpers, and the object-safe [`Engine`] trait.

pub mod color;
pub mod engine;
pub mod error;
pub mod field;
pub mod grid;
pub mod params;
pub mod pixel;
pub mod prng;
pub mod seed;

pub use color::{ColorConfig, Srgb};
pub use engine::Engine;
pub use error::EngineError;
pub use field::Field;
pub use grid::{Cells, CellsMut, Channel, GridStore, PingPong};
pub use pixel::{render_frame, Frame};
pub use prng::Xorshift64;
pub use seed::SeedPattern;
