//! Colors and the two-stop colorizer.
//!
//! The colorizer is a pure mapping from one scalar concentration to a color:
//! a contrast/brightness transform around 0.5 followed by a linear blend
//! between two endpoint colors. It never feeds back into simulation state.

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// Serializes as a hex string `"#rrggbb"`. The hex round-trip has 8-bit
/// quantization, which is fine since hex colors are inherently 8-bit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `EngineError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits, got '{hex}'"
            )));
        }
        let component = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&hex[range], 16)
                .map(|v| v as f64 / 255.0)
                .map_err(|e| EngineError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: component(0..2, "red")?,
            g: component(2..4, "green")?,
            b: component(4..6, "blue")?,
        })
    }

    /// Formats as `"#rrggbb"`, rounding each component to 8 bits.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantizes to 8-bit components, clamping out-of-range values.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    /// Linear blend from `self` (t = 0) to `other` (t = 1). `t` is not clamped.
    pub fn lerp(self, other: Srgb, t: f64) -> Srgb {
        Srgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Endpoint colors plus the contrast/brightness transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Color at concentration 0.
    pub low: Srgb,
    /// Color at concentration 1.
    pub high: Srgb,
    /// Scale around 0.5; 1.0 leaves values unchanged.
    pub contrast: f64,
    /// Multiplier applied after contrast; 1.0 leaves values unchanged.
    pub brightness: f64,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            low: Srgb::BLACK,
            high: Srgb::WHITE,
            contrast: 1.0,
            brightness: 1.0,
        }
    }
}

impl ColorConfig {
    /// The mix factor for `value`: `clamp01((v - 0.5) * contrast + 0.5) * brightness`.
    pub fn mix_factor(&self, value: f64) -> f64 {
        ((value - 0.5) * self.contrast + 0.5).clamp(0.0, 1.0) * self.brightness
    }

    /// Maps a concentration to a color.
    pub fn map(&self, value: f64) -> Srgb {
        self.low.lerp(self.high, self.mix_factor(value))
    }
}
