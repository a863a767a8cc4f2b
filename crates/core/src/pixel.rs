//! RGBA8 frames rendered from a [`Field`] through a [`ColorConfig`].
//!
//! Frames are derived data: rendering only reads the field. The output size
//! is an integer multiple of the field so the same call serves the live
//! display (scale 1) and high-resolution export.

use crate::color::ColorConfig;
use crate::error::EngineError;
use crate::field::Field;

/// A rendered RGBA8 image, row-major, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl Frame {
    /// The RGBA bytes of pixel `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.rgba[i],
            self.rgba[i + 1],
            self.rgba[i + 2],
            self.rgba[i + 3],
        ]
    }
}

/// Renders `field` at `scale` pixels per cell.
///
/// Scale 1 maps each cell to one pixel. Larger scales sample the field
/// bilinearly, wrapping across edges like the simulation does, so exports
/// tile seamlessly. Returns `EngineError::InvalidDimensions` for scale 0 or
/// an output size that overflows.
pub fn render_frame(field: &Field, config: &ColorConfig, scale: usize) -> Result<Frame, EngineError> {
    if scale == 0 {
        return Err(EngineError::InvalidDimensions);
    }
    let width = field
        .width()
        .checked_mul(scale)
        .ok_or(EngineError::InvalidDimensions)?;
    let height = field
        .height()
        .checked_mul(scale)
        .ok_or(EngineError::InvalidDimensions)?;
    let len = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(4))
        .ok_or(EngineError::InvalidDimensions)?;

    let mut rgba = Vec::with_capacity(len);
    if scale == 1 {
        for &v in field.data() {
            push_pixel(&mut rgba, config, v);
        }
    } else {
        let inv = 1.0 / scale as f64;
        for py in 0..height {
            let v = (py as f64 + 0.5) * inv - 0.5;
            for px in 0..width {
                let u = (px as f64 + 0.5) * inv - 0.5;
                push_pixel(&mut rgba, config, sample_bilinear(field, u, v));
            }
        }
    }
    Ok(Frame {
        width,
        height,
        rgba,
    })
}

fn push_pixel(rgba: &mut Vec<u8>, config: &ColorConfig, value: f64) {
    let [r, g, b] = config.map(value).to_rgb8();
    rgba.extend_from_slice(&[r, g, b, 255]);
}

/// Bilinear sample at fractional cell coordinates with toroidal wrap.
fn sample_bilinear(field: &Field, u: f64, v: f64) -> f64 {
    let x0 = u.floor();
    let y0 = v.floor();
    let fx = u - x0;
    let fy = v - y0;
    let (x0, y0) = (x0 as isize, y0 as isize);

    let v00 = field.get(x0, y0);
    let v10 = field.get(x0 + 1, y0);
    let v01 = field.get(x0, y0 + 1);
    let v11 = field.get(x0 + 1, y0 + 1);

    let top = v00 + (v10 - v00) * fx;
    let bottom = v01 + (v11 - v01) * fx;
    top + (bottom - top) * fy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;

    #[test]
    fn frame_has_expected_size() {
        let field = Field::new(8, 4).unwrap();
        let frame = render_frame(&field, &ColorConfig::default(), 1).unwrap();
        assert_eq!((frame.width, frame.height), (8, 4));
        assert_eq!(frame.rgba.len(), 8 * 4 * 4);
    }

    #[test]
    fn scaled_frame_multiplies_dimensions() {
        let field = Field::new(8, 8).unwrap();
        let frame = render_frame(&field, &ColorConfig::default(), 3).unwrap();
        assert_eq!((frame.width, frame.height), (24, 24));
        assert_eq!(frame.rgba.len(), 24 * 24 * 4);
    }

    #[test]
    fn zero_scale_is_rejected() {
        let field = Field::new(2, 2).unwrap();
        assert!(matches!(
            render_frame(&field, &ColorConfig::default(), 0),
            Err(EngineError::InvalidDimensions)
        ));
    }

    #[test]
    fn alpha_is_opaque() {
        let field = Field::filled(4, 4, 0.5).unwrap();
        let frame = render_frame(&field, &ColorConfig::default(), 2).unwrap();
        assert!(frame.rgba.chunks(4).all(|px| px[3] == 255));
    }

    #[test]
    fn unit_scale_maps_cells_directly() {
        let mut field = Field::new(3, 1).unwrap();
        field.set(0, 0, 0.0);
        field.set(1, 0, 1.0);
        field.set(2, 0, 0.5);
        let frame = render_frame(&field, &ColorConfig::default(), 1).unwrap();
        assert_eq!(frame.pixel(0, 0), [0, 0, 0, 255]);
        assert_eq!(frame.pixel(1, 0), [255, 255, 255, 255]);
        assert_eq!(frame.pixel(2, 0), [128, 128, 128, 255]);
    }

    #[test]
    fn uniform_field_renders_uniformly_at_any_scale() {
        let field = Field::filled(5, 5, 0.25).unwrap();
        let cfg = ColorConfig {
            low: Srgb::from_hex("#102030").unwrap(),
            high: Srgb::from_hex("#f0e0d0").unwrap(),
            ..ColorConfig::default()
        };
        let frame = render_frame(&field, &cfg, 4).unwrap();
        let first = frame.pixel(0, 0);
        assert!(frame.rgba.chunks(4).all(|px| px == first));
    }

    #[test]
    fn bilinear_wraps_across_the_seam() {
        let mut field = Field::new(4, 4).unwrap();
        field.set(0, 0, 1.0);
        // Halfway between the last column and the first one.
        let v = sample_bilinear(&field, 3.5, 0.0);
        assert!((v - 0.5).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn rendering_does_not_mutate_the_field() {
        let field = Field::filled(4, 4, 0.3).unwrap();
        let before = field.clone();
        let _ = render_frame(&field, &ColorConfig::default(), 2).unwrap();
        assert_eq!(field, before);
    }
}
