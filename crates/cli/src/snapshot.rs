//! PNG export of rendered frames.

use rd_engine_core::error::EngineError;
use rd_engine_core::pixel::Frame;
use std::path::Path;

/// Writes an RGBA frame as a PNG.
///
/// Returns `EngineError::InvalidDimensions` if the frame dimensions overflow
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png(frame: &Frame, path: &Path) -> Result<(), EngineError> {
    let w = u32::try_from(frame.width).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(frame.height).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, frame.rgba.clone())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}
