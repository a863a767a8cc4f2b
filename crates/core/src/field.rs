//! Two-dimensional scalar field with toroidal wrapping and clamped values.
//!
//! A `Field` stores `width * height` f64 values in the range [0, 1] using
//! row-major layout. Coordinate access uses toroidal (wrap-around) addressing
//! so negative and overflowing indices are valid. The torus is the only
//! boundary condition the engine knows.

use crate::error::EngineError;

/// A 2D scalar field with values clamped to [0, 1] and toroidal coordinate wrapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Field {
    /// Creates a zero-filled field of the given dimensions.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`, and
    /// `EngineError::AllocationFailed` if the buffer cannot be reserved.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        Self::filled(width, height, 0.0)
    }

    /// Creates a field filled with `value`, clamped to [0, 1].
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .ok_or(EngineError::InvalidDimensions)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| EngineError::AllocationFailed {
                resolution: width.max(height),
            })?;
        data.resize(len, value.clamp(0.0, 1.0));
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a field from a pre-built data vector, validating that
    /// `data.len() == width * height`.
    ///
    /// Values are **not** clamped; the caller is responsible for ensuring
    /// they lie in [0, 1].
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let expected = width
            .checked_mul(height)
            .ok_or(EngineError::InvalidDimensions)?;
        if data.len() != expected {
            return Err(EngineError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Field width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Field height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the underlying row-major data.
    ///
    /// Values written here bypass the [0, 1] clamping. The stepper and the
    /// forcing operator clamp their own output before writing.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Converts signed coordinates to a flat index using toroidal wrapping.
    fn index(&self, x: isize, y: isize) -> usize {
        let xi = x.rem_euclid(self.width as isize) as usize;
        let yi = y.rem_euclid(self.height as isize) as usize;
        yi * self.width + xi
    }

    /// Gets the value at `(x, y)` with toroidal wrapping.
    pub fn get(&self, x: isize, y: isize) -> f64 {
        self.data[self.index(x, y)]
    }

    /// Sets the value at `(x, y)` with toroidal wrapping. The value is clamped to [0, 1].
    pub fn set(&mut self, x: isize, y: isize, value: f64) {
        let idx = self.index(x, y);
        self.data[idx] = value.clamp(0.0, 1.0);
    }

    /// Overwrites every cell with `value`, clamped to [0, 1].
    pub fn fill(&mut self, value: f64) {
        self.data.fill(value.clamp(0.0, 1.0));
    }

    /// Copies every cell from `other`.
    ///
    /// Returns `EngineError::DimensionMismatch` if the fields differ in size.
    pub fn copy_from(&mut self, other: &Field) -> Result<(), EngineError> {
        if self.width != other.width || self.height != other.height {
            return Err(EngineError::DimensionMismatch {
                lhs_w: self.width,
                lhs_h: self.height,
                rhs_w: other.width,
                rhs_h: other.height,
            });
        }
        self.data.copy_from_slice(&other.data);
        Ok(())
    }

    /// Arithmetic mean of all cells.
    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    /// Population standard deviation of all cells.
    ///
    /// Zero for a spatially uniform field, whatever its value.
    pub fn std_dev(&self) -> f64 {
        let mean = self.mean();
        let var = self
            .data
            .iter()
            .map(|v| (v - mean) * (v - mean))
            .sum::<f64>()
            / self.data.len() as f64;
        var.sqrt()
    }

    /// Counts 4-connected regions of cells strictly above `threshold`.
    ///
    /// Connectivity wraps across the edges, so a blob straddling the seam
    /// counts once.
    pub fn count_regions(&self, threshold: f64) -> usize {
        let w = self.width;
        let h = self.height;
        let mut visited = vec![false; self.data.len()];
        let mut stack = Vec::new();
        let mut regions = 0;

        for start in 0..self.data.len() {
            if visited[start] || self.data[start] <= threshold {
                continue;
            }
            regions += 1;
            visited[start] = true;
            stack.push(start);
            while let Some(idx) = stack.pop() {
                let x = idx % w;
                let y = idx / w;
                let neighbors = [
                    y * w + (x + w - 1) % w,
                    y * w + (x + 1) % w,
                    ((y + h - 1) % h) * w + x,
                    ((y + 1) % h) * w + x,
                ];
                for n in neighbors {
                    if !visited[n] && self.data[n] > threshold {
                        visited[n] = true;
                        stack.push(n);
                    }
                }
            }
        }
        regions
    }
}
