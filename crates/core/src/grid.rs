//! Double-buffered two-channel concentration grid.
//!
//! [`GridStore`] owns both copies of the A and B channels. At any moment one
//! copy is *current* (authoritative, readable) and the other is *scratch*
//! (being written). Writers obtain both views at once through
//! [`GridStore::split`] and publish their result with [`GridStore::swap`].
//! Which copy is current is pure index math in [`PingPong`], so no view can
//! alias the buffer it is reading.

use crate::error::EngineError;
use crate::field::Field;
use crate::prng::Xorshift64;
use crate::seed::SeedPattern;
use log::debug;
use serde::{Deserialize, Serialize};

/// One of the two chemical channels stored per cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Substrate / inhibitor channel.
    A,
    /// Activator channel, the one that gets rendered.
    #[default]
    B,
}

/// Tracks which of two buffers is current. The invariant
/// `src_index() + dst_index() == 1` always holds.
#[derive(Debug, Clone, Copy, Default)]
pub struct PingPong {
    current: usize,
}

impl PingPong {
    /// Creates a new `PingPong` with source at index 0 and destination at index 1.
    pub fn new() -> Self {
        Self { current: 0 }
    }

    /// Index of the current (read) buffer.
    pub fn src_index(&self) -> usize {
        self.current
    }

    /// Index of the scratch (write) buffer.
    pub fn dst_index(&self) -> usize {
        1 - self.current
    }

    /// Flips which buffer is read from and which is written to.
    pub fn swap(&mut self) {
        self.current = 1 - self.current;
    }
}

/// Read-only view of one buffer pair.
#[derive(Debug, Clone, Copy)]
pub struct Cells<'a> {
    pub a: &'a Field,
    pub b: &'a Field,
}

impl<'a> Cells<'a> {
    /// The field holding `channel`.
    pub fn channel(&self, channel: Channel) -> &'a Field {
        match channel {
            Channel::A => self.a,
            Channel::B => self.b,
        }
    }
}

/// Writable view of the scratch buffer pair.
#[derive(Debug)]
pub struct CellsMut<'a> {
    pub a: &'a mut Field,
    pub b: &'a mut Field,
}

impl CellsMut<'_> {
    /// The field holding `channel`.
    pub fn channel_mut(&mut self, channel: Channel) -> &mut Field {
        match channel {
            Channel::A => &mut *self.a,
            Channel::B => &mut *self.b,
        }
    }
}

/// Owns the front and back copies of both channels for an R×R lattice.
#[derive(Debug, Clone)]
pub struct GridStore {
    resolution: usize,
    a: [Field; 2],
    b: [Field; 2],
    ping_pong: PingPong,
}

impl GridStore {
    /// Allocates two zero-initialized buffer pairs of `resolution × resolution`.
    ///
    /// Returns `EngineError::InvalidDimensions` for a zero resolution and
    /// `EngineError::AllocationFailed` if the buffers cannot be reserved.
    pub fn allocate(resolution: usize) -> Result<Self, EngineError> {
        let alloc = || {
            Field::new(resolution, resolution).map_err(|e| match e {
                EngineError::AllocationFailed { .. } => {
                    EngineError::AllocationFailed { resolution }
                }
                other => other,
            })
        };
        debug!("allocating {resolution}x{resolution} grid (4 buffers)");
        Ok(Self {
            resolution,
            a: [alloc()?, alloc()?],
            b: [alloc()?, alloc()?],
            ping_pong: PingPong::new(),
        })
    }

    /// Side length of the lattice.
    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Number of cells per channel.
    pub fn len(&self) -> usize {
        self.resolution * self.resolution
    }

    /// Always false: a grid has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.resolution == 0
    }

    /// The authoritative buffer pair.
    pub fn current(&self) -> Cells<'_> {
        let src = self.ping_pong.src_index();
        Cells {
            a: &self.a[src],
            b: &self.b[src],
        }
    }

    /// Borrows the current buffer for reading and the scratch buffer for
    /// writing at the same time.
    pub fn split(&mut self) -> (Cells<'_>, CellsMut<'_>) {
        let [a0, a1] = &mut self.a;
        let [b0, b1] = &mut self.b;
        if self.ping_pong.src_index() == 0 {
            (Cells { a: a0, b: b0 }, CellsMut { a: a1, b: b1 })
        } else {
            (Cells { a: a1, b: b1 }, CellsMut { a: a0, b: b0 })
        }
    }

    /// Publishes the scratch buffer as current.
    pub fn swap(&mut self) {
        self.ping_pong.swap();
    }

    /// Writes `pattern` into the current buffer and mirrors it into scratch,
    /// so both copies start identical.
    pub fn seed(&mut self, pattern: &SeedPattern, rng: &mut Xorshift64) -> Result<(), EngineError> {
        let src = self.ping_pong.src_index();
        let dst = self.ping_pong.dst_index();
        pattern.write(&mut self.a[src], &mut self.b[src], rng);
        let (a_src, a_dst) = pair(&mut self.a, src, dst);
        a_dst.copy_from(a_src)?;
        let (b_src, b_dst) = pair(&mut self.b, src, dst);
        b_dst.copy_from(b_src)?;
        Ok(())
    }
}

/// Splits a two-element buffer array into (`src`, `dst`) borrows.
fn pair(fields: &mut [Field; 2], src: usize, dst: usize) -> (&Field, &mut Field) {
    debug_assert_ne!(src, dst);
    let [f0, f1] = fields;
    if src == 0 {
        (f0, f1)
    } else {
        (f1, f0)
    }
}
