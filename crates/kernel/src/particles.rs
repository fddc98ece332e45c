//! Ambient firefly particles.
//!
//! The footprint constants place the fireflies around the portal model:
//! a 3.8 x 3.8 square on the ground plane, floating between 1.0 and 1.5.

use rand::Rng;
use std::ops::Range;

/// Half-open range for `x` and `z`.
pub const HORIZONTAL_RANGE: Range<f32> = -1.9..1.9;
/// Half-open range for `y`.
pub const HEIGHT_RANGE: Range<f32> = 1.0..1.5;
/// Half-open range for the per-particle size multiplier.
pub const SCALE_RANGE: Range<f32> = 1.0..2.0;

/// Fixed-size particle buffers: `positions` and `scales` are parallel.
///
/// Built once and never resized.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticleField {
    positions: Vec<[f32; 3]>,
    scales: Vec<f32>,
}

impl ParticleField {
    /// Scatter `count` particles with independent uniform draws.
    pub fn generate<R: Rng>(count: usize, rng: &mut R) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut scales = Vec::with_capacity(count);
        for _ in 0..count {
            let x = rng.gen_range(HORIZONTAL_RANGE);
            let y = rng.gen_range(HEIGHT_RANGE);
            let z = rng.gen_range(HORIZONTAL_RANGE);
            positions.push([x, y, z]);
            scales.push(rng.gen_range(SCALE_RANGE));
        }
        tracing::debug!(count, "generated firefly field");
        Self { positions, scales }
    }

    pub fn len(&self) -> usize {
        self.scales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scales.is_empty()
    }

    pub fn positions(&self) -> &[[f32; 3]] {
        &self.positions
    }

    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    /// `(position, scale)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = ([f32; 3], f32)> + '_ {
        self.positions.iter().copied().zip(self.scales.iter().copied())
    }
}
