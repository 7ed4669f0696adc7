//! Terrain heightmap generation and queries
//!
//! The ground is a 1-D heightmap: one surface height per integer x column.
//! Heights are screen y values, so a larger height means lower ground.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{GameConfig, TerrainParams};
use crate::consts::SLOPE_SAMPLE_OFFSET;

/// Immutable ground surface for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Terrain {
    heights: Vec<f32>,
    /// Field height, returned for columns the map does not cover
    field_height: f32,
}

/// Draw from `[lo, hi)`, tolerating a collapsed range
fn sample_range<R: Rng>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    lo + rng.random::<f32>() * (hi - lo)
}

/// Draw from `[-span/2, span/2)`
fn sample_centered<R: Rng>(rng: &mut R, span: f32) -> f32 {
    (rng.random::<f32>() - 0.5) * span
}

impl Terrain {
    /// Generate a fresh heightmap for the configured field
    ///
    /// Layers a base height, a broad hill sinusoid, a rougher detail
    /// sinusoid, per-column jitter and a linear tilt, then clamps every
    /// column into the playable band.
    pub fn generate<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        let params: &TerrainParams = &config.terrain;
        let width = config.width.max(1.0) as usize;

        let base = config.height * sample_range(rng, params.base_fraction);
        let main_amplitude = sample_range(rng, params.main_amplitude);
        let main_wavelength = sample_range(rng, params.main_wavelength);
        let detail_amplitude = sample_range(rng, params.detail_amplitude);
        let detail_wavelength = sample_range(rng, params.detail_wavelength);
        let tilt = sample_range(rng, params.tilt);

        let min_height = config.min_terrain_height();
        let max_height = config.max_terrain_height();

        let heights = (0..width)
            .map(|column| {
                let x = column as f32;
                let mut y = base;
                y -= (x / main_wavelength).sin() * main_amplitude;
                y -= (x / detail_wavelength).sin() * detail_amplitude;
                y += sample_centered(rng, params.jitter);
                y += x * tilt;
                y.min(max_height).max(min_height)
            })
            .collect();

        Self {
            heights,
            field_height: config.height,
        }
    }

    /// Build terrain from explicit heights (scripted scenarios, tests)
    pub fn from_heights(heights: Vec<f32>, field_height: f32) -> Self {
        Self {
            heights,
            field_height,
        }
    }

    /// Level ground at `surface` across `width` columns
    pub fn flat(width: usize, surface: f32, field_height: f32) -> Self {
        Self::from_heights(vec![surface; width], field_height)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.heights.len()
    }

    /// Raw heights, one per column
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// Nearest column index for `x`, clamped into the map
    fn column(&self, x: f32) -> usize {
        let last = self.heights.len().saturating_sub(1) as f32;
        // NaN maps to column 0
        x.round().clamp(0.0, last).max(0.0) as usize
    }

    /// Surface height at `x`
    ///
    /// Out-of-range x is clamped to the nearest edge column.
    pub fn height_at(&self, x: f32) -> f32 {
        self.heights
            .get(self.column(x))
            .copied()
            .unwrap_or(self.field_height)
    }

    /// Local slope angle at `x` in degrees
    ///
    /// Positive when the ground drops to the right (screen y grows down).
    /// Returns 0 when both sample points clamp to the same column.
    pub fn slope_angle_at(&self, x: f32) -> f32 {
        let x1 = self.column(x - SLOPE_SAMPLE_OFFSET);
        let x2 = self.column(x + SLOPE_SAMPLE_OFFSET);
        if x1 == x2 {
            return 0.0;
        }
        let y1 = self.height_at(x1 as f32);
        let y2 = self.height_at(x2 as f32);
        (y2 - y1).atan2(x2 as f32 - x1 as f32).to_degrees()
    }
}
