//! Deterministic heightfield synthesis and the height query used for ground contact.

use rayon::prelude::*;
use thiserror::Error;

use crate::config::TerrainConfig;

#[derive(Debug, Error, PartialEq)]
pub enum TerrainError {
    #[error("terrain resolution must be at least 1")]
    InvalidResolution,
    #[error("terrain size must be positive and finite, got {0}")]
    InvalidSize(f32),
    #[error("terrain max height must be non-negative and finite, got {0}")]
    InvalidMaxHeight(f32),
}

/// Narrow height-query capability handed to anything that stands on the ground.
pub trait HeightProvider {
    /// Terrain-local surface height at world `(x, z)`, or `None` if the
    /// provider has nothing usable to report there.
    fn height_at(&self, x: f32, z: f32) -> Option<f32>;

    /// Vertical offset of the terrain in world space.
    fn origin_y(&self) -> f32;
}

/// A square grid of `(resolution + 1)²` height samples covering `size` x `size`
/// world units centred on the origin. Immutable once generated.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightField {
    resolution: u32,
    size: f32,
    max_height: f32,
    smoothness: f32,
    heights: Vec<f32>, // row-major, index = z * (resolution + 1) + x
}

impl HeightField {
    /// Builds the grid from its parameters alone. `smoothness` is kept on the
    /// field but does not take part in the height formula.
    pub fn generate(
        resolution: u32,
        size: f32,
        max_height: f32,
        smoothness: f32,
    ) -> Result<Self, TerrainError> {
        if resolution == 0 {
            return Err(TerrainError::InvalidResolution);
        }
        if !size.is_finite() || size <= 0.0 {
            return Err(TerrainError::InvalidSize(size));
        }
        if !max_height.is_finite() || max_height < 0.0 {
            return Err(TerrainError::InvalidMaxHeight(max_height));
        }

        let side = resolution as usize + 1;
        let res = resolution as f32;
        let mut heights = vec![0.0f32; side * side];

        heights.par_chunks_mut(side).enumerate().for_each(|(z, row)| {
            let nz = (z as f32 / res) * 2.0 - 1.0;
            for (x, h) in row.iter_mut().enumerate() {
                let nx = (x as f32 / res) * 2.0 - 1.0;
                *h = shape(nx, nz) * max_height;
            }
        });

        Ok(Self { resolution, size, max_height, smoothness, heights })
    }

    pub fn from_config(cfg: &TerrainConfig) -> Result<Self, TerrainError> {
        Self::generate(cfg.resolution, cfg.size, cfg.max_height, cfg.smoothness)
    }

    /// Nearest-cell lookup. Coordinates outside the field clamp to the edge
    /// row/column; there is no interpolation between samples, so the surface
    /// is stepped at `size / resolution` granularity.
    pub fn height_at(&self, x: f32, z: f32) -> f32 {
        let (ix, iz) = self.cell_of(x, z);
        self.sample(ix, iz)
    }

    /// Grid indices of the cell containing world `(x, z)`, clamped into the grid.
    pub fn cell_of(&self, x: f32, z: f32) -> (u32, u32) {
        let half = self.size / 2.0;
        let to_index = |w: f32| -> u32 {
            let normalized = (w + half) / self.size;
            // NaN floors to NaN and casts to 0
            let i = (normalized * self.resolution as f32).floor() as i64;
            i.clamp(0, self.resolution as i64) as u32
        };
        (to_index(x), to_index(z))
    }

    /// Raw sample at grid indices, clamped into range.
    pub fn sample(&self, ix: u32, iz: u32) -> f32 {
        let side = self.side();
        let ix = ix.min(self.resolution) as usize;
        let iz = iz.min(self.resolution) as usize;
        self.heights[iz * side + ix]
    }

    /// World-space (x, z) of a grid vertex.
    pub fn vertex_position(&self, ix: u32, iz: u32) -> (f32, f32) {
        let step = self.size / self.resolution as f32;
        let half = self.size / 2.0;
        (ix as f32 * step - half, iz as f32 * step - half)
    }

    pub fn resolution(&self) -> u32 { self.resolution }
    pub fn size(&self) -> f32 { self.size }
    pub fn max_height(&self) -> f32 { self.max_height }
    pub fn smoothness(&self) -> f32 { self.smoothness }
    pub fn heights(&self) -> &[f32] { &self.heights }
    pub fn side(&self) -> usize { self.resolution as usize + 1 }
}

/// Normalised [0, 1] terrain shape at grid coordinates in [-1, 1].
fn shape(nx: f32, nz: f32) -> f32 {
    let distance = (nx * nx + nz * nz).sqrt();

    let mut h = 0.0;
    h += (nx * 1.5).cos() * (nz * 1.2).sin() * 0.2; // rolling hills
    h += (nx * 0.8 + nz * 0.3).sin() * 0.3; // broad diagonal features
    h += 0.5 * (1.0 - (distance * 1.5).min(1.0)); // central rise, gone past 2/3 radius
    h += 0.1 * (nx * 3.0 + nz * 5.0).sin(); // ridges

    ((h + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// A generated field placed in the world.
#[derive(Debug, Clone)]
pub struct Terrain {
    pub field: HeightField,
    pub origin_y: f32,
}

impl Terrain {
    pub fn new(field: HeightField, origin_y: f32) -> Self {
        Self { field, origin_y }
    }

    pub fn from_config(cfg: &TerrainConfig) -> Result<Self, TerrainError> {
        Ok(Self::new(HeightField::from_config(cfg)?, cfg.origin_y))
    }
}

impl HeightProvider for Terrain {
    fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        Some(self.field.height_at(x, z)).filter(|h| h.is_finite())
    }

    fn origin_y(&self) -> f32 {
        self.origin_y
    }
}
