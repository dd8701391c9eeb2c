//! Pixel grids and the virtual screen rays are cast through.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::math::vec3::Vec3;

/// Longest side of an automatically sized sphere image.
pub const MAX_IMAGE_SIDE: usize = 800;

/// Pixel resolution of a grid: `width` columns by `height` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Resolution {
    pub width: usize,
    pub height: usize,
}

impl Resolution {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Fails with `InvalidInput` when either side is zero.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::invalid_input(format!(
                "resolution must be at least 1x1, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }

    /// Resolution matching a physical aspect ratio, with the longer side at
    /// `max_side` pixels. Both sides are rounded up to an even pixel count.
    pub fn fit_aspect(aspect_ratio: f64, max_side: usize) -> Self {
        let (width, height) = if aspect_ratio >= 1.0 {
            (max_side, (max_side as f64 / aspect_ratio) as usize)
        } else {
            ((max_side as f64 * aspect_ratio) as usize, max_side)
        };
        Self::new(round_up_to_even(width), round_up_to_even(height))
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

fn round_up_to_even(n: usize) -> usize {
    n + n % 2
}

/// A rectangular window in a plane of constant Z, split into pixels.
///
/// All values are in meters. Pixel `(0, 0)` is the top-left corner: X grows
/// to the right with the column index, world Y shrinks as the row index grows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPlane {
    left: f64,
    top: f64,
    z: f64,
    cell_width: f64,
    cell_height: f64,
}

impl ScreenPlane {
    /// A `width` x `height` window centered on `center`.
    pub fn centered(center: Vec3, width: f64, height: f64, resolution: Resolution) -> Self {
        Self {
            left: center.x - width / 2.0,
            top: center.y + height / 2.0,
            z: center.z,
            cell_width: width / resolution.width as f64,
            cell_height: height / resolution.height as f64,
        }
    }

    /// World-space center of pixel `(x, y)`.
    #[inline]
    pub fn pixel_center(&self, x: usize, y: usize) -> Vec3 {
        Vec3::new(
            self.left + (x as f64 + 0.5) * self.cell_width,
            self.top - (y as f64 + 0.5) * self.cell_height,
            self.z,
        )
    }
}
