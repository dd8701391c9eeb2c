//! Illuminance on the plane z = 0 from a single point source.
//!
//! For a light at height `zL` the illuminance at a plane point is
//! `E = I0 · cosθ / r² = I0 · zL / r³`, where `r` is the distance from the
//! light to the point. Only points inside a circular aperture are lit.

use std::time::Instant;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::field::{Field, ScalarField};
use crate::light::{LightSource, MetricLight};
use crate::math::linspace;
use crate::screen::Resolution;
use crate::units::mm_to_m;

/// Physical size of the lit area, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct AreaSize {
    pub width: f64,
    pub height: f64,
}

impl AreaSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Rectangular area of the plane, in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_max: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn new(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    /// A `width` x `height` area centered on the origin.
    pub fn centered(width: f64, height: f64) -> Self {
        Self::new(-width / 2.0, -height / 2.0, width / 2.0, height / 2.0)
    }

    pub fn around_origin(area: AreaSize) -> Self {
        Self::centered(area.width, area.height)
    }

    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Circular aperture on the plane, in millimeters. The boundary counts as inside.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MaskCircle {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
}

impl MaskCircle {
    pub fn new(center_x: f64, center_y: f64, radius: f64) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    fn in_meters(&self) -> MetricMask {
        MetricMask {
            center_x: mm_to_m(self.center_x),
            center_y: mm_to_m(self.center_y),
            radius_squared: mm_to_m(self.radius).powi(2),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MetricMask {
    center_x: f64,
    center_y: f64,
    radius_squared: f64,
}

impl MetricMask {
    #[inline]
    fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.center_x;
        let dy = y - self.center_y;
        dx * dx + dy * dy <= self.radius_squared
    }
}

/// `I0 · zL / r³` at plane point `(x, y)`, everything in meters.
#[inline]
fn illuminance(light: &MetricLight, x: f64, y: f64) -> f64 {
    let dx = x - light.position.x;
    let dy = y - light.position.y;
    let z = light.position.z;
    let r = (dx * dx + dy * dy + z * z).sqrt();
    light.intensity * z / (r * r * r)
}

/// Everything needed to light one rectangular patch of the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarScene {
    pub bounds: Bounds,
    pub resolution: Resolution,
    pub light: LightSource,
    pub mask: MaskCircle,
}

impl PlanarScene {
    pub fn new(bounds: Bounds, resolution: Resolution, light: LightSource, mask: MaskCircle) -> Self {
        Self {
            bounds,
            resolution,
            light,
            mask,
        }
    }

    /// Illuminance in W/m² over the grid, zero outside the mask.
    ///
    /// Column `i` samples `x = linspace(x_min, x_max, width)[i]` and row `j`
    /// samples `y = linspace(y_min, y_max, height)[j]`, both edges included.
    pub fn compute(&self) -> Result<ScalarField> {
        compute(&self.bounds, self.resolution, &self.light, &self.mask)
    }

    /// Illuminance at one plane point (millimeters), without building a grid.
    pub fn point_illumination(&self, x: f64, y: f64) -> f64 {
        point_illumination(x, y, &self.light, &self.mask)
    }

    /// The mask center and the four points where the mask circle crosses the
    /// X and Y axes through its center.
    pub fn diagnostic_points(&self) -> Vec<DiagnosticPoint> {
        let MaskCircle {
            center_x: cx,
            center_y: cy,
            radius: r,
        } = self.mask;

        [
            ("center", cx, cy),
            ("X+", cx + r, cy),
            ("X-", cx - r, cy),
            ("Y+", cx, cy + r),
            ("Y-", cx, cy - r),
        ]
        .into_iter()
        .map(|(label, x, y)| DiagnosticPoint {
            label,
            x,
            y,
            illumination: self.point_illumination(x, y),
        })
        .collect()
    }
}

/// One sampled plane point, coordinates in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagnosticPoint {
    pub label: &'static str,
    pub x: f64,
    pub y: f64,
    pub illumination: f64,
}

/// See [`PlanarScene::compute`].
pub fn compute(
    bounds: &Bounds,
    resolution: Resolution,
    light: &LightSource,
    mask: &MaskCircle,
) -> Result<ScalarField> {
    resolution.ensure_non_empty()?;
    if mask.radius <= 0.0 {
        return Err(Error::invalid_input(format!(
            "mask radius must be positive, got {} mm",
            mask.radius
        )));
    }
    if light.position.z <= 0.0 {
        return Err(Error::invalid_geometry(
            "light source must be strictly above the plane",
        ));
    }

    let started = Instant::now();
    let light = light.in_meters();
    let mask = mask.in_meters();
    let xs = linspace(mm_to_m(bounds.x_min), mm_to_m(bounds.x_max), resolution.width);
    let ys = linspace(mm_to_m(bounds.y_min), mm_to_m(bounds.y_max), resolution.height);

    let field = Field::par_from_rows(resolution.width, resolution.height, 0.0, |row, out| {
        let y = ys[row];
        for (cell, &x) in out.iter_mut().zip(&xs) {
            if mask.contains(x, y) {
                *cell = illuminance(&light, x, y);
            }
        }
    });

    log::debug!(
        "planar illumination {} computed in {:.2?}",
        resolution,
        started.elapsed()
    );
    Ok(field)
}

/// See [`PlanarScene::point_illumination`].
///
/// Returns 0 outside the mask, and also when the light is not above the plane.
pub fn point_illumination(x: f64, y: f64, light: &LightSource, mask: &MaskCircle) -> f64 {
    if light.position.z <= 0.0 {
        return 0.0;
    }
    let light = light.in_meters();
    let (x, y) = (mm_to_m(x), mm_to_m(y));
    if !mask.in_meters().contains(x, y) {
        return 0.0;
    }
    illuminance(&light, x, y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_scene() -> PlanarScene {
        PlanarScene::new(
            Bounds::new(-2500.0, -2500.0, 2500.0, 2500.0),
            Resolution::new(500, 500),
            LightSource::at(1500.0, -1000.0, 2500.0, 800.0),
            MaskCircle::new(0.0, 0.0, 2500.0),
        )
    }

    #[test]
    fn test_area_bounds_are_centered_on_origin() {
        let area = AreaSize::new(4000.0, 1000.0);
        assert_relative_eq!(area.aspect_ratio(), 4.0);
        let bounds = Bounds::around_origin(area);
        assert_eq!(bounds, Bounds::new(-2000.0, -500.0, 2000.0, 500.0));
        assert_relative_eq!(bounds.width(), 4000.0);
    }

    #[test]
    fn test_center_matches_closed_form() {
        let scene = reference_scene();
        let r = (1.5_f64.powi(2) + 1.0_f64.powi(2) + 2.5_f64.powi(2)).sqrt();
        let expected = 800.0 * 2.5 / r.powi(3);
        assert_relative_eq!(scene.point_illumination(0.0, 0.0), expected, epsilon = 1e-9);
        assert_relative_eq!(expected, 68.30, epsilon = 0.01);
    }

    #[test]
    fn test_grid_shape_and_corners() {
        let field = reference_scene().compute().unwrap();
        assert_eq!(field.shape(), (500, 500));
        // Corners are sqrt(2) * 2500 mm from the mask center.
        assert_eq!(field.get(0, 0), Some(0.0));
        assert_eq!(field.get(499, 499), Some(0.0));
    }

    #[test]
    fn test_grid_cell_matches_point_illumination() {
        let scene = reference_scene();
        let field = scene.compute().unwrap();
        let xs = linspace(-2500.0, 2500.0, 500);
        let ys = linspace(-2500.0, 2500.0, 500);
        for &(col, row) in &[(250, 250), (100, 300), (400, 120)] {
            assert_relative_eq!(
                field.get(col, row).unwrap(),
                scene.point_illumination(xs[col], ys[row]),
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn test_zero_outside_and_positive_inside_mask() {
        let scene = PlanarScene::new(
            Bounds::centered(2000.0, 2000.0),
            Resolution::new(101, 101),
            LightSource::at(0.0, 0.0, 1000.0, 100.0),
            MaskCircle::new(200.0, -100.0, 600.0),
        );
        let field = scene.compute().unwrap();
        let xs = linspace(-1000.0, 1000.0, 101);
        let ys = linspace(-1000.0, 1000.0, 101);

        for (row, &y) in ys.iter().enumerate() {
            for (col, &x) in xs.iter().enumerate() {
                let d2 = (x - 200.0).powi(2) + (y + 100.0).powi(2);
                let value = field.get(col, row).unwrap();
                if d2 > 600.0_f64.powi(2) + 1e-6 {
                    assert_eq!(value, 0.0, "({x}, {y}) should be masked");
                } else if d2 < 600.0_f64.powi(2) - 1e-6 {
                    assert!(value > 0.0, "({x}, {y}) should be lit");
                }
            }
        }
    }

    #[test]
    fn test_mask_boundary_is_inclusive() {
        let light = LightSource::at(0.0, 0.0, 1000.0, 100.0);
        let mask = MaskCircle::new(0.0, 0.0, 500.0);
        assert!(point_illumination(500.0, 0.0, &light, &mask) > 0.0);
        assert_eq!(point_illumination(500.1, 0.0, &light, &mask), 0.0);
    }

    #[test]
    fn test_decreases_with_distance_from_light_projection() {
        let scene = PlanarScene::new(
            Bounds::centered(4000.0, 4000.0),
            Resolution::new(81, 81),
            LightSource::at(300.0, -200.0, 800.0, 50.0),
            MaskCircle::new(0.0, 0.0, 2000.0),
        );
        let field = scene.compute().unwrap();
        let xs = linspace(-2.0, 2.0, 81);
        let ys = linspace(-2.0, 2.0, 81);

        let mut lit: Vec<(f64, f64)> = Vec::new();
        for (row, &y) in ys.iter().enumerate() {
            for (col, &x) in xs.iter().enumerate() {
                let value = field.get(col, row).unwrap();
                if value > 0.0 {
                    let d = ((x - 0.3).powi(2) + (y + 0.2).powi(2)).sqrt();
                    lit.push((d, value));
                }
            }
        }
        lit.sort_by(|a, b| a.0.total_cmp(&b.0));
        for pair in lit.windows(2) {
            if pair[0].0 < pair[1].0 {
                assert!(pair[0].1 >= pair[1].1 * (1.0 - 1e-12));
            }
        }
    }

    #[test]
    fn test_light_on_plane_is_invalid_geometry() {
        let mut scene = reference_scene();
        scene.light.position.z = 0.0;
        assert!(matches!(scene.compute(), Err(Error::InvalidGeometry(_))));
        assert_eq!(scene.point_illumination(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_empty_grid_is_invalid_input() {
        let mut scene = reference_scene();
        scene.resolution = Resolution::new(0, 500);
        assert!(matches!(scene.compute(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_diagnostic_points() {
        let points = reference_scene().diagnostic_points();
        let labels: Vec<_> = points.iter().map(|p| p.label).collect();
        assert_eq!(labels, ["center", "X+", "X-", "Y+", "Y-"]);
        assert_eq!((points[1].x, points[1].y), (2500.0, 0.0));
        // The crossings sit on the inclusive boundary, so they are lit.
        assert!(points.iter().all(|p| p.illumination > 0.0));
        // X+ is nearer the light at (1500, -1000) than X- is.
        assert!(points[1].illumination > points[2].illumination);
    }
}
