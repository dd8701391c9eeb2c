//! Ray-cast Blinn-Phong rendering of a single sphere.
//!
//! One ray per pixel leaves the observer, passes through the pixel center on a
//! virtual screen and is intersected with the sphere. The screen lies in the
//! plane `z = sphere.center.z`, centered on the sphere's X/Y, so the sphere is
//! always framed. Pixels that miss are 0.
//!
//! Pixels do not depend on each other: rows are shaded in parallel with rayon.

mod blinn_phong;
mod sampling;
mod sphere;

pub use blinn_phong::{
    diffuse_factor, specular_factor, PhongParams, BASE_AMBIENT, MIN_LIGHT_DISTANCE,
};
pub use sampling::SamplePoint;
pub use sphere::{Hit, Ray, Sphere, HIT_EPSILON};

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::field::{Field, ScalarField};
use crate::light::{LightSource, MetricLight};
use crate::math::vec3::Vec3;
use crate::screen::{Resolution, ScreenPlane};
use crate::units::{mm_to_m, vec_m_to_mm, vec_mm_to_m};

/// Physical screen size in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ScreenSize {
    pub width: f64,
    pub height: f64,
}

impl ScreenSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }
}

/// Cooperative cancellation and progress for a running render.
///
/// Share one between the render and the caller; the caller may flip
/// [`cancel`](Self::cancel) from another thread and poll
/// [`rows_done`](Self::rows_done).
#[derive(Debug, Default)]
pub struct RenderControl {
    cancelled: AtomicBool,
    rows_done: AtomicUsize,
}

impl RenderControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub fn rows_done(&self) -> usize {
        self.rows_done.load(Ordering::Relaxed)
    }

    fn row_finished(&self) {
        self.rows_done.fetch_add(1, Ordering::Relaxed);
    }
}

/// Observer, sphere, lights and material, all in millimeters.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereScene {
    pub screen: ScreenSize,
    pub resolution: Resolution,
    pub observer: Vec3,
    pub sphere: Sphere,
    pub lights: Vec<LightSource>,
    pub phong: PhongParams,
}

impl SphereScene {
    pub fn new(
        screen: ScreenSize,
        resolution: Resolution,
        observer: Vec3,
        sphere: Sphere,
        lights: Vec<LightSource>,
        phong: PhongParams,
    ) -> Self {
        Self {
            screen,
            resolution,
            observer,
            sphere,
            lights,
            phong,
        }
    }

    fn validate(&self) -> Result<()> {
        self.resolution.ensure_non_empty()?;
        self.sphere.validate()?;
        if self.screen.width <= 0.0 || self.screen.height <= 0.0 {
            return Err(Error::invalid_input(format!(
                "screen size must be positive, got {}x{} mm",
                self.screen.width, self.screen.height
            )));
        }
        Ok(())
    }

    /// Brightness of every pixel; 0 where the ray misses the sphere.
    pub fn compute(&self) -> Result<ScalarField> {
        self.compute_with(&RenderControl::new())
    }

    /// Same as [`compute`](Self::compute), reporting finished rows to
    /// `control` and returning [`Error::Cancelled`] if it gets cancelled.
    pub fn compute_with(&self, control: &RenderControl) -> Result<ScalarField> {
        self.validate()?;

        let started = Instant::now();
        let tracer = Tracer::new(self);
        let width = self.resolution.width;

        let field = Field::par_from_rows(width, self.resolution.height, 0.0, |y, row| {
            if control.is_cancelled() {
                return;
            }
            for (x, cell) in row.iter_mut().enumerate() {
                *cell = tracer.trace(x, y).map(|(_, value)| value).unwrap_or(0.0);
            }
            control.row_finished();
        });

        if control.is_cancelled() {
            log::debug!("sphere render cancelled after {} rows", control.rows_done());
            return Err(Error::Cancelled);
        }

        log::debug!(
            "sphere shading {} with {} light(s) computed in {:.2?}",
            self.resolution,
            self.lights.len(),
            started.elapsed()
        );
        Ok(field)
    }

    /// Hit point (millimeters) and brightness for one pixel, or None on a miss.
    pub fn trace_pixel(&self, x: usize, y: usize) -> Result<Option<(Vec3, f64)>> {
        self.validate()?;
        if x >= self.resolution.width || y >= self.resolution.height {
            return Err(Error::invalid_input(format!(
                "pixel ({x}, {y}) is outside the {} grid",
                self.resolution
            )));
        }
        Ok(Tracer::new(self)
            .trace(x, y)
            .map(|(hit, value)| (vec_m_to_mm(hit.point), value)))
    }
}

/// A scene converted to meters, ready to cast rays.
struct Tracer {
    screen: ScreenPlane,
    observer: Vec3,
    sphere: Sphere,
    lights: Vec<MetricLight>,
    phong: PhongParams,
}

impl Tracer {
    fn new(scene: &SphereScene) -> Self {
        let sphere = scene.sphere.in_meters();
        Self {
            screen: ScreenPlane::centered(
                sphere.center,
                mm_to_m(scene.screen.width),
                mm_to_m(scene.screen.height),
                scene.resolution,
            ),
            observer: vec_mm_to_m(scene.observer),
            sphere,
            lights: scene.lights.iter().map(LightSource::in_meters).collect(),
            phong: scene.phong,
        }
    }

    #[inline]
    fn trace(&self, x: usize, y: usize) -> Option<(Hit, f64)> {
        let ray = Ray::through(self.observer, self.screen.pixel_center(x, y));
        let hit = self.sphere.intersect(&ray)?;
        let value = blinn_phong::shade(hit.point, hit.normal, self.observer, &self.lights, &self.phong);
        Some((hit, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    pub(super) fn reference_scene(resolution: Resolution) -> SphereScene {
        SphereScene::new(
            ScreenSize::new(500.0, 500.0),
            resolution,
            Vec3::new(0.0, 0.0, -1500.0),
            Sphere::new(Vec3::new(0.0, 0.0, 300.0), 250.0),
            vec![
                LightSource::at(800.0, 100.0, 0.0, 6000.0),
                LightSource::at(-1000.0, 0.0, -400.0, 4000.0),
            ],
            PhongParams::default(),
        )
    }

    #[test]
    fn test_center_pixel_hits_near_face() {
        // Odd resolution puts a pixel center exactly on the sphere's axis.
        let scene = reference_scene(Resolution::new(201, 201));
        let (point, value) = scene.trace_pixel(100, 100).unwrap().unwrap();
        assert_relative_eq!(point.x, 0.0, epsilon = 1e-9);
        assert_relative_eq!(point.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(point.z, 50.0, epsilon = 1e-9);
        assert!(value > 0.0);
    }

    #[test]
    fn test_corners_miss_and_center_hits() {
        let field = reference_scene(Resolution::new(64, 64)).compute().unwrap();
        assert_eq!(field.shape(), (64, 64));
        // The sphere silhouette is inscribed in the screen, so corners miss.
        assert_eq!(field.get(0, 0), Some(0.0));
        assert_eq!(field.get(63, 63), Some(0.0));
        assert!(field.get(32, 32).unwrap() > 0.0);
    }

    #[test]
    fn test_every_hit_has_at_least_ambient() {
        let scene = reference_scene(Resolution::new(48, 48));
        let field = scene.compute().unwrap();
        let floor = scene.phong.ambient * BASE_AMBIENT;
        for &v in field.as_slice() {
            assert!(v == 0.0 || v >= floor - 1e-12);
        }
    }

    #[test]
    fn test_field_matches_single_pixel_trace() {
        let scene = reference_scene(Resolution::new(40, 30));
        let field = scene.compute().unwrap();
        for &(x, y) in &[(20, 15), (12, 9), (27, 20), (0, 0)] {
            let expected = scene.trace_pixel(x, y).unwrap().map(|(_, v)| v).unwrap_or(0.0);
            assert_eq!(field.get(x, y), Some(expected));
        }
    }

    #[test]
    fn test_trace_pixel_rejects_out_of_grid() {
        let scene = reference_scene(Resolution::new(40, 30));
        assert!(scene.trace_pixel(39, 29).is_ok());
        assert!(matches!(scene.trace_pixel(40, 0), Err(Error::InvalidInput(_))));
        assert!(matches!(scene.trace_pixel(0, 30), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_brighter_on_lit_side() {
        // Only the right-hand light: the right half must outshine the left.
        let mut scene = reference_scene(Resolution::new(101, 101));
        scene.lights = vec![LightSource::at(800.0, 100.0, 0.0, 6000.0)];
        let field = scene.compute().unwrap();
        assert!(field.get(70, 50).unwrap() > field.get(30, 50).unwrap());
    }

    #[test]
    fn test_preconditions() {
        let mut scene = reference_scene(Resolution::new(10, 10));
        scene.sphere.radius = 0.0;
        assert!(matches!(scene.compute(), Err(Error::InvalidInput(_))));

        let mut scene = reference_scene(Resolution::new(10, 0));
        assert!(matches!(scene.compute(), Err(Error::InvalidInput(_))));
        scene.resolution = Resolution::new(10, 10);
        scene.screen = ScreenSize::new(0.0, 10.0);
        assert!(matches!(scene.compute(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_cancelled_render_returns_no_field() {
        let control = RenderControl::new();
        control.cancel();
        let result = reference_scene(Resolution::new(32, 32)).compute_with(&control);
        assert!(matches!(result, Err(Error::Cancelled)));
        assert_eq!(control.rows_done(), 0);
    }

    #[test]
    fn test_progress_counts_every_row() {
        let control = RenderControl::new();
        reference_scene(Resolution::new(16, 24))
            .compute_with(&control)
            .unwrap();
        assert_eq!(control.rows_done(), 24);
    }
}
