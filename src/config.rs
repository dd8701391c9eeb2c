//! Scene files and the range checks applied before an engine runs.
//!
//! Both scenes are read from TOML. Every field is optional and falls back to
//! the defaults below, so an empty file describes a complete scene. `validate`
//! turns a config into engine input or explains which value is out of range.
//!
//! ```toml
//! [area]
//! width = 5000.0
//! height = 5000.0
//!
//! [resolution]
//! width = 500
//! height = 500
//!
//! [light]
//! position = { x = 1500.0, y = -1000.0, z = 2500.0 }
//! intensity = 800.0
//!
//! [mask]
//! center_x = 0.0
//! center_y = 0.0
//! radius = 2500.0
//! ```

use std::fmt;
use std::path::Path;

use approx::relative_eq;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::illumination::{AreaSize, Bounds, MaskCircle, PlanarScene};
use crate::light::LightSource;
use crate::math::vec3::Vec3;
use crate::screen::{Resolution, MAX_IMAGE_SIDE};
use crate::shading::{PhongParams, ScreenSize, Sphere, SphereScene};

pub const SIZE_RANGE_MM: (f64, f64) = (100.0, 10_000.0);
pub const RESOLUTION_RANGE: (usize, usize) = (200, 800);
pub const LIGHT_COORD_RANGE_MM: (f64, f64) = (-10_000.0, 10_000.0);
pub const INTENSITY_RANGE: (f64, f64) = (0.01, 10_000.0);

/// Relative tolerance when comparing physical and pixel aspect ratios.
const ASPECT_TOLERANCE: f64 = 1e-5;

fn check_range(name: &str, value: f64, (min, max): (f64, f64), unit: &str) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(Error::invalid_input(format!(
            "{name} must be between {min} and {max}{unit}, got {value}"
        )));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if !(value > 0.0) {
        return Err(Error::invalid_input(format!(
            "{name} must be positive, got {value}"
        )));
    }
    Ok(())
}

fn check_resolution(resolution: Resolution) -> Result<()> {
    let (min, max) = RESOLUTION_RANGE;
    for (side, value) in [("width", resolution.width), ("height", resolution.height)] {
        if !(min..=max).contains(&value) {
            return Err(Error::invalid_input(format!(
                "resolution {side} must be between {min} and {max} pixels, got {value}"
            )));
        }
    }
    Ok(())
}

fn check_light_xy(index: Option<usize>, light: &LightSource) -> Result<()> {
    let name = |axis: &str| match index {
        Some(i) => format!("light {} {axis}", i + 1),
        None => format!("light {axis}"),
    };
    check_range(&name("x"), light.position.x, LIGHT_COORD_RANGE_MM, " mm")?;
    check_range(&name("y"), light.position.y, LIGHT_COORD_RANGE_MM, " mm")?;
    check_range(&name("intensity"), light.intensity, INTENSITY_RANGE, " W/sr")
}

/// Read and parse a TOML scene file.
pub fn load<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let text = std::fs::read_to_string(path.as_ref())?;
    Ok(toml::from_str(&text)?)
}

// ============ Planar illumination ============

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlaneConfig {
    /// Size of the lit area, centered on the origin.
    pub area: AreaSize,
    pub resolution: Resolution,
    pub light: LightSource,
    pub mask: MaskCircle,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            area: AreaSize::new(5000.0, 5000.0),
            resolution: Resolution::new(500, 500),
            light: LightSource::at(1500.0, -1000.0, 2500.0, 800.0),
            mask: MaskCircle::new(0.0, 0.0, 2500.0),
        }
    }
}

impl PlaneConfig {
    /// Range-check every value and produce the scene to compute.
    ///
    /// When the area's aspect ratio differs from the pixel grid's, the area is
    /// resized to match: first its height, or its width if the new height would
    /// leave the allowed range. A warning is logged for each adjustment.
    pub fn validate(&self) -> Result<PlanarScene> {
        check_range("area width", self.area.width, SIZE_RANGE_MM, " mm")?;
        check_range("area height", self.area.height, SIZE_RANGE_MM, " mm")?;
        check_resolution(self.resolution)?;
        check_light_xy(None, &self.light)?;
        check_range("light z", self.light.position.z, (0.0, LIGHT_COORD_RANGE_MM.1), " mm")?;
        if self.light.position.z <= 0.0 {
            return Err(Error::invalid_geometry(
                "light source must be strictly above the plane",
            ));
        }
        check_positive("mask radius", self.mask.radius)?;

        let area = self.matched_area()?;
        Ok(PlanarScene::new(
            Bounds::around_origin(area),
            self.resolution,
            self.light,
            self.mask,
        ))
    }

    fn matched_area(&self) -> Result<AreaSize> {
        let AreaSize { width, height } = self.area;
        let pixel_ratio = self.resolution.aspect_ratio();
        if relative_eq!(
            self.area.aspect_ratio(),
            pixel_ratio,
            epsilon = 1e-8,
            max_relative = ASPECT_TOLERANCE
        ) {
            return Ok(self.area);
        }

        let (min, max) = SIZE_RANGE_MM;
        let new_height = width / pixel_ratio;
        if (min..=max).contains(&new_height) {
            log::warn!(
                "area {width:.0}x{height:.0} mm does not match resolution {}; height changed to {new_height:.0} mm",
                self.resolution
            );
            return Ok(AreaSize::new(width, new_height));
        }

        let new_width = height * pixel_ratio;
        if (min..=max).contains(&new_width) {
            log::warn!(
                "area {width:.0}x{height:.0} mm does not match resolution {}; width changed to {new_width:.0} mm",
                self.resolution
            );
            return Ok(AreaSize::new(new_width, height));
        }

        Err(Error::invalid_input(format!(
            "cannot fit area {width:.1}x{height:.1} mm to resolution {}; set width/height = {pixel_ratio:.2}",
            self.resolution
        )))
    }
}

// ============ Sphere shading ============

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SphereConfig {
    pub screen: ScreenSize,
    /// Derived from the screen's aspect ratio when absent.
    pub resolution: Option<Resolution>,
    pub observer: Vec3,
    pub sphere: Sphere,
    pub lights: Vec<LightSource>,
    pub phong: PhongParams,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            screen: ScreenSize::new(500.0, 500.0),
            resolution: None,
            observer: Vec3::new(0.0, 0.0, -1500.0),
            sphere: Sphere::new(Vec3::new(0.0, 0.0, 300.0), 250.0),
            lights: vec![
                // Strong highlight near the right edge.
                LightSource::at(800.0, 100.0, 0.0, 6000.0),
                // Fill light for the left half.
                LightSource::at(-1000.0, 0.0, -400.0, 4000.0),
            ],
            phong: PhongParams::default(),
        }
    }
}

/// Observer/screen placements that likely leave the sphere invisible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisibilityWarning {
    ObserverBehindSphere { observer_z: f64, far_z: f64 },
    ObserverInsideSphere { observer_z: f64, near_z: f64, far_z: f64 },
}

impl fmt::Display for VisibilityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            VisibilityWarning::ObserverBehindSphere { observer_z, far_z } => write!(
                f,
                "observer (z={observer_z:.0}) is past the far side of the sphere (z={far_z:.0}); the sphere is probably not visible"
            ),
            VisibilityWarning::ObserverInsideSphere {
                observer_z,
                near_z,
                far_z,
            } => write!(
                f,
                "observer (z={observer_z:.0}) is within the sphere's depth range [{near_z:.0}, {far_z:.0}]; the image may look wrong"
            ),
        }
    }
}

impl SphereConfig {
    /// Placement problems that do not stop the render but deserve a warning.
    ///
    /// The screen plane passes through the sphere's center, so the sphere
    /// always straddles it; only the observer's depth can hide the sphere.
    pub fn visibility_warnings(&self) -> Vec<VisibilityWarning> {
        let observer_z = self.observer.z;
        let near_z = self.sphere.center.z - self.sphere.radius;
        let far_z = self.sphere.center.z + self.sphere.radius;

        let mut warnings = Vec::new();
        if observer_z >= far_z {
            warnings.push(VisibilityWarning::ObserverBehindSphere { observer_z, far_z });
        } else if observer_z >= near_z {
            warnings.push(VisibilityWarning::ObserverInsideSphere {
                observer_z,
                near_z,
                far_z,
            });
        }
        warnings
    }

    /// The configured resolution, or one fitted to the screen's aspect ratio.
    pub fn effective_resolution(&self) -> Resolution {
        self.resolution
            .unwrap_or_else(|| Resolution::fit_aspect(self.screen.aspect_ratio(), MAX_IMAGE_SIDE))
    }

    pub fn validate(&self) -> Result<SphereScene> {
        check_range("screen width", self.screen.width, SIZE_RANGE_MM, " mm")?;
        check_range("screen height", self.screen.height, SIZE_RANGE_MM, " mm")?;
        if let Some(resolution) = self.resolution {
            check_resolution(resolution)?;
        }
        check_positive("sphere radius", self.sphere.radius)?;

        for (i, light) in self.lights.iter().enumerate() {
            check_light_xy(Some(i), light)?;
            check_range(
                &format!("light {} z", i + 1),
                light.position.z,
                LIGHT_COORD_RANGE_MM,
                " mm",
            )?;
        }

        let unit = (0.0, 1.0);
        check_range("ambient coefficient", self.phong.ambient, unit, "")?;
        check_range("diffuse coefficient", self.phong.diffuse, unit, "")?;
        check_range("specular coefficient", self.phong.specular, unit, "")?;
        check_positive("shininess", self.phong.shininess)?;

        for warning in self.visibility_warnings() {
            log::warn!("{warning}");
        }

        Ok(SphereScene::new(
            self.screen,
            self.effective_resolution(),
            self.observer,
            self.sphere,
            self.lights.clone(),
            self.phong,
        ))
    }
}
