//! Point light sources.

use serde::Deserialize;

use crate::math::vec3::Vec3;
use crate::units::vec_mm_to_m;

/// An idealized point emitter.
///
/// Position is in millimeters like every other public input; intensity is the
/// radiant intensity I0 in W/sr.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct LightSource {
    pub position: Vec3,
    pub intensity: f64,
}

impl LightSource {
    pub fn new(position: Vec3, intensity: f64) -> Self {
        LightSource {
            position,
            intensity,
        }
    }

    pub fn at(x: f64, y: f64, z: f64, intensity: f64) -> Self {
        Self::new(Vec3::new(x, y, z), intensity)
    }

    /// The same light with its position converted to meters.
    pub(crate) fn in_meters(&self) -> MetricLight {
        MetricLight {
            position: vec_mm_to_m(self.position),
            intensity: self.intensity,
        }
    }
}

/// Engine-internal light with position in meters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MetricLight {
    pub position: Vec3,
    pub intensity: f64,
}
