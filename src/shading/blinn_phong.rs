//! Blinn-Phong shading of a single surface point.

use serde::Deserialize;

use crate::light::MetricLight;
use crate::math::vec3::Vec3;

/// Baseline brightness scaled by `ka`.
///
/// An engineering constant that keeps unlit parts of the sphere visible; it
/// does not come from the light sources.
pub const BASE_AMBIENT: f64 = 15.0;

/// Light-to-point distances are floored at 1 mm (in meters).
pub const MIN_LIGHT_DISTANCE: f64 = 0.001;

/// Material coefficients for the Blinn-Phong model.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PhongParams {
    pub ambient: f64,
    pub diffuse: f64,
    pub specular: f64,
    pub shininess: f64,
}

impl PhongParams {
    pub fn new(ambient: f64, diffuse: f64, specular: f64, shininess: f64) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }
}

impl Default for PhongParams {
    fn default() -> Self {
        Self::new(0.35, 1.0, 0.9, 180.0)
    }
}

/// Lambertian factor `max(0, N·L)`.
#[inline]
pub fn diffuse_factor(normal: Vec3, to_light: Vec3) -> f64 {
    normal.dot(to_light).max(0.0)
}

/// Halfway-vector factor `max(0, N·H)^shininess`.
#[inline]
pub fn specular_factor(normal: Vec3, to_light: Vec3, to_viewer: Vec3, shininess: f64) -> f64 {
    let halfway = (to_light + to_viewer).normalize();
    normal.dot(halfway).max(0.0).powf(shininess)
}

/// Brightness at `point` with unit `normal`, seen from `observer`.
///
/// `ka·BASE_AMBIENT + Σ I0 / d² · (kd·diffuse + ks·specular)` over all lights,
/// with `d` floored at [`MIN_LIGHT_DISTANCE`]. All positions in meters.
pub(crate) fn shade(
    point: Vec3,
    normal: Vec3,
    observer: Vec3,
    lights: &[MetricLight],
    params: &PhongParams,
) -> f64 {
    let to_viewer = (observer - point).normalize();

    let direct: f64 = lights
        .iter()
        .map(|light| {
            let offset = light.position - point;
            let to_light = offset.normalize();
            let distance = offset.magnitude().max(MIN_LIGHT_DISTANCE);
            let attenuation = 1.0 / (distance * distance);

            let diffuse = params.diffuse * diffuse_factor(normal, to_light);
            let specular =
                params.specular * specular_factor(normal, to_light, to_viewer, params.shininess);
            light.intensity * attenuation * (diffuse + specular)
        })
        .sum();

    params.ambient * BASE_AMBIENT + direct
}
