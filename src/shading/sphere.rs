//! Sphere geometry and ray intersection.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::math::vec3::Vec3;
use crate::units::{mm_to_m, vec_mm_to_m};

/// Hits closer than this (meters) along the ray are treated as behind the origin.
pub const HIT_EPSILON: f64 = 1e-4;

/// A sphere with center and radius in millimeters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn validate(&self) -> Result<()> {
        if self.radius <= 0.0 || !self.radius.is_finite() {
            return Err(Error::invalid_input(format!(
                "sphere radius must be positive, got {} mm",
                self.radius
            )));
        }
        Ok(())
    }

    pub(crate) fn in_meters(&self) -> Sphere {
        Sphere {
            center: vec_mm_to_m(self.center),
            radius: mm_to_m(self.radius),
        }
    }

    /// Nearest hit strictly in front of the ray origin.
    ///
    /// The entry root is taken when it lies past [`HIT_EPSILON`], otherwise the
    /// exit root. An origin inside the sphere therefore sees the far wall.
    pub fn intersect(&self, ray: &Ray) -> Option<Hit> {
        let oc = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = 2.0 * oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t1 = (-b - sqrt_d) / (2.0 * a);
        let t2 = (-b + sqrt_d) / (2.0 * a);

        let t = if t1 > HIT_EPSILON {
            t1
        } else if t2 > HIT_EPSILON {
            t2
        } else {
            return None;
        };

        let point = ray.at(t);
        Some(Hit {
            distance: t,
            point,
            normal: (point - self.center).normalize(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// A ray from `origin` through `target`, with a unit direction.
    pub fn through(origin: Vec3, target: Vec3) -> Self {
        Self {
            origin,
            direction: (target - origin).normalize(),
        }
    }

    pub fn at(&self, distance: f64) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Surface point and outward unit normal where a ray meets the sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub distance: f64,
    pub point: Vec3,
    pub normal: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::new(0.0, 0.0, 0.3), 0.25)
    }

    #[test]
    fn test_central_ray_hits_near_face() {
        let ray = Ray::through(Vec3::new(0.0, 0.0, -1.5), Vec3::new(0.0, 0.0, 0.3));
        let hit = unit_sphere().intersect(&ray).unwrap();
        assert_relative_eq!(hit.point.z, 0.05, epsilon = 1e-12);
        assert_relative_eq!(hit.distance, 1.55, epsilon = 1e-12);
        assert_relative_eq!(hit.normal.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ray_outside_angular_radius_misses() {
        let ray = Ray::through(Vec3::new(0.0, 0.0, -1.5), Vec3::new(2.0, 0.0, 0.3));
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn test_sphere_behind_origin_misses() {
        let ray = Ray::through(Vec3::new(0.0, 0.0, -1.5), Vec3::new(0.0, 0.0, -3.0));
        assert!(unit_sphere().intersect(&ray).is_none());
    }

    #[test]
    fn test_origin_inside_sees_far_wall() {
        let ray = Ray::through(Vec3::new(0.0, 0.0, 0.3), Vec3::new(0.0, 0.0, 1.0));
        let hit = unit_sphere().intersect(&ray).unwrap();
        assert_relative_eq!(hit.point.z, 0.55, epsilon = 1e-12);
        // The normal still points outward, away from the observer.
        assert_relative_eq!(hit.normal.z, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_validate_rejects_non_positive_radius() {
        assert!(Sphere::new(Vec3::ZERO, 0.0).validate().is_err());
        assert!(Sphere::new(Vec3::ZERO, -1.0).validate().is_err());
        assert!(Sphere::new(Vec3::ZERO, 1.0).validate().is_ok());
    }
}
