//! Millimeter/meter conversions.
//!
//! Everything crossing the public API is in millimeters. Radiometric math runs in
//! meters so that illuminance comes out in W/m².

use crate::math::vec3::Vec3;

pub const MM_PER_METER: f64 = 1000.0;

#[inline]
pub fn mm_to_m(value: f64) -> f64 {
    value / MM_PER_METER
}

#[inline]
pub fn m_to_mm(value: f64) -> f64 {
    value * MM_PER_METER
}

#[inline]
pub fn vec_mm_to_m(v: Vec3) -> Vec3 {
    v / MM_PER_METER
}

#[inline]
pub fn vec_m_to_mm(v: Vec3) -> Vec3 {
    v.scale(MM_PER_METER)
}
