//! Random spot checks of a rendered sphere field.

use rand::seq::index;
use rand::Rng;

use super::SphereScene;
use crate::error::{Error, Result};
use crate::field::ScalarField;
use crate::math::vec3::Vec3;

/// One re-traced pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// `(x, y)` pixel coordinates.
    pub pixel: (usize, usize),
    /// Hit point in millimeters; None when the sphere is not visible.
    pub world: Option<Vec3>,
    pub brightness: f64,
}

impl SamplePoint {
    fn not_visible() -> Self {
        Self {
            pixel: (0, 0),
            world: None,
            brightness: 0.0,
        }
    }
}

impl SphereScene {
    /// Pick up to `count` distinct lit pixels of `field` at random and re-trace them.
    ///
    /// When nothing is lit, `count` placeholder points with no world position are returned.
    pub fn sample_points(&self, field: &ScalarField, count: usize) -> Result<Vec<SamplePoint>> {
        self.sample_points_with(field, count, &mut rand::rng())
    }

    /// [`sample_points`](Self::sample_points) with a caller-supplied RNG.
    pub fn sample_points_with<R: Rng + ?Sized>(
        &self,
        field: &ScalarField,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<SamplePoint>> {
        if field.width() != self.resolution.width || field.height() != self.resolution.height {
            return Err(Error::invalid_input(format!(
                "field is {}x{} but the scene renders at {}",
                field.width(),
                field.height(),
                self.resolution
            )));
        }

        let lit = field.positive_cells();
        if lit.is_empty() {
            return Ok(vec![SamplePoint::not_visible(); count]);
        }

        let amount = count.min(lit.len());
        index::sample(rng, lit.len(), amount)
            .into_iter()
            .map(|i| {
                let (x, y) = lit[i];
                let traced = self.trace_pixel(x, y)?;
                Ok(SamplePoint {
                    pixel: (x, y),
                    world: traced.map(|(point, _)| point),
                    brightness: traced.map(|(_, value)| value).unwrap_or(0.0),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::super::tests::reference_scene;
    use crate::field::Field;
    use crate::screen::Resolution;

    #[test]
    fn test_samples_are_distinct_lit_pixels() {
        let scene = reference_scene(Resolution::new(40, 40));
        let field = scene.compute().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let samples = scene.sample_points_with(&field, 5, &mut rng).unwrap();

        assert_eq!(samples.len(), 5);
        for s in &samples {
            let (x, y) = s.pixel;
            assert_eq!(field.get(x, y), Some(s.brightness));
            let world = s.world.unwrap();
            // On the sphere surface, in millimeters.
            let r = (world - scene.sphere.center).magnitude();
            assert!((r - 250.0).abs() < 1e-6);
        }
        let mut pixels: Vec<_> = samples.iter().map(|s| s.pixel).collect();
        pixels.sort();
        pixels.dedup();
        assert_eq!(pixels.len(), 5);
    }

    #[test]
    fn test_sample_count_is_capped_by_lit_pixels() {
        let scene = reference_scene(Resolution::new(3, 3));
        let mut values = vec![0.0; 9];
        values[4] = 1.0;
        let field = Field::from_vec(3, 3, values).unwrap();
        let samples = scene.sample_points_with(&field, 4, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].pixel, (1, 1));
    }

    #[test]
    fn test_dark_field_yields_placeholders() {
        let scene = reference_scene(Resolution::new(8, 8));
        let field = Field::filled(8, 8, 0.0);
        let samples = scene.sample_points(&field, 3).unwrap();
        assert_eq!(samples.len(), 3);
        assert!(samples.iter().all(|s| s.world.is_none() && s.brightness == 0.0));
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let scene = reference_scene(Resolution::new(8, 8));
        let field = Field::filled(4, 8, 1.0);
        assert!(scene.sample_points(&field, 3).is_err());
    }
}
