//! 8-bit rescaling of raw fields for display and storage.
//!
//! Each field is stretched by its own maximum. Two fields with different
//! absolute levels both fill [0, 255], so normalized images are not comparable
//! with each other; the raw [`ScalarField`] keeps the true scale for statistics.

use std::path::Path;

use image::GrayImage;

use super::{Field, ScalarField};
use crate::error::{Error, Result};

/// Grayscale version of a [`ScalarField`], plus the maximum it was scaled by.
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedField {
    pixels: Field<u8>,
    source_max: f64,
}

/// `floor(v / max * 255)` per cell; an all-zero field when the maximum is not positive.
pub fn normalize(field: &ScalarField) -> NormalizedField {
    let max = field.max();
    if max <= 0.0 {
        return NormalizedField {
            pixels: Field::filled(field.width(), field.height(), 0),
            source_max: 0.0,
        };
    }

    // Inputs never exceed `max`, and `as` saturates anyway.
    let pixels = field.map(|v| ((v / max) * 255.0).floor() as u8);
    NormalizedField {
        pixels,
        source_max: max,
    }
}

impl NormalizedField {
    pub fn pixels(&self) -> &Field<u8> {
        &self.pixels
    }

    pub fn width(&self) -> usize {
        self.pixels.width()
    }

    pub fn height(&self) -> usize {
        self.pixels.height()
    }

    /// The maximum of the field this was derived from (0.0 for a dark field).
    pub fn source_max(&self) -> f64 {
        self.source_max
    }

    /// Undo the scaling, up to the 1/255 quantization step.
    pub fn rescale(&self) -> ScalarField {
        let max = self.source_max;
        self.pixels.map(|v| v as f64 / 255.0 * max)
    }

    /// Single-channel 8-bit luminance image.
    pub fn to_image(&self) -> Result<GrayImage> {
        let width = u32::try_from(self.width())
            .map_err(|_| Error::invalid_input("field too wide for an image"))?;
        let height = u32::try_from(self.height())
            .map_err(|_| Error::invalid_input("field too tall for an image"))?;
        GrayImage::from_raw(width, height, self.pixels.as_slice().to_vec())
            .ok_or_else(|| Error::invalid_input("pixel buffer does not match image size"))
    }

    /// Save as a grayscale image; the format follows the file extension.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.to_image()?.save(path)?;
        log::debug!("saved {}x{} grayscale image to {}", self.width(), self.height(), path.display());
        Ok(())
    }
}
