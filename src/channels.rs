//! Per-channel mean brightness of raster images.

use std::path::Path;

use image::{DynamicImage, ImageFormat, ImageReader};

use crate::error::{Error, Result};

pub const CHANNEL_NAMES: [&str; 3] = ["red", "green", "blue"];

/// Mean of the red, green and blue channels in interleaved 8-bit samples.
///
/// `channels` is the number of samples per pixel: 3 for RGB, 4 for RGBA.
/// A fourth (alpha) channel is ignored.
pub fn channel_averages(samples: &[u8], channels: usize) -> Result<[f64; 3]> {
    if !(3..=4).contains(&channels) {
        return Err(Error::invalid_input(format!(
            "pixels must have 3 or 4 channels, got {channels}"
        )));
    }
    if samples.len() % channels != 0 {
        return Err(Error::invalid_input(format!(
            "{} samples do not divide into {}-channel pixels",
            samples.len(),
            channels
        )));
    }

    let pixel_count = samples.len() / channels;
    if pixel_count == 0 {
        return Err(Error::invalid_input("image has no pixels"));
    }

    let mut sums = [0u64; 3];
    for pixel in samples.chunks_exact(channels) {
        for (sum, &value) in sums.iter_mut().zip(pixel) {
            *sum += value as u64;
        }
    }

    Ok(sums.map(|sum| sum as f64 / pixel_count as f64))
}

/// Red, green and blue means of a decoded image.
///
/// Every image is converted to RGB first, so a grayscale image reports its
/// luminance mean on all three channels.
pub fn image_channel_averages(image: &DynamicImage) -> Result<[f64; 3]> {
    channel_averages(image.to_rgb8().as_raw(), 3)
}

/// What is known about an image file besides its pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageSummary {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub format: Option<ImageFormat>,
    pub file_size: u64,
}

impl ImageSummary {
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn file_size_mib(&self) -> f64 {
        self.file_size as f64 / (1024.0 * 1024.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageAnalysis {
    pub summary: ImageSummary,
    pub averages: [f64; 3],
}

/// Load an image, detecting its format from the content, and average its channels.
pub fn analyze_file<P: AsRef<Path>>(path: P) -> Result<ImageAnalysis> {
    let path = path.as_ref();
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format();
    let image = reader.decode()?;

    let summary = ImageSummary {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        width: image.width(),
        height: image.height(),
        format,
        file_size: std::fs::metadata(path)?.len(),
    };
    log::debug!("decoded {} ({}x{})", summary.name, summary.width, summary.height);

    Ok(ImageAnalysis {
        averages: image_channel_averages(&image)?,
        summary,
    })
}
