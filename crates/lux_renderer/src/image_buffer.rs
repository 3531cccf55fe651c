//! Accumulated render output and conversion to 8-bit images.

use crate::{BucketResult, Color};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// Per-pixel sums of radiance samples, all taken with the same sample count.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    /// Number of samples summed into every pixel
    pub samples_per_pixel: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Sample sum at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the sample sum at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Mean radiance at (x, y).
    pub fn average(&self, x: u32, y: u32) -> Color {
        self.get(x, y) * self.sample_scale()
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let bucket = &result.bucket;
        for local_y in 0..bucket.height {
            for local_x in 0..bucket.width {
                let color = result.pixels[(local_y * bucket.width + local_x) as usize];
                self.set(bucket.x + local_x, bucket.y + local_y, color);
            }
        }
    }

    fn sample_scale(&self) -> f32 {
        1.0 / self.samples_per_pixel.max(1) as f32
    }

    /// Tone-mapped RGB bytes, rows top to bottom.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let scale = self.sample_scale();
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            let rgb = color_to_rgb8(*color, scale);
            bytes.extend_from_slice(&rgb);
        }
        bytes
    }

    /// Write the image to `path`; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        if self.pixels.is_empty() {
            return Err(OutputError::Empty {
                width: self.width,
                height: self.height,
            });
        }

        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
        )?;

        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Apply gamma correction (gamma = 2.0). NaN and negative values map to zero.
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Average a sample sum by `scale`, gamma correct, then quantize each
/// channel as `256 * clamp(c, 0, 0.999)`.
pub fn color_to_rgb8(sum: Color, scale: f32) -> [u8; 3] {
    let quantize = |c: f32| (256.0 * linear_to_gamma(c * scale).clamp(0.0, 0.999)) as u8;
    [quantize(sum.x), quantize(sum.y), quantize(sum.z)]
}
