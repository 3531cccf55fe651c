//! Procedural and image-backed textures consulted by materials.

use crate::perlin::Perlin;
use crate::Color;
use lux_math::{Interval, Vec3};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while building an image texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGB")]
    BufferSize {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A color as a pure function of surface coordinates and position.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// Constant color.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    color: Color,
}

impl SolidColor {
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(Color::new(r, g, b))
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        self.color
    }
}

/// 3D checker pattern alternating between two child textures.
pub struct CheckerTexture {
    odd: Arc<dyn Texture>,
    even: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(odd: Arc<dyn Texture>, even: Arc<dyn Texture>) -> Self {
        Self { odd, even }
    }

    pub fn from_colors(odd: Color, even: Color) -> Self {
        Self::new(
            Arc::new(SolidColor::new(odd)),
            Arc::new(SolidColor::new(even)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        let sines = (10.0 * p.x).sin() * (10.0 * p.y).sin() * (10.0 * p.z).sin();
        if sines < 0.0 {
            self.odd.value(u, v, p)
        } else {
            self.even.value(u, v, p)
        }
    }
}

/// Marble-like pattern from a shared Perlin field.
pub struct NoiseTexture {
    noise: Arc<Perlin>,
    scale: f32,
}

impl NoiseTexture {
    /// Number of octaves summed by the turbulence term.
    const TURBULENCE_DEPTH: usize = 7;

    pub fn new(noise: Arc<Perlin>, scale: f32) -> Self {
        Self { noise, scale }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let phase = self.scale * p.z + 10.0 * self.noise.turb(p, Self::TURBULENCE_DEPTH);
        Color::ONE * 0.5 * (1.0 + phase.sin())
    }
}

/// Nearest-neighbour lookup into a decoded 8-bit RGB buffer.
///
/// (0, 0) is the bottom-left corner of the image.
#[derive(Clone, Debug)]
pub struct ImageTexture {
    width: u32,
    height: u32,
    /// Row-major RGB bytes, top row first
    data: Vec<u8>,
}

impl ImageTexture {
    const BYTES_PER_PIXEL: usize = 3;
    const COLOR_SCALE: f32 = 1.0 / 255.0;

    /// Wrap an RGB buffer of `width * height * 3` bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> TextureResult<Self> {
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(TextureError::BufferSize {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A texture with no pixels. Samples as solid cyan.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            data: Vec::new(),
        }
    }

    /// Decode an image file into an RGB texture.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);

        Self::new(width, height, rgb.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, _p: Vec3) -> Color {
        if self.data.is_empty() {
            return Color::new(0.0, 1.0, 1.0);
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        // Flip V to image coordinates
        let v = 1.0 - unit.clamp(v);

        let i = ((u * self.width as f32) as u32).min(self.width - 1) as usize;
        let j = ((v * self.height as f32) as u32).min(self.height - 1) as usize;

        let offset = (j * self.width as usize + i) * Self::BYTES_PER_PIXEL;
        let pixel = &self.data[offset..offset + Self::BYTES_PER_PIXEL];

        Color::new(
            pixel[0] as f32 * Self::COLOR_SCALE,
            pixel[1] as f32 * Self::COLOR_SCALE,
            pixel[2] as f32 * Self::COLOR_SCALE,
        )
    }
}
