//! Core path tracing integrator.
//!
//! Implements Monte Carlo path tracing with:
//! - An iterative bounce loop with a hard depth cutoff
//! - Optional light importance sampling through a fixed 0.3 / 0.7 mixture
//! - Constant-color or sky-gradient backgrounds

use crate::pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf};
use crate::{Camera, Color, Hittable, Ray};
use lux_math::Interval;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Closest ray parameter accepted for a hit; keeps bounced rays off the
/// surface they left.
pub const T_MIN: f32 = 0.001;

/// What a ray sees when it leaves the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// A constant color
    Solid(Color),
    /// White at the horizon blending to sky blue overhead
    Sky,
}

impl Background {
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::Sky => sky_gradient(ray),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Radiance for rays that hit nothing
    pub background: Background,
    /// Base seed; each bucket derives its own generator from it
    pub seed: u64,
    /// Edge length of a square render bucket in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::default(),
            seed: 0,
            bucket_size: crate::DEFAULT_BUCKET_SIZE,
        }
    }
}

/// A built scene: the object hierarchy plus the objects to sample as lights.
///
/// Both are read-only once rendering starts.
#[derive(Clone)]
pub struct Scene {
    pub world: Arc<dyn Hittable>,
    pub lights: Option<Arc<dyn Hittable>>,
}

impl Scene {
    /// Scene without light sampling.
    pub fn new(world: Arc<dyn Hittable>) -> Self {
        Self {
            world,
            lights: None,
        }
    }

    pub fn with_lights(mut self, lights: Arc<dyn Hittable>) -> Self {
        self.lights = Some(lights);
        self
    }

    /// Radiance along `ray`, sampling lights when the scene has any.
    pub fn ray_color(
        &self,
        ray: &Ray,
        background: &Background,
        max_depth: u32,
        rng: &mut dyn RngCore,
    ) -> Color {
        trace(
            ray,
            self.world.as_ref(),
            self.lights.as_deref(),
            background,
            max_depth,
            rng,
        )
    }
}

/// Compute the color seen by a ray, following each material's own sampling.
pub fn ray_color(
    ray: &Ray,
    world: &dyn Hittable,
    background: &Background,
    max_depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    trace(ray, world, None, background, max_depth, rng)
}

/// Compute the color seen by a ray, sending part of each diffuse bounce
/// toward `lights`.
pub fn ray_color_with_lights(
    ray: &Ray,
    world: &dyn Hittable,
    lights: &dyn Hittable,
    background: &Background,
    max_depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    trace(ray, world, Some(lights), background, max_depth, rng)
}

/// Shared bounce loop.
///
/// `throughput` carries the product of path weights so far; each vertex adds
/// its emission scaled by it. After `max_depth` vertices the path
/// contributes nothing further.
fn trace(
    ray: &Ray,
    world: &dyn Hittable,
    lights: Option<&dyn Hittable>,
    background: &Background,
    max_depth: u32,
    rng: &mut dyn RngCore,
) -> Color {
    let mut radiance = Color::ZERO;
    let mut throughput = Color::ONE;
    let mut ray = *ray;

    for _ in 0..max_depth {
        let Some(rec) = world.hit(&ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
            return radiance + throughput * background.color(&ray);
        };

        radiance += throughput * rec.material.emitted(&rec, rec.u, rec.v, rec.p);

        let Some(scatter) = rec.material.scatter(&ray, &rec, rng) else {
            return radiance;
        };

        let Some(material_pdf) = scatter.pdf else {
            // Specular and phase-function lobes are followed as sampled
            throughput *= scatter.attenuation;
            ray = scatter.scattered;
            continue;
        };

        let (scattered, pdf) = match lights {
            Some(lights) => {
                let mixture =
                    MixturePdf::new(HittablePdf::new(lights, rec.p), CosinePdf::new(rec.normal));
                let scattered = Ray::new(rec.p, mixture.generate(rng), ray.time());
                let pdf = mixture.value(scattered.direction(), rng);
                (scattered, pdf)
            }
            None => (scatter.scattered, material_pdf),
        };

        // A zero, negative or non-finite density carries no usable estimate
        if !(pdf > 0.0 && pdf.is_finite()) {
            return radiance;
        }

        let scattering_pdf = rec.material.scattering_pdf(&ray, &rec, &scattered);
        throughput *= scatter.attenuation * scattering_pdf / pdf;
        if throughput == Color::ZERO {
            return radiance;
        }
        ray = scattered;
    }

    radiance
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Sum of `config.samples_per_pixel` radiance samples for pixel (x, y).
///
/// Averaging and tone mapping belong to the image sink.
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += scene.ray_color(&ray, &config.background, config.max_depth, rng);
    }

    pixel_color
}
