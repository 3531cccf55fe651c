//! Lux renderer - CPU Monte Carlo path tracing
//!
//! A physically based path tracer for analytic scenes: spheres, axis-aligned
//! rectangles and boxes, instancing transforms, and homogeneous media, lit by
//! emissive surfaces or a background. Diffuse bounces can be steered toward
//! designated lights through a fixed-weight mixture density.
//!
//! Scenes are immutable once built and shared across rayon workers; every
//! random draw comes from a generator passed in by the caller.

mod aarect;
mod bucket;
mod bvh;
mod camera;
mod cuboid;
mod hittable;
mod image_buffer;
mod material;
mod medium;
mod pdf;
mod perlin;
mod renderer;
pub mod sampling;
mod sphere;
mod texture;
mod transform;

pub use aarect::{AaRect, RectPlane};
pub use bucket::{
    bucket_rng, generate_buckets, render, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE,
};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use cuboid::Cuboid;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use image_buffer::{color_to_rgb8, linear_to_gamma, ImageBuffer, OutputError};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult,
};
pub use medium::ConstantMedium;
pub use pdf::{CosinePdf, HittablePdf, MixturePdf, Pdf};
pub use perlin::Perlin;
pub use renderer::{
    ray_color, ray_color_with_lights, render_pixel, Background, RenderConfig, Scene, T_MIN,
};
pub use sphere::{MovingSphere, Sphere};
pub use texture::{
    CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture, TextureError, TextureResult,
};
pub use transform::{FlipFace, RotateY, Translate};

/// Re-export Vec3 and common math types from lux_math
pub use lux_math::{Aabb, Interval, Onb, Ray, Vec3};
