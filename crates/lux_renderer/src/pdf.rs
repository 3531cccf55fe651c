//! Direction sampling densities used by the light-sampling integrator.

use crate::sampling::{gen_f32, random_cosine_direction};
use crate::Hittable;
use lux_math::{Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;

/// A probability density over directions, paired with a sampler for it.
pub trait Pdf {
    /// Density of `direction` in solid angle.
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32;

    /// Draw a direction distributed according to [`Pdf::value`].
    fn generate(&self, rng: &mut dyn RngCore) -> Vec3;
}

/// Cosine-weighted hemisphere around a normal.
pub struct CosinePdf {
    uvw: Onb,
}

impl CosinePdf {
    pub fn new(w: Vec3) -> Self {
        Self {
            uvw: Onb::from_w(w),
        }
    }
}

impl Pdf for CosinePdf {
    fn value(&self, direction: Vec3, _rng: &mut dyn RngCore) -> f32 {
        let cosine = direction.normalize_or_zero().dot(self.uvw.w());
        if cosine <= 0.0 {
            0.0
        } else {
            cosine / PI
        }
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.uvw.local(random_cosine_direction(rng))
    }
}

/// Directions from a fixed origin toward an object, usually a light.
pub struct HittablePdf<'a> {
    object: &'a dyn Hittable,
    origin: Vec3,
}

impl<'a> HittablePdf<'a> {
    pub fn new(object: &'a dyn Hittable, origin: Vec3) -> Self {
        Self { object, origin }
    }
}

impl Pdf for HittablePdf<'_> {
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.object.pdf_value(self.origin, direction, rng)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(self.origin, rng)
    }
}

/// Fixed-weight blend of two densities.
///
/// A plain mixture: `p0` is chosen with probability [`MixturePdf::WEIGHT`]
/// and the density is the matching weighted sum. No balance heuristic.
pub struct MixturePdf<A, B> {
    p0: A,
    p1: B,
}

impl<A: Pdf, B: Pdf> MixturePdf<A, B> {
    /// Probability of sampling from `p0`.
    pub const WEIGHT: f32 = 0.3;

    pub fn new(p0: A, p1: B) -> Self {
        Self { p0, p1 }
    }
}

impl<A: Pdf, B: Pdf> Pdf for MixturePdf<A, B> {
    fn value(&self, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        Self::WEIGHT * self.p0.value(direction, rng)
            + (1.0 - Self::WEIGHT) * self.p1.value(direction, rng)
    }

    fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        if gen_f32(rng) < Self::WEIGHT {
            self.p0.generate(rng)
        } else {
            self.p1.generate(rng)
        }
    }
}
