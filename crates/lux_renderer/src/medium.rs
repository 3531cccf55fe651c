//! Homogeneous participating media (fog, smoke).

use crate::sampling::gen_f32;
use crate::texture::Texture;
use crate::{Color, HitRecord, Hittable, Isotropic, Ray};
use lux_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Offset past the entry point when searching for the exit point.
const EXIT_EPSILON: f32 = 0.0001;

/// A constant-density volume filling a convex boundary object.
///
/// A ray passing through scatters at an exponentially distributed distance.
/// Scattering is isotropic, driven by the phase function's albedo.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    density: f32,
    neg_inv_density: f32,
    phase_function: Isotropic,
}

impl ConstantMedium {
    /// A density of zero or less gives a medium that never scatters.
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Arc<dyn Texture>) -> Self {
        if !(density > 0.0) {
            log::warn!(
                "Constant medium density {} is not positive; the volume will be transparent",
                density
            );
        }

        Self {
            boundary,
            density,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo),
        }
    }

    pub fn from_color(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> Self {
        Self::new(
            boundary,
            density,
            Arc::new(crate::texture::SolidColor::new(albedo)),
        )
    }

    pub fn density(&self) -> f32 {
        self.density
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        if !(self.density > 0.0) {
            return None;
        }

        // Entry and exit are searched without the caller's bounds so that
        // rays starting inside the volume still find both crossings.
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self.boundary.hit(
            ray,
            Interval::new(entry.t + EXIT_EPSILON, f32::INFINITY),
            rng,
        )?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();
        if hit_distance > distance_inside {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            // Arbitrary; the phase function ignores it
            normal: Vec3::X,
            material: &self.phase_function,
            u: 0.0,
            v: 0.0,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self, time: Interval) -> Aabb {
        self.boundary.bounding_box(time)
    }
}
