//! Instancing decorators: translation, rotation about Y, and face flipping.
//!
//! Each wraps a shared object, moves the ray into the object's frame, and
//! maps the resulting hit back to world space.

use crate::{HitRecord, Hittable, Ray};
use lux_math::{Aabb, Interval, Mat3, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// An object displaced by a fixed offset.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        Self { object, offset }
    }

    pub fn offset(&self) -> Vec3 {
        self.offset
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let offset_ray = ray.with_origin(ray.origin() - self.offset);
        self.object
            .hit(&offset_ray, ray_t, rng)
            .map(|rec| HitRecord {
                p: rec.p + self.offset,
                ..rec
            })
    }

    fn bounding_box(&self, time: Interval) -> Aabb {
        self.object.bounding_box(time).translate(self.offset)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.object.pdf_value(origin - self.offset, direction, rng)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin - self.offset, rng)
    }
}

/// An object rotated about the Y axis through the origin.
pub struct RotateY {
    object: Arc<dyn Hittable>,
    /// World to object space
    to_object: Mat3,
    /// Object to world space
    to_world: Mat3,
}

impl RotateY {
    /// Rotate `object` counter-clockwise (seen from +Y) by `degrees`.
    pub fn new(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        let radians = degrees.to_radians();
        Self {
            object,
            to_object: Mat3::from_rotation_y(-radians),
            to_world: Mat3::from_rotation_y(radians),
        }
    }
}

impl Hittable for RotateY {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let rotated = Ray::new(
            self.to_object * ray.origin(),
            self.to_object * ray.direction(),
            ray.time(),
        );

        // Rotation preserves the sign of dot(direction, normal), so the
        // face orientation found in object space still holds.
        self.object.hit(&rotated, ray_t, rng).map(|rec| HitRecord {
            p: self.to_world * rec.p,
            normal: self.to_world * rec.normal,
            ..rec
        })
    }

    fn bounding_box(&self, time: Interval) -> Aabb {
        let bbox = self.object.bounding_box(time);
        if bbox.is_empty() {
            return Aabb::EMPTY;
        }
        if !bbox.min().is_finite() || !bbox.max().is_finite() {
            return Aabb::UNIVERSE;
        }
        bbox.map_corners(|p| self.to_world * p)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.object
            .pdf_value(self.to_object * origin, self.to_object * direction, rng)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.to_world * self.object.random(self.to_object * origin, rng)
    }
}

/// Reports the opposite face orientation for every hit on the wrapped object.
///
/// Used to turn one-sided emitters around without moving geometry.
pub struct FlipFace {
    object: Arc<dyn Hittable>,
}

impl FlipFace {
    pub fn new(object: Arc<dyn Hittable>) -> Self {
        Self { object }
    }
}

impl Hittable for FlipFace {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.object.hit(ray, ray_t, rng).map(|rec| HitRecord {
            front_face: !rec.front_face,
            ..rec
        })
    }

    fn bounding_box(&self, time: Interval) -> Aabb {
        self.object.bounding_box(time)
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        self.object.pdf_value(origin, direction, rng)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin, rng)
    }
}
