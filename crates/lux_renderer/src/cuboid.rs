//! Closed axis-aligned box built from six rectangles.

use crate::{AaRect, HitRecord, Hittable, HittableList, Material, Ray};
use lux_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Axis-aligned rectangular prism. Named to stay clear of `std::boxed::Box`.
pub struct Cuboid {
    sides: HittableList,
    bbox: Aabb,
}

impl Cuboid {
    /// Box spanning two opposite corners, given in any order.
    pub fn new(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> Self {
        let min = a.min(b);
        let max = a.max(b);

        let mut sides = HittableList::new();
        sides.add(Arc::new(AaRect::xy(min.x, max.x, min.y, max.y, max.z, material.clone())));
        sides.add(Arc::new(AaRect::xy(min.x, max.x, min.y, max.y, min.z, material.clone())));
        sides.add(Arc::new(AaRect::xz(min.x, max.x, min.z, max.z, max.y, material.clone())));
        sides.add(Arc::new(AaRect::xz(min.x, max.x, min.z, max.z, min.y, material.clone())));
        sides.add(Arc::new(AaRect::yz(min.y, max.y, min.z, max.z, max.x, material.clone())));
        sides.add(Arc::new(AaRect::yz(min.y, max.y, min.z, max.z, min.x, material)));

        Self {
            sides,
            bbox: Aabb::from_points(min, max),
        }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.sides.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self, _time: Interval) -> Aabb {
        self.bbox
    }
}
