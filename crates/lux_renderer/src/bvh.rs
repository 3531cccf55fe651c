//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared scene objects. Each build picks a random split
//! axis, orders the objects by the low edge of their boxes along it, and
//! halves the list.

use crate::{HitRecord, Hittable, HittableList, Ray};
use lux_math::{Aabb, Interval};
use rand::{Rng, RngCore};
use std::cmp::Ordering;
use std::sync::Arc;

/// BVH node - a branch with two children, a leaf holding one object, or empty.
pub enum BvhNode {
    /// Internal node. Children are other nodes or plain scene objects.
    Branch {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// A single object. Stored once so stochastic objects (media) are
    /// tested once per query.
    Leaf { object: Arc<dyn Hittable>, bbox: Aabb },
    /// No objects; never hit.
    Empty,
}

impl BvhNode {
    /// Build a BVH over `objects`, using their boxes over `time`.
    pub fn new(objects: Vec<Arc<dyn Hittable>>, time: Interval, rng: &mut dyn RngCore) -> Self {
        let count = objects.len();
        let node = if objects.is_empty() {
            BvhNode::Empty
        } else {
            Self::build(objects, time, rng)
        };

        log::debug!("Built BVH over {} objects", count);
        node
    }

    pub fn from_list(list: HittableList, time: Interval, rng: &mut dyn RngCore) -> Self {
        Self::new(list.into_objects(), time, rng)
    }

    fn build(objects: Vec<Arc<dyn Hittable>>, time: Interval, rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);

        // Compute sort keys once rather than per comparison
        let mut keyed: Vec<(f32, Arc<dyn Hittable>)> = objects
            .into_iter()
            .map(|object| (object.bounding_box(time).axis_interval(axis).min, object))
            .collect();
        keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
        let mut objects: Vec<Arc<dyn Hittable>> =
            keyed.into_iter().map(|(_, object)| object).collect();

        match objects.len() {
            0 => BvhNode::Empty,
            1 => {
                let object = objects.swap_remove(0);
                let bbox = object.bounding_box(time);
                BvhNode::Leaf { object, bbox }
            }
            2 => {
                let right = objects.swap_remove(1);
                let left = objects.swap_remove(0);
                Self::branch(left, right, time)
            }
            n => {
                let right_objects = objects.split_off(n / 2);
                let left: Arc<dyn Hittable> = Arc::new(Self::build(objects, time, rng));
                let right: Arc<dyn Hittable> = Arc::new(Self::build(right_objects, time, rng));
                Self::branch(left, right, time)
            }
        }
    }

    fn branch(left: Arc<dyn Hittable>, right: Arc<dyn Hittable>, time: Interval) -> Self {
        let bbox = Aabb::surrounding(&left.bounding_box(time), &right.bounding_box(time));
        BvhNode::Branch { left, right, bbox }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { object, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }
                object.hit(ray, ray_t, rng)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to closest hit
                let right_max = hit_left.map_or(ray_t.max, |rec| rec.t);
                let hit_right = right.hit(ray, Interval::new(ray_t.min, right_max), rng);

                hit_right.or(hit_left)
            }
        }
    }

    fn bounding_box(&self, _time: Interval) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
