//! Axis-aligned rectangles.
//!
//! A rectangle lies in a plane of constant coordinate `k` along one axis and
//! spans a finite range on the other two. The outward normal points along
//! the positive constant axis.

use crate::sampling::gen_range_f32;
use crate::{HitRecord, Hittable, Material, Ray};
use lux_math::{Aabb, Interval, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Orientation of an axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RectPlane {
    /// Spans X and Y at constant Z
    Xy,
    /// Spans X and Z at constant Y
    Xz,
    /// Spans Y and Z at constant X
    Yz,
}

impl RectPlane {
    /// (first spanned axis, second spanned axis, constant axis)
    fn axes(self) -> (usize, usize, usize) {
        match self {
            RectPlane::Xy => (0, 1, 2),
            RectPlane::Xz => (0, 2, 1),
            RectPlane::Yz => (1, 2, 0),
        }
    }
}

/// Padding applied along the constant axis so the box has thickness.
const PLANE_PADDING: f32 = 0.0001;

/// An axis-aligned rectangle.
pub struct AaRect {
    plane: RectPlane,
    /// Extent along the first spanned axis
    a: Interval,
    /// Extent along the second spanned axis
    b: Interval,
    k: f32,
    material: Arc<dyn Material>,
}

impl AaRect {
    pub fn new(plane: RectPlane, a: Interval, b: Interval, k: f32, material: Arc<dyn Material>) -> Self {
        Self {
            plane,
            a,
            b,
            k,
            material,
        }
    }

    /// Rectangle `[x0, x1] x [y0, y1]` at `z = k`.
    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(RectPlane::Xy, Interval::new(x0, x1), Interval::new(y0, y1), k, material)
    }

    /// Rectangle `[x0, x1] x [z0, z1]` at `y = k`.
    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(RectPlane::Xz, Interval::new(x0, x1), Interval::new(z0, z1), k, material)
    }

    /// Rectangle `[y0, y1] x [z0, z1]` at `x = k`.
    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: Arc<dyn Material>) -> Self {
        Self::new(RectPlane::Yz, Interval::new(y0, y1), Interval::new(z0, z1), k, material)
    }

    pub fn plane(&self) -> RectPlane {
        self.plane
    }

    pub fn area(&self) -> f32 {
        self.a.size() * self.b.size()
    }

    fn outward_normal(&self) -> Vec3 {
        let (_, _, axis_k) = self.plane.axes();
        let mut n = Vec3::ZERO;
        n[axis_k] = 1.0;
        n
    }
}

impl Hittable for AaRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (axis_a, axis_b, axis_k) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        // Parallel to the plane
        if direction[axis_k] == 0.0 {
            return None;
        }

        let t = (self.k - origin[axis_k]) / direction[axis_k];
        if !ray_t.surrounds(t) {
            return None;
        }

        let pa = origin[axis_a] + t * direction[axis_a];
        let pb = origin[axis_b] + t * direction[axis_b];
        if !self.a.contains(pa) || !self.b.contains(pb) {
            return None;
        }

        let uv = (
            (pa - self.a.min) / self.a.size(),
            (pb - self.b.min) / self.b.size(),
        );
        Some(HitRecord::new(
            ray,
            t,
            self.outward_normal(),
            self.material.as_ref(),
            uv,
        ))
    }

    fn bounding_box(&self, _time: Interval) -> Aabb {
        let (axis_a, axis_b, axis_k) = self.plane.axes();
        let mut lo = Vec3::ZERO;
        let mut hi = Vec3::ZERO;
        lo[axis_a] = self.a.min;
        hi[axis_a] = self.a.max;
        lo[axis_b] = self.b.min;
        hi[axis_b] = self.b.max;
        lo[axis_k] = self.k - PLANE_PADDING;
        hi[axis_k] = self.k + PLANE_PADDING;
        Aabb::from_points(lo, hi)
    }

    /// Solid-angle density `distance^2 / (|cos| * area)` for directions that
    /// land on the rectangle, zero otherwise.
    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        let probe = Ray::new(origin, direction, 0.0);
        let Some(rec) = self.hit(&probe, Interval::new(0.001, f32::INFINITY), rng) else {
            return 0.0;
        };

        let length_squared = direction.length_squared();
        let distance_squared = rec.t * rec.t * length_squared;
        let cosine = (direction.dot(rec.normal) / length_squared.sqrt()).abs();
        let denominator = cosine * self.area();
        if denominator <= 0.0 {
            return 0.0;
        }

        distance_squared / denominator
    }

    /// Direction from `origin` to a uniformly chosen point on the rectangle.
    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let (axis_a, axis_b, axis_k) = self.plane.axes();
        let mut point = Vec3::ZERO;
        point[axis_a] = gen_range_f32(rng, self.a.min, self.a.max);
        point[axis_b] = gen_range_f32(rng, self.b.min, self.b.max);
        point[axis_k] = self.k;
        point - origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::DiffuseLight;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn light() -> Arc<dyn Material> {
        Arc::new(DiffuseLight::from_color(Vec3::splat(15.0)))
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_xy_rect_hit_and_uv() {
        let mut rng = StdRng::seed_from_u64(0);
        let rect = AaRect::xy(0.0, 2.0, 0.0, 4.0, -3.0, light());
        let ray = Ray::new(Vec3::new(0.5, 3.0, 0.0), -Vec3::Z, 0.0);

        let rec = rect.hit(&ray, forward(), &mut rng).expect("should hit");
        assert!((rec.t - 3.0).abs() < 1e-6);
        assert!((rec.u - 0.25).abs() < 1e-6);
        assert!((rec.v - 0.75).abs() < 1e-6);
        // Ray travels along -Z, outward normal is +Z
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_rect_rejects_outside_extent_and_interval() {
        let mut rng = StdRng::seed_from_u64(0);
        let rect = AaRect::xz(0.0, 1.0, 0.0, 1.0, 2.0, light());

        let outside = Ray::new(Vec3::new(1.5, 0.0, 0.5), Vec3::Y, 0.0);
        assert!(rect.hit(&outside, forward(), &mut rng).is_none());

        let short = Ray::new(Vec3::new(0.5, 0.0, 0.5), Vec3::Y, 0.0);
        assert!(rect.hit(&short, Interval::new(0.001, 1.5), &mut rng).is_none());

        let parallel = Ray::new(Vec3::new(0.5, 0.0, 0.5), Vec3::X, 0.0);
        assert!(rect.hit(&parallel, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_yz_rect_back_face() {
        let mut rng = StdRng::seed_from_u64(0);
        let rect = AaRect::yz(0.0, 1.0, 0.0, 1.0, 5.0, light());
        let ray = Ray::new(Vec3::new(0.0, 0.5, 0.5), Vec3::X, 0.0);

        let rec = rect.hit(&ray, forward(), &mut rng).expect("should hit");
        assert!(!rec.front_face);
        assert_eq!(rec.normal, -Vec3::X);
    }

    #[test]
    fn test_rect_box_is_padded() {
        let rect = AaRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, light());
        let bbox = rect.bounding_box(Interval::new(0.0, 1.0));

        assert_eq!(bbox.x, Interval::new(213.0, 343.0));
        assert_eq!(bbox.z, Interval::new(227.0, 332.0));
        assert!(bbox.y.min < 554.0 && bbox.y.max > 554.0);
        assert!(bbox.y.size() > 0.0);
    }

    #[test]
    fn test_rect_pdf_value() {
        let mut rng = StdRng::seed_from_u64(0);
        let rect = AaRect::xz(-1.0, 1.0, -1.0, 1.0, 10.0, light());

        // Straight up: distance 10, cosine 1, area 4
        let pdf = rect.pdf_value(Vec3::ZERO, Vec3::Y, &mut rng);
        assert!((pdf - 25.0).abs() < 1e-3);

        // Scaling the direction does not change the density
        let scaled = rect.pdf_value(Vec3::ZERO, Vec3::Y * 7.0, &mut rng);
        assert!((scaled - pdf).abs() < 1e-3);

        assert_eq!(rect.pdf_value(Vec3::ZERO, Vec3::X, &mut rng), 0.0);
    }

    #[test]
    fn test_rect_random_lands_on_surface() {
        let mut rng = StdRng::seed_from_u64(41);
        let rect = AaRect::xz(213.0, 343.0, 227.0, 332.0, 554.0, light());
        let origin = Vec3::new(278.0, 100.0, 278.0);

        for _ in 0..500 {
            let direction = rect.random(origin, &mut rng);
            let target = origin + direction;
            assert!((target.y - 554.0).abs() < 1e-3);
            assert!(rect.pdf_value(origin, direction, &mut rng) > 0.0);
        }
    }
}
