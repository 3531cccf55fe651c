//! Sphere primitives for ray tracing.

use crate::sampling::random_to_sphere;
use crate::{HitRecord, Hittable, Material, Ray};
use lux_math::{Aabb, Interval, Onb, Vec3};
use rand::RngCore;
use std::f32::consts::PI;
use std::sync::Arc;

/// A static sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are clamped to zero.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(self.center, self.radius, self.material.as_ref(), ray, ray_t)
    }

    fn bounding_box(&self, _time: Interval) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Vec3, direction: Vec3, rng: &mut dyn RngCore) -> f32 {
        let probe = Ray::new(origin, direction, 0.0);
        if self
            .hit(&probe, Interval::new(0.001, f32::INFINITY), rng)
            .is_none()
        {
            return 0.0;
        }

        let distance_squared = (self.center - origin).length_squared();
        let ratio = self.radius * self.radius / distance_squared;
        if ratio >= 1.0 {
            // Origin inside the sphere: directions are drawn uniformly
            return 1.0 / (4.0 * PI);
        }

        let cos_theta_max = (1.0 - ratio).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);
        1.0 / solid_angle
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        if distance_squared <= self.radius * self.radius {
            return crate::sampling::random_unit_vector(rng);
        }

        let uvw = Onb::from_w(direction);
        uvw.local(random_to_sphere(rng, self.radius, distance_squared))
    }
}

/// A sphere whose center moves linearly over the shutter interval.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<dyn Material>,
}

impl MovingSphere {
    /// Sphere at `center0` at `time0`, moving to `center1` by `time1`.
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius: radius.max(0.0),
            material,
        }
    }

    /// Center at `time`. A zero-length interval pins it to `center0`.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span == 0.0 {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        hit_sphere(
            self.center(ray.time()),
            self.radius,
            self.material.as_ref(),
            ray,
            ray_t,
        )
    }

    /// Union of the boxes at both ends of `time`.
    fn bounding_box(&self, time: Interval) -> Aabb {
        let rvec = Vec3::splat(self.radius);
        let c0 = self.center(time.min);
        let c1 = self.center(time.max);
        let box0 = Aabb::from_points(c0 - rvec, c0 + rvec);
        let box1 = Aabb::from_points(c1 - rvec, c1 + rvec);
        Aabb::surrounding(&box0, &box1)
    }
}

/// Shared ray-sphere intersection. Tests the near root, then the far one.
fn hit_sphere<'a>(
    center: Vec3,
    radius: f32,
    material: &'a dyn Material,
    ray: &Ray,
    ray_t: Interval,
) -> Option<HitRecord<'a>> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 || a == 0.0 || radius == 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    // Find the nearest root in the acceptable range
    let mut root = (h - sqrtd) / a;
    if !ray_t.surrounds(root) {
        root = (h + sqrtd) / a;
        if !ray_t.surrounds(root) {
            return None;
        }
    }

    let outward_normal = (ray.at(root) - center) / radius;
    Some(HitRecord::new(
        ray,
        root,
        outward_normal,
        material,
        sphere_uv(outward_normal),
    ))
}

/// UV coordinates for a point on the unit sphere centered at the origin.
///
/// u follows the azimuth around Y starting from -X, v runs from the south
/// pole (0) to the north pole (1).
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let phi = p.z.atan2(p.x);
    let theta = p.y.clamp(-1.0, 1.0).asin();

    let u = 1.0 - (phi + PI) / (2.0 * PI);
    let v = (theta + PI / 2.0) / PI;
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::from_color(Vec3::splat(0.5)))
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_sphere_hit() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 0.0);
        let rec = sphere.hit(&ray, forward(), &mut rng).expect("should hit");

        assert!((rec.t - 0.5).abs() < 0.001);
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0), 0.0);
        assert!(sphere.hit(&ray, forward(), &mut rng).is_none());
    }

    #[test]
    fn test_sphere_hit_through_center_from_outside() {
        let mut rng = StdRng::seed_from_u64(31);

        for _ in 0..1000 {
            let center = Vec3::new(
                rng.gen_range(-10.0f32..10.0),
                rng.gen_range(-10.0f32..10.0),
                rng.gen_range(-10.0f32..10.0),
            );
            let radius: f32 = rng.gen_range(0.1..3.0);
            let sphere = Sphere::new(center, radius, grey());

            let offset = crate::sampling::random_unit_vector(&mut rng)
                * (radius + rng.gen_range(0.5f32..20.0));
            let origin = center + offset;
            let direction = (center - origin) * rng.gen_range(0.2f32..4.0);
            let ray = Ray::new(origin, direction, 0.0);

            let rec = sphere.hit(&ray, forward(), &mut rng).expect("should hit");
            assert!(rec.t > 0.0);
            let radial = (rec.p - center).normalize();
            assert!(rec.normal.cross(radial).length() < 1e-3);
            assert!(rec.front_face);
        }
    }

    #[test]
    fn test_sphere_hit_from_inside_uses_far_root() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere = Sphere::new(Vec3::ZERO, 2.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        let rec = sphere.hit(&ray, forward(), &mut rng).expect("should hit");
        assert!((rec.t - 2.0).abs() < 1e-5);
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_sphere_uv_poles_and_seam() {
        let (_, v_north) = sphere_uv(Vec3::Y);
        let (_, v_south) = sphere_uv(-Vec3::Y);
        assert!((v_north - 1.0).abs() < 1e-6);
        assert!(v_south.abs() < 1e-6);

        let (u, v) = sphere_uv(Vec3::X);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);

        let (u, _) = sphere_uv(Vec3::Z);
        assert!((u - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_moving_sphere_center_and_box() {
        let sphere = MovingSphere::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.0, 1.0, 0.5, grey());

        assert_eq!(sphere.center(0.5), Vec3::new(0.0, 1.0, 0.0));

        let bbox = sphere.bounding_box(Interval::new(0.0, 1.0));
        assert_eq!(bbox.min(), Vec3::new(-0.5, -0.5, -0.5));
        assert_eq!(bbox.max(), Vec3::new(0.5, 2.5, 0.5));
    }

    #[test]
    fn test_moving_sphere_hit_depends_on_time() {
        let mut rng = StdRng::seed_from_u64(0);
        let sphere = MovingSphere::new(Vec3::ZERO, Vec3::new(0.0, 2.0, 0.0), 0.0, 1.0, 0.5, grey());

        let early = Ray::new(Vec3::new(0.0, 2.0, 5.0), -Vec3::Z, 0.0);
        let late = Ray::new(Vec3::new(0.0, 2.0, 5.0), -Vec3::Z, 1.0);

        assert!(sphere.hit(&early, forward(), &mut rng).is_none());
        let rec = sphere.hit(&late, forward(), &mut rng).expect("should hit");
        assert!((rec.t - 4.5).abs() < 1e-4);
    }

    #[test]
    fn test_moving_sphere_zero_shutter() {
        let sphere = MovingSphere::new(Vec3::ZERO, Vec3::ONE, 0.5, 0.5, 1.0, grey());
        assert_eq!(sphere.center(0.9), Vec3::ZERO);
    }

    #[test]
    fn test_sphere_light_pdf_matches_cone() {
        let mut rng = StdRng::seed_from_u64(32);
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, grey());
        let origin = Vec3::ZERO;

        let cos_theta_max = (1.0f32 - 1.0 / 100.0).sqrt();
        let expected = 1.0 / (2.0 * PI * (1.0 - cos_theta_max));

        for _ in 0..200 {
            let direction = sphere.random(origin, &mut rng);
            let pdf = sphere.pdf_value(origin, direction, &mut rng);
            assert!((pdf - expected).abs() / expected < 1e-3);
        }

        assert_eq!(sphere.pdf_value(origin, Vec3::Z, &mut rng), 0.0);
    }
}
