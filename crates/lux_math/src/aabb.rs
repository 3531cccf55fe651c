use crate::{Interval, Ray, Vec3};

/// Minimum extent of a box along any axis. Planar primitives produce
/// zero-thickness boxes that are padded to this.
const MIN_EXTENT: f32 = 0.0001;

/// Axis-Aligned Bounding Box used by the BVH.
///
/// Stored as one interval per axis; `min()`/`max()` give the corner points.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// A box containing nothing. Identity element of [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };

    /// Create a box from three intervals, padding degenerate axes.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create a box from two opposite corners in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let lo = a.min(b);
        let hi = a.max(b);
        Self::new(
            Interval::new(lo.x, hi.x),
            Interval::new(lo.y, hi.y),
            Interval::new(lo.z, hi.z),
        )
    }

    /// Tightest box containing both boxes.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// True if the box encloses no point (any axis is empty).
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Interval along an axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, axis: usize) -> Interval {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Slab test: does the ray pass through the box for some `t` in `ray_t`?
    ///
    /// Near/far are swapped per axis for negative direction components. A zero
    /// component gives infinite slab bounds, which reject the ray unless its
    /// origin lies between the two planes. The test fails as soon as the
    /// running interval becomes empty or zero-width.
    pub fn hit(&self, ray: &Ray, mut ray_t: Interval) -> bool {
        let origin = ray.origin();
        let direction = ray.direction();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let inv_d = 1.0 / direction[axis];

            let mut t0 = (slab.min - origin[axis]) * inv_d;
            let mut t1 = (slab.max - origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            // f32::max/min drop a NaN operand, so an origin lying exactly on a
            // slab plane with a zero direction component leaves ray_t unchanged.
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// The same box moved by `offset`.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.offset(offset.x),
            self.y.offset(offset.y),
            self.z.offset(offset.z),
        )
    }

    /// The eight corner points.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Bounding box of the corners mapped through `f`.
    pub fn map_corners(&self, f: impl Fn(Vec3) -> Vec3) -> Aabb {
        let corners = self.corners().map(f);
        let lo = corners.iter().copied().fold(Vec3::INFINITY, Vec3::min);
        let hi = corners.iter().copied().fold(Vec3::NEG_INFINITY, Vec3::max);
        Aabb::from_points(lo, hi)
    }

    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_EXTENT {
            self.x = self.x.expand(MIN_EXTENT);
        }
        if self.y.size() < MIN_EXTENT {
            self.y = self.y.expand(MIN_EXTENT);
        }
        if self.z.size() < MIN_EXTENT {
            self.z = self.z.expand(MIN_EXTENT);
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Reference intersection: clip `ray_t` against each axis independently.
    fn brute_force_hit(aabb: &Aabb, ray: &Ray, ray_t: Interval) -> bool {
        let mut lo = ray_t.min;
        let mut hi = ray_t.max;
        for axis in 0..3 {
            let slab = aabb.axis_interval(axis);
            let o = ray.origin()[axis];
            let d = ray.direction()[axis];
            if d == 0.0 {
                if o < slab.min || o > slab.max {
                    return false;
                }
                continue;
            }
            let a = (slab.min - o) / d;
            let b = (slab.max - o) / d;
            lo = lo.max(a.min(b));
            hi = hi.min(a.max(b));
        }
        hi > lo
    }

    fn random_component(rng: &mut StdRng) -> f32 {
        // Zeros and negatives must both appear often
        match rng.gen_range(0..4) {
            0 => 0.0,
            1 => -0.0,
            _ => rng.gen_range(-2.0..2.0),
        }
    }

    #[test]
    fn test_aabb_from_points_orders_corners() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 10.0, -5.0));

        assert_eq!(aabb.min(), Vec3::new(0.0, 0.0, -5.0));
        assert_eq!(aabb.max(), Vec3::new(10.0, 10.0, 5.0));
    }

    #[test]
    fn test_aabb_pads_flat_axis() {
        let aabb = Aabb::from_points(Vec3::new(0.0, 0.0, 2.0), Vec3::new(1.0, 1.0, 2.0));

        assert!(aabb.z.size() > 0.0);
        assert!(aabb.z.contains(2.0));
        assert_eq!(aabb.x.size(), 1.0);
    }

    #[test]
    fn test_aabb_surrounding() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::splat(5.0));
        let b = Aabb::from_points(Vec3::splat(3.0), Vec3::new(10.0, 4.0, 4.0));
        let union = Aabb::surrounding(&a, &b);

        assert_eq!(union.min(), Vec3::ZERO);
        assert_eq!(union.max(), Vec3::new(10.0, 5.0, 5.0));
        assert_eq!(Aabb::surrounding(&Aabb::EMPTY, &a), a);
    }

    #[test]
    fn test_aabb_hit_basic() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = Interval::new(0.0, 100.0);

        let toward = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&toward, t));

        let away = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!aabb.hit(&away, t));

        let beside = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&beside, t));

        // Box lies beyond the allowed range
        assert!(!aabb.hit(&toward, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_hit_axis_parallel_ray() {
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let t = Interval::new(0.0, f32::INFINITY);

        let inside_slab = Ray::new(Vec3::new(0.5, -5.0, 0.5), Vec3::Y, 0.0);
        assert!(aabb.hit(&inside_slab, t));

        let outside_slab = Ray::new(Vec3::new(1.5, -5.0, 0.5), Vec3::Y, 0.0);
        assert!(!aabb.hit(&outside_slab, t));
    }

    #[test]
    fn test_aabb_hit_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20_000 {
            let a = Vec3::new(
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
                rng.gen_range(-3.0..3.0),
            );
            let b = a + Vec3::new(
                rng.gen_range(0.01..2.0),
                rng.gen_range(0.01..2.0),
                rng.gen_range(0.01..2.0),
            );
            let aabb = Aabb::from_points(a, b);

            let origin = Vec3::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            );
            let direction = Vec3::new(
                random_component(&mut rng),
                random_component(&mut rng),
                random_component(&mut rng),
            );
            if direction == Vec3::ZERO {
                continue;
            }
            let ray = Ray::new(origin, direction, 0.0);
            let t = Interval::new(rng.gen_range(-1.0..0.5), rng.gen_range(0.5..20.0));

            assert_eq!(
                aabb.hit(&ray, t),
                brute_force_hit(&aabb, &ray, t),
                "box {:?} ray {:?} interval {:?}",
                aabb,
                ray,
                t
            );
        }
    }

    #[test]
    fn test_aabb_map_corners() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let swapped = aabb.map_corners(|p| Vec3::new(p.z, p.y, -p.x));

        assert_eq!(swapped.min(), Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(swapped.max(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_aabb_translate() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE).translate(Vec3::new(5.0, -1.0, 0.0));

        assert_eq!(aabb.min(), Vec3::new(5.0, -1.0, 0.0));
        assert_eq!(aabb.max(), Vec3::new(6.0, 0.0, 1.0));
    }
}
