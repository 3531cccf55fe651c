use crate::Vec3;

/// A ray with origin, direction, and time.
///
/// The direction is not normalized; primitives and media rely on its length
/// to convert between ray parameter and distance. The time lies in the camera
/// shutter interval and drives motion blur.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    origin: Vec3,
    direction: Vec3,
    time: f32,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }

    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Point along the ray: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// Same direction and time, different origin.
    #[inline]
    pub fn with_origin(&self, origin: Vec3) -> Self {
        Self::new(origin, self.direction, self.time)
    }
}
