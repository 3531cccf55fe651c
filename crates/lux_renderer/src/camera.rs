//! Camera for ray generation.

use crate::sampling::{gen_f32, gen_range_f32, random_in_unit_disk};
use crate::Ray;
use lux_math::Vec3;
use rand::RngCore;

/// Thin-lens camera with an open shutter interval.
///
/// Rays carry a time drawn uniformly from the shutter interval, which is what
/// moving objects are blurred over. Call [`Camera::initialize`] after the last
/// builder call and before generating rays.
#[derive(Clone, Debug)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view, degrees
    vfov: f32,
    /// Cone angle of rays through each pixel, degrees; zero is a pinhole
    defocus_angle: f32,
    /// Distance to the plane in perfect focus
    focus_dist: f32,

    time0: f32,
    time1: f32,

    frame: Frame,
}

/// Image plane and lens derived from the camera settings.
#[derive(Clone, Copy, Debug, Default)]
struct Frame {
    center: Vec3,
    pixel00: Vec3,
    pixel_du: Vec3,
    pixel_dv: Vec3,
    lens_u: Vec3,
    lens_v: Vec3,
}

impl Frame {
    fn new(camera: &Camera) -> Self {
        let w = (camera.look_from - camera.look_at).normalize();
        let u = camera.vup.cross(w).normalize();
        let v = w.cross(u);

        let half_height = (camera.vfov.to_radians() * 0.5).tan() * camera.focus_dist;
        let aspect = camera.image_width as f32 / camera.image_height as f32;
        let across = u * (2.0 * half_height * aspect);
        let down = -v * (2.0 * half_height);

        let pixel_du = across / camera.image_width as f32;
        let pixel_dv = down / camera.image_height as f32;
        let upper_left = camera.look_from - camera.focus_dist * w - 0.5 * (across + down);

        let lens_radius = camera.focus_dist * (camera.defocus_angle * 0.5).to_radians().tan();

        Self {
            center: camera.look_from,
            pixel00: upper_left + 0.5 * (pixel_du + pixel_dv),
            pixel_du,
            pixel_dv,
            lens_u: u * lens_radius,
            lens_v: v * lens_radius,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            vup: Vec3::Y,
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 1.0,
            frame: Frame::default(),
        }
    }

    /// Set image resolution; zero dimensions become one.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Set the shutter open and close times.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0;
        self.time1 = time1;
        self
    }

    /// Shutter open and close times.
    pub fn shutter(&self) -> (f32, f32) {
        (self.time0, self.time1)
    }

    /// Derive the image plane from the current settings.
    pub fn initialize(&mut self) {
        self.frame = Frame::new(self);
    }

    /// Jittered ray through pixel (i, j). Row 0 is the top.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let frame = &self.frame;
        let (dx, dy) = (gen_f32(rng) - 0.5, gen_f32(rng) - 0.5);
        let target = frame.pixel00
            + (i as f32 + dx) * frame.pixel_du
            + (j as f32 + dy) * frame.pixel_dv;

        let origin = if self.defocus_angle > 0.0 {
            let p = random_in_unit_disk(rng);
            frame.center + p.x * frame.lens_u + p.y * frame.lens_v
        } else {
            frame.center
        };

        let time = if self.time1 > self.time0 {
            gen_range_f32(rng, self.time0, self.time1)
        } else {
            self.time0
        };

        Ray::new(origin, target - origin, time)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
