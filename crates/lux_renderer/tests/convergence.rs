//! End-to-end renders whose expected output is known in closed form.

use lux_renderer::{
    ray_color, ray_color_with_lights, render, AaRect, Background, Camera, Color, DiffuseLight,
    FlipFace, Hittable, HittableList, Lambertian, Ray, RenderConfig, Scene, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

const RESOLUTION: u32 = 16;

/// Camera looking straight at a unit sphere at the origin, close enough that
/// every pixel lands on it.
fn close_up_camera() -> Camera {
    let mut camera = Camera::new()
        .with_resolution(RESOLUTION, RESOLUTION)
        .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
        .with_lens(10.0, 0.0, 5.0);
    camera.initialize();
    camera
}

fn mean_color(scene: &Scene, camera: &Camera, config: &RenderConfig) -> Color {
    let image = render(camera, scene, config);
    let mut total = Color::ZERO;
    for y in 0..image.height {
        for x in 0..image.width {
            total += image.average(x, y);
        }
    }
    total / (image.width * image.height) as f32
}

/// Under a uniform white background a convex Lambertian object reflects
/// exactly its albedo, so the estimate should settle on it.
#[test]
fn lambertian_sphere_converges_to_albedo() {
    let albedo = Color::new(0.7, 0.3, 0.45);
    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::ZERO,
        1.0,
        Arc::new(Lambertian::from_color(albedo)),
    )));
    let scene = Scene::new(Arc::new(world));
    let camera = close_up_camera();

    for samples_per_pixel in [1, 10, 100, 1000] {
        let config = RenderConfig {
            samples_per_pixel,
            max_depth: 50,
            background: Background::Solid(Color::ONE),
            seed: 1234,
            bucket_size: 8,
        };
        let mean = mean_color(&scene, &camera, &config);
        let error = (mean - albedo).abs().max_element();
        assert!(
            error < 0.01,
            "spp {}: mean {:?} differs from albedo {:?}",
            samples_per_pixel,
            mean,
            albedo
        );
    }
}

#[test]
fn render_is_deterministic_for_a_seed() {
    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.3, 0.0, 0.0),
        0.6,
        Arc::new(Lambertian::from_color(Color::splat(0.5))),
    )));
    let scene = Scene::new(Arc::new(world));
    let camera = close_up_camera();
    let config = RenderConfig {
        samples_per_pixel: 4,
        background: Background::Sky,
        seed: 99,
        bucket_size: 5,
        ..RenderConfig::default()
    };

    let first = render(&camera, &scene, &config);
    let second = render(&camera, &scene, &config);
    assert_eq!(first.pixels, second.pixels);
    assert_eq!(first.to_rgb8(), second.to_rgb8());
}

fn light_only_scene() -> Scene {
    let light: Arc<dyn Hittable> = Arc::new(FlipFace::new(Arc::new(AaRect::xz(
        -1.0,
        1.0,
        -1.0,
        1.0,
        3.0,
        Arc::new(DiffuseLight::from_color(Color::splat(15.0))),
    ))));

    let mut world = HittableList::new();
    world.add(light.clone());
    world.add(Arc::new(Sphere::new(
        Vec3::ZERO,
        1.0,
        Arc::new(Lambertian::from_color(Color::splat(0.73))),
    )));
    Scene::new(Arc::new(world)).with_lights(light)
}

#[test]
fn light_only_scene_is_black_where_rays_miss() {
    let scene = light_only_scene();

    // Looking away from everything
    let mut camera = Camera::new()
        .with_resolution(8, 8)
        .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 10.0), Vec3::Y)
        .with_lens(30.0, 0.0, 1.0);
    camera.initialize();

    let config = RenderConfig {
        samples_per_pixel: 16,
        background: Background::Solid(Color::ZERO),
        ..RenderConfig::default()
    };
    let image = render(&camera, &scene, &config);
    assert!(image.pixels.iter().all(|&c| c == Color::ZERO));
    assert!(image.to_rgb8().iter().all(|&b| b == 0));
}

#[test]
fn light_only_scene_lights_the_sphere() {
    let scene = light_only_scene();
    let mut camera = Camera::new()
        .with_resolution(8, 8)
        .with_position(Vec3::new(0.0, 0.5, 6.0), Vec3::ZERO, Vec3::Y)
        .with_lens(15.0, 0.0, 1.0);
    camera.initialize();

    let config = RenderConfig {
        samples_per_pixel: 16,
        background: Background::Solid(Color::ZERO),
        ..RenderConfig::default()
    };
    let image = render(&camera, &scene, &config);
    assert!(image.pixels.iter().all(|c| c.is_finite()));
    assert!(image.pixels.iter().any(|c| c.x > 0.0));
}

/// Sampling the light directly must not change the expected value.
#[test]
fn light_sampling_matches_plain_estimate() {
    let light: Arc<dyn Hittable> = Arc::new(FlipFace::new(Arc::new(AaRect::xz(
        -1.0,
        1.0,
        -1.0,
        1.0,
        2.0,
        Arc::new(DiffuseLight::from_color(Color::splat(4.0))),
    ))));
    let mut world = HittableList::new();
    world.add(light.clone());
    world.add(Arc::new(AaRect::xz(
        -5.0,
        5.0,
        -5.0,
        5.0,
        0.0,
        Arc::new(Lambertian::from_color(Color::splat(0.5))),
    )));

    let background = Background::Solid(Color::ZERO);
    // Below the light, looking at the middle of the floor
    let eye = Ray::new(Vec3::new(3.0, 1.0, 0.0), Vec3::new(-3.0, -1.0, 0.0), 0.0);
    let n = 100_000;

    let mut rng = StdRng::seed_from_u64(5);
    let plain: Color = (0..n)
        .map(|_| ray_color(&eye, &world, &background, 50, &mut rng))
        .sum::<Color>()
        / n as f32;

    let mut rng = StdRng::seed_from_u64(6);
    let sampled: Color = (0..n)
        .map(|_| ray_color_with_lights(&eye, &world, light.as_ref(), &background, 50, &mut rng))
        .sum::<Color>()
        / n as f32;

    assert!(plain.x > 0.05, "plain estimate {:?}", plain);
    let relative = (plain.x - sampled.x).abs() / sampled.x;
    assert!(
        relative < 0.05,
        "plain {:?} vs light sampled {:?}",
        plain,
        sampled
    );
}
