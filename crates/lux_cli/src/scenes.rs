//! Built-in scene presets.

use anyhow::{Context, Result};
use clap::ValueEnum;
use lux_renderer::{
    AaRect, Background, BvhNode, Camera, CheckerTexture, Color, ConstantMedium, Cuboid,
    Dielectric, DiffuseLight, FlipFace, Hittable, HittableList, ImageTexture, Interval,
    Lambertian, Material, Metal, MovingSphere, NoiseTexture, Perlin, RotateY, Scene, SolidColor,
    Sphere, Texture, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;

/// Scenes the driver knows how to build.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScenePreset {
    /// Field of small diffuse, metal and glass spheres
    RandomSpheres,
    /// Bouncing spheres over a checkered ground, with motion blur
    CheckerSpheres,
    /// Two marble spheres
    PerlinSpheres,
    /// An image-mapped globe (needs --texture)
    Earth,
    /// Marble spheres lit by a sphere and a rectangle
    SimpleLight,
    /// The Cornell box, sampling its ceiling light directly
    CornellBox,
    /// The Cornell box with both blocks replaced by smoke
    CornellSmoke,
    /// Everything at once
    Final,
}

/// A scene plus the view and settings it was composed for.
pub struct Preset {
    pub scene: Scene,
    /// Camera with position and lens set; resolution is applied by the caller
    pub camera: Camera,
    pub aspect_ratio: f32,
    pub background: Background,
}

const SHUTTER: Interval = Interval {
    min: 0.0,
    max: 1.0,
};

fn lambertian(color: Color) -> Arc<dyn Material> {
    Arc::new(Lambertian::from_color(color))
}

fn random_color(rng: &mut StdRng, min: f32, max: f32) -> Color {
    Color::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

fn into_bvh(list: HittableList, rng: &mut StdRng) -> Arc<dyn Hittable> {
    Arc::new(BvhNode::from_list(list, SHUTTER, rng))
}

fn outdoor_camera(look_from: Vec3, look_at: Vec3, vfov: f32) -> Camera {
    Camera::new()
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(vfov, 0.0, 10.0)
        .with_shutter(0.0, 1.0)
}

impl ScenePreset {
    /// Build the preset. `texture` is the image used by image-mapped objects.
    pub fn build(self, texture: Option<&Path>, rng: &mut StdRng) -> Result<Preset> {
        let preset = match self {
            ScenePreset::RandomSpheres => random_spheres(rng),
            ScenePreset::CheckerSpheres => checker_spheres(rng),
            ScenePreset::PerlinSpheres => perlin_spheres(rng),
            ScenePreset::Earth => {
                let path = texture.context("the earth scene needs --texture <FILE>")?;
                earth(load_texture(path)?)
            }
            ScenePreset::SimpleLight => simple_light(rng),
            ScenePreset::CornellBox => cornell_box(),
            ScenePreset::CornellSmoke => cornell_smoke(),
            ScenePreset::Final => {
                let globe: Arc<dyn Texture> = match texture {
                    Some(path) => load_texture(path)?,
                    None => {
                        log::warn!("No --texture given; the globe renders as debug cyan");
                        Arc::new(ImageTexture::empty())
                    }
                };
                final_scene(globe, rng)
            }
        };
        Ok(preset)
    }
}

fn load_texture(path: &Path) -> Result<Arc<dyn Texture>> {
    let texture = ImageTexture::open(path)
        .with_context(|| format!("Failed to load texture {}", path.display()))?;
    Ok(Arc::new(texture))
}

fn sphere_field(rng: &mut StdRng, ground: Arc<dyn Texture>, moving: bool) -> HittableList {
    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::new(ground)),
    )));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let object: Arc<dyn Hittable> = if choose_mat < 0.8 {
                // Diffuse
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                if moving {
                    let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                    Arc::new(MovingSphere::new(center, center1, 0.0, 1.0, 0.2, lambertian(albedo)))
                } else {
                    Arc::new(Sphere::new(center, 0.2, lambertian(albedo)))
                }
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz))))
            } else {
                // Glass
                Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5))))
            };
            world.add(object);
        }
    }

    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    world
}

fn random_spheres(rng: &mut StdRng) -> Preset {
    let ground = Arc::new(SolidColor::rgb(0.5, 0.5, 0.5));
    let world = sphere_field(rng, ground, false);

    Preset {
        scene: Scene::new(into_bvh(world, rng)),
        camera: outdoor_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0),
        aspect_ratio: 16.0 / 9.0,
        background: Background::Sky,
    }
}

fn checker_spheres(rng: &mut StdRng) -> Preset {
    let checker = Arc::new(CheckerTexture::from_colors(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let world = sphere_field(rng, checker, true);

    Preset {
        scene: Scene::new(into_bvh(world, rng)),
        camera: outdoor_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0),
        aspect_ratio: 16.0 / 9.0,
        background: Background::Sky,
    }
}

fn marble_pair(rng: &mut StdRng, scale: f32) -> HittableList {
    let marble: Arc<dyn Material> = Arc::new(Lambertian::new(Arc::new(NoiseTexture::new(
        Arc::new(Perlin::new(rng)),
        scale,
    ))));

    let mut world = HittableList::new();
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        marble.clone(),
    )));
    world.add(Arc::new(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, marble)));
    world
}

fn perlin_spheres(rng: &mut StdRng) -> Preset {
    let world = marble_pair(rng, 5.0);

    Preset {
        scene: Scene::new(Arc::new(world)),
        camera: outdoor_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0),
        aspect_ratio: 16.0 / 9.0,
        background: Background::Sky,
    }
}

fn earth(texture: Arc<dyn Texture>) -> Preset {
    let globe = Sphere::new(Vec3::ZERO, 2.0, Arc::new(Lambertian::new(texture)));

    Preset {
        scene: Scene::new(Arc::new(globe)),
        camera: outdoor_camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0),
        aspect_ratio: 16.0 / 9.0,
        background: Background::Sky,
    }
}

fn simple_light(rng: &mut StdRng) -> Preset {
    let mut world = marble_pair(rng, 4.0);

    // Emission above 1 only matters for light that bounces off other surfaces
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(4.0)));
    let bulb: Arc<dyn Hittable> = Arc::new(Sphere::new(Vec3::new(0.0, 7.0, 0.0), 2.0, light.clone()));
    let panel: Arc<dyn Hittable> = Arc::new(AaRect::xy(3.0, 5.0, 1.0, 3.0, -2.0, light));
    world.add(bulb.clone());
    world.add(panel.clone());

    let mut lights = HittableList::new();
    lights.add(bulb);
    lights.add(panel);

    Preset {
        scene: Scene::new(Arc::new(world)).with_lights(Arc::new(lights)),
        camera: outdoor_camera(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), 20.0),
        aspect_ratio: 16.0 / 9.0,
        background: Background::Solid(Color::ZERO),
    }
}

/// Walls of the Cornell box, all facing inward.
fn cornell_walls(world: &mut HittableList) -> Arc<dyn Material> {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::new(0.73, 0.73, 0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));

    world.add(Arc::new(FlipFace::new(Arc::new(AaRect::yz(
        0.0, 555.0, 0.0, 555.0, 555.0, green,
    )))));
    world.add(Arc::new(AaRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red)));
    world.add(Arc::new(FlipFace::new(Arc::new(AaRect::xz(
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        white.clone(),
    )))));
    world.add(Arc::new(AaRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone())));
    world.add(Arc::new(FlipFace::new(Arc::new(AaRect::xy(
        0.0,
        555.0,
        0.0,
        555.0,
        555.0,
        white.clone(),
    )))));

    white
}

/// The two blocks, rotated and placed on the floor.
fn cornell_blocks(white: Arc<dyn Material>) -> (Arc<dyn Hittable>, Arc<dyn Hittable>) {
    let tall: Arc<dyn Hittable> = Arc::new(Cuboid::new(
        Vec3::ZERO,
        Vec3::new(165.0, 330.0, 165.0),
        white.clone(),
    ));
    let tall: Arc<dyn Hittable> = Arc::new(RotateY::new(tall, 15.0));
    let tall: Arc<dyn Hittable> = Arc::new(Translate::new(tall, Vec3::new(265.0, 0.0, 295.0)));

    let short: Arc<dyn Hittable> =
        Arc::new(Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 165.0, 165.0), white));
    let short: Arc<dyn Hittable> = Arc::new(RotateY::new(short, -18.0));
    let short: Arc<dyn Hittable> = Arc::new(Translate::new(short, Vec3::new(130.0, 0.0, 65.0)));

    (tall, short)
}

fn cornell_camera() -> Camera {
    Camera::new()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_shutter(0.0, 1.0)
}

/// A downward-facing ceiling light.
fn ceiling_light(x0: f32, x1: f32, z0: f32, z1: f32, emission: f32) -> Arc<dyn Hittable> {
    let light: Arc<dyn Material> = Arc::new(DiffuseLight::from_color(Color::splat(emission)));
    Arc::new(FlipFace::new(Arc::new(AaRect::xz(x0, x1, z0, z1, 554.0, light))))
}

fn cornell_box() -> Preset {
    let mut world = HittableList::new();
    let white = cornell_walls(&mut world);

    let light = ceiling_light(213.0, 343.0, 227.0, 332.0, 15.0);
    world.add(light.clone());

    let (tall, short) = cornell_blocks(white);
    world.add(tall);
    world.add(short);

    Preset {
        scene: Scene::new(Arc::new(world)).with_lights(light),
        camera: cornell_camera(),
        aspect_ratio: 1.0,
        background: Background::Solid(Color::ZERO),
    }
}

fn cornell_smoke() -> Preset {
    let mut world = HittableList::new();
    let white = cornell_walls(&mut world);

    let light = ceiling_light(113.0, 443.0, 127.0, 432.0, 7.0);
    world.add(light.clone());

    let (tall, short) = cornell_blocks(white);
    world.add(Arc::new(ConstantMedium::from_color(tall, 0.01, Color::ZERO)));
    world.add(Arc::new(ConstantMedium::from_color(short, 0.01, Color::ONE)));

    Preset {
        scene: Scene::new(Arc::new(world)).with_lights(light),
        camera: cornell_camera(),
        aspect_ratio: 1.0,
        background: Background::Solid(Color::ZERO),
    }
}

fn final_scene(globe: Arc<dyn Texture>, rng: &mut StdRng) -> Preset {
    let ground = lambertian(Color::new(0.48, 0.83, 0.53));

    let mut boxes = HittableList::new();
    let boxes_per_side = 20;
    for i in 0..boxes_per_side {
        for j in 0..boxes_per_side {
            let w = 100.0;
            let x0 = -1000.0 + i as f32 * w;
            let z0 = -1000.0 + j as f32 * w;
            let y1 = rng.gen_range(1.0..101.0);

            boxes.add(Arc::new(Cuboid::new(
                Vec3::new(x0, 0.0, z0),
                Vec3::new(x0 + w, y1, z0 + w),
                ground.clone(),
            )));
        }
    }

    let mut world = HittableList::new();
    world.add(into_bvh(boxes, rng));

    let light = ceiling_light(123.0, 423.0, 147.0, 412.0, 7.0);
    world.add(light.clone());

    let center0 = Vec3::new(400.0, 400.0, 200.0);
    let center1 = center0 + Vec3::new(30.0, 0.0, 0.0);
    world.add(Arc::new(MovingSphere::new(
        center0,
        center1,
        0.0,
        1.0,
        50.0,
        lambertian(Color::new(0.7, 0.3, 0.1)),
    )));

    world.add(Arc::new(Sphere::new(
        Vec3::new(260.0, 150.0, 45.0),
        50.0,
        Arc::new(Dielectric::new(1.5)),
    )));
    world.add(Arc::new(Sphere::new(
        Vec3::new(0.0, 150.0, 145.0),
        50.0,
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 1.0)),
    )));

    // Glass ball filled with blue fog
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::new(360.0, 150.0, 145.0),
        70.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(boundary.clone());
    world.add(Arc::new(ConstantMedium::from_color(
        boundary,
        0.2,
        Color::new(0.2, 0.4, 0.9),
    )));

    // Thin mist over everything
    let boundary: Arc<dyn Hittable> = Arc::new(Sphere::new(
        Vec3::ZERO,
        5000.0,
        Arc::new(Dielectric::new(1.5)),
    ));
    world.add(Arc::new(ConstantMedium::from_color(boundary, 0.0001, Color::ONE)));

    world.add(Arc::new(Sphere::new(
        Vec3::new(400.0, 200.0, 400.0),
        100.0,
        Arc::new(Lambertian::new(globe)),
    )));
    let marble = Arc::new(NoiseTexture::new(Arc::new(Perlin::new(rng)), 0.1));
    world.add(Arc::new(Sphere::new(
        Vec3::new(220.0, 280.0, 300.0),
        80.0,
        Arc::new(Lambertian::new(marble)),
    )));

    let white = lambertian(Color::new(0.73, 0.73, 0.73));
    let mut cluster = HittableList::new();
    for _ in 0..1000 {
        cluster.add(Arc::new(Sphere::new(
            random_color(rng, 0.0, 165.0),
            10.0,
            white.clone(),
        )));
    }
    let cluster: Arc<dyn Hittable> = Arc::new(RotateY::new(into_bvh(cluster, rng), 15.0));
    world.add(Arc::new(Translate::new(cluster, Vec3::new(-100.0, 270.0, 395.0))));

    Preset {
        scene: Scene::new(Arc::new(world)).with_lights(light),
        camera: Camera::new()
            .with_position(
                Vec3::new(478.0, 278.0, -600.0),
                Vec3::new(278.0, 278.0, 0.0),
                Vec3::Y,
            )
            .with_lens(40.0, 0.0, 10.0)
            .with_shutter(0.0, 1.0),
        aspect_ratio: 1.0,
        background: Background::Solid(Color::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lux_renderer::{Ray, RenderConfig};
    use rand::SeedableRng;

    #[test]
    fn test_presets_build_without_texture() {
        let mut rng = StdRng::seed_from_u64(0);
        for preset in ScenePreset::value_variants() {
            let built = preset.build(None, &mut rng);
            if *preset == ScenePreset::Earth {
                assert!(built.is_err());
            } else {
                let built = built.unwrap();
                assert!(built.aspect_ratio > 0.0);
                assert!(!built.scene.world.bounding_box(SHUTTER).is_empty());
            }
        }
    }

    #[test]
    fn test_cornell_box_light_faces_down() {
        let mut rng = StdRng::seed_from_u64(0);
        let preset = ScenePreset::CornellBox.build(None, &mut rng).unwrap();
        let lights = preset.scene.lights.clone().expect("cornell box samples its light");

        // Straight up from the floor into the light
        let ray = Ray::new(Vec3::new(220.0, 1.0, 300.0), Vec3::Y, 0.0);
        let rec = lights
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .expect("should hit the light");
        let emitted = rec.material.emitted(&rec, rec.u, rec.v, rec.p);
        assert_eq!(emitted, Color::splat(15.0));

        // Nothing blocks the view from this spot on the floor
        let config = RenderConfig::default();
        let color = preset.scene.ray_color(&ray, &preset.background, config.max_depth, &mut rng);
        assert_eq!(color, Color::splat(15.0));
    }
}
