//! Simple path tracer example.
//!
//! Renders a small scene touching every entity and material type and saves
//! it as a PPM.
//!
//! ```text
//! cargo run --release --example simple_render -- [output.ppm] [settings.json]
//! ```
//!
//! The optional JSON file may override `camera` and `render` settings, e.g.
//! `{ "camera": { "image_width": 800, "samples_per_pixel": 100 }, "render": { "seed": 7 } }`.

use anyhow::{Context, Result};
use lumen_renderer::{
    make_box, pyramid, render, write_ppm, Camera, CameraConfig, CheckerTexture, Color,
    ConstantMedium, Dielectric, DiffuseLight, Entity, EntityList, ImageTexture, Lambertian,
    LogProgress, Metal, NoiseTexture, Point3, Quad, RenderSettings, RgbImage, RotateY, Scene,
    Sphere, Translate, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::fs::File;
use std::io::BufWriter;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoConfig {
    camera: CameraConfig,
    render: RenderSettings,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "output.ppm".to_string());
    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?
        }
        None => DemoConfig {
            camera: default_camera(),
            render: RenderSettings::default().with_seed(2024),
        },
    };

    let start = std::time::Instant::now();
    let scene = build_scene(config.render.seed)?;
    log::info!("Scene built in {:?}", start.elapsed());

    let camera = Camera::initialize(config.camera)?;
    let image = render(&camera, &scene, &config.render, &LogProgress)?;

    let file = File::create(&output).with_context(|| format!("creating {output}"))?;
    write_ppm(BufWriter::new(file), &image)?;
    log::info!("Saved to {}", output);

    Ok(())
}

fn default_camera() -> CameraConfig {
    CameraConfig::default()
        .with_resolution(400, 16.0 / 9.0)
        .with_quality(64, 20)
        .with_position(
            Point3::new(13.0, 3.0, 6.0), // look_from
            Point3::new(0.0, 1.0, 0.0),  // look_at
            Vec3::Y,                     // vup
        )
        .with_lens(25.0, 0.4, 14.0)
        .with_background(Color::new(0.05, 0.05, 0.08))
}

/// Build the demo scene. Random placement and noise derive from `seed`.
fn build_scene(seed: u64) -> Result<Scene> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = EntityList::new();

    // Ground
    let checker = Arc::new(CheckerTexture::from_colors(
        0.8,
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, -1000.0, 0.0),
        1000.0,
        Arc::new(Lambertian::with_texture(checker)),
    )));

    // Three main spheres
    world.add(Arc::new(Sphere::new(Point3::new(0.0, 1.0, 0.0), 1.0, Arc::new(Dielectric::new(1.5)))));
    world.add(Arc::new(Sphere::new(
        Point3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Lambertian::with_texture(Arc::new(NoiseTexture::new(4.0, &mut rng)))),
    )));
    world.add(Arc::new(Sphere::new(
        Point3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    // Image-mapped globe; renders the placeholder color if the file is missing
    let earth = Arc::new(ImageTexture::new(Arc::new(RgbImage::open_or_placeholder("earthmap.jpg"))));
    world.add(Arc::new(Sphere::new(
        Point3::new(0.0, 0.6, 3.0),
        0.6,
        Arc::new(Lambertian::with_texture(earth)),
    )));

    // Rotated box, pyramid and a puff of smoke
    let white: Arc<dyn lumen_renderer::Material> = Arc::new(Lambertian::new(Color::splat(0.73)));
    let cube: Arc<dyn Entity> = Arc::new(make_box(Point3::ZERO, Point3::splat(1.2), white.clone()));
    let cube = Arc::new(RotateY::new(cube, 20.0));
    world.add(Arc::new(Translate::new(cube, Vec3::new(-2.5, 0.0, 3.0))));

    world.add(Arc::new(pyramid(
        [
            Point3::new(2.0, 0.0, 2.5),
            Point3::new(3.2, 0.0, 2.5),
            Point3::new(3.2, 0.0, 3.7),
            Point3::new(2.0, 0.0, 3.7),
        ],
        Point3::new(2.6, 1.3, 3.1),
        Arc::new(Metal::new(Color::new(0.8, 0.8, 0.9), 0.2)),
    )));

    let smoke_boundary: Arc<dyn Entity> = Arc::new(Sphere::new(Point3::new(-1.5, 0.7, -3.0), 0.7, white));
    world.add(Arc::new(ConstantMedium::from_color(smoke_boundary, 1.5, Color::splat(0.2))));

    // Small random spheres, some in motion
    for a in -5..5 {
        for b in -5..5 {
            let center = Point3::new(
                a as f64 + 0.9 * rng.gen::<f64>(),
                0.2,
                b as f64 + 0.9 * rng.gen::<f64>(),
            );

            if (center - Point3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f64 = rng.gen();
            if choose_mat < 0.8 {
                // Diffuse
                let albedo = Color::new(
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                    rng.gen::<f64>() * rng.gen::<f64>(),
                );
                let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.3), 0.0);
                world.add(Arc::new(Sphere::moving(center, center1, 0.2, Arc::new(Lambertian::new(albedo)))));
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f64>(),
                    0.5 + 0.5 * rng.gen::<f64>(),
                    0.5 + 0.5 * rng.gen::<f64>(),
                );
                let fuzz = 0.5 * rng.gen::<f64>();
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Metal::new(albedo, fuzz)))));
            } else {
                // Glass
                world.add(Arc::new(Sphere::new(center, 0.2, Arc::new(Dielectric::new(1.5)))));
            }
        }
    }

    // Overhead area light, also importance sampled
    let light: Arc<dyn Entity> = Arc::new(Quad::new(
        Point3::new(-2.0, 6.0, -2.0),
        Vec3::new(4.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 4.0),
        Arc::new(DiffuseLight::new(Color::splat(5.0))),
    ));
    world.add(light.clone());

    log::info!("Created {} objects", world.len());
    Ok(Scene::with_bvh(world)?.with_lights(light))
}
