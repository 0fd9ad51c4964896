//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with bounded depth
//! - Optional importance sampling toward light sources
//! - Stratified multi-sampling per pixel
//! - A tiled, multithreaded scheduler with deterministic per-tile seeding

use crate::bucket::{assemble_row_major, generate_buckets, render_bucket, spiral_order, Bucket, DEFAULT_BUCKET_SIZE};
use crate::bvh::BvhNode;
use crate::camera::Camera;
use crate::entity::{Entity, EntityList, HitRecord};
use crate::error::{RenderError, RenderResult};
use crate::pdf::Pdf;
use crate::sampling;
use lumen_math::{Color, Interval, Ray};
use rand::RngCore;
use rayon::ThreadPoolBuilder;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Rays start this far along their direction to skip self-intersection.
const RAY_T_MIN: f64 = 0.001;

/// How often the calling thread checks tile progress.
const PROGRESS_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Everything a ray can interact with.
#[derive(Clone)]
pub struct Scene {
    /// Root of the scene graph
    pub world: Arc<dyn Entity>,
    /// Emitters to importance-sample toward, if any
    pub lights: Option<Arc<dyn Entity>>,
}

impl Scene {
    pub fn new(world: Arc<dyn Entity>) -> Self {
        Self { world, lights: None }
    }

    /// Build a scene whose root is a BVH over `list`.
    pub fn with_bvh(list: EntityList) -> RenderResult<Self> {
        Ok(Self::new(Arc::new(BvhNode::from_list(list)?)))
    }

    pub fn with_lights(mut self, lights: Arc<dyn Entity>) -> Self {
        self.lights = Some(lights);
        self
    }
}

/// Compute the color seen by a ray.
///
/// Traces the ray through the scene, bouncing off surfaces and accumulating
/// emitted light, for at most `depth` bounces.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, background: Color, rng: &mut dyn RngCore) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !scene.world.hit(ray, Interval::new(RAY_T_MIN, f64::INFINITY), &mut rec, rng) {
        return background;
    }

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    let Some(scatter) = rec.material.scatter(ray, &rec, rng) else {
        return emission;
    };

    let (Some(lights), Some(material_pdf)) = (scene.lights.as_deref(), rec.material.sampling_pdf(&rec)) else {
        return emission + scatter.attenuation * ray_color(&scatter.scattered, scene, depth - 1, background, rng);
    };

    // Importance sample half toward the lights, half by the material
    let mixture = Pdf::mixture(Pdf::entity(lights, rec.p), material_pdf);
    let scattered = Ray::new(rec.p, mixture.generate(rng), ray.time());
    let pdf_value = mixture.value(scattered.direction());

    if pdf_value.is_nan() || pdf_value <= 0.0 {
        return emission;
    }

    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);
    let sample_color = ray_color(&scattered, scene, depth - 1, background, rng);

    emission + scatter.attenuation * scattering_pdf * sample_color / pdf_value
}

/// Render a single pixel: one jittered sample per stratum, averaged.
pub fn render_pixel(camera: &Camera, scene: &Scene, i: u32, j: u32, rng: &mut dyn RngCore) -> Color {
    let mut pixel_color = Color::ZERO;
    let sqrt_spp = camera.sqrt_spp();

    for s_j in 0..sqrt_spp {
        for s_i in 0..sqrt_spp {
            let ray = camera.get_ray(i, j, s_i, s_j, rng);
            pixel_color += ray_color(&ray, scene, camera.max_depth(), camera.background(), rng);
        }
    }

    pixel_color * camera.pixel_samples_scale()
}

/// Simple image buffer for storing render output, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Edge length of the square tiles, in pixels
    pub tile_size: u32,
    /// Worker count; `None` uses the available hardware parallelism
    pub threads: Option<usize>,
    /// Base seed; tile `k` samples from `seed + k`
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_BUCKET_SIZE,
            threads: None,
            seed: 0,
        }
    }
}

impl RenderSettings {
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> RenderResult<()> {
        if self.tile_size == 0 {
            return Err(RenderError::InvalidConfig("tile size must be non-zero".into()));
        }
        if self.threads == Some(0) {
            return Err(RenderError::InvalidConfig("thread count must be non-zero".into()));
        }
        Ok(())
    }

    fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

/// Receives tile progress while a render runs.
///
/// Called only from the thread that started the render.
pub trait ProgressSink {
    fn report(&self, completed: usize, total: usize);
}

/// Progress sink that logs through `log`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn report(&self, completed: usize, total: usize) {
        log::info!("Tiles completed: {}/{}", completed, total);
    }
}

/// Decrements the live-worker count when a worker exits, even by panic.
struct WorkerGuard<'a>(&'a AtomicUsize);

impl Drop for WorkerGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Release);
    }
}

/// Render the scene with a pool of worker threads.
///
/// The output is identical for a given seed regardless of worker count or
/// scheduling, since every tile draws from its own generator seeded with
/// `seed + tile index`.
pub fn render(
    camera: &Camera,
    scene: &Scene,
    settings: &RenderSettings,
    progress: &dyn ProgressSink,
) -> RenderResult<ImageBuffer> {
    settings.validate()?;

    let width = camera.image_width();
    let height = camera.image_height();
    let buckets = generate_buckets(width, height, settings.tile_size);
    let total = buckets.len();
    let workers = settings.worker_count().min(total).max(1);

    log::info!(
        "Rendering {}x{} at {} spp, {} tiles on {} threads",
        width,
        height,
        camera.sqrt_spp() * camera.sqrt_spp(),
        total,
        workers
    );
    let start = Instant::now();

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("lumen-worker-{i}"))
        .build()?;

    // Tile-major storage: each tile owns one contiguous slice
    let mut tiles = vec![Color::ZERO; width as usize * height as usize];

    {
        let mut queue: VecDeque<(Bucket, &mut [Color])> = VecDeque::with_capacity(total);
        let mut rest: &mut [Color] = &mut tiles;
        for bucket in &buckets {
            let (tile, tail) = std::mem::take(&mut rest).split_at_mut(bucket.pixel_count());
            queue.push_back((*bucket, tile));
            rest = tail;
        }
        queue
            .make_contiguous()
            .sort_by(|(a, _), (b, _)| spiral_order(a, b, width, height));

        let queue = Mutex::new(queue);
        let completed = AtomicUsize::new(0);
        let active = AtomicUsize::new(workers);

        pool.in_place_scope(|s| {
            for _ in 0..workers {
                let (queue, completed, active) = (&queue, &completed, &active);
                s.spawn(move |_| {
                    let _guard = WorkerGuard(active);
                    loop {
                        let next = queue
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .pop_front();
                        let Some((bucket, pixels)) = next else {
                            break;
                        };

                        let mut rng = sampling::tile_rng(settings.seed, bucket.index);
                        render_bucket(&bucket, camera, scene, pixels, &mut rng);
                        completed.fetch_add(1, Ordering::Release);
                    }
                });
            }

            let mut reported = None;
            while active.load(Ordering::Acquire) > 0 {
                let done = completed.load(Ordering::Acquire);
                if reported != Some(done) {
                    progress.report(done, total);
                    reported = Some(done);
                }
                std::thread::sleep(PROGRESS_POLL_INTERVAL);
            }
        });
    }

    progress.report(total, total);
    log::info!("Render finished in {:.2?}", start.elapsed());

    Ok(ImageBuffer {
        width,
        height,
        pixels: assemble_row_major(&buckets, &tiles, width, height),
    })
}
