//! Textures: spatially varying colors looked up at a hit point.

use crate::image_source::ImageSource;
use crate::perlin::Perlin;
use lumen_math::{Color, Interval, Point3};
use rand::RngCore;
use std::sync::Arc;

/// Color returned by image textures that have no pixels.
pub const PLACEHOLDER_COLOR: Color = Color::new(0.0, 0.0, 1.0);

/// Anything that maps surface coordinates `(u, v)` and a point `p` to a color.
pub trait Texture: Send + Sync {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color;
}

/// Constant color everywhere.
#[derive(Debug, Clone, Copy)]
pub struct SolidColor {
    albedo: Color,
}

impl SolidColor {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Texture for SolidColor {
    fn value(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        self.albedo
    }
}

/// 3D checkerboard alternating between two textures in cells of size `scale`.
pub struct CheckerTexture {
    inv_scale: f64,
    even: Arc<dyn Texture>,
    odd: Arc<dyn Texture>,
}

impl CheckerTexture {
    pub fn new(scale: f64, even: Arc<dyn Texture>, odd: Arc<dyn Texture>) -> Self {
        Self {
            inv_scale: 1.0 / scale,
            even,
            odd,
        }
    }

    pub fn from_colors(scale: f64, even: Color, odd: Color) -> Self {
        Self::new(
            scale,
            Arc::new(SolidColor::new(even)),
            Arc::new(SolidColor::new(odd)),
        )
    }
}

impl Texture for CheckerTexture {
    fn value(&self, u: f64, v: f64, p: Point3) -> Color {
        let cell = (self.inv_scale * p).floor();
        let parity = (cell.x as i64 + cell.y as i64 + cell.z as i64).rem_euclid(2);

        if parity == 0 {
            self.even.value(u, v, p)
        } else {
            self.odd.value(u, v, p)
        }
    }
}

/// Marble-like pattern driven by Perlin turbulence.
pub struct NoiseTexture {
    noise: Perlin,
    scale: f64,
}

impl NoiseTexture {
    /// Octaves of turbulence summed into the phase.
    const TURBULENCE_DEPTH: usize = 7;

    /// Build a noise texture with a lattice randomized from `rng`.
    pub fn new(scale: f64, rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
            scale,
        }
    }
}

impl Texture for NoiseTexture {
    fn value(&self, _u: f64, _v: f64, p: Point3) -> Color {
        let turb = self.noise.turbulence(p, Self::TURBULENCE_DEPTH);
        Color::splat(0.5) * (1.0 + (self.scale * p.z + 10.0 * turb).sin())
    }
}

/// Nearest-pixel lookup into an image; `v = 0` is the bottom row.
pub struct ImageTexture {
    image: Arc<dyn ImageSource>,
}

impl ImageTexture {
    pub fn new(image: Arc<dyn ImageSource>) -> Self {
        Self { image }
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f64, v: f64, _p: Point3) -> Color {
        if self.image.is_empty() {
            return PLACEHOLDER_COLOR;
        }

        let unit = Interval::new(0.0, 1.0);
        let u = unit.clamp(u);
        let v = 1.0 - unit.clamp(v);

        let width = self.image.width();
        let height = self.image.height();
        let col = ((u * width as f64) as u32).min(width - 1);
        let row = ((v * height as f64) as u32).min(height - 1);
        let [r, g, b] = self.image.pixel(col, row);

        let scale = 1.0 / 255.0;
        Color::new(r as f64 * scale, g as f64 * scale, b as f64 * scale)
    }
}
