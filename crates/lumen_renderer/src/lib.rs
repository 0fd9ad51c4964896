//! Lumen renderer - CPU Monte Carlo path tracing
//!
//! Scenes are built from shared [`Entity`] trait objects (spheres, quads,
//! triangles, volumes and instancing wrappers), usually under a [`BvhNode`].
//! [`render`] traces them through a [`Camera`] on a pool of worker threads,
//! one image tile at a time, and [`write_ppm`] writes the result.

mod bucket;
mod bvh;
mod camera;
mod entity;
mod error;
mod image_source;
mod material;
mod medium;
mod pdf;
mod perlin;
mod ppm;
mod quad;
mod renderer;
mod sampling;
mod sphere;
mod texture;
mod transform;
mod triangle;

pub use bucket::{assemble_row_major, generate_buckets, render_bucket, spiral_order, Bucket, DEFAULT_BUCKET_SIZE};
pub use bvh::BvhNode;
pub use camera::{Camera, CameraConfig};
pub use entity::{Entity, EntityList, HitRecord};
pub use error::{ImageLoadError, RenderError, RenderResult, SceneError};
pub use image_source::{ImageSource, RgbImage};
pub use material::{Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, ScatterResult};
pub use medium::ConstantMedium;
pub use pdf::Pdf;
pub use perlin::Perlin;
pub use ppm::{color_to_rgb, linear_to_gamma, write_ppm};
pub use quad::{make_box, Quad};
pub use renderer::{ray_color, render, render_pixel, ImageBuffer, LogProgress, ProgressSink, RenderSettings, Scene};
pub use sphere::Sphere;
pub use texture::{CheckerTexture, ImageTexture, NoiseTexture, SolidColor, Texture, PLACEHOLDER_COLOR};
pub use transform::{RotateY, Translate};
pub use triangle::{pyramid, Triangle};

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Color, Interval, Onb, Point3, Ray, Vec3};
