//! Bucket-based tile rendering.
//!
//! Divides the image into tiles (buckets) that can be rendered
//! independently and in parallel. Buckets are numbered row-major; that
//! index seeds the bucket's random samples and fixes where its pixels live
//! in the tile-major output storage.

use crate::camera::Camera;
use crate::renderer::{render_pixel, Scene};
use lumen_math::Color;
use rand::RngCore;
use std::cmp::Ordering;

/// A rectangular region of the image to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of bucket's top-left corner
    pub x: u32,
    /// Y coordinate of bucket's top-left corner
    pub y: u32,
    /// Width of the bucket in pixels
    pub width: u32,
    /// Height of the bucket in pixels
    pub height: u32,
    /// Row-major index of this bucket in the grid
    pub index: usize,
}

impl Bucket {
    /// Create a new bucket.
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    /// Get the total number of pixels in this bucket.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Squared distance from the bucket's center to `(cx, cy)`.
    fn distance_sq_to(&self, cx: f64, cy: f64) -> f64 {
        let bx = self.x as f64 + self.width as f64 / 2.0;
        let by = self.y as f64 + self.height as f64 / 2.0;
        (bx - cx).powi(2) + (by - cy).powi(2)
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 16;

/// Generate the bucket grid for an image, row-major.
///
/// Edge buckets are clipped to the image.
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let mut buckets = Vec::new();
    if bucket_size == 0 {
        return buckets;
    }

    let mut index = 0;
    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = bucket_size.min(width - x);
            let bh = bucket_size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, index));
            index += 1;
            x += bucket_size;
        }
        y += bucket_size;
    }

    buckets
}

/// Ordering that visits buckets from the image center outward.
///
/// Only affects the order work is handed out in, never the result. Ties
/// keep row-major order.
pub fn spiral_order(a: &Bucket, b: &Bucket, width: u32, height: u32) -> Ordering {
    let cx = width as f64 / 2.0;
    let cy = height as f64 / 2.0;

    a.distance_sq_to(cx, cy)
        .total_cmp(&b.distance_sq_to(cx, cy))
        .then(a.index.cmp(&b.index))
}

/// Render a single bucket into `pixels`, row-major within the bucket.
///
/// `pixels` must hold exactly `bucket.pixel_count()` colors.
pub fn render_bucket(bucket: &Bucket, camera: &Camera, scene: &Scene, pixels: &mut [Color], rng: &mut dyn RngCore) {
    debug_assert_eq!(pixels.len(), bucket.pixel_count());

    let rows = pixels.chunks_exact_mut(bucket.width as usize);
    for (local_y, row) in (0..bucket.height).zip(rows) {
        for (local_x, pixel) in (0..bucket.width).zip(row.iter_mut()) {
            *pixel = render_pixel(camera, scene, bucket.x + local_x, bucket.y + local_y, rng);
        }
    }
}

/// Scatter tile-major storage back into a row-major image.
///
/// `buckets` must be in index order, matching the layout of `tiles`.
pub fn assemble_row_major(buckets: &[Bucket], tiles: &[Color], width: u32, height: u32) -> Vec<Color> {
    let width = width as usize;
    let mut pixels = vec![Color::ZERO; width * height as usize];

    let mut offset = 0;
    for bucket in buckets {
        let bw = bucket.width as usize;
        for (row, src) in tiles[offset..offset + bucket.pixel_count()]
            .chunks_exact(bw)
            .enumerate()
        {
            let start = (bucket.y as usize + row) * width + bucket.x as usize;
            pixels[start..start + bw].copy_from_slice(src);
        }
        offset += bucket.pixel_count();
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4); // 2x2 grid

        // Total pixels should equal image size
        let total_pixels: usize = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 30, 16);
        assert_eq!(buckets.len(), 7 * 2);

        let total_pixels: usize = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total_pixels, 100 * 30);

        let last = buckets.last().unwrap();
        assert_eq!((last.x, last.y, last.width, last.height), (96, 16, 4, 14));
    }

    #[test]
    fn test_indices_are_row_major() {
        let buckets = generate_buckets(48, 32, 16);
        for (i, bucket) in buckets.iter().enumerate() {
            assert_eq!(bucket.index, i);
            assert_eq!(bucket.x, (i % 3) as u32 * 16);
            assert_eq!(bucket.y, (i / 3) as u32 * 16);
        }
    }

    #[test]
    fn test_spiral_order() {
        let mut buckets = generate_buckets(192, 192, 64);
        assert_eq!(buckets.len(), 9); // 3x3 grid

        buckets.sort_by(|a, b| spiral_order(a, b, 192, 192));

        // First bucket should be the center one
        let first = &buckets[0];
        assert_eq!((first.x, first.y), (64, 64));
        assert_eq!(first.index, 4);
        // Edge midpoints before corners, row-major among equals
        let next: Vec<usize> = buckets[1..5].iter().map(|b| b.index).collect();
        assert_eq!(next, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_assemble_row_major() {
        let (width, height) = (5, 3);
        let buckets = generate_buckets(width, height, 2);

        // Fill each tile with the row-major index of its own pixels
        let mut tiles = Vec::new();
        for bucket in &buckets {
            for y in 0..bucket.height {
                for x in 0..bucket.width {
                    let index = (bucket.y + y) * width + bucket.x + x;
                    tiles.push(Color::splat(index as f64));
                }
            }
        }

        let pixels = assemble_row_major(&buckets, &tiles, width, height);
        for (i, pixel) in pixels.iter().enumerate() {
            assert_eq!(*pixel, Color::splat(i as f64));
        }
    }

    #[test]
    fn test_zero_size_yields_no_buckets() {
        assert!(generate_buckets(10, 10, 0).is_empty());
    }
}
