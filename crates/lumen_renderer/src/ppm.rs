//! Plain-text PPM ("P3") output.

use crate::error::RenderResult;
use crate::renderer::ImageBuffer;
use lumen_math::{Color, Interval};
use std::io::Write;

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
///
/// NaN channels become 0 before gamma correction.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    const INTENSITY: Interval = Interval::new(0.0, 0.999);

    let byte = |c: f64| {
        let c = if c.is_nan() { 0.0 } else { c };
        (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8
    };

    [byte(color.x), byte(color.y), byte(color.z)]
}

/// Write `image` as an ASCII PPM: header, then one `r g b` line per pixel.
pub fn write_ppm<W: Write>(mut out: W, image: &ImageBuffer) -> RenderResult<()> {
    write!(out, "P3\n{} {}\n255\n", image.width, image.height)?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb(*color);
        writeln!(out, "{} {} {}", r, g, b)?;
    }

    out.flush()?;
    Ok(())
}
