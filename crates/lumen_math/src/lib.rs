//! Lumen math - f64 vector algebra and ray-tracing primitives.
//!
//! Vectors come from glam (`DVec3`); this crate adds the ray, interval and
//! bounding-box types the renderer's hit testing is built on.

// Re-export glam for convenience
pub use glam::{dvec3, DMat4, DVec3};

mod aabb;
mod interval;
mod onb;
mod ray;
mod transform;
mod vec;

pub use aabb::Aabb;
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::Mat4Ext;
pub use vec::{near_zero, reflect, refract};

/// 3-component vector used for directions.
pub type Vec3 = DVec3;
/// A point in world space.
pub type Point3 = DVec3;
/// Linear RGB color, one channel per component.
pub type Color = DVec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.cross(b), Vec3::new(-3.0, 6.0, -3.0));
    }
}
