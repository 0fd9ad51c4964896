// Transform utilities for DMat4
//
// Extends glam::DMat4 with bounding-box transformation used by instancing
// wrappers. glam already provides transform_point3() and transform_vector3().

use crate::Aabb;
use glam::DMat4;

/// Extension trait for DMat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for DMat4 {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners().map(|corner| self.transform_point3(corner));

        let (min, max) = corners[1..]
            .iter()
            .fold((corners[0], corners[0]), |(lo, hi), &c| (lo.min(c), hi.max(c)));

        Aabb::from_points(min, max)
    }
}
