//! Triangle primitive and the square pyramid assembled from triangles.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::entity::{Entity, EntityList, HitRecord};
use crate::material::Material;
use lumen_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A single-sided-normal triangle; hits are reported from both sides.
pub struct Triangle {
    v0: Point3,
    edge1: Vec3,
    edge2: Vec3,
    /// Pre-computed face normal (unit length)
    normal: Vec3,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices (counter-clockwise faces the normal).
    pub fn new(v0: Point3, v1: Point3, v2: Point3, material: Arc<dyn Material>) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize();

        // Aabb::from_points pads the thin axis of axis-aligned triangles
        let bbox = Aabb::from_points(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            v0,
            edge1,
            edge2,
            normal,
            material,
            bbox,
        }
    }
}

impl Entity for Triangle {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>, _rng: &mut dyn RngCore) -> bool {
        let h = ray.direction().cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to triangle
        if a.abs() < 1e-8 {
            return false;
        }

        let f = 1.0 / a;
        let s = ray.origin() - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return false;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction().dot(q);
        if v < 0.0 || u + v > 1.0 {
            return false;
        }

        let t = f * self.edge2.dot(q);
        if !ray_t.contains(t) {
            return false;
        }

        rec.t = t;
        rec.p = ray.at(t);
        rec.set_face_normal(ray, self.normal);
        rec.u = u;
        rec.v = v;
        rec.material = self.material.as_ref();

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// Square-based pyramid: two triangles for the base, four for the sides.
///
/// `base` is given in order around the rim.
pub fn pyramid(base: [Point3; 4], apex: Point3, material: Arc<dyn Material>) -> EntityList {
    let mut faces = EntityList::new();

    faces.add(Arc::new(Triangle::new(base[0], base[1], base[2], material.clone())));
    faces.add(Arc::new(Triangle::new(base[2], base[3], base[0], material.clone())));

    for i in 0..4 {
        faces.add(Arc::new(Triangle::new(
            base[i],
            base[(i + 1) % 4],
            apex,
            material.clone(),
        )));
    }

    faces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use crate::Color;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    fn facing_triangle() -> Triangle {
        // Triangle in XY plane at z=-1
        Triangle::new(
            Vec3::new(-1.0, -1.0, -1.0),
            Vec3::new(1.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            gray(),
        )
    }

    #[test]
    fn test_triangle_hit() {
        let triangle = facing_triangle();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(1);
        let mut rec = HitRecord::default();

        assert!(triangle.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 1.0).abs() < 1e-12);
        assert!(rec.front_face);
        assert!(rec.u >= 0.0 && rec.v >= 0.0 && rec.u + rec.v <= 1.0);
    }

    #[test]
    fn test_triangle_miss() {
        let triangle = facing_triangle();
        let ray = Ray::new_simple(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0));
        let mut rng = StdRng::seed_from_u64(1);
        let mut rec = HitRecord::default();

        assert!(!triangle.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
    }

    #[test]
    fn test_pyramid_blocks_rays_from_above_and_below() {
        let base = [
            Point3::new(-1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(-1.0, 0.0, 1.0),
        ];
        let shape = pyramid(base, Point3::new(0.0, 2.0, 0.0), gray());
        assert_eq!(shape.len(), 6);

        let mut rng = StdRng::seed_from_u64(1);
        let mut rec = HitRecord::default();
        let down = Ray::new_simple(Point3::new(0.0, 5.0, 0.0), -Vec3::Y);
        assert!(shape.hit(&down, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!((rec.p.y - 2.0).abs() < 1e-9);

        let up = Ray::new_simple(Point3::new(0.2, -5.0, 0.3), Vec3::Y);
        assert!(shape.hit(&up, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!(rec.p.y.abs() < 1e-9);
    }
}
