//! Instancing wrappers that place an entity with a rigid transform.
//!
//! Rays are moved into the wrapped entity's object space, tested there, and
//! the hit point and normal moved back to world space. The direction is not
//! renormalized so `t` is the same in both spaces.

use crate::entity::{Entity, HitRecord};
use lumen_math::{Aabb, DMat4, Interval, Mat4Ext, Point3, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Entity displaced by a constant offset.
pub struct Translate {
    object: Arc<dyn Entity>,
    offset: Vec3,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Entity>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            bbox,
        }
    }
}

impl Entity for Translate {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>, rng: &mut dyn RngCore) -> bool {
        let offset_ray = Ray::new(ray.origin() - self.offset, ray.direction(), ray.time());

        if !self.object.hit(&offset_ray, ray_t, rec, rng) {
            return false;
        }

        rec.p += self.offset;
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3) -> f64 {
        self.object.pdf_value(origin - self.offset, direction)
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        self.object.random(origin - self.offset, rng)
    }
}

/// Entity rotated about the world Y axis.
pub struct RotateY {
    object: Arc<dyn Entity>,
    /// Object space to world space
    to_world: DMat4,
    /// World space to object space
    to_object: DMat4,
    bbox: Aabb,
}

impl RotateY {
    /// Rotate `object` by `angle` degrees (counter-clockwise looking down -Y).
    pub fn new(object: Arc<dyn Entity>, angle: f64) -> Self {
        let to_world = DMat4::from_rotation_y(angle.to_radians());
        let to_object = to_world.inverse();
        let bbox = to_world.transform_aabb(&object.bounding_box());

        Self {
            object,
            to_world,
            to_object,
            bbox,
        }
    }
}

impl Entity for RotateY {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>, rng: &mut dyn RngCore) -> bool {
        let local_ray = Ray::new(
            self.to_object.transform_point3(ray.origin()),
            self.to_object.transform_vector3(ray.direction()),
            ray.time(),
        );

        if !self.object.hit(&local_ray, ray_t, rec, rng) {
            return false;
        }

        // Rotation preserves orientation, so front_face carries over
        rec.p = self.to_world.transform_point3(rec.p);
        rec.normal = self.to_world.transform_vector3(rec.normal);
        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3) -> f64 {
        self.object.pdf_value(
            self.to_object.transform_point3(origin),
            self.to_object.transform_vector3(direction),
        )
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        let local = self.object.random(self.to_object.transform_point3(origin), rng);
        self.to_world.transform_vector3(local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Material};
    use crate::quad::make_box;
    use crate::{Color, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_translate_moves_hit_point() {
        let sphere: Arc<dyn Entity> = Arc::new(Sphere::new(Point3::ZERO, 1.0, gray()));
        let moved = Translate::new(sphere, Vec3::new(10.0, 0.0, 0.0));

        let ray = Ray::new_simple(Point3::new(10.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(1);
        let mut rec = HitRecord::default();
        assert!(moved.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 4.0).abs() < 1e-9);
        assert!((rec.p - Point3::new(10.0, 0.0, 1.0)).length() < 1e-9);

        let bbox = moved.bounding_box();
        assert!((bbox.x.min - 9.0).abs() < 1e-9);
        assert!((bbox.x.max - 11.0).abs() < 1e-9);

        // Nothing remains at the untranslated position
        let miss = Ray::new_simple(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!moved.hit(&miss, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
    }

    #[test]
    fn test_rotate_y_turns_box_face() {
        // Thin slab spanning x in [0, 4], rotated 90 degrees it spans z in [-4, 0]
        let slab: Arc<dyn Entity> = Arc::new(make_box(
            Point3::new(0.0, -1.0, -0.5),
            Point3::new(4.0, 1.0, 0.5),
            gray(),
        ));
        let rotated = RotateY::new(slab, 90.0);

        let bbox = rotated.bounding_box();
        // Face boxes are padded, so the bounds enclose [-4, 0] with a little slack
        assert!(bbox.z.min <= -4.0 && bbox.z.min > -4.001);
        assert!(bbox.z.max >= 0.0 && bbox.z.max < 0.001);
        assert!(bbox.x.max < 0.6);

        let mut rng = StdRng::seed_from_u64(1);
        let mut rec = HitRecord::default();
        let along_z = Ray::new_simple(Point3::new(0.0, 0.0, -10.0), Vec3::Z);
        assert!(rotated.hit(&along_z, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!((rec.p.z + 4.0).abs() < 1e-9);
        assert!((rec.normal - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-9);
        assert!(rec.front_face);

        let along_x = Ray::new_simple(Point3::new(3.0, 0.0, 10.0), -Vec3::Z);
        assert!(!rotated.hit(&along_x, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
    }
}
