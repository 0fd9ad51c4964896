//! Participating media of constant density (smoke, fog).

use crate::entity::{Entity, HitRecord};
use crate::material::Isotropic;
use crate::sampling;
use crate::texture::Texture;
use lumen_math::{Aabb, Color, Interval, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Gap between the entry hit and the search for the exit hit.
const EXIT_EPSILON: f64 = 0.0001;

/// Homogeneous volume filling a convex boundary.
///
/// A ray crossing the volume scatters after an exponentially distributed
/// distance; if that distance exceeds the chord through the boundary the ray
/// passes through untouched.
pub struct ConstantMedium {
    boundary: Arc<dyn Entity>,
    neg_inv_density: f64,
    phase_function: Isotropic,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Entity>, density: f64, texture: Arc<dyn Texture>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::with_texture(texture),
        }
    }

    pub fn from_color(boundary: Arc<dyn Entity>, density: f64, albedo: Color) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::new(albedo),
        }
    }
}

impl Entity for ConstantMedium {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>, rng: &mut dyn RngCore) -> bool {
        let mut rec1 = HitRecord::default();
        let mut rec2 = HitRecord::default();

        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut rec1, rng) {
            return false;
        }

        if !self.boundary.hit(
            ray,
            Interval::new(rec1.t + EXIT_EPSILON, f64::INFINITY),
            &mut rec2,
            rng,
        ) {
            return false;
        }

        let mut t_enter = rec1.t.max(ray_t.min);
        let t_exit = rec2.t.min(ray_t.max);

        if t_exit <= t_enter {
            return false;
        }

        if t_enter < 0.0 {
            t_enter = 0.0;
        }

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * sampling::random_f64(rng).ln();

        if hit_distance > distance_inside_boundary {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);

        // Arbitrary; a volume has no surface
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.material = &self.phase_function;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}
