//! Sphere primitive, optionally moving for motion blur.

use crate::entity::{Entity, HitRecord};
use crate::material::Material;
use crate::sampling;
use lumen_math::{Aabb, Interval, Onb, Point3, Ray, Vec3};
use rand::RngCore;
use std::f64::consts::PI;
use std::sync::Arc;

/// A sphere primitive.
///
/// The center travels linearly from `center` at time 0 to
/// `center + motion` at time 1.
pub struct Sphere {
    center: Point3,
    motion: Vec3,
    radius: f64,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a stationary sphere.
    pub fn new(center: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            motion: Vec3::ZERO,
            radius,
            material,
            bbox,
        }
    }

    /// Create a sphere moving from `center0` (time 0) to `center1` (time 1).
    pub fn moving(center0: Point3, center1: Point3, radius: f64, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let box0 = Aabb::from_points(center0 - rvec, center0 + rvec);
        let box1 = Aabb::from_points(center1 - rvec, center1 + rvec);

        Self {
            center: center0,
            motion: center1 - center0,
            radius,
            material,
            bbox: Aabb::surrounding(&box0, &box1),
        }
    }

    /// Center of the sphere at the given ray time.
    #[inline]
    fn center_at(&self, time: f64) -> Point3 {
        self.center + time * self.motion
    }

    /// UV coordinates for a point on the unit sphere centered at the origin.
    fn get_sphere_uv(p: Vec3) -> (f64, f64) {
        // theta: angle up from -Y, phi: angle around Y from -X
        let theta = (-p.y).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }

    /// Direction uniformly distributed inside the cone subtended by a sphere
    /// of `radius` seen from `distance_squared` away, in the cone's local frame.
    fn random_to_sphere(radius: f64, distance_squared: f64, rng: &mut dyn RngCore) -> Vec3 {
        let r1 = sampling::random_f64(rng);
        let r2 = sampling::random_f64(rng);
        let z = 1.0 + r2 * ((1.0 - radius * radius / distance_squared).sqrt() - 1.0);

        let phi = 2.0 * PI * r1;
        let x = phi.cos() * (1.0 - z * z).sqrt();
        let y = phi.sin() * (1.0 - z * z).sqrt();

        Vec3::new(x, y, z)
    }

    /// Intersection test behind `hit`; draws no random numbers.
    fn intersect<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let center = self.center_at(ray.time());
        let oc = center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return false;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return false;
            }
        }

        rec.t = root;
        rec.p = ray.at(rec.t);
        let outward_normal = (rec.p - center) / self.radius;
        rec.set_face_normal(ray, outward_normal);
        (rec.u, rec.v) = Self::get_sphere_uv(outward_normal);
        rec.material = self.material.as_ref();

        true
    }
}

impl Entity for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>, _rng: &mut dyn RngCore) -> bool {
        self.intersect(ray, ray_t, rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    // Only meaningful for stationary spheres. Zero from inside the sphere,
    // where no cone of directions bounds it.
    fn pdf_value(&self, origin: Point3, direction: Vec3) -> f64 {
        let distance_squared = (self.center - origin).length_squared();
        if distance_squared <= self.radius * self.radius {
            return 0.0;
        }

        let mut rec = HitRecord::default();
        if !self.intersect(&Ray::new_simple(origin, direction), Interval::new(0.001, f64::INFINITY), &mut rec) {
            return 0.0;
        }

        let cos_theta_max = (1.0 - self.radius * self.radius / distance_squared).sqrt();
        let solid_angle = 2.0 * PI * (1.0 - cos_theta_max);

        1.0 / solid_angle
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        let distance_squared = direction.length_squared();
        if distance_squared <= self.radius * self.radius {
            return sampling::random_unit_vector(rng);
        }
        let uvw = Onb::new(direction);
        uvw.transform(Self::random_to_sphere(self.radius, distance_squared, rng))
    }
}
