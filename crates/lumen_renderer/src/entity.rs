//! Entity trait, HitRecord and the flat EntityList composite.

use crate::material::{Material, ScatterResult};
use crate::sampling;
use lumen_math::{Aabb, Interval, Point3, Ray, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// Placeholder material for `HitRecord::default()`. Always absorbs.
struct DummyMaterial;

impl Material for DummyMaterial {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        None
    }
}

static DUMMY_MATERIAL: DummyMaterial = DummyMaterial;

/// Record of a ray-entity intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Point3,
    /// Surface normal at intersection (always points against the ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// Surface parametrization used for texture lookup
    pub u: f64,
    pub v: f64,
    /// Ray parameter of the intersection
    pub t: f64,
    /// Whether the ray arrived from outside the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Point3::ZERO,
            normal: Vec3::ZERO,
            material: &DUMMY_MATERIAL,
            u: 0.0,
            v: 0.0,
            t: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The stored normal always opposes the ray, so we track separately
    /// whether the front or back face was hit.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can hit.
///
/// The scene graph is built once and then shared read-only between render
/// threads, hence the `Send + Sync` bound.
pub trait Entity: Send + Sync {
    /// Test if a ray hits this entity within `ray_t`.
    ///
    /// Returns true on a hit and fills in `rec`. On a miss `rec` is untouched.
    /// Only participating media draw from `rng`.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>, rng: &mut dyn RngCore) -> bool;

    /// Axis-aligned bounding box enclosing the entity for all ray times.
    fn bounding_box(&self) -> Aabb;

    /// Density of `random` producing `direction`, for entities used
    /// as importance-sampled light sources.
    fn pdf_value(&self, _origin: Point3, _direction: Vec3) -> f64 {
        0.0
    }

    /// Direction from `origin` toward a random point on the entity.
    fn random(&self, _origin: Point3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }
}

/// A flat, ordered collection of entities.
#[derive(Clone, Default)]
pub struct EntityList {
    objects: Vec<Arc<dyn Entity>>,
    bbox: Aabb,
}

impl EntityList {
    /// Create a new empty list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an entity to the list.
    pub fn add(&mut self, object: Arc<dyn Entity>) {
        self.bbox = Aabb::surrounding(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Arc<dyn Entity>] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<Arc<dyn Entity>> {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl FromIterator<Arc<dyn Entity>> for EntityList {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Entity>>>(iter: I) -> Self {
        let mut list = EntityList::new();
        for object in iter {
            list.add(object);
        }
        list
    }
}

impl Entity for EntityList {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>, rng: &mut dyn RngCore) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, ray_t.narrowed_to(closest_so_far), rec, rng) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }

    fn pdf_value(&self, origin: Point3, direction: Vec3) -> f64 {
        if self.objects.is_empty() {
            return 0.0;
        }
        let weight = 1.0 / self.objects.len() as f64;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn random(&self, origin: Point3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::X;
        }
        let index = sampling::random_index(rng, self.objects.len());
        self.objects[index].random(origin, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Lambertian, Quad, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gray() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Color::splat(0.5)))
    }

    #[test]
    fn test_face_normal_orientation() {
        let ray = Ray::new_simple(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let mut rec = HitRecord::default();

        rec.set_face_normal(&ray, Vec3::Z);
        assert!(rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);

        rec.set_face_normal(&ray, -Vec3::Z);
        assert!(!rec.front_face);
        assert_eq!(rec.normal, Vec3::Z);
    }

    #[test]
    fn test_list_returns_closest_hit() {
        let mut list = EntityList::new();
        list.add(Arc::new(Sphere::new(Point3::new(0.0, 0.0, -10.0), 1.0, gray())));
        list.add(Arc::new(Sphere::new(Point3::new(0.0, 0.0, -4.0), 1.0, gray())));

        let ray = Ray::new_simple(Point3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let mut rng = StdRng::seed_from_u64(1);
        let mut rec = HitRecord::default();
        assert!(list.hit(&ray, Interval::new(0.001, f64::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 3.0).abs() < 1e-9);
        assert_eq!(list.len(), 2);

        // The far sphere alone is still found once the near one is out of range
        let mut rec = HitRecord::default();
        assert!(list.hit(&ray, Interval::new(5.5, f64::INFINITY), &mut rec, &mut rng));
        assert!((rec.t - 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_list_bbox_grows_with_entities() {
        let mut list = EntityList::new();
        assert_eq!(list.bounding_box(), Aabb::EMPTY);

        list.add(Arc::new(Sphere::new(Point3::new(-3.0, 0.0, 0.0), 1.0, gray())));
        list.add(Arc::new(Sphere::new(Point3::new(3.0, 0.0, 0.0), 1.0, gray())));
        let bbox = list.bounding_box();
        assert_eq!(bbox.x, Interval::new(-4.0, 4.0));
        assert!(!list.is_empty());
    }

    #[test]
    fn test_list_pdf_averages_children() {
        let quad = Arc::new(Quad::new(
            Point3::new(-1.0, -1.0, -2.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            gray(),
        ));
        let origin = Point3::ZERO;
        let direction = Vec3::new(0.0, 0.0, -1.0);
        let single = quad.pdf_value(origin, direction);
        assert!(single > 0.0);

        let mut list = EntityList::new();
        list.add(quad.clone());
        list.add(Arc::new(Quad::new(
            Point3::new(10.0, 10.0, 10.0),
            Vec3::X,
            Vec3::Y,
            gray(),
        )));

        // The second quad is never hit along this direction
        assert!((list.pdf_value(origin, direction) - 0.5 * single).abs() < 1e-12);
    }

    #[test]
    fn test_empty_list_defaults() {
        let list = EntityList::new();
        assert_eq!(list.pdf_value(Point3::ZERO, Vec3::Z), 0.0);
        assert_eq!(list.random(Point3::ZERO, &mut StdRng::seed_from_u64(2)), Vec3::X);
    }
}
