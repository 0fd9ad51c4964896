//! Material trait for surface scattering.

use crate::entity::HitRecord;
use crate::pdf::Pdf;
use crate::sampling;
use crate::texture::{SolidColor, Texture};
use lumen_math::{near_zero, reflect, refract, Color, Point3, Ray};
use rand::RngCore;
use std::f64::consts::PI;
use std::sync::Arc;

/// Outcome of a ray scattering off a surface.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    /// Color filter applied to light arriving along `scattered`
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult>;

    /// Light emitted at the given surface coordinates. Black unless the
    /// material is a light source.
    fn emitted(&self, _u: f64, _v: f64, _p: Point3) -> Color {
        Color::ZERO
    }

    /// Density with which this material scatters `ray_in` into `scattered`.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f64 {
        0.0
    }

    /// Distribution to importance-sample scattered directions from.
    ///
    /// `None` for specular materials, whose single scattered direction is
    /// used as is.
    fn sampling_pdf(&self, _rec: &HitRecord) -> Option<Pdf<'static>> {
        None
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    texture: Arc<dyn Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn with_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Lambertian {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + sampling::random_unit_vector(rng);

        // Catch degenerate scatter direction
        if near_zero(scatter_direction) {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction, ray_in.time()),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f64 {
        let cos_theta = rec.normal.dot(scattered.direction().normalize());
        (cos_theta / PI).max(0.0)
    }

    fn sampling_pdf(&self, rec: &HitRecord) -> Option<Pdf<'static>> {
        Some(Pdf::cosine(rec.normal))
    }
}

/// Metal (specular) material.
pub struct Metal {
    albedo: Color,
    fuzz: f64,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f64) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction(), rec.normal);
        let direction = if self.fuzz > 0.0 {
            reflected.normalize() + self.fuzz * sampling::random_unit_vector(rng)
        } else {
            reflected
        };

        // Fuzzed below the surface: absorbed
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterResult {
            attenuation: self.albedo,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Dielectric (glass) material.
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance
    fn reflectance(cosine: f64, ior: f64) -> f64 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection
        let cannot_refract = refraction_ratio * sin_theta >= 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > sampling::random_f64(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction, ray_in.time()),
        })
    }
}

/// Diffuse light emitter.
pub struct DiffuseLight {
    texture: Arc<dyn Texture>,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(emit)))
    }

    pub fn with_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for DiffuseLight {
    fn scatter(&self, _ray_in: &Ray, _rec: &HitRecord, _rng: &mut dyn RngCore) -> Option<ScatterResult> {
        None
    }

    fn emitted(&self, u: f64, v: f64, p: Point3) -> Color {
        self.texture.value(u, v, p)
    }
}

/// Phase function of a participating medium: scatters uniformly in all
/// directions.
pub struct Isotropic {
    texture: Arc<dyn Texture>,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::with_texture(Arc::new(SolidColor::new(albedo)))
    }

    pub fn with_texture(texture: Arc<dyn Texture>) -> Self {
        Self { texture }
    }
}

impl Material for Isotropic {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
        Some(ScatterResult {
            attenuation: self.texture.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, sampling::random_unit_vector(rng), ray_in.time()),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f64 {
        1.0 / (4.0 * PI)
    }

    fn sampling_pdf(&self, _rec: &HitRecord) -> Option<Pdf<'static>> {
        Some(Pdf::Sphere)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Hit record on the z = 0 plane facing +z.
    fn record(front_face: bool) -> HitRecord<'static> {
        HitRecord {
            p: Point3::ZERO,
            normal: if front_face { Vec3::Z } else { -Vec3::Z },
            front_face,
            ..HitRecord::default()
        }
    }

    #[test]
    fn test_lambertian_scatters_above_surface() {
        let mut rng = StdRng::seed_from_u64(1);
        let material = Lambertian::new(Color::new(0.2, 0.4, 0.6));
        let ray_in = Ray::new(Point3::new(0.0, 0.0, 1.0), -Vec3::Z, 0.25);
        let rec = record(true);

        for _ in 0..100 {
            let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.2, 0.4, 0.6));
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
            assert_eq!(result.scattered.time(), 0.25);
            assert!(material.scattering_pdf(&ray_in, &rec, &result.scattered) >= 0.0);
        }

        let straight_up = Ray::new_simple(Point3::ZERO, Vec3::Z);
        assert!((material.scattering_pdf(&ray_in, &rec, &straight_up) - 1.0 / PI).abs() < 1e-12);
    }

    #[test]
    fn test_metal_without_fuzz_is_exact_mirror() {
        let mut rng = StdRng::seed_from_u64(4);
        let material = Metal::new(Color::ONE, 0.0);
        let d = Vec3::new(1.0, 0.0, -2.0);
        let ray_in = Ray::new_simple(Point3::new(-1.0, 0.0, 2.0), d);
        let rec = record(true);

        let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
        assert_eq!(result.scattered.direction(), reflect(d, rec.normal));
        assert_eq!(result.scattered.direction(), Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let material = Metal::new(Color::ONE, 5.0);
        assert_eq!(material.fuzz, 1.0);
    }

    #[test]
    fn test_dielectric_unit_ior_does_not_bend() {
        let mut rng = StdRng::seed_from_u64(2);
        let material = Dielectric::new(1.0);

        for i in 1..40 {
            let angle = i as f64 * 0.03;
            let d = Vec3::new(angle.sin(), 0.0, -angle.cos());
            let ray_in = Ray::new_simple(Point3::new(0.0, 0.0, 1.0), d);
            let result = material.scatter(&ray_in, &record(true), &mut rng).unwrap();
            let out = result.scattered.direction();

            assert_eq!(result.attenuation, Color::ONE);
            // Either a Schlick reflection or a straight pass-through
            if out.z < 0.0 {
                assert!((out - d).length() < 1e-9);
            } else {
                assert!((out - Vec3::new(d.x, 0.0, -d.z)).length() < 1e-9);
            }
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mut rng = StdRng::seed_from_u64(3);
        let material = Dielectric::new(1.5);
        // Leaving glass at 60 degrees: 1.5 * sin(60) > 1
        let d = Vec3::new(60f64.to_radians().sin(), 0.0, 60f64.to_radians().cos());
        let ray_in = Ray::new_simple(Point3::new(0.0, 0.0, -1.0), d);

        let result = material.scatter(&ray_in, &record(false), &mut rng).unwrap();
        assert!(result.scattered.direction().z < 0.0);
    }

    #[test]
    fn test_diffuse_light_emits_without_scattering() {
        let mut rng = StdRng::seed_from_u64(6);
        let light = DiffuseLight::new(Color::splat(4.0));
        let ray_in = Ray::new_simple(Point3::new(0.0, 0.0, 1.0), -Vec3::Z);
        assert!(light.scatter(&ray_in, &record(true), &mut rng).is_none());
        assert_eq!(light.emitted(0.0, 0.0, Point3::ZERO), Color::splat(4.0));
        assert_eq!(Lambertian::new(Color::ONE).emitted(0.0, 0.0, Point3::ZERO), Color::ZERO);
    }

    #[test]
    fn test_isotropic_density() {
        let mut rng = StdRng::seed_from_u64(8);
        let material = Isotropic::new(Color::ONE);
        let ray_in = Ray::new_simple(Point3::ZERO, Vec3::X);
        let rec = record(true);
        let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
        assert!((result.scattered.direction().length() - 1.0).abs() < 1e-9);
        assert!((material.scattering_pdf(&ray_in, &rec, &result.scattered) - 0.25 / PI).abs() < 1e-12);
        assert!(matches!(material.sampling_pdf(&rec), Some(Pdf::Sphere)));
    }
}
