//! Probability densities over directions, used for importance sampling.

use crate::entity::Entity;
use crate::sampling;
use lumen_math::{Onb, Point3, Vec3};
use rand::RngCore;
use std::f64::consts::PI;

/// A sampling distribution over directions.
///
/// `generate` draws a direction and `value` reports the density with which
/// `generate` would have produced a given direction.
pub enum Pdf<'a> {
    /// Uniform over the unit sphere
    Sphere,
    /// Cosine-weighted hemisphere around the basis' `w` axis
    Cosine(Onb),
    /// Directions from `origin` toward points on an entity
    Entity {
        entity: &'a dyn Entity,
        origin: Point3,
    },
    /// Equal-weight blend of two densities
    Mixture(Box<Pdf<'a>>, Box<Pdf<'a>>),
}

impl<'a> Pdf<'a> {
    /// Cosine-weighted density around `normal`.
    pub fn cosine(normal: Vec3) -> Self {
        Pdf::Cosine(Onb::new(normal))
    }

    pub fn entity(entity: &'a dyn Entity, origin: Point3) -> Self {
        Pdf::Entity { entity, origin }
    }

    pub fn mixture(a: Pdf<'a>, b: Pdf<'a>) -> Self {
        Pdf::Mixture(Box::new(a), Box::new(b))
    }

    /// Density of `direction` under this distribution.
    pub fn value(&self, direction: Vec3) -> f64 {
        match self {
            Pdf::Sphere => 1.0 / (4.0 * PI),
            Pdf::Cosine(uvw) => {
                let cosine_theta = direction.normalize().dot(uvw.w());
                (cosine_theta / PI).max(0.0)
            }
            Pdf::Entity { entity, origin } => entity.pdf_value(*origin, direction),
            Pdf::Mixture(a, b) => 0.5 * a.value(direction) + 0.5 * b.value(direction),
        }
    }

    /// Draw a direction from this distribution.
    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            Pdf::Sphere => sampling::random_unit_vector(rng),
            Pdf::Cosine(uvw) => uvw.transform(sampling::random_cosine_direction(rng)),
            Pdf::Entity { entity, origin } => entity.random(*origin, rng),
            Pdf::Mixture(a, b) => {
                if sampling::random_f64(rng) < 0.5 {
                    a.generate(rng)
                } else {
                    b.generate(rng)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Lambertian, Material};
    use crate::{Color, Quad};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn test_sphere_pdf_is_uniform() {
        let pdf = Pdf::Sphere;
        assert!((pdf.value(Vec3::X) - 1.0 / (4.0 * PI)).abs() < 1e-12);
        assert_eq!(pdf.value(Vec3::X), pdf.value(-Vec3::Y));
    }

    #[test]
    fn test_cosine_pdf_hemisphere() {
        let pdf = Pdf::cosine(Vec3::Y);
        assert!((pdf.value(Vec3::Y) - 1.0 / PI).abs() < 1e-12);
        assert_eq!(pdf.value(-Vec3::Y), 0.0);

        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let d = pdf.generate(&mut rng);
            assert!(d.dot(Vec3::Y) >= 0.0);
            assert!(pdf.value(d) >= 0.0);
        }
    }

    #[test]
    fn test_mixture_averages_values() {
        let light_material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::ONE));
        let light = Quad::new(
            Point3::new(-1.0, 5.0, -1.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
            light_material,
        );
        let toward_light = Pdf::entity(&light, Point3::ZERO);
        let up = Vec3::Y;
        let light_density = toward_light.value(up);
        assert!(light_density > 0.0);

        let mixed = Pdf::mixture(Pdf::entity(&light, Point3::ZERO), Pdf::cosine(Vec3::Y));
        let expected = 0.5 * light_density + 0.5 / PI;
        assert!((mixed.value(up) - expected).abs() < 1e-12);

        // Samples from the mixture point either toward the light or upward
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..100 {
            assert!(mixed.generate(&mut rng).y > 0.0);
        }
    }
}
