//! Material trait for surface scattering.

use std::fmt::Debug;
use std::sync::Arc;

use orb_math::{Ray, Vec3, Vec3Ext};
use rand::RngCore;
use thiserror::Error;

use crate::hittable::HitRecord;
use crate::sampling::{gen_f64, random_in_unit_sphere, random_unit_vector};
use crate::texture::Texture;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Reasons a material cannot be constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MaterialError {
    #[error("Refractive index must be positive and finite, got {0}")]
    InvalidRefractiveIndex(f64),
}

/// Outcome of a successful scatter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterResult {
    /// Per-channel fraction of light carried along `scattered`
    pub attenuation: Color,
    /// Outgoing ray, starting at the hit point
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
///
/// Materials hold only their construction parameters; all randomness comes
/// from the generator passed to `scatter`.
pub trait Material: Debug + Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns the attenuation and outgoing ray, or `None` if the ray is
    /// absorbed.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore)
        -> Option<ScatterResult>;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Arc<Texture>,
}

impl Lambertian {
    /// Create a new Lambertian material tinted by a texture.
    pub fn new(albedo: Arc<Texture>) -> Self {
        Self { albedo }
    }

    /// Lambertian with a constant albedo.
    pub fn solid(albedo: Color) -> Self {
        Self::new(Arc::new(Texture::Solid(albedo)))
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.near_zero() {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
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

    pub fn fuzz(&self) -> f64 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let reflected = reflect(ray_in.direction().unit(), rec.normal);
        let scattered_dir = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Only scatter if the reflected ray is in the same hemisphere as the normal
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.albedo,
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f64,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f64) -> Result<Self, MaterialError> {
        if !(ior.is_finite() && ior > 0.0) {
            return Err(MaterialError::InvalidRefractiveIndex(ior));
        }
        Ok(Self { ior })
    }

    /// Schlick's approximation for reflectance
    pub fn reflectance(cosine: f64, eta: f64) -> f64 {
        let r0 = ((1.0 - eta) / (1.0 + eta)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let eta = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().unit();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

        // Total internal reflection; no random draw
        let cannot_refract = eta * sin_theta > 1.0;

        let direction =
            if cannot_refract || gen_f64(rng) < Self::reflectance(cos_theta, eta) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, eta)
            };

        Some(ScatterResult {
            attenuation: Color::ONE,
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index `eta`.
#[inline]
pub fn refract(uv: Vec3, n: Vec3, eta: f64) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = eta * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Hit on the front of a surface facing +Z at the origin.
    fn front_hit() -> HitRecord {
        HitRecord {
            p: Vec3::ZERO,
            normal: Vec3::Z,
            u: 0.25,
            v: 0.75,
            t: 1.0,
            front_face: true,
        }
    }

    #[test]
    fn test_lambertian_always_scatters() {
        let mut rng = StdRng::seed_from_u64(1);
        let mat = Lambertian::solid(Color::new(0.8, 0.3, 0.3));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.3, 0.0, -1.0));

        for _ in 0..1000 {
            let result = mat.scatter(&ray, &front_hit(), &mut rng).expect("must scatter");
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.3));
            assert_eq!(result.scattered.origin(), Vec3::ZERO);
            // normal + unit vector never points below the surface
            assert!(result.scattered.direction().dot(Vec3::Z) >= 0.0);
            assert!(!result.scattered.direction().near_zero());
        }
    }

    #[test]
    fn test_lambertian_samples_texture_at_hit() {
        let mut rng = StdRng::seed_from_u64(2);
        let checker = Texture::checker(
            Arc::new(Texture::Solid(Color::ONE)),
            Arc::new(Texture::Solid(Color::ZERO)),
        );
        let mat = Lambertian::new(Arc::new(checker));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z);

        // p = origin: sines product is zero, even side
        let result = mat.scatter(&ray, &front_hit(), &mut rng).unwrap();
        assert_eq!(result.attenuation, Color::ONE);
    }

    #[test]
    fn test_metal_mirror_reflects() {
        let mut rng = StdRng::seed_from_u64(3);
        let mat = Metal::new(Color::new(0.9, 0.8, 0.7), 0.0);
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, -1.0));

        let result = mat.scatter(&ray, &front_hit(), &mut rng).unwrap();
        let expected = Vec3::new(1.0, 0.0, 1.0).unit();
        assert!((result.scattered.direction() - expected).length() < 1e-12);
        assert_eq!(result.attenuation, Color::new(0.9, 0.8, 0.7));
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        assert_eq!(Metal::new(Color::ONE, 3.0).fuzz(), 1.0);
        assert_eq!(Metal::new(Color::ONE, -1.0).fuzz(), 0.0);
    }

    #[test]
    fn test_metal_absorbs_exactly_below_surface() {
        let mut rng = StdRng::seed_from_u64(4);
        let mat = Metal::new(Color::ONE, 1.0);
        // Grazing incidence makes many fuzzed reflections dip below the surface
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.05), Vec3::new(1.0, 0.0, -0.05));

        let mut absorbed = 0;
        for _ in 0..2000 {
            match mat.scatter(&ray, &front_hit(), &mut rng) {
                Some(result) => assert!(result.scattered.direction().dot(Vec3::Z) > 0.0),
                None => absorbed += 1,
            }
        }
        assert!(absorbed > 0);
        assert!(absorbed < 2000);

        // A mirror reflection tangent to the surface has zero dot and is absorbed
        let tangent = Ray::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::X);
        let mirror = Metal::new(Color::ONE, 0.0);
        assert!(mirror.scatter(&tangent, &front_hit(), &mut rng).is_none());
    }

    #[test]
    fn test_dielectric_rejects_bad_index() {
        assert_eq!(
            Dielectric::new(0.0).unwrap_err(),
            MaterialError::InvalidRefractiveIndex(0.0)
        );
        assert!(Dielectric::new(-1.5).is_err());
        assert!(Dielectric::new(f64::NAN).is_err());
        assert!(Dielectric::new(f64::INFINITY).is_err());
        assert!(Dielectric::new(1.0).is_ok());
    }

    #[test]
    fn test_dielectric_always_scatters_without_absorbing() {
        let mut rng = StdRng::seed_from_u64(5);
        let mat = Dielectric::new(1.5).unwrap();
        let ray = Ray::new(Vec3::new(0.5, 0.0, 1.0), Vec3::new(-0.5, 0.0, -1.0));

        for front_face in [true, false] {
            let rec = HitRecord {
                front_face,
                ..front_hit()
            };
            for _ in 0..200 {
                let result = mat.scatter(&ray, &rec, &mut rng).expect("must scatter");
                assert_eq!(result.attenuation, Color::ONE);
            }
        }
    }

    #[test]
    fn test_dielectric_normal_incidence_reflectance() {
        let eta = 1.0 / 1.5;
        let r0 = Dielectric::reflectance(1.0, eta);
        assert!((r0 - 0.04).abs() < 1e-12);
        // Same for the inverse ratio
        assert!((Dielectric::reflectance(1.0, 1.5) - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_dielectric_normal_incidence_reflect_rate() {
        let mut rng = StdRng::seed_from_u64(6);
        let mat = Dielectric::new(1.5).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z);

        let trials = 20_000;
        let reflected = (0..trials)
            .filter(|_| {
                let result = mat.scatter(&ray, &front_hit(), &mut rng).unwrap();
                result.scattered.direction().z > 0.0
            })
            .count();
        let rate = reflected as f64 / trials as f64;
        assert!((rate - 0.04).abs() < 0.01, "rate = {rate}");
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let mut rng = StdRng::seed_from_u64(7);
        let mat = Dielectric::new(1.5).unwrap();
        // Inside the glass, steep angle: eta * sin_theta > 1
        let rec = HitRecord {
            front_face: false,
            ..front_hit()
        };
        let ray = Ray::new(Vec3::new(-1.0, 0.0, 0.2), Vec3::new(1.0, 0.0, -0.2));

        for _ in 0..100 {
            let result = mat.scatter(&ray, &rec, &mut rng).unwrap();
            let expected = reflect(ray.direction().unit(), Vec3::Z);
            assert!((result.scattered.direction() - expected).length() < 1e-12);
        }
    }

    #[test]
    fn test_refract_straight_through() {
        let out = refract(-Vec3::Z, Vec3::Z, 1.0 / 1.5);
        assert!((out - (-Vec3::Z)).length() < 1e-12);
    }

    #[test]
    fn test_refract_bends_toward_normal() {
        let incoming = Vec3::new(1.0, 0.0, -1.0).unit();
        let out = refract(incoming, Vec3::Z, 1.0 / 1.5);

        assert!((out.length() - 1.0).abs() < 1e-12);
        // Snell: sin_out = eta * sin_in
        let sin_in = incoming.x;
        assert!((out.x - sin_in / 1.5).abs() < 1e-12);
    }
}
