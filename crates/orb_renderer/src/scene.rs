//! Runtime scene: the sphere list the integrator traces against.
//!
//! The scene owns every sphere and, through them, every material and
//! texture. Dropping the scene releases all of it.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use orb_core::{
    MaterialDescription, Palette, SceneDescription, SceneError, TextureCache, TextureDescription,
};
use orb_math::{Interval, Ray, Vec3};

use crate::error::{RenderError, RenderResult};
use crate::hittable::{HitRecord, Hittable};
use crate::material::{Dielectric, Lambertian, Material, Metal};
use crate::sphere::Sphere;
use crate::texture::{ImageTexture, Texture};

/// Nearest intersection and the sphere it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct SceneHit<'a> {
    pub record: HitRecord,
    pub sphere: &'a Sphere,
}

/// A list of spheres.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    /// Create a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sphere to the scene.
    pub fn add(&mut self, sphere: Sphere) {
        self.spheres.push(sphere);
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// Get the number of spheres.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// Check if the scene is empty.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Find the nearest sphere hit strictly inside `ray_t`.
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<SceneHit<'_>> {
        let mut closest: Option<SceneHit<'_>> = None;
        let mut closest_so_far = ray_t.max;

        for sphere in &self.spheres {
            if let Some(record) = sphere.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = record.t;
                closest = Some(SceneHit { record, sphere });
            }
        }

        closest
    }

    /// Build a scene from its description.
    ///
    /// Relative image paths resolve against `base_dir`. Images that fail to
    /// decode are logged and rendered with the fallback color.
    pub fn from_description(desc: &SceneDescription, base_dir: Option<&Path>) -> RenderResult<Self> {
        desc.validate_references()?;

        let mut cache = match base_dir {
            Some(dir) => TextureCache::with_base_dir(dir),
            None => TextureCache::new(),
        };

        let mut materials: BTreeMap<&str, Arc<dyn Material>> = BTreeMap::new();
        for (name, material) in &desc.materials {
            let material = build_material(name, material, &desc.palette, &mut cache)?;
            materials.insert(name.as_str(), material);
        }

        let mut scene = Scene::new();
        for (index, sphere) in desc.spheres.iter().enumerate() {
            let material = match &sphere.material {
                Some(name) => Some(materials.get(name.as_str()).cloned().ok_or_else(|| {
                    SceneError::UnknownMaterial {
                        sphere: index,
                        material: name.clone(),
                    }
                })?),
                None => None,
            };
            let color = desc.palette.resolve(&sphere.color)?;
            let sphere = Sphere::new(Vec3::from_array(sphere.center), sphere.radius, color, material)
                .map_err(|source| RenderError::Geometry {
                    sphere: index,
                    source,
                })?;
            scene.add(sphere);
        }

        log::debug!(
            "Built scene: {} spheres, {} materials, {} images",
            scene.len(),
            materials.len(),
            cache.len()
        );

        Ok(scene)
    }
}

fn build_material(
    name: &str,
    desc: &MaterialDescription,
    palette: &Palette,
    cache: &mut TextureCache,
) -> RenderResult<Arc<dyn Material>> {
    let material: Arc<dyn Material> = match desc {
        MaterialDescription::Lambertian { albedo } => {
            Arc::new(Lambertian::new(build_texture(albedo, palette, cache)?))
        }
        MaterialDescription::Metal { albedo, fuzz } => {
            Arc::new(Metal::new(palette.resolve(albedo)?, *fuzz))
        }
        MaterialDescription::Dielectric { refractive_index } => {
            let dielectric =
                Dielectric::new(*refractive_index).map_err(|source| RenderError::Material {
                    material: name.to_string(),
                    source,
                })?;
            Arc::new(dielectric)
        }
    };
    Ok(material)
}

fn build_texture(
    desc: &TextureDescription,
    palette: &Palette,
    cache: &mut TextureCache,
) -> RenderResult<Arc<Texture>> {
    let texture = match desc {
        TextureDescription::Solid { color } => Texture::Solid(palette.resolve(color)?),
        TextureDescription::Checker { even, odd, scale } => Texture::Checker {
            even: build_texture(even, palette, cache)?,
            odd: build_texture(odd, palette, cache)?,
            scale: *scale,
        },
        TextureDescription::Image { path } => Texture::Image(ImageTexture::load(cache, path)),
    };
    Ok(Arc::new(texture))
}
