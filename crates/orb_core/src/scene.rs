//! Scene description types.
//!
//! This module defines the renderer-agnostic description of a scene: the
//! spheres, the named materials they reference, the camera and the render
//! settings. Descriptions are plain data and round-trip through JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette::{ColorRef, Palette};

/// Errors that can occur while loading or resolving a scene description.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Unknown palette color: {0}")]
    UnknownColor(String),

    #[error("Sphere {sphere} references unknown material '{material}'")]
    UnknownMaterial { sphere: usize, material: String },

    #[error("Failed to read scene file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Scene JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Default frequency of the checker pattern.
pub const DEFAULT_CHECKER_SCALE: f64 = 10.0;

fn default_checker_scale() -> f64 {
    DEFAULT_CHECKER_SCALE
}

/// A texture: "color at surface coordinate".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextureDescription {
    /// Constant color.
    Solid { color: ColorRef },

    /// 3-D checker alternating between two child textures.
    Checker {
        even: Box<TextureDescription>,
        odd: Box<TextureDescription>,
        #[serde(default = "default_checker_scale")]
        scale: f64,
    },

    /// Image file sampled by surface (u, v). Relative paths resolve against
    /// the scene file's directory.
    Image { path: PathBuf },
}

impl TextureDescription {
    /// Constant-color texture.
    pub fn solid(color: impl Into<ColorRef>) -> Self {
        Self::Solid {
            color: color.into(),
        }
    }

    /// Checker texture with the default frequency.
    pub fn checker(even: TextureDescription, odd: TextureDescription) -> Self {
        Self::Checker {
            even: Box::new(even),
            odd: Box::new(odd),
            scale: DEFAULT_CHECKER_SCALE,
        }
    }

    /// Image texture.
    pub fn image(path: impl Into<PathBuf>) -> Self {
        Self::Image { path: path.into() }
    }
}

/// A surface scattering model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialDescription {
    /// Diffuse surface tinted by a texture.
    Lambertian { albedo: TextureDescription },

    /// Reflective surface; `fuzz` is clamped to [0, 1] by the renderer.
    Metal { albedo: ColorRef, fuzz: f64 },

    /// Non-absorbing refractive medium.
    Dielectric { refractive_index: f64 },
}

/// A sphere and the name of its material (none = flat-color terminal surface).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereDescription {
    pub center: [f64; 3],
    pub radius: f64,
    pub color: ColorRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub material: Option<String>,
}

/// Camera placement and lens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    pub eye: [f64; 3],
    pub look_at: [f64; 3],
    #[serde(default = "default_up")]
    pub up: [f64; 3],
    /// Vertical field of view in degrees.
    pub vfov: f64,
    #[serde(default)]
    pub aperture: f64,
    pub focus_distance: f64,
}

fn default_up() -> [f64; 3] {
    [0.0, 1.0, 0.0]
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 0.0],
            look_at: [0.0, 0.0, -1.0],
            up: default_up(),
            vfov: 90.0,
            aperture: 0.0,
            focus_distance: 1.0,
        }
    }
}

/// Color returned for rays that leave the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackgroundDescription {
    Solid { color: ColorRef },
    Gradient { horizon: ColorRef, zenith: ColorRef },
}

impl Default for BackgroundDescription {
    fn default() -> Self {
        Self::Solid {
            color: ColorRef::Rgb([0.0, 0.0, 0.0]),
        }
    }
}

/// Image and sampling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderDescription {
    pub width: u32,
    pub height: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub seed: u64,
    pub bucket_size: u32,
    pub background: BackgroundDescription,
}

impl Default for RenderDescription {
    fn default() -> Self {
        Self {
            width: 400,
            height: 200,
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
            bucket_size: 32,
            background: BackgroundDescription::default(),
        }
    }
}

/// Complete description of a scene and how to render it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub camera: CameraDescription,
    #[serde(default)]
    pub render: RenderDescription,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDescription>,
    #[serde(default)]
    pub spheres: Vec<SphereDescription>,
}

impl SceneDescription {
    /// Parse a scene from a JSON string.
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scene = Self::from_json_str(&json)?;

        log::debug!(
            "Loaded scene {}: {} spheres, {} materials",
            path.display(),
            scene.spheres.len(),
            scene.materials.len()
        );

        Ok(scene)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add a named material, replacing any previous one with that name.
    pub fn add_material(&mut self, name: impl Into<String>, material: MaterialDescription) {
        self.materials.insert(name.into(), material);
    }

    /// Add a sphere.
    pub fn add_sphere(
        &mut self,
        center: [f64; 3],
        radius: f64,
        color: impl Into<ColorRef>,
        material: Option<&str>,
    ) {
        self.spheres.push(SphereDescription {
            center,
            radius,
            color: color.into(),
            material: material.map(str::to_string),
        });
    }

    /// Check that every sphere's material name exists.
    pub fn validate_references(&self) -> SceneResult<()> {
        for (index, sphere) in self.spheres.iter().enumerate() {
            if let Some(name) = &sphere.material {
                if !self.materials.contains_key(name) {
                    return Err(SceneError::UnknownMaterial {
                        sphere: index,
                        material: name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orb_math::Vec3;

    const MINIMAL: &str = r#"{
        "camera": { "eye": [0, 0, 0], "look_at": [0, 0, -1], "vfov": 90, "focus_distance": 1 },
        "render": { "width": 20, "height": 10, "samples_per_pixel": 4 },
        "materials": {
            "floor": {
                "type": "lambertian",
                "albedo": {
                    "type": "checker",
                    "even": { "type": "solid", "color": "white" },
                    "odd": { "type": "solid", "color": [0.2, 0.3, 0.1] }
                }
            },
            "glass": { "type": "dielectric", "refractive_index": 1.5 }
        },
        "spheres": [
            { "center": [0, -100.5, -1], "radius": 100, "color": "white", "material": "floor" },
            { "center": [0, 0, -1], "radius": 0.5, "color": [1, 1, 1], "material": "glass" },
            { "center": [0, 50, 0], "radius": 10, "color": "gray" }
        ]
    }"#;

    #[test]
    fn test_parse_minimal_scene() {
        let scene = SceneDescription::from_json_str(MINIMAL).unwrap();

        assert_eq!(scene.spheres.len(), 3);
        assert_eq!(scene.materials.len(), 2);
        assert_eq!(scene.render.width, 20);
        // Unspecified render fields fall back to defaults
        assert_eq!(scene.render.max_depth, 50);
        assert_eq!(scene.camera.up, [0.0, 1.0, 0.0]);
        assert_eq!(scene.camera.aperture, 0.0);
        assert!(scene.spheres[2].material.is_none());
        assert_eq!(scene.palette, Palette::default());
        scene.validate_references().unwrap();
    }

    #[test]
    fn test_partial_palette_keeps_default_names() {
        let scene = SceneDescription::from_json_str(
            r#"{
                "palette": { "red": [1, 0, 0] },
                "spheres": [{ "center": [0, 0, -1], "radius": 0.5, "color": "white" }]
            }"#,
        )
        .unwrap();

        let red = scene.palette.resolve(&ColorRef::named("red")).unwrap();
        assert_eq!(red, Vec3::new(1.0, 0.0, 0.0));
        let white = scene.palette.resolve(&ColorRef::named(Palette::WHITE)).unwrap();
        assert_eq!(white, Vec3::ONE);
    }

    #[test]
    fn test_checker_scale_default() {
        let scene = SceneDescription::from_json_str(MINIMAL).unwrap();
        match &scene.materials["floor"] {
            MaterialDescription::Lambertian {
                albedo: TextureDescription::Checker { scale, .. },
            } => assert_eq!(*scale, DEFAULT_CHECKER_SCALE),
            other => panic!("unexpected material {other:?}"),
        }
    }

    #[test]
    fn test_json_round_trip() {
        let scene = SceneDescription::from_json_str(MINIMAL).unwrap();
        let json = scene.to_json_string().unwrap();
        assert_eq!(SceneDescription::from_json_str(&json).unwrap(), scene);
    }

    #[test]
    fn test_unknown_material_reference() {
        let mut scene = SceneDescription::default();
        scene.add_sphere([0.0, 0.0, 0.0], 1.0, ColorRef::named("white"), Some("missing"));

        let err = scene.validate_references().unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnknownMaterial { sphere: 0, ref material } if material == "missing"
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = SceneDescription::from_json_file("/nonexistent/scene.json").unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }

    #[test]
    fn test_bad_json() {
        let err = SceneDescription::from_json_str("{ \"spheres\": 3 }").unwrap_err();
        assert!(matches!(err, SceneError::Json(_)));
    }
}
