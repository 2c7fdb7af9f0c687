//! Named color table used while building scenes.

use std::collections::BTreeMap;

use orb_math::Vec3;
use serde::{Deserialize, Deserializer, Serialize};

use crate::scene::{SceneError, SceneResult};

/// A color given either as literal RGB components or as a palette name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorRef {
    Rgb([f64; 3]),
    Named(String),
}

impl ColorRef {
    /// Reference a palette entry by name.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Literal color.
    pub fn rgb(color: Vec3) -> Self {
        Self::Rgb(color.to_array())
    }
}

impl From<Vec3> for ColorRef {
    fn from(color: Vec3) -> Self {
        Self::rgb(color)
    }
}

/// Named colors available to a scene description.
///
/// The default palette holds the colors used by the showcase scene. A scene
/// file may override or extend its entries; defaults it does not mention
/// remain available.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Palette {
    colors: BTreeMap<String, [f64; 3]>,
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, [f64; 3]>::deserialize(deserializer)?;
        let mut palette = Palette::default();
        palette.colors.extend(entries);
        Ok(palette)
    }
}

impl Palette {
    pub const WHITE: &'static str = "white";
    pub const WHITE_GRAY: &'static str = "white_gray";
    pub const GRAY: &'static str = "gray";
    pub const SILVER: &'static str = "silver";
    pub const BLACK: &'static str = "black";
    pub const BLUE: &'static str = "blue";
    pub const PURPLE: &'static str = "purple";

    /// Create an empty palette.
    pub fn empty() -> Self {
        Self {
            colors: BTreeMap::new(),
        }
    }

    /// Builder method to add or replace a color.
    pub fn with(mut self, name: impl Into<String>, color: Vec3) -> Self {
        self.insert(name, color);
        self
    }

    /// Add or replace a color.
    pub fn insert(&mut self, name: impl Into<String>, color: Vec3) {
        self.colors.insert(name.into(), color.to_array());
    }

    /// Look up a color by name.
    pub fn get(&self, name: &str) -> Option<Vec3> {
        self.colors.get(name).map(|c| Vec3::from_array(*c))
    }

    /// Resolve a color reference against this palette.
    pub fn resolve(&self, color: &ColorRef) -> SceneResult<Vec3> {
        match color {
            ColorRef::Rgb(rgb) => Ok(Vec3::from_array(*rgb)),
            ColorRef::Named(name) => self
                .get(name)
                .ok_or_else(|| SceneError::UnknownColor(name.clone())),
        }
    }

    /// Number of named colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the palette has no colors.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::empty()
            .with(Self::WHITE, Vec3::new(1.0, 1.0, 1.0))
            .with(Self::WHITE_GRAY, Vec3::new(0.9, 0.9, 0.9))
            .with(Self::GRAY, Vec3::new(0.5, 0.5, 0.5))
            .with(Self::SILVER, Vec3::new(0.75, 0.75, 0.75))
            .with(Self::BLACK, Vec3::ZERO)
            .with(Self::BLUE, Vec3::new(0.0, 0.75, 1.0))
            .with(Self::PURPLE, Vec3::new(0.5, 0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.len(), 7);
        assert_eq!(palette.get(Palette::BLUE), Some(Vec3::new(0.0, 0.75, 1.0)));
        assert_eq!(palette.get(Palette::BLACK), Some(Vec3::ZERO));
    }

    #[test]
    fn test_resolve() {
        let palette = Palette::default();
        let gray = palette.resolve(&ColorRef::named(Palette::GRAY)).unwrap();
        assert_eq!(gray, Vec3::splat(0.5));

        let literal = palette.resolve(&ColorRef::Rgb([0.1, 0.2, 0.3])).unwrap();
        assert_eq!(literal, Vec3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_resolve_unknown_name() {
        let err = Palette::empty()
            .resolve(&ColorRef::named("chartreuse"))
            .unwrap_err();
        assert!(matches!(err, SceneError::UnknownColor(name) if name == "chartreuse"));
    }

    #[test]
    fn test_color_ref_json_forms() {
        let named: ColorRef = serde_json::from_str("\"silver\"").unwrap();
        assert_eq!(named, ColorRef::named("silver"));

        let rgb: ColorRef = serde_json::from_str("[1.0, 0.0, 0.5]").unwrap();
        assert_eq!(rgb, ColorRef::Rgb([1.0, 0.0, 0.5]));
    }

    #[test]
    fn test_file_palette_extends_defaults() {
        let palette: Palette =
            serde_json::from_str(r#"{"red": [1, 0, 0], "gray": [0.25, 0.25, 0.25]}"#).unwrap();

        assert_eq!(palette.len(), 8);
        assert_eq!(palette.get("red"), Some(Vec3::new(1.0, 0.0, 0.0)));
        assert_eq!(palette.get(Palette::GRAY), Some(Vec3::splat(0.25)));
        assert_eq!(palette.get(Palette::WHITE), Some(Vec3::ONE));
    }
}
