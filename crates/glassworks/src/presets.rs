//! Scene presets: TOML files overriding a scene's starting state.
//!
//! A preset may pin the geometry, the dispersion loop count, the backdrop
//! text, and any subset of the optical parameters by their control names.
//! Unknown keys are rejected rather than ignored so a typo in a tuning file
//! surfaces immediately; values out of range clamp the same way the control
//! panel does.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use optics::{OpticalParams, DESCRIPTORS};
use renderer::geometry::Shape;

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("failed to read preset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse preset: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("preset names unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("preset names unknown shape '{0}'")]
    UnknownShape(String),
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenePreset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loop_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_text: Option<String>,
    /// Optical parameter overrides keyed by control name (`ior-red`,
    /// `saturation`, ...).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f32>,
}

impl ScenePreset {
    pub fn parse(input: &str) -> Result<Self, PresetError> {
        let preset: ScenePreset = toml::from_str(input)?;
        preset.validate()?;
        Ok(preset)
    }

    pub fn load(path: &Path) -> Result<Self, PresetError> {
        let contents = fs::read_to_string(path).map_err(|source| PresetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    fn validate(&self) -> Result<(), PresetError> {
        for name in self.params.keys() {
            if !DESCRIPTORS.iter().any(|desc| desc.name == name) {
                return Err(PresetError::UnknownParameter(name.clone()));
            }
        }
        if let Some(shape) = &self.shape {
            shape
                .parse::<Shape>()
                .map_err(|_| PresetError::UnknownShape(shape.clone()))?;
        }
        Ok(())
    }

    pub fn shape(&self) -> Option<Shape> {
        // Validated at parse time.
        self.shape.as_deref().and_then(|name| name.parse().ok())
    }

    /// Writes every override into the live parameter set, clamped to the
    /// control ranges.
    pub fn apply_params(&self, params: &mut OpticalParams) {
        for desc in DESCRIPTORS {
            if let Some(&value) = self.params.get(desc.name) {
                params.set(desc.slot, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use optics::ParamSlot;

    #[test]
    fn full_preset_parses() {
        let preset = ScenePreset::parse(
            r#"
            shape = "sphere"
            loop_count = 8
            backdrop_text = "GLASS"

            [params]
            ior-red = 1.2
            saturation = 1.5
            "#,
        )
        .unwrap();
        assert_eq!(preset.shape(), Some(Shape::Sphere));
        assert_eq!(preset.loop_count, Some(8));
        assert_eq!(preset.backdrop_text.as_deref(), Some("GLASS"));
        assert_eq!(preset.params.len(), 2);
    }

    #[test]
    fn round_trips_through_serde() {
        let original = ScenePreset::parse(
            r#"
            shape = "torus"

            [params]
            fresnel-power = 6.0
            nacre = 0.25
            "#,
        )
        .unwrap();
        let serialized = toml::to_string(&original).unwrap();
        let reparsed = ScenePreset::parse(&serialized).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn unknown_top_level_keys_are_rejected() {
        let error = ScenePreset::parse("shininess = 10.0\n").unwrap_err();
        assert!(matches!(error, PresetError::Parse(_)), "{error}");
    }

    #[test]
    fn unknown_parameter_names_are_rejected() {
        let error = ScenePreset::parse("[params]\nrefraction-index = 1.5\n").unwrap_err();
        match error {
            PresetError::UnknownParameter(name) => assert_eq!(name, "refraction-index"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn unknown_shape_is_rejected() {
        let error = ScenePreset::parse("shape = \"teapot\"\n").unwrap_err();
        assert!(matches!(error, PresetError::UnknownShape(_)));
    }

    #[test]
    fn applied_values_clamp_to_the_control_ranges() {
        let preset = ScenePreset::parse("[params]\nior-red = 9.0\nsaturation = -3.0\n").unwrap();
        let mut params = OpticalParams::default();
        preset.apply_params(&mut params);
        assert_eq!(params.get(ParamSlot::IorR), 2.0);
        assert_eq!(params.get(ParamSlot::Saturation), 0.0);
    }

    #[test]
    fn empty_preset_changes_nothing() {
        let preset = ScenePreset::parse("").unwrap();
        let mut params = OpticalParams::default();
        preset.apply_params(&mut params);
        assert_eq!(params, OpticalParams::default());
        assert_eq!(preset.shape(), None);
    }

    #[test]
    fn loads_from_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        std::fs::write(&path, "shape = \"dodecahedron\"\n\n[params]\nior-red = 1.3\n").unwrap();
        let preset = ScenePreset::load(&path).unwrap();
        assert_eq!(preset.shape(), Some(Shape::Dodecahedron));
        let mut params = OpticalParams::default();
        preset.apply_params(&mut params);
        assert!((params.get(ParamSlot::IorR) - 1.3).abs() < 1e-6);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match ScenePreset::load(&path) {
            Err(PresetError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result {other:?}"),
        }
    }
}
