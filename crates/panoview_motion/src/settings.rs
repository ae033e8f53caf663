// SPDX-License-Identifier: MIT OR Apache-2.0
//! Motion settings stored as RON.
//!
//! This module manages:
//! - Named controller presets (bounds, initial value, speed)
//! - Default transition parameters for tweens
//! - Loading and saving with a format version check

use crate::easing::Easing;
use crate::motion::MotionController;
use crate::tween::{Tween, TweenBuilder};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "motion.ron";

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON for these settings
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be encoded
    #[error("Encode error: {0}")]
    Encode(#[from] ron::Error),

    /// Written by a newer version
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },

    /// No controller preset with this name
    #[error("Unknown controller: {0}")]
    UnknownController(String),
}

/// Result type for settings operations
pub type Result<T> = std::result::Result<T, SettingsError>;

/// Preset for one motion controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerSettings {
    /// Lower bound, unbounded when absent
    pub min: Option<f64>,
    /// Upper bound, unbounded when absent
    pub max: Option<f64>,
    /// Starting value
    pub initial: f64,
    /// Base speed in units per second
    pub speed: f64,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            min: None,
            max: None,
            initial: 0.0,
            speed: 1.0,
        }
    }
}

impl ControllerSettings {
    /// Create a controller from this preset
    pub fn build(&self) -> MotionController {
        MotionController::new(self.initial)
            .with_bounds(
                self.min.unwrap_or(f64::NEG_INFINITY),
                self.max.unwrap_or(f64::INFINITY),
            )
            .with_speed(self.speed)
    }
}

/// Defaults for tween transitions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// Duration in milliseconds
    pub duration_ms: f64,
    /// Delay in milliseconds
    pub delay_ms: f64,
    /// Easing curve
    pub easing: Easing,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            duration_ms: 300.0,
            delay_ms: 0.0,
            easing: Easing::InOutQuad,
        }
    }
}

impl TransitionSettings {
    /// Start a tween builder with these defaults
    pub fn tween(&self) -> TweenBuilder {
        Tween::builder(self.duration_ms)
            .with_delay(self.delay_ms)
            .with_easing(self.easing)
    }
}

/// All motion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    /// Format version
    pub version: u32,
    /// Controller presets by name
    pub controllers: IndexMap<String, ControllerSettings>,
    /// Tween defaults
    pub transition: TransitionSettings,
}

impl Default for MotionSettings {
    fn default() -> Self {
        let mut controllers = IndexMap::new();
        controllers.insert(
            "yaw".to_string(),
            ControllerSettings {
                speed: std::f64::consts::PI / 2.0,
                ..Default::default()
            },
        );
        controllers.insert(
            "pitch".to_string(),
            ControllerSettings {
                min: Some(-std::f64::consts::FRAC_PI_2),
                max: Some(std::f64::consts::FRAC_PI_2),
                speed: std::f64::consts::PI / 2.0,
                ..Default::default()
            },
        );
        controllers.insert(
            "zoom".to_string(),
            ControllerSettings {
                min: Some(0.0),
                max: Some(100.0),
                initial: 50.0,
                speed: 50.0,
            },
        );

        Self {
            version: SETTINGS_FORMAT_VERSION,
            controllers,
            transition: TransitionSettings::default(),
        }
    }
}

impl MotionSettings {
    /// Parse settings from a RON string
    pub fn from_ron(s: &str) -> Result<Self> {
        let settings: MotionSettings = ron::from_str(s)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Encode settings as pretty RON
    pub fn to_ron(&self) -> Result<String> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, config)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = Self::from_ron(&content).inspect_err(|e| {
            tracing::warn!("Rejected motion settings {:?}: {}", path, e);
        })?;
        tracing::info!(
            "Loaded motion settings from {:?} ({} controllers)",
            path,
            settings.controllers.len()
        );
        Ok(settings)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_ron()?)?;
        tracing::debug!("Saved motion settings to {:?}", path);
        Ok(())
    }

    /// Create the controller preset `name`
    pub fn controller(&self, name: &str) -> Result<MotionController> {
        self.controllers
            .get(name)
            .map(ControllerSettings::build)
            .ok_or_else(|| SettingsError::UnknownController(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::MotionMode;

    #[test]
    fn test_default_settings() {
        let settings = MotionSettings::default();
        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.controllers.len(), 3);
        assert_eq!(settings.transition.easing, Easing::InOutQuad);
    }

    #[test]
    fn test_serialization() {
        let settings = MotionSettings::default();
        let ron_str = settings.to_ron().unwrap();
        let loaded = MotionSettings::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_partial_document_uses_defaults() {
        let settings = MotionSettings::from_ron(
            r#"(
                controllers: {
                    "zoom": (min: Some(0.0), max: Some(10.0), speed: 4.0),
                },
                transition: (easing: outCubic),
            )"#,
        )
        .unwrap();

        assert_eq!(settings.version, SETTINGS_FORMAT_VERSION);
        assert_eq!(settings.transition.easing, Easing::OutCubic);
        assert_eq!(settings.transition.duration_ms, 300.0);

        let zoom = settings.controller("zoom").unwrap();
        assert_eq!(zoom.bounds(), (0.0, 10.0));
        assert_eq!(zoom.speed(), 4.0);
        assert_eq!(zoom.mode(), MotionMode::Stopped);
        assert!(matches!(
            settings.controller("yaw"),
            Err(SettingsError::UnknownController(_))
        ));
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = MotionSettings::from_ron("(version: 99)");
        assert!(matches!(
            result,
            Err(SettingsError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            MotionSettings::from_ron("(transition: (easing: wobble))"),
            Err(SettingsError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "panoview-motion-{}-{}",
            std::process::id(),
            SETTINGS_FILE_NAME
        ));
        let mut settings = MotionSettings::default();
        settings.transition.duration_ms = 750.0;

        settings.save(&path).unwrap();
        let loaded = MotionSettings::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.transition.duration_ms, 750.0);
        assert!(matches!(
            MotionSettings::load(&path),
            Err(SettingsError::Io(_))
        ));
    }

    #[test]
    fn test_transition_tween() {
        let settings = TransitionSettings {
            duration_ms: 100.0,
            delay_ms: 0.0,
            easing: Easing::Linear,
        };
        let mut tween = settings.tween().property("opacity", 0.0, 1.0).build().unwrap();
        tween.tick(50.0);
        assert_eq!(tween.values()["opacity"], 0.5);
    }
}
