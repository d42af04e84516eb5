//! Lipsync layer configuration
//!
//! Loaded from a JSON file. Every field has a default so a partial file
//! (or `{}`) is a valid configuration.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LipsyncError, Result};
use crate::graph::AvatarMask;
use crate::viseme::VisemeTweakTable;

/// Default decision boundary between the regular and wide signal regimes
pub const DEFAULT_ANALOG_THRESHOLD: f32 = 0.95;

/// Default base transition duration, in seconds
pub const DEFAULT_TRANSITION_DURATION: f32 = 0.1;

/// Configuration of the limited-lipsync override layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LipsyncLayerConfig {
    /// Analog signal value separating regular (below) from wide (above)
    pub analog_threshold: f32,
    /// Mask applied to the generated layer, passed through untouched
    pub mask: AvatarMask,
    /// Base transition duration in seconds
    pub transition_duration: f32,
    /// Global scale applied to every wide clip amplitude
    pub amplitude_scale: f32,
    /// Whether viseme states write default values on entry
    pub write_defaults: bool,
    /// Per-viseme amplitude and transition tweaks
    pub tweaks: VisemeTweakTable,
}

impl Default for LipsyncLayerConfig {
    fn default() -> Self {
        Self {
            analog_threshold: DEFAULT_ANALOG_THRESHOLD,
            mask: AvatarMask::default(),
            transition_duration: DEFAULT_TRANSITION_DURATION,
            amplitude_scale: 1.0,
            write_defaults: false,
            tweaks: VisemeTweakTable::default(),
        }
    }
}

impl LipsyncLayerConfig {
    /// Load a configuration file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(LipsyncError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let file = File::open(path).map_err(|e| LipsyncError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;

        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| LipsyncError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Check value ranges
    ///
    /// # Errors
    /// `InvalidConfig` when the threshold is outside `0..=1`, or when a
    /// duration, scale or tweak is negative or not finite.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.analog_threshold) {
            return Err(invalid(format!(
                "analog_threshold must be between 0 and 1, got {}",
                self.analog_threshold
            )));
        }
        check_non_negative("transition_duration", self.transition_duration)?;
        check_non_negative("amplitude_scale", self.amplitude_scale)?;

        for (viseme, tweak) in self.tweaks.iter() {
            check_non_negative(&format!("tweaks[{}].amplitude", viseme.index()), tweak.amplitude)?;
            check_non_negative(
                &format!("tweaks[{}].transition_factor", viseme.index()),
                tweak.transition_factor,
            )?;
        }

        Ok(())
    }
}

fn check_non_negative(field: &str, value: f32) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(invalid(format!(
            "{} must be a finite non-negative number, got {}",
            field, value
        )));
    }
    Ok(())
}

fn invalid(reason: String) -> LipsyncError {
    LipsyncError::InvalidConfig { reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viseme::{Viseme, VisemeTweak};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_default_is_valid() {
        LipsyncLayerConfig::default().validate().unwrap();
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: LipsyncLayerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, LipsyncLayerConfig::default());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lipsync.json");

        let mut config = LipsyncLayerConfig {
            analog_threshold: 0.8,
            mask: AvatarMask::new("FaceOnly"),
            write_defaults: true,
            ..Default::default()
        };
        config.tweaks.set(Viseme::Oh, VisemeTweak::new(0.3, 1.5));

        config.save(&path).unwrap();
        let loaded = LipsyncLayerConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_threshold_out_of_range() {
        let config = LipsyncLayerConfig {
            analog_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(LipsyncError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_negative_tweak_rejected() {
        let mut config = LipsyncLayerConfig::default();
        config.tweaks.set(Viseme::Aa, VisemeTweak::new(1.0, -2.0));

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("tweaks[10].transition_factor"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = LipsyncLayerConfig::load(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(LipsyncError::FileNotFound { .. })));
    }
}
