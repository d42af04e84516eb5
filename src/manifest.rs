//! Gesture manifests and their bindings
//!
//! A manifest lists the gesture animations of one activity. The lipsync
//! override layer is only needed when some bound manifest asks for limited
//! lipsync on at least one of its animations.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LipsyncError, Result};

/// Anything that can ask for the limited-lipsync layer
pub trait RequiresLimitedLipsync {
    fn requires_limited_lipsync(&self) -> bool;
}

/// One gesture animation of a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureAnimation {
    pub name: String,
    /// Whether this animation restricts the mouth while it plays
    #[serde(default)]
    pub limited_lipsync: bool,
}

/// Gesture animations of one activity
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub name: String,
    #[serde(default)]
    pub animations: Vec<GestureAnimation>,
}

impl RequiresLimitedLipsync for Manifest {
    fn requires_limited_lipsync(&self) -> bool {
        self.animations.iter().any(|a| a.limited_lipsync)
    }
}

/// A manifest bound to an activity stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestBinding {
    /// Stage value that activates the manifest; `None` for the default stage
    #[serde(default)]
    pub stage_value: Option<u32>,
    pub manifest: Manifest,
}

impl RequiresLimitedLipsync for ManifestBinding {
    fn requires_limited_lipsync(&self) -> bool {
        self.manifest.requires_limited_lipsync()
    }
}

/// True iff at least one binding requires limited lipsync
pub fn requires_generation<B: RequiresLimitedLipsync>(bindings: &[B]) -> bool {
    bindings.iter().any(|b| b.requires_limited_lipsync())
}

/// Load a JSON array of bindings
pub fn load_bindings(path: &Path) -> Result<Vec<ManifestBinding>> {
    if !path.exists() {
        return Err(LipsyncError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| LipsyncError::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(limited: &[bool]) -> ManifestBinding {
        ManifestBinding {
            stage_value: None,
            manifest: Manifest {
                name: "Activity".to_string(),
                animations: limited
                    .iter()
                    .enumerate()
                    .map(|(i, &limited_lipsync)| GestureAnimation {
                        name: format!("Gesture {}", i),
                        limited_lipsync,
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn test_no_bindings() {
        assert!(!requires_generation::<ManifestBinding>(&[]));
    }

    #[test]
    fn test_any_binding_requires() {
        let bindings = vec![binding(&[false, false]), binding(&[false, true])];
        assert!(requires_generation(&bindings));
    }

    #[test]
    fn test_none_require() {
        let bindings = vec![binding(&[false]), binding(&[])];
        assert!(!requires_generation(&bindings));
    }

    #[test]
    fn test_limited_lipsync_defaults_to_false() {
        let animation: GestureAnimation = serde_json::from_str(r#"{"name": "Fist"}"#).unwrap();
        assert!(!animation.limited_lipsync);
    }
}
