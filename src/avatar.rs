//! Avatar descriptor
//!
//! Metadata about the avatar's face mesh: which renderer carries the mouth
//! blendshapes and which blendshape expresses each viseme.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LipsyncError, Result};
use crate::viseme::{Viseme, VISEME_COUNT};

/// Blendshape target metadata of an avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvatarDescriptor {
    /// Display name of the avatar
    #[serde(default)]
    pub name: String,
    /// Path of the face renderer relative to the avatar root
    pub face_mesh_path: String,
    /// Blendshape per viseme; index is the viseme index
    pub viseme_blendshapes: Vec<String>,
}

impl AvatarDescriptor {
    /// Descriptor using the conventional `vrc.v_<viseme>` blendshape names
    pub fn with_standard_blendshapes(face_mesh_path: &str) -> Self {
        Self {
            name: String::new(),
            face_mesh_path: face_mesh_path.to_string(),
            viseme_blendshapes: Viseme::ALL
                .iter()
                .map(|v| format!("vrc.v_{}", v.label().to_lowercase()))
                .collect(),
        }
    }

    /// Load and validate a descriptor from JSON
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
        let descriptor: Self = serde_json::from_reader(BufReader::new(file))?;
        descriptor.validate()?;

        Ok(descriptor)
    }

    /// Check there is a face mesh and exactly one blendshape slot per viseme
    pub fn validate(&self) -> Result<()> {
        if self.face_mesh_path.is_empty() {
            return Err(LipsyncError::InvalidAvatar {
                reason: "face_mesh_path is empty".to_string(),
            });
        }

        if self.viseme_blendshapes.len() != VISEME_COUNT {
            return Err(LipsyncError::InvalidAvatar {
                reason: format!(
                    "expected {} viseme blendshapes, found {}",
                    VISEME_COUNT,
                    self.viseme_blendshapes.len()
                ),
            });
        }

        Ok(())
    }

    /// Blendshape expressing a viseme; empty when the avatar has none
    pub fn blendshape(&self, viseme: Viseme) -> &str {
        self.viseme_blendshapes
            .get(viseme.index())
            .map(String::as_str)
            .unwrap_or("")
    }
}
