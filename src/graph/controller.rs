//! Animator controller container
//!
//! Layers are kept in blend order. Replacing a layer keeps its index so that
//! regenerating one layer never reshuffles the others.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::machine::StateMachine;
use crate::error::{LipsyncError, Result};

/// Opaque avatar mask handle, passed through to the layer untouched
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarMask(String);

impl AvatarMask {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Type of an animator parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    Int,
    Float,
    Bool,
    Trigger,
}

/// A named, typed animator parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub kind: ParameterKind,
}

/// A named, weighted, masked layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimatorLayer {
    pub name: String,
    pub weight: f32,
    pub mask: AvatarMask,
    pub machine: StateMachine,
}

/// Container seam the generator writes layers and parameters through
pub trait AnimatorGraph {
    /// Recreate the named layer empty, at its current index if it exists
    fn create_or_replace_layer(
        &mut self,
        name: &str,
        weight: f32,
        mask: &AvatarMask,
    ) -> Result<&mut StateMachine>;

    /// Remove the named layer; returns whether a layer was removed
    fn remove_layer_if_exists(&mut self, name: &str) -> Result<bool>;

    /// Declare a parameter, leaving an existing one of the same kind in place
    fn ensure_parameter(&mut self, name: &str, kind: ParameterKind) -> Result<()>;
}

/// In-memory animator controller, persisted as JSON
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimatorController {
    pub name: String,
    parameters: Vec<Parameter>,
    layers: Vec<AnimatorLayer>,
}

impl AnimatorController {
    /// Create an empty controller
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            layers: Vec::new(),
        }
    }

    /// Load a controller from a JSON file
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
        let controller = serde_json::from_reader(BufReader::new(file))?;
        Ok(controller)
    }

    /// Load a controller, or start an empty one named after the file
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            return Self::load(path);
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(name))
    }

    /// Save the controller as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| LipsyncError::FileWriteError {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Append a layer at the end of the blend order
    pub fn add_layer(&mut self, name: &str, weight: f32, mask: AvatarMask) -> &mut StateMachine {
        self.layers.push(AnimatorLayer {
            name: name.to_string(),
            weight,
            mask,
            machine: StateMachine::new(),
        });
        let last = self.layers.len() - 1;
        &mut self.layers[last].machine
    }

    pub fn layers(&self) -> &[AnimatorLayer] {
        &self.layers
    }

    pub fn layer(&self, name: &str) -> Option<&AnimatorLayer> {
        self.layers.iter().find(|l| l.name == name)
    }

    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

impl AnimatorGraph for AnimatorController {
    fn create_or_replace_layer(
        &mut self,
        name: &str,
        weight: f32,
        mask: &AvatarMask,
    ) -> Result<&mut StateMachine> {
        let layer = AnimatorLayer {
            name: name.to_string(),
            weight,
            mask: mask.clone(),
            machine: StateMachine::new(),
        };

        let index = match self.layer_index(name) {
            Some(index) => {
                self.layers[index] = layer;
                index
            }
            None => {
                self.layers.push(layer);
                self.layers.len() - 1
            }
        };

        Ok(&mut self.layers[index].machine)
    }

    fn remove_layer_if_exists(&mut self, name: &str) -> Result<bool> {
        match self.layer_index(name) {
            Some(index) => {
                self.layers.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn ensure_parameter(&mut self, name: &str, kind: ParameterKind) -> Result<()> {
        match self.parameter(name) {
            Some(existing) if existing.kind == kind => Ok(()),
            Some(existing) => Err(LipsyncError::LayerError {
                reason: format!(
                    "Parameter '{}' already exists as {:?}, expected {:?}",
                    name, existing.kind, kind
                ),
            }),
            None => {
                self.parameters.push(Parameter {
                    name: name.to_string(),
                    kind,
                });
                Ok(())
            }
        }
    }
}
