//! Asset Container Module
//!
//! Generated clips are handed to an asset registry which becomes their sole
//! owner. Generated assets are found again purely by name prefix, so the
//! registry exposes listing and batch removal as separate, mockable steps.

mod memory;
mod store;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clip::AnimationClip;
use crate::error::Result;

pub use memory::InMemoryAssetRegistry;
pub use store::{AssetManifest, AssetRecord, FileAssetStore, MANIFEST_FILE_NAME};

/// Stable identity of a stored asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AssetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of asset stored in a registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    AnimationClip,
}

/// Handle to a registered clip, as referenced from animator states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRef {
    pub id: AssetId,
    pub name: String,
}

/// Asset container the generator registers clips with
///
/// Names are not unique: identity is the `AssetId`.
pub trait AssetRegistry {
    /// IDs of every asset of `kind` whose name starts with `prefix`
    fn list_by_prefix(&self, prefix: &str, kind: AssetKind) -> Vec<AssetId>;

    /// Remove assets by ID; returns how many were removed
    fn remove_batch(&mut self, ids: &[AssetId]) -> Result<usize>;

    /// Take ownership of a clip and return a handle to it
    fn add_animation(&mut self, clip: AnimationClip) -> Result<ClipRef>;

    /// Flush barrier; handles are only stable for graph use after this
    fn commit(&mut self) -> Result<()>;

    /// First asset of `kind` with exactly this name
    fn find_by_name(&self, name: &str, kind: AssetKind) -> Option<AssetId>;

    /// Read back a stored clip
    fn load_animation(&self, id: AssetId) -> Result<AnimationClip>;

    /// Remove every asset of `kind` whose name starts with `prefix`
    fn remove_assets_with_prefix(&mut self, prefix: &str, kind: AssetKind) -> Result<usize> {
        let ids = self.list_by_prefix(prefix, kind);
        if ids.is_empty() {
            return Ok(0);
        }
        self.remove_batch(&ids)
    }
}
