//! In-memory asset registry

use super::{AssetId, AssetKind, AssetRegistry, ClipRef};
use crate::clip::AnimationClip;
use crate::error::{LipsyncError, Result};

/// Asset registry backed by a `Vec`, in insertion order
#[derive(Debug, Default)]
pub struct InMemoryAssetRegistry {
    clips: Vec<(AssetId, AnimationClip)>,
    commits: usize,
}

impl InMemoryAssetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored clips
    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// How many times `commit` was called
    pub fn commit_count(&self) -> usize {
        self.commits
    }

    /// Names of all stored clips, in insertion order
    pub fn clip_names(&self) -> Vec<&str> {
        self.clips.iter().map(|(_, c)| c.name.as_str()).collect()
    }
}

impl AssetRegistry for InMemoryAssetRegistry {
    fn list_by_prefix(&self, prefix: &str, kind: AssetKind) -> Vec<AssetId> {
        match kind {
            AssetKind::AnimationClip => self
                .clips
                .iter()
                .filter(|(_, clip)| clip.name.starts_with(prefix))
                .map(|(id, _)| *id)
                .collect(),
        }
    }

    fn remove_batch(&mut self, ids: &[AssetId]) -> Result<usize> {
        let before = self.clips.len();
        self.clips.retain(|(id, _)| !ids.contains(id));
        Ok(before - self.clips.len())
    }

    fn add_animation(&mut self, clip: AnimationClip) -> Result<ClipRef> {
        let id = AssetId::new();
        let handle = ClipRef {
            id,
            name: clip.name.clone(),
        };
        self.clips.push((id, clip));
        Ok(handle)
    }

    fn commit(&mut self) -> Result<()> {
        self.commits += 1;
        Ok(())
    }

    fn find_by_name(&self, name: &str, kind: AssetKind) -> Option<AssetId> {
        match kind {
            AssetKind::AnimationClip => self
                .clips
                .iter()
                .find(|(_, clip)| clip.name == name)
                .map(|(id, _)| *id),
        }
    }

    fn load_animation(&self, id: AssetId) -> Result<AnimationClip> {
        self.clips
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, clip)| clip.clone())
            .ok_or_else(|| LipsyncError::AssetNotFound { id: id.to_string() })
    }
}
