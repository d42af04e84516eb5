//! Directory-backed asset store
//!
//! Each clip is one JSON file named after its asset ID. A manifest maps IDs to
//! names, creation times and SHA-256 checksums. Additions and removals are
//! staged in memory and only reach the disk on `commit`.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use super::{AssetId, AssetKind, AssetRegistry, ClipRef};
use crate::clip::AnimationClip;
use crate::error::{LipsyncError, Result};

/// Manifest file name inside the store directory
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

const CLIP_FILE_SUFFIX: &str = ".anim.json";

/// Metadata for a single stored asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub name: String,
    pub kind: AssetKind,
    /// File name relative to the store directory
    pub file: String,
    pub created_at: DateTime<Utc>,
    /// SHA-256 of the file contents, lowercase hex
    pub checksum: String,
}

/// Manifest tracking all stored assets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetManifest {
    pub assets: BTreeMap<AssetId, AssetRecord>,
}

/// Asset registry persisted to a directory.
pub struct FileAssetStore {
    root: PathBuf,
    manifest: AssetManifest,
    /// Serialized clips waiting for the next commit
    staged: HashMap<AssetId, Vec<u8>>,
    /// Files to delete on the next commit
    doomed: Vec<String>,
}

impl FileAssetStore {
    /// Open (and create if needed) a store at `root`.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.exists() {
            fs::create_dir_all(root).map_err(|e| LipsyncError::DirectoryCreateError {
                path: root.to_path_buf(),
                source: e,
            })?;
        }

        let manifest_path = root.join(MANIFEST_FILE_NAME);
        let manifest = if manifest_path.exists() {
            let content =
                fs::read_to_string(&manifest_path).map_err(|e| LipsyncError::FileReadError {
                    path: manifest_path.clone(),
                    source: e,
                })?;
            serde_json::from_str(&content)?
        } else {
            AssetManifest::default()
        };

        Ok(Self {
            root: root.to_path_buf(),
            manifest,
            staged: HashMap::new(),
            doomed: Vec::new(),
        })
    }

    /// Get the store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All known records, staged additions included.
    pub fn records(&self) -> impl Iterator<Item = (&AssetId, &AssetRecord)> {
        self.manifest.assets.iter()
    }

    /// Whether there are uncommitted changes.
    pub fn has_pending_changes(&self) -> bool {
        !self.staged.is_empty() || !self.doomed.is_empty()
    }

    /// Recompute checksums of committed assets.
    ///
    /// Returns the names of assets whose file is missing or no longer matches
    /// its recorded checksum.
    pub fn verify_integrity(&self) -> Result<Vec<String>> {
        let mut mismatched = Vec::new();

        for (id, record) in &self.manifest.assets {
            if self.staged.contains_key(id) {
                continue;
            }

            let path = self.root.join(&record.file);
            let matches = match fs::read(&path) {
                Ok(bytes) => checksum(&bytes) == record.checksum,
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => {
                    return Err(LipsyncError::FileReadError { path, source: e });
                }
            };

            if !matches {
                mismatched.push(record.name.clone());
            }
        }

        Ok(mismatched)
    }

    /// Clip files on disk that the manifest does not reference.
    ///
    /// These are left behind when a run fails between writing clips and
    /// writing the manifest.
    pub fn find_orphaned_files(&self) -> Vec<PathBuf> {
        let referenced: HashSet<&str> = self
            .manifest
            .assets
            .values()
            .map(|r| r.file.as_str())
            .chain(self.doomed.iter().map(|f| f.as_str()))
            .collect();

        WalkDir::new(&self.root)
            .max_depth(1)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let file_name = entry.file_name().to_string_lossy().to_string();
                let is_orphan =
                    file_name.ends_with(CLIP_FILE_SUFFIX) && !referenced.contains(file_name.as_str());
                is_orphan.then(|| entry.into_path())
            })
            .collect()
    }

    fn save_manifest(&self) -> Result<()> {
        let manifest_path = self.root.join(MANIFEST_FILE_NAME);
        let content = serde_json::to_string_pretty(&self.manifest)?;

        fs::write(&manifest_path, content).map_err(|e| LipsyncError::FileWriteError {
            path: manifest_path,
            source: e,
        })?;

        Ok(())
    }

    fn record(&self, id: AssetId) -> Result<&AssetRecord> {
        self.manifest
            .assets
            .get(&id)
            .ok_or_else(|| LipsyncError::AssetNotFound { id: id.to_string() })
    }
}

impl AssetRegistry for FileAssetStore {
    fn list_by_prefix(&self, prefix: &str, kind: AssetKind) -> Vec<AssetId> {
        self.manifest
            .assets
            .iter()
            .filter(|(_, r)| r.kind == kind && r.name.starts_with(prefix))
            .map(|(id, _)| *id)
            .collect()
    }

    fn remove_batch(&mut self, ids: &[AssetId]) -> Result<usize> {
        // Validate the whole batch before touching anything
        for id in ids {
            self.record(*id)?;
        }

        let mut removed = 0;
        for id in ids {
            if let Some(record) = self.manifest.assets.remove(id) {
                if self.staged.remove(id).is_none() {
                    self.doomed.push(record.file);
                }
                removed += 1;
            }
        }

        Ok(removed)
    }

    fn add_animation(&mut self, clip: AnimationClip) -> Result<ClipRef> {
        let id = AssetId::new();
        let bytes = serde_json::to_vec_pretty(&clip)?;

        let record = AssetRecord {
            name: clip.name.clone(),
            kind: AssetKind::AnimationClip,
            file: format!("{}{}", id, CLIP_FILE_SUFFIX),
            created_at: Utc::now(),
            checksum: checksum(&bytes),
        };

        self.manifest.assets.insert(id, record);
        self.staged.insert(id, bytes);

        Ok(ClipRef {
            id,
            name: clip.name,
        })
    }

    fn commit(&mut self) -> Result<()> {
        let written = self.staged.len();
        for (id, bytes) in self.staged.drain() {
            let file = self
                .manifest
                .assets
                .get(&id)
                .map(|r| r.file.clone())
                .unwrap_or_else(|| format!("{}{}", id, CLIP_FILE_SUFFIX));
            let path = self.root.join(file);
            fs::write(&path, bytes).map_err(|e| LipsyncError::FileWriteError { path, source: e })?;
        }

        let deleted = self.doomed.len();
        for file in self.doomed.drain(..) {
            let path = self.root.join(&file);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(LipsyncError::FileWriteError { path, source: e }),
            }
        }

        self.save_manifest()?;
        debug!(
            "Committed asset store {}: {} written, {} deleted",
            self.root.display(),
            written,
            deleted
        );

        Ok(())
    }

    fn find_by_name(&self, name: &str, kind: AssetKind) -> Option<AssetId> {
        self.manifest
            .assets
            .iter()
            .find(|(_, r)| r.kind == kind && r.name == name)
            .map(|(id, _)| *id)
    }

    fn load_animation(&self, id: AssetId) -> Result<AnimationClip> {
        if let Some(bytes) = self.staged.get(&id) {
            return Ok(serde_json::from_slice(bytes)?);
        }

        let path = self.root.join(&self.record(id)?.file);
        let content = fs::read(&path).map_err(|e| LipsyncError::FileReadError { path, source: e })?;
        Ok(serde_json::from_slice(&content)?)
    }

    /// Also sweeps orphaned clip files whose clip name carries the prefix.
    fn remove_assets_with_prefix(&mut self, prefix: &str, kind: AssetKind) -> Result<usize> {
        let ids = self.list_by_prefix(prefix, kind);
        let mut removed = if ids.is_empty() {
            0
        } else {
            self.remove_batch(&ids)?
        };

        for path in self.find_orphaned_files() {
            let clip: AnimationClip = match fs::read(&path)
                .ok()
                .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            {
                Some(clip) => clip,
                None => {
                    warn!("Skipping unreadable clip file {}", path.display());
                    continue;
                }
            };

            if clip.name.starts_with(prefix) {
                if let Some(file_name) = path.file_name() {
                    self.doomed.push(file_name.to_string_lossy().to_string());
                    removed += 1;
                }
            }
        }

        Ok(removed)
    }
}

fn checksum(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
