//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::io::ErrorKind;
use std::path::Path;

use log::{info, warn};

use crate::assets::{AssetKind, AssetRegistry, ClipRef, FileAssetStore};
use crate::avatar::AvatarDescriptor;
use crate::clip::{AnimationClip, VisemeAnimationMaker};
use crate::config::LipsyncLayerConfig;
use crate::error::{LipsyncError, Result};
use crate::generator::LipsyncLayerGenerator;
use crate::graph::{AnimatorController, ConditionMode};
use crate::manifest::load_bindings;
use crate::progress::LogProgress;

/// Name of the shared clip played by the none state
pub const EMPTY_CLIP_NAME: &str = "Hai_EmptyClip";

/// Regenerate the lipsync override layer.
pub fn generate(
    controller_path: &Path,
    assets_dir: &Path,
    avatar_path: &Path,
    bindings_path: &Path,
    config_path: Option<&Path>,
) -> Result<()> {
    info!("Generating lipsync layer into: {}", controller_path.display());

    let config = match config_path {
        Some(path) => LipsyncLayerConfig::load(path)?,
        None => LipsyncLayerConfig::default(),
    };
    let avatar = AvatarDescriptor::load(avatar_path)?;
    let bindings = load_bindings(bindings_path)?;

    let mut controller = AnimatorController::load_or_create(controller_path)?;
    let mut store = FileAssetStore::open(assets_dir)?;
    let empty_clip = ensure_empty_clip(&mut store)?;

    let maker = VisemeAnimationMaker::new();
    let generator = LipsyncLayerGenerator::new(&config, &avatar, &bindings, &maker, empty_clip);
    let report = generator.create(&mut controller, &mut store, &mut LogProgress)?;

    controller.save(controller_path)?;

    if report.generated {
        println!("Layer '{}' generated", report.layer_name);
        println!("States: {}", report.state_count);
        println!("Transitions: {}", report.transition_count);
        println!("Clips: {} (purged {})", report.clip_count(), report.purged_assets);
    } else {
        println!(
            "No manifest requires limited lipsync; layer '{}' left empty",
            report.layer_name
        );
    }

    Ok(())
}

/// Remove the lipsync override layer.
pub fn delete(controller_path: &Path) -> Result<()> {
    info!("Deleting lipsync layer from: {}", controller_path.display());

    let mut controller = AnimatorController::load(controller_path)?;
    LipsyncLayerGenerator::delete(&mut controller)?;
    controller.save(controller_path)?;

    println!("Lipsync layer removed from {}", controller_path.display());

    Ok(())
}

/// Print the layers of a controller.
pub fn inspect(controller_path: &Path) -> Result<()> {
    let controller = AnimatorController::load(controller_path)?;

    println!("Controller: {}", controller.name);
    println!("{:-<60}", "");

    for parameter in controller.parameters() {
        println!("Parameter {} ({:?})", parameter.name, parameter.kind);
    }

    for (index, layer) in controller.layers().iter().enumerate() {
        println!(
            "[{}] {} (weight {:.2}, mask '{}')",
            index,
            layer.name,
            layer.weight,
            layer.mask.name()
        );

        for transition in layer.machine.any_state_transitions() {
            let target = layer
                .machine
                .state(transition.target)
                .map(|s| s.name.as_str())
                .unwrap_or("?");
            let guards: Vec<String> = transition
                .conditions
                .iter()
                .map(|c| format!("{} {} {}", c.parameter, mode_symbol(c.mode), c.threshold))
                .collect();

            println!(
                "    Any -> {:<12} {:.3}s  [{}]",
                target,
                transition.duration,
                guards.join(" && ")
            );
        }
    }

    println!("{:-<60}", "");

    Ok(())
}

/// Write a default configuration file.
pub fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(LipsyncError::FileWriteError {
            path: path.to_path_buf(),
            source: std::io::Error::new(
                ErrorKind::AlreadyExists,
                "file exists, pass --force to overwrite",
            ),
        });
    }

    LipsyncLayerConfig::default().save(path)?;
    println!("Default configuration written to {}", path.display());

    Ok(())
}

/// Check the integrity of an asset store.
pub fn verify(assets_dir: &Path) -> Result<()> {
    info!("Verifying asset store: {}", assets_dir.display());

    let store = FileAssetStore::open(assets_dir)?;

    let orphans = store.find_orphaned_files();
    for orphan in &orphans {
        warn!("Orphaned clip file: {}", orphan.display());
    }

    let mismatched = store.verify_integrity()?;
    println!(
        "Assets: {} | Orphaned files: {} | Mismatched: {}",
        store.records().count(),
        orphans.len(),
        mismatched.len()
    );

    match mismatched.into_iter().next() {
        Some(name) => Err(LipsyncError::IntegrityMismatch { name }),
        None => Ok(()),
    }
}

/// Find the shared empty clip, creating it on first use.
fn ensure_empty_clip(assets: &mut dyn AssetRegistry) -> Result<ClipRef> {
    if let Some(id) = assets.find_by_name(EMPTY_CLIP_NAME, AssetKind::AnimationClip) {
        return Ok(ClipRef {
            id,
            name: EMPTY_CLIP_NAME.to_string(),
        });
    }

    let handle = assets.add_animation(AnimationClip::new(EMPTY_CLIP_NAME))?;
    assets.commit()?;
    Ok(handle)
}

fn mode_symbol(mode: ConditionMode) -> &'static str {
    match mode {
        ConditionMode::If => "is true",
        ConditionMode::IfNot => "is false",
        ConditionMode::Greater => ">",
        ConditionMode::Less => "<",
        ConditionMode::Equals => "==",
        ConditionMode::NotEqual => "!=",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::InMemoryAssetRegistry;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_empty_clip_reuses_existing() {
        let mut registry = InMemoryAssetRegistry::new();

        let first = ensure_empty_clip(&mut registry).unwrap();
        let second = ensure_empty_clip(&mut registry).unwrap();

        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.commit_count(), 1);
    }

    #[test]
    fn test_init_config_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lipsync.json");

        init_config(&path, false).unwrap();
        assert!(init_config(&path, false).is_err());
        init_config(&path, true).unwrap();
    }
}
