//! File Store Tests
//!
//! Generation against the directory-backed asset store and the JSON
//! controller, as driven by the CLI.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use tempfile::{tempdir, TempDir};

use lipsync_layer::assets::{AssetKind, AssetRegistry, ClipRef, FileAssetStore};
use lipsync_layer::avatar::AvatarDescriptor;
use lipsync_layer::cli::commands;
use lipsync_layer::clip::{AnimationClip, VisemeAnimationMaker};
use lipsync_layer::config::LipsyncLayerConfig;
use lipsync_layer::generator::{GENERATED_CLIP_PREFIX, LIPSYNC_LAYER_NAME};
use lipsync_layer::graph::{AnimatorController, AvatarMask};
use lipsync_layer::manifest::{GestureAnimation, Manifest, ManifestBinding};
use lipsync_layer::progress::NoProgress;
use lipsync_layer::viseme::VISEME_COUNT;
use lipsync_layer::LipsyncLayerGenerator;

fn bindings(limited: bool) -> Vec<ManifestBinding> {
    vec![ManifestBinding {
        stage_value: None,
        manifest: Manifest {
            name: "Default".to_string(),
            animations: vec![GestureAnimation {
                name: "Smile".to_string(),
                limited_lipsync: limited,
            }],
        },
    }]
}

fn clip_files(dir: &Path) -> usize {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().ends_with(".anim.json"))
        .count()
}

/// Project directory with avatar and bindings files ready for the CLI
fn create_project(limited: bool) -> TempDir {
    let dir = tempdir().unwrap();

    let avatar = AvatarDescriptor::with_standard_blendshapes("Body");
    fs::write(
        dir.path().join("avatar.json"),
        serde_json::to_string_pretty(&avatar).unwrap(),
    )
    .unwrap();
    fs::write(
        dir.path().join("bindings.json"),
        serde_json::to_string_pretty(&bindings(limited)).unwrap(),
    )
    .unwrap();

    dir
}

fn run_generate(project: &Path, config: Option<&Path>) {
    commands::generate(
        &project.join("fx.json"),
        &project.join("assets"),
        &project.join("avatar.json"),
        &project.join("bindings.json"),
        config,
    )
    .unwrap();
}

#[test]
fn test_store_regeneration_replaces_clips_on_disk() {
    let dir = tempdir().unwrap();
    let config = LipsyncLayerConfig::default();
    let avatar = AvatarDescriptor::with_standard_blendshapes("Body");
    let bindings = bindings(true);
    let maker = VisemeAnimationMaker::new();
    let mut controller = AnimatorController::new("FX");

    for _ in 0..2 {
        let mut store = FileAssetStore::open(dir.path()).unwrap();
        let empty_clip = match store.find_by_name("Empty", AssetKind::AnimationClip) {
            Some(id) => ClipRef {
                id,
                name: "Empty".to_string(),
            },
            None => store.add_animation(AnimationClip::new("Empty")).unwrap(),
        };

        LipsyncLayerGenerator::new(&config, &avatar, &bindings, &maker, empty_clip)
            .create(&mut controller, &mut store, &mut NoProgress)
            .unwrap();
        assert!(!store.has_pending_changes());
    }

    let store = FileAssetStore::open(dir.path()).unwrap();
    assert_eq!(
        store
            .list_by_prefix(GENERATED_CLIP_PREFIX, AssetKind::AnimationClip)
            .len(),
        2 * VISEME_COUNT
    );
    assert_eq!(clip_files(dir.path()), 2 * VISEME_COUNT + 1);
    assert!(store.find_orphaned_files().is_empty());
    assert!(store.verify_integrity().unwrap().is_empty());
}

#[test]
fn test_orphaned_generated_files_are_swept() {
    let dir = tempdir().unwrap();
    let orphan = AnimationClip::new(format!("{}3", GENERATED_CLIP_PREFIX));
    fs::write(
        dir.path().join("leftover.anim.json"),
        serde_json::to_vec(&orphan).unwrap(),
    )
    .unwrap();
    let foreign = AnimationClip::new("SomeoneElse");
    fs::write(
        dir.path().join("foreign.anim.json"),
        serde_json::to_vec(&foreign).unwrap(),
    )
    .unwrap();

    let mut store = FileAssetStore::open(dir.path()).unwrap();
    let removed = store
        .remove_assets_with_prefix(GENERATED_CLIP_PREFIX, AssetKind::AnimationClip)
        .unwrap();
    store.commit().unwrap();

    assert_eq!(removed, 1);
    assert!(!dir.path().join("leftover.anim.json").exists());
    assert!(dir.path().join("foreign.anim.json").exists());
}

#[test]
fn test_cli_generate_and_delete() {
    let project = create_project(true);
    let controller_path = project.path().join("fx.json");

    run_generate(project.path(), None);
    run_generate(project.path(), None);

    let controller = AnimatorController::load(&controller_path).unwrap();
    assert_eq!(controller.layers().len(), 1);
    let layer = controller.layer(LIPSYNC_LAYER_NAME).unwrap();
    assert_eq!(layer.machine.len(), 1 + 2 * VISEME_COUNT);
    assert_eq!(layer.machine.any_state_transitions().len(), 1 + 2 * VISEME_COUNT);

    // Generated clips plus the shared empty clip
    assert_eq!(clip_files(&project.path().join("assets")), 2 * VISEME_COUNT + 1);
    commands::verify(&project.path().join("assets")).unwrap();

    commands::delete(&controller_path).unwrap();
    commands::delete(&controller_path).unwrap();

    let controller = AnimatorController::load(&controller_path).unwrap();
    assert!(controller.layer(LIPSYNC_LAYER_NAME).is_none());
}

#[test]
fn test_cli_generate_uses_config_file() {
    let project = create_project(true);
    let config_path = project.path().join("lipsync.json");
    fs::write(&config_path, r#"{ "analog_threshold": 0.5, "mask": "Mouth" }"#).unwrap();

    run_generate(project.path(), Some(&config_path));

    let controller = AnimatorController::load(&project.path().join("fx.json")).unwrap();
    let layer = controller.layer(LIPSYNC_LAYER_NAME).unwrap();
    assert_eq!(layer.mask, AvatarMask::new("Mouth"));
    for transition in layer.machine.any_state_transitions() {
        let analog = transition.conditions.last().unwrap();
        assert_eq!(analog.threshold, 0.5);
    }
}

#[test]
fn test_cli_generate_disabled_writes_empty_layer() {
    let project = create_project(false);

    run_generate(project.path(), None);

    let controller = AnimatorController::load(&project.path().join("fx.json")).unwrap();
    assert!(controller.layer(LIPSYNC_LAYER_NAME).unwrap().machine.is_empty());

    let store = FileAssetStore::open(&project.path().join("assets")).unwrap();
    assert!(store
        .list_by_prefix(GENERATED_CLIP_PREFIX, AssetKind::AnimationClip)
        .is_empty());
}

#[test]
fn test_cli_verify_detects_tampering() {
    let project = create_project(true);
    run_generate(project.path(), None);

    let assets = project.path().join("assets");
    let store = FileAssetStore::open(&assets).unwrap();
    let (_, record) = store
        .records()
        .find(|(_, r)| r.name.starts_with(GENERATED_CLIP_PREFIX))
        .unwrap();
    fs::write(assets.join(&record.file), b"{}").unwrap();

    assert!(commands::verify(&assets).is_err());
}

#[test]
fn test_cli_missing_avatar_fails() {
    let project = create_project(true);
    fs::remove_file(project.path().join("avatar.json")).unwrap();

    let result = commands::generate(
        &project.path().join("fx.json"),
        &project.path().join("assets"),
        &project.path().join("avatar.json"),
        &project.path().join("bindings.json"),
        None,
    );

    assert!(result.is_err());
    assert!(!project.path().join("fx.json").exists());
}
