//! Assets and character configuration read from JSON files

use std::fs;
use std::path::Path;

use anim_pose::{
    AnimError, AssetCache, BlendState, BlendWeightResolver, CharacterAnimator, JsonAssetLoader,
    LocomotionConfig, LocomotionSignals, LocomotionState, RuntimeSkeleton,
};
use glam::Vec3;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use crate::common::init_logging;

const SKELETON_JSON: &str = r#"{
    "bones": [
        {
            "name": "root",
            "parent_index": null,
            "bind_pose": { "position": [0.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.0, 1.0], "scale": [1.0, 1.0, 1.0] },
            "inverse_bind_pose": [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]
        },
        {
            "name": "tip",
            "parent_index": 0,
            "bind_pose": { "position": [0.0, 1.0, 0.0], "rotation": [0.0, 0.0, 0.0, 1.0], "scale": [1.0, 1.0, 1.0] },
            "inverse_bind_pose": [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, -1.0, 0.0, 1.0]
        }
    ]
}"#;

const SLIDE_CLIP_JSON: &str = r#"{
    "total_frame": 3,
    "node_channels": [
        {
            "name": "root",
            "position_keys": [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
            "rotation_keys": [[0.0, 0.0, 0.0, 1.0]],
            "scaling_keys": [[1.0, 1.0, 1.0]]
        }
    ]
}"#;

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

fn asset_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "rig/skeleton.json", SKELETON_JSON);
    write(dir.path(), "rig/slide.clip.json", SLIDE_CLIP_JSON);
    write(dir.path(), "rig/identity.map.json", r#"{ "convert": [0, 1] }"#);
    write(
        dir.path(),
        "rig/full.mask.json",
        r#"{ "skeleton_file_path": "rig/skeleton.json", "enabled": [true, true] }"#,
    );
    dir
}

fn character_config() -> String {
    let states = [
        "idle",
        "walk_start",
        "walk_run",
        "walk_stop",
        "jump_start_from_idle",
        "jump_loop_from_idle",
        "jump_end_from_idle",
        "jump_start_from_walk_run",
        "jump_loop_from_walk_run",
        "jump_end_from_walk_run",
    ];
    let clips: Vec<String> = states
        .iter()
        .map(|state| {
            format!(
                r#""{state}": {{ "clip_file_path": "rig/slide.clip.json", "anim_skel_map_path": "rig/identity.map.json", "mask_file_path": "rig/full.mask.json", "looping": true }}"#
            )
        })
        .collect();
    format!(r#"{{ "frames_per_second": 2.0, "clips": {{ {} }} }}"#, clips.join(", "))
}

#[test]
fn test_json_assets_drive_the_pipeline() {
    init_logging();
    let dir = asset_dir();
    let cache = AssetCache::new(JsonAssetLoader::new(dir.path()));

    let definition = cache.skeleton("rig/skeleton.json").unwrap();
    let mut skeleton = RuntimeSkeleton::build_skeleton(&definition).unwrap();

    let state = BlendState::single(
        "rig/slide.clip.json",
        "rig/identity.map.json",
        "rig/full.mask.json",
        0.75,
    );
    let resolved = BlendWeightResolver::new(&cache).resolve(&state).unwrap();
    skeleton.apply_animation(&resolved).unwrap();

    let tip = &skeleton.bones()[1];
    assert!(tip.world().position.abs_diff_eq(Vec3::new(1.5, 1.0, 0.0), 1e-5));

    let result = skeleton.output_animation_result();
    let offset = result.nodes[1].transform.transform_point3(Vec3::new(0.0, 1.0, 0.0));
    assert!(offset.abs_diff_eq(Vec3::new(1.5, 1.0, 0.0), 1e-5));
}

#[test]
fn test_character_config_from_json() {
    let dir = asset_dir();
    let cache = AssetCache::new(JsonAssetLoader::new(dir.path()));

    let config: LocomotionConfig = serde_json::from_str(&character_config()).unwrap();
    assert_eq!(config.frames_per_second, 2.0);
    assert_eq!(config.cross_fade_seconds, 0.2);
    assert_eq!(config.clips.len(), 10);

    let mut animator = CharacterAnimator::from_cache(&cache, "rig/skeleton.json", config).unwrap();
    let tick = animator
        .tick(&cache, 0.5, &LocomotionSignals::default())
        .unwrap();

    assert_eq!(tick.state, LocomotionState::Idle);
    assert!((tick.phase - 0.5).abs() < 1e-5);
    assert_eq!(tick.result.len(), 2);
}

#[test]
fn test_incomplete_config_is_rejected() {
    let dir = asset_dir();
    let cache = AssetCache::new(JsonAssetLoader::new(dir.path()));
    let config: LocomotionConfig = serde_json::from_str(
        r#"{ "clips": { "idle": { "clip_file_path": "a", "anim_skel_map_path": "b", "mask_file_path": "c" } } }"#,
    )
    .unwrap();

    let err = CharacterAnimator::from_cache(&cache, "rig/skeleton.json", config).unwrap_err();
    assert!(matches!(err, AnimError::UnknownClipTable(LocomotionState::WalkStart)));
}

#[test]
fn test_signal_snapshot_from_json() {
    let signals: LocomotionSignals = serde_json::from_str(r#"{ "speed": 2.5 }"#).unwrap();
    assert_eq!(signals, LocomotionSignals::new(false, false, 2.5));
}
