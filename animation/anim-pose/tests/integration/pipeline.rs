//! Resolve, sample and output through the public API

use std::sync::Arc;

use anim_pose::{
    AnimSkeletonMap, AnimationClip, AssetCache, BlendState, BlendWeightResolver, BoneBlendMask,
    MemoryLoader, RawBone, RuntimeSkeleton, SkeletonDefinition, Transform,
};
use glam::{Mat4, Quat, Vec3};
use pretty_assertions::assert_eq;

use crate::common::{
    FULL_MASK, LOWER_MASK, SKELETON, UPPER_MASK, blend_clip, hero_cache, init_logging,
};

fn two_bone_cache() -> AssetCache<MemoryLoader> {
    let bone = |name: &str, parent_index| RawBone {
        name: name.to_string(),
        parent_index,
        bind_pose: Transform::IDENTITY,
        inverse_bind_pose: Mat4::IDENTITY,
    };
    let loader = MemoryLoader::new()
        .with_skeleton(
            "pair.skel",
            SkeletonDefinition::new(vec![bone("a", None), bone("b", Some(0))]),
        )
        .with_clip("a.clip", AnimationClip::default())
        .with_clip("b.clip", AnimationClip::default())
        .with_skeleton_map("pair.map", AnimSkeletonMap::identity(2))
        .with_mask("all.mask", BoneBlendMask::all_enabled("pair.skel", 2))
        .with_mask(
            "b.mask",
            BoneBlendMask {
                skeleton_file_path: "pair.skel".to_string(),
                enabled: vec![true, false],
            },
        );
    AssetCache::new(loader)
}

fn pair_request(clip: &str, mask: &str, weight: f32) -> anim_pose::BlendClip {
    anim_pose::BlendClip {
        clip_file_path: clip.to_string(),
        anim_skel_map_path: "pair.map".to_string(),
        mask_file_path: mask.to_string(),
        phase: 0.0,
        weight,
    }
}

fn rounded(table: &[&[f32]]) -> Vec<Vec<i32>> {
    table
        .iter()
        .map(|row| row.iter().map(|w| (w * 1000.0).round() as i32).collect())
        .collect()
}

#[test]
fn test_two_clips_resolve_to_requested_ratio() {
    init_logging();
    let cache = two_bone_cache();
    let state = BlendState::new()
        .with_clip(pair_request("a.clip", "all.mask", 0.3))
        .with_clip(pair_request("b.clip", "all.mask", 0.7));

    let resolved = BlendWeightResolver::new(&cache).resolve(&state).unwrap();

    assert_eq!(
        rounded(&resolved.weight_table()),
        vec![vec![300, 300], vec![700, 700]]
    );
}

#[test]
fn test_masking_clip_b_off_bone_one() {
    init_logging();
    let cache = two_bone_cache();
    let state = BlendState::new()
        .with_clip(pair_request("a.clip", "all.mask", 0.3))
        .with_clip(pair_request("b.clip", "b.mask", 0.7));

    let resolved = BlendWeightResolver::new(&cache).resolve(&state).unwrap();

    assert_eq!(
        rounded(&resolved.weight_table()),
        vec![vec![300, 1000], vec![700, 0]]
    );
}

#[test]
fn test_layered_upper_and_lower_body() {
    init_logging();
    let cache = hero_cache();
    let definition = cache.skeleton(SKELETON).unwrap();
    let mut skeleton = RuntimeSkeleton::build_skeleton(&definition).unwrap();

    let state = BlendState::new()
        .with_clip(blend_clip("hero/walk.clip", LOWER_MASK, 0.5, 1.0))
        .with_clip(blend_clip("hero/aim.clip", UPPER_MASK, 1.0, 1.0));
    let resolved = BlendWeightResolver::new(&cache).resolve(&state).unwrap();
    skeleton.apply_animation(&resolved).unwrap();

    let bones = skeleton.bones();
    // Lower body follows the walk clip at frame 2 of 5
    assert!(bones[0].local().position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
    assert!(bones[3].local().position.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-5));
    assert!(bones[0].local().rotation.abs_diff_eq(Quat::IDENTITY, 1e-5));
    // Upper body follows the aim clip at its last key
    assert!(bones[1].local().rotation.abs_diff_eq(Quat::from_rotation_y(1.2), 1e-5));
    assert!(bones[2].local().rotation.abs_diff_eq(Quat::from_rotation_y(1.2), 1e-5));
}

#[test]
fn test_cache_shared_between_characters() {
    init_logging();
    let cache = hero_cache();
    let state = BlendState::single("hero/walk.clip", crate::common::MAP, FULL_MASK, 0.25);
    let resolver = BlendWeightResolver::new(&cache);

    let first = resolver.resolve(&state).unwrap();
    let loads = cache.loader().load_count();
    let second = resolver.resolve(&state).unwrap();

    assert_eq!(cache.loader().load_count(), loads);
    assert!(Arc::ptr_eq(&first.clips[0].clip, &second.clips[0].clip));

    let definition = cache.skeleton(SKELETON).unwrap();
    let mut hero = RuntimeSkeleton::build_skeleton(&definition).unwrap();
    let mut twin = RuntimeSkeleton::build_skeleton(&definition).unwrap();
    hero.apply_animation(&first).unwrap();
    twin.apply_animation(&second).unwrap();

    assert_eq!(hero.output_animation_result(), twin.output_animation_result());
}

#[test]
fn test_skinning_output_at_bind_pose() {
    let cache = hero_cache();
    let definition = cache.skeleton(SKELETON).unwrap();
    let mut skeleton = RuntimeSkeleton::build_skeleton(&definition).unwrap();

    // Walk clip at phase 0 holds every bone at the origin of its parent
    let state = BlendState::single("hero/walk.clip", crate::common::MAP, FULL_MASK, 0.0);
    let resolved = BlendWeightResolver::new(&cache).resolve(&state).unwrap();
    skeleton.apply_animation(&resolved).unwrap();
    skeleton.reset_skeleton();

    let result = skeleton.output_animation_result();
    let indices: Vec<usize> = result.nodes.iter().map(|n| n.index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4]);
    for node in &result.nodes {
        assert!(node.transform.abs_diff_eq(Mat4::IDENTITY, 1e-5));
    }

    let head = &skeleton.bones()[2];
    assert!(head.world().position.abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-5));
}

#[test]
fn test_missing_mask_fails_resolve() {
    let cache = hero_cache();
    let state = BlendState::single("hero/walk.clip", crate::common::MAP, "hero/none.mask", 0.0);

    let err = BlendWeightResolver::new(&cache).resolve(&state).unwrap_err();
    assert_eq!(err.to_string(), "Bone blend mask not found: hero/none.mask");
}
