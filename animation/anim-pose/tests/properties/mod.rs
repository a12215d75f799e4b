//! Randomized checks of the resolver and blender invariants

use anim_pose::{
    AnimSkeletonMap, AnimationClip, AnimationPose, AssetCache, BlendClip, BlendState,
    BlendWeightResolver, BoneBlendMask, MemoryLoader, RawBone, SkeletonDefinition, Transform,
};
use glam::{Mat4, Quat, Vec3};
use proptest::prelude::*;

const BONES: usize = 6;

fn flat_skeleton() -> SkeletonDefinition {
    SkeletonDefinition::new(
        (0..BONES)
            .map(|i| RawBone {
                name: format!("bone_{i}"),
                parent_index: i.checked_sub(1),
                bind_pose: Transform::IDENTITY,
                inverse_bind_pose: Mat4::IDENTITY,
            })
            .collect(),
    )
}

/// One clip per (weight, mask) pair, each with its own mask asset
fn cache_and_state(clips: &[(f32, Vec<bool>)]) -> (AssetCache<MemoryLoader>, BlendState) {
    let mut loader = MemoryLoader::new()
        .with_skeleton("skel", flat_skeleton())
        .with_clip("clip", AnimationClip::default())
        .with_skeleton_map("map", AnimSkeletonMap::identity(BONES));
    let mut state = BlendState::new();

    for (index, (weight, enabled)) in clips.iter().enumerate() {
        let mask_path = format!("mask_{index}");
        loader.insert_mask(
            mask_path.clone(),
            BoneBlendMask {
                skeleton_file_path: "skel".to_string(),
                enabled: enabled.clone(),
            },
        );
        state = state.with_clip(BlendClip {
            clip_file_path: "clip".to_string(),
            anim_skel_map_path: "map".to_string(),
            mask_file_path: mask_path,
            phase: 0.0,
            weight: *weight,
        });
    }

    (AssetCache::new(loader), state)
}

fn transform() -> impl Strategy<Value = Transform> {
    (
        prop::array::uniform3(-10.0f32..10.0),
        prop::array::uniform3(-1.0f32..1.0),
        0.0f32..std::f32::consts::PI,
        prop::array::uniform3(0.1f32..3.0),
    )
        .prop_map(|(position, axis, angle, scale)| {
            let axis = Vec3::from(axis).try_normalize().unwrap_or(Vec3::Y);
            Transform::new(
                Vec3::from(position),
                Quat::from_axis_angle(axis, angle),
                Vec3::from(scale),
            )
        })
}

proptest! {
    #[test]
    fn resolved_weights_sum_to_one_or_zero(
        clips in prop::collection::vec(
            (0.01f32..10.0, prop::collection::vec(any::<bool>(), BONES)),
            1..5,
        )
    ) {
        let (cache, state) = cache_and_state(&clips);
        let resolved = BlendWeightResolver::new(&cache).resolve(&state).unwrap();

        for bone in 0..BONES {
            let covered = clips.iter().any(|(_, enabled)| enabled[bone]);
            let sum = resolved.weight_sum(bone);
            if covered {
                prop_assert!((sum - 1.0).abs() < 1e-4, "bone {} sums to {}", bone, sum);
            } else {
                prop_assert_eq!(sum, 0.0);
                prop_assert!(resolved.uncovered_bones.contains(&bone));
            }

            for (clip, (_, enabled)) in resolved.clips.iter().zip(&clips) {
                if !enabled[bone] {
                    prop_assert_eq!(clip.weight(bone), 0.0);
                }
            }
        }
    }

    #[test]
    fn resolve_twice_is_bit_identical(
        clips in prop::collection::vec(
            (0.01f32..10.0, prop::collection::vec(any::<bool>(), BONES)),
            1..4,
        )
    ) {
        let (cache, state) = cache_and_state(&clips);
        let resolver = BlendWeightResolver::new(&cache);

        let first = resolver.resolve(&state).unwrap();
        let second = resolver.resolve(&state).unwrap();

        for (a, b) in first.clips.iter().zip(&second.clips) {
            let a: Vec<u32> = a.bone_weights.iter().map(|w| w.to_bits()).collect();
            let b: Vec<u32> = b.bone_weights.iter().map(|w| w.to_bits()).collect();
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn blending_a_pose_with_itself_is_a_no_op(
        bones in prop::collection::vec(transform(), 1..8),
        weight in 0.0f32..1.0,
        factor in 0.0f32..=1.0,
    ) {
        let pose = AnimationPose::from_transforms(bones, weight);
        let blended = AnimationPose::blend(&pose, &pose, factor).unwrap();

        for (a, b) in blended.bone_poses.iter().zip(&pose.bone_poses) {
            prop_assert!(a.abs_diff_eq(b, 1e-4), "{:?} != {:?}", a, b);
        }
        for w in &blended.weights {
            prop_assert!((w - weight).abs() < 1e-6);
        }
    }
}
