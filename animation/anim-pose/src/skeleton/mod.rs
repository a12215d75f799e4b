//! Runtime skeleton evaluation
//!
//! A [`RuntimeSkeleton`] is built once from a validated
//! [`SkeletonDefinition`] and then driven every tick:
//!
//! 1. [`RuntimeSkeleton::reset_skeleton`] puts every bone back in its bind pose
//! 2. [`RuntimeSkeleton::sample_pose`] samples all clips of a resolved blend
//!    state and mixes them with their per-bone weights
//! 3. [`RuntimeSkeleton::apply_pose`] writes the local pose and propagates
//!    world transforms from parents to children
//! 4. [`RuntimeSkeleton::output_animation_result`] produces skinning matrices
//!
//! Bones are stored in topological order, so world transforms are derived in
//! a single forward pass over the bone array.

mod bone;
mod sampler;

use glam::Mat4;

pub use bone::Bone;
pub use sampler::{FrameSample, sample_channel};

use crate::asset::SkeletonDefinition;
use crate::blend::{AnimationPose, BlendStateWithClipData, WEIGHT_EPSILON};
use crate::error::{AnimError, Result};

/// Skinning matrix of one bone
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct AnimationResultElement {
    /// One-based bone index; zero is reserved for "no bone"
    pub index: usize,
    pub transform: Mat4,
}

/// Per-tick output consumed by skinning
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct AnimationResult {
    pub nodes: Vec<AnimationResultElement>,
}

impl AnimationResult {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Array-backed bone hierarchy owned by one character
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSkeleton {
    bones: Box<[Bone]>,
}

impl RuntimeSkeleton {
    /// Build a runtime skeleton from a definition
    ///
    /// The definition must be flat and topologically ordered; otherwise a
    /// structural error is returned and no skeleton is built. The new
    /// skeleton starts in its bind pose.
    pub fn build_skeleton(definition: &SkeletonDefinition) -> Result<Self> {
        definition.validate()?;

        let bones: Box<[Bone]> = definition
            .bones
            .iter()
            .enumerate()
            .map(|(index, raw)| Bone::from_raw(index, raw))
            .collect();

        let mut skeleton = Self { bones };
        skeleton.update_world();
        log::debug!("Built runtime skeleton with {} bones", skeleton.bone_count());
        Ok(skeleton)
    }

    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Put every bone back in its bind pose
    pub fn reset_skeleton(&mut self) {
        for bone in self.bones.iter_mut() {
            bone.reset_to_bind_pose();
        }
        self.update_world();
    }

    /// Bind-pose local transforms with zero weight, the start of every blend
    fn bind_pose(&self) -> AnimationPose {
        AnimationPose::from_transforms(self.bones.iter().map(|b| *b.bind_pose()).collect(), 0.0)
    }

    /// Current local transforms with unit weight
    pub fn local_pose(&self) -> AnimationPose {
        AnimationPose::from_transforms(self.bones.iter().map(|b| *b.local()).collect(), 1.0)
    }

    /// Sample and mix every clip of `blend_state` into a local pose
    ///
    /// Each clip contributes to a bone with the weight resolved for that
    /// bone. Keys are absolute local transforms: a sampled key replaces the
    /// bone's bind pose rather than being applied on top of it. Bones that
    /// no clip contributes to keep their bind pose. Clip
    /// nodes without a bone are skipped with a warning. The skeleton itself
    /// is not modified.
    pub fn sample_pose(&self, blend_state: &BlendStateWithClipData) -> Result<AnimationPose> {
        let bone_count = self.bone_count();
        if blend_state.bone_count != bone_count {
            log::warn!(
                "Blend state resolved for {} bones, skeleton has {}",
                blend_state.bone_count,
                bone_count
            );
        }

        let mut pose = self.bind_pose();

        for (clip_index, resolved) in blend_state.clips.iter().enumerate() {
            let clip = &resolved.clip;
            if clip.total_frame == 0 {
                log::warn!("Clip {clip_index} has no frames, skipping");
                continue;
            }

            let frame = FrameSample::at_phase(resolved.phase, clip.total_frame);
            let mut clip_pose = self.bind_pose();

            for (node, channel) in clip.node_channels.iter().enumerate() {
                let Some(bone) = resolved.skeleton_map.bone_for_node(node) else {
                    log::warn!(
                        "Clip {clip_index} node {node} ({}) has no skeleton bone",
                        channel.name
                    );
                    continue;
                };
                if bone >= bone_count {
                    log::warn!(
                        "Clip {clip_index} node {node} maps to bone {bone}, skeleton has {bone_count}"
                    );
                    continue;
                }

                let weight = resolved.weight(bone);
                if weight.abs() < WEIGHT_EPSILON {
                    continue;
                }

                clip_pose.bone_poses[bone] =
                    sample_channel(channel, frame, self.bones[bone].bind_pose());
                clip_pose.weights[bone] = weight;
            }

            pose.accumulate(&clip_pose)?;
        }

        Ok(pose)
    }

    /// Write `pose` as the local transform of every bone and update world
    /// transforms
    pub fn apply_pose(&mut self, pose: &AnimationPose) -> Result<()> {
        if pose.bone_count() != self.bone_count() {
            return Err(AnimError::PoseLengthMismatch {
                left: self.bone_count(),
                right: pose.bone_count(),
            });
        }

        for (bone, local) in self.bones.iter_mut().zip(&pose.bone_poses) {
            bone.local = *local;
        }
        self.update_world();
        Ok(())
    }

    /// Reset to bind pose, then sample and apply `blend_state`
    pub fn apply_animation(&mut self, blend_state: &BlendStateWithClipData) -> Result<()> {
        self.reset_skeleton();
        let pose = self.sample_pose(blend_state)?;
        self.apply_pose(&pose)
    }

    /// Recompute every world transform from the local transforms
    pub fn update_world(&mut self) {
        for index in 0..self.bones.len() {
            let local = self.bones[index].local;
            // Parents precede children, so the parent's world is current
            let world = match self.bones[index].parent() {
                Some(parent) => self.bones[parent].world.compose(&local),
                None => local,
            };
            self.bones[index].world = world;
        }
    }

    /// Skinning matrices of every bone, tagged with one-based indices
    pub fn output_animation_result(&self) -> AnimationResult {
        AnimationResult {
            nodes: self
                .bones
                .iter()
                .map(|bone| AnimationResultElement {
                    index: bone.index() + 1,
                    transform: bone.skinning_matrix(),
                })
                .collect(),
        }
    }
}
