//! Immutable asset types shared through the asset cache

use glam::{Mat4, Quat, Vec3};

use crate::error::{AnimError, Result};
use crate::transform::Transform;

#[cfg(feature = "serde-support")]
const fn default_true() -> bool {
    true
}

/// Raw bone record of a skeleton definition
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct RawBone {
    pub name: String,
    /// Index of the parent bone, `None` for roots
    pub parent_index: Option<usize>,
    /// Rest-pose local transform
    pub bind_pose: Transform,
    /// Inverse of the bone's bind-pose world matrix
    pub inverse_bind_pose: Mat4,
}

/// Skeleton as authored, before a runtime skeleton is built from it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct SkeletonDefinition {
    pub bones: Vec<RawBone>,
    /// Bones are stored in a flat array rather than as a node tree
    #[cfg_attr(feature = "serde-support", serde(default = "default_true"))]
    pub is_flat: bool,
    /// Every parent precedes its children
    #[cfg_attr(feature = "serde-support", serde(default = "default_true"))]
    pub in_topological_order: bool,
}

impl SkeletonDefinition {
    /// Create a flat, topologically ordered definition
    pub fn new(bones: Vec<RawBone>) -> Self {
        Self {
            bones,
            is_flat: true,
            in_topological_order: true,
        }
    }

    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    /// Check the structural preconditions for building a runtime skeleton
    ///
    /// Both the authored flags and the actual parent indices are checked.
    pub fn validate(&self) -> Result<()> {
        let count = self.bones.len();
        if !self.is_flat {
            return Err(AnimError::NonFlatSkeleton { bones: count });
        }
        if !self.in_topological_order {
            return Err(AnimError::UnorderedSkeleton { bones: count });
        }

        for (bone, raw) in self.bones.iter().enumerate() {
            let Some(parent) = raw.parent_index else {
                continue;
            };
            if parent >= count {
                return Err(AnimError::ParentOutOfRange {
                    bone,
                    parent,
                    count,
                });
            }
            if parent >= bone {
                return Err(AnimError::NotTopological { bone, parent });
            }
        }

        Ok(())
    }
}

/// Keyframes of a single clip node
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AnimationChannel {
    pub name: String,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub position_keys: Vec<Vec3>,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub rotation_keys: Vec<Quat>,
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub scaling_keys: Vec<Vec3>,
}

/// Frame-sampled animation clip
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AnimationClip {
    /// Nominal number of frames; individual channels may hold fewer keys
    pub total_frame: u32,
    pub node_channels: Vec<AnimationChannel>,
}

impl AnimationChannel {
    /// Components of this channel without any keys
    pub fn missing_components(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.position_keys.is_empty() {
            missing.push("position");
        }
        if self.rotation_keys.is_empty() {
            missing.push("rotation");
        }
        if self.scaling_keys.is_empty() {
            missing.push("scaling");
        }
        missing
    }
}

impl AnimationClip {
    pub fn node_count(&self) -> usize {
        self.node_channels.len()
    }

    /// Log each channel that will fall back to the bind pose when sampled
    pub(crate) fn warn_missing_keys(&self, path: &str) {
        for channel in &self.node_channels {
            let missing = channel.missing_components();
            if !missing.is_empty() {
                log::warn!(
                    "{path}: channel {} has no {} keys, bind pose is used",
                    channel.name,
                    missing.join("/")
                );
            }
        }
    }
}

/// Clip node index to skeleton bone index
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct AnimSkeletonMap {
    /// `None` marks a clip node with no bone in the skeleton
    pub convert: Vec<Option<usize>>,
}

impl AnimSkeletonMap {
    /// Map node `i` to bone `i` for `count` nodes
    pub fn identity(count: usize) -> Self {
        Self {
            convert: (0..count).map(Some).collect(),
        }
    }

    pub fn bone_for_node(&self, node: usize) -> Option<usize> {
        self.convert.get(node).copied().flatten()
    }
}

/// Per-bone enable flags authored against one skeleton
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BoneBlendMask {
    pub skeleton_file_path: String,
    pub enabled: Vec<bool>,
}

impl BoneBlendMask {
    /// Mask enabling every bone of a `count`-bone skeleton
    pub fn all_enabled(skeleton_file_path: impl Into<String>, count: usize) -> Self {
        Self {
            skeleton_file_path: skeleton_file_path.into(),
            enabled: vec![true; count],
        }
    }

    /// Bones past the end of the flag array count as disabled
    pub fn is_enabled(&self, bone: usize) -> bool {
        self.enabled.get(bone).copied().unwrap_or(false)
    }
}
