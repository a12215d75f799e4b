//! Blend requests and their resolved form

use std::sync::Arc;

use crate::asset::{AnimSkeletonMap, AnimationClip};

/// One clip of a blend request
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BlendClip {
    pub clip_file_path: String,
    pub anim_skel_map_path: String,
    pub mask_file_path: String,
    /// Playback position in `[0, 1]`
    pub phase: f32,
    /// Requested weight before per-bone normalization
    pub weight: f32,
}

/// Set of clips to blend this tick
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct BlendState {
    pub clips: Vec<BlendClip>,
}

impl BlendState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blend state playing a single clip at full weight
    pub fn single(
        clip_file_path: impl Into<String>,
        anim_skel_map_path: impl Into<String>,
        mask_file_path: impl Into<String>,
        phase: f32,
    ) -> Self {
        Self::new().with_clip(BlendClip {
            clip_file_path: clip_file_path.into(),
            anim_skel_map_path: anim_skel_map_path.into(),
            mask_file_path: mask_file_path.into(),
            phase,
            weight: 1.0,
        })
    }

    pub fn with_clip(mut self, clip: BlendClip) -> Self {
        self.clips.push(clip);
        self
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}

/// A clip of a resolved blend state
#[derive(Debug, Clone)]
pub struct ResolvedClip {
    pub clip: Arc<AnimationClip>,
    pub skeleton_map: Arc<AnimSkeletonMap>,
    pub phase: f32,
    /// Normalized weight of this clip at every skeleton bone
    pub bone_weights: Vec<f32>,
}

impl ResolvedClip {
    /// Weight at `bone`, zero past the end of the table
    pub fn weight(&self, bone: usize) -> f32 {
        self.bone_weights.get(bone).copied().unwrap_or(0.0)
    }
}

/// Blend state resolved against the asset cache
#[derive(Debug, Clone, Default)]
pub struct BlendStateWithClipData {
    pub clips: Vec<ResolvedClip>,
    /// Number of bones of the skeleton the masks were authored against
    pub bone_count: usize,
    /// Bones no clip is enabled on; all their weights are zero
    pub uncovered_bones: Vec<usize>,
}

impl BlendStateWithClipData {
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    /// Sum of every clip's weight at `bone`
    pub fn weight_sum(&self, bone: usize) -> f32 {
        self.clips.iter().map(|clip| clip.weight(bone)).sum()
    }

    /// Per-clip weight rows, in clip order
    pub fn weight_table(&self) -> Vec<&[f32]> {
        self.clips.iter().map(|c| c.bone_weights.as_slice()).collect()
    }
}
