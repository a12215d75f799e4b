//! Per-bone blend weight normalization
//!
//! Weights are normalized per bone rather than globally: a clip only counts
//! toward the bones its mask enables. This lets two clips own different
//! regions of the body at once, e.g. an upper-body aim clip over a
//! lower-body locomotion clip.

use std::sync::Arc;

use super::state::{BlendState, BlendStateWithClipData, ResolvedClip};
use crate::asset::{AssetCache, AssetLoader, BoneBlendMask};
use crate::error::{AnimError, Result};

/// Weight sums below this are treated as zero
pub const WEIGHT_EPSILON: f32 = 1e-4;

/// Resolves blend requests against an asset cache
#[derive(Debug)]
pub struct BlendWeightResolver<'a, L> {
    cache: &'a AssetCache<L>,
}

impl<'a, L: AssetLoader> BlendWeightResolver<'a, L> {
    pub fn new(cache: &'a AssetCache<L>) -> Self {
        Self { cache }
    }

    /// Load every asset `blend_state` references and compute the normalized
    /// per-clip, per-bone weight table
    ///
    /// The bone count comes from the skeleton the first clip's mask was
    /// authored against. A bone that no clip's mask enables is reported
    /// through the log and keeps a weight of zero for every clip.
    pub fn resolve(&self, blend_state: &BlendState) -> Result<BlendStateWithClipData> {
        if blend_state.is_empty() {
            return Err(AnimError::EmptyBlendState);
        }

        let clip_count = blend_state.clip_count();
        let mut clips = Vec::with_capacity(clip_count);
        let mut masks: Vec<Arc<BoneBlendMask>> = Vec::with_capacity(clip_count);
        for request in &blend_state.clips {
            clips.push((
                self.cache.clip(&request.clip_file_path)?,
                self.cache.skeleton_map(&request.anim_skel_map_path)?,
            ));
            masks.push(self.cache.mask(&request.mask_file_path)?);
        }

        let skeleton_path = &masks[0].skeleton_file_path;
        let bone_count = self.cache.skeleton(skeleton_path)?.bone_count();

        for (request, mask) in blend_state.clips.iter().zip(&masks) {
            if mask.enabled.len() < bone_count {
                log::warn!(
                    "Mask {} covers {} of {} bones of {}, remaining bones are disabled",
                    request.mask_file_path,
                    mask.enabled.len(),
                    bone_count,
                    skeleton_path
                );
            }
        }

        let mut weights = vec![vec![0.0_f32; bone_count]; clip_count];
        let mut uncovered_bones = Vec::new();

        for bone in 0..bone_count {
            let sum: f32 = blend_state
                .clips
                .iter()
                .zip(&masks)
                .filter(|(_, mask)| mask.is_enabled(bone))
                .map(|(request, _)| request.weight)
                .sum();

            if sum.abs() < WEIGHT_EPSILON {
                log::error!("Blend weight sum at bone {bone} is zero, bone keeps its bind pose");
                uncovered_bones.push(bone);
                continue;
            }

            for (clip_index, (request, mask)) in blend_state.clips.iter().zip(&masks).enumerate() {
                if mask.is_enabled(bone) {
                    weights[clip_index][bone] = request.weight / sum;
                }
            }
        }

        let clips = clips
            .into_iter()
            .zip(weights)
            .zip(&blend_state.clips)
            .map(|(((clip, skeleton_map), bone_weights), request)| ResolvedClip {
                clip,
                skeleton_map,
                phase: request.phase,
                bone_weights,
            })
            .collect();

        Ok(BlendStateWithClipData {
            clips,
            bone_count,
            uncovered_bones,
        })
    }
}
