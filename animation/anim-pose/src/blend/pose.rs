//! Per-bone local poses and their blending

use crate::error::{AnimError, Result};
use crate::transform::Transform;

/// Weight sums at or below this leave an in-place blend untouched
const MIN_WEIGHT_SUM: f32 = 1e-4;

/// Local transform of every bone plus a parallel per-bone weight
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimationPose {
    pub bone_poses: Vec<Transform>,
    pub weights: Vec<f32>,
}

impl AnimationPose {
    /// Pose of `bone_count` identity transforms, all with `weight`
    pub fn new(bone_count: usize, weight: f32) -> Self {
        Self {
            bone_poses: vec![Transform::IDENTITY; bone_count],
            weights: vec![weight; bone_count],
        }
    }

    /// Pose holding the given transforms, all with `weight`
    pub fn from_transforms(bone_poses: Vec<Transform>, weight: f32) -> Self {
        let weights = vec![weight; bone_poses.len()];
        Self {
            bone_poses,
            weights,
        }
    }

    pub fn bone_count(&self) -> usize {
        self.bone_poses.len()
    }

    fn check_length(&self, other: &Self) -> Result<()> {
        if self.bone_poses.len() != other.bone_poses.len()
            || self.weights.len() != self.bone_poses.len()
            || other.weights.len() != other.bone_poses.len()
        {
            return Err(AnimError::PoseLengthMismatch {
                left: self.bone_poses.len(),
                right: other.bone_poses.len(),
            });
        }
        Ok(())
    }

    /// Interpolate from `from` to `to` by `factor`
    ///
    /// Position and scale are lerped, rotation is slerped and the weight of
    /// each bone is lerped between the two input weights.
    pub fn blend(from: &Self, to: &Self, factor: f32) -> Result<Self> {
        from.check_length(to)?;

        let bone_poses = from
            .bone_poses
            .iter()
            .zip(&to.bone_poses)
            .map(|(a, b)| a.slerp(b, factor))
            .collect();
        let weights = from
            .weights
            .iter()
            .zip(&to.weights)
            .map(|(a, b)| a + (b - a) * factor)
            .collect();

        Ok(Self {
            bone_poses,
            weights,
        })
    }

    /// Fold `other` into this pose
    ///
    /// For every bone with a combined weight above `1e-4`, the pose moves
    /// toward `other` by `self.weight / (self.weight + other.weight)` and
    /// the combined weight is stored back. Rotations use normalized lerp.
    /// Bones whose combined weight is negligible are left untouched.
    pub fn blend_in_place(&mut self, other: &Self) -> Result<()> {
        self.check_length(other)?;

        for (bone, (pose, weight)) in self
            .bone_poses
            .iter_mut()
            .zip(self.weights.iter_mut())
            .enumerate()
        {
            let sum = *weight + other.weights[bone];
            if sum > MIN_WEIGHT_SUM {
                let cur_weight = *weight / sum;
                *pose = pose.nlerp(&other.bone_poses[bone], cur_weight);
                *weight = sum;
            }
        }
        Ok(())
    }

    /// Add `other` to a running weighted average
    ///
    /// After folding poses `p1..pn` into an accumulator that started with
    /// zero weight, every bone holds the weight-averaged transform of the
    /// inputs and the total weight. Bones where every input had zero weight
    /// keep the accumulator's starting transform.
    pub fn accumulate(&mut self, other: &Self) -> Result<()> {
        self.check_length(other)?;

        for (bone, (pose, weight)) in self
            .bone_poses
            .iter_mut()
            .zip(self.weights.iter_mut())
            .enumerate()
        {
            let incoming = other.weights[bone];
            let sum = *weight + incoming;
            if sum > MIN_WEIGHT_SUM && incoming > 0.0 {
                *pose = pose.nlerp(&other.bone_poses[bone], incoming / sum);
                *weight = sum;
            }
        }
        Ok(())
    }
}
