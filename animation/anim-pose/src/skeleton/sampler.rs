//! Keyframe sampling for frame-indexed clip channels

use glam::{Quat, Vec3};

use crate::asset::AnimationChannel;
use crate::transform::Transform;

/// Bracketing frame pair and interpolation fraction at a clip phase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSample {
    pub low: usize,
    pub high: usize,
    /// Position between `low` and `high`, in `[0, 1)`
    pub fraction: f32,
}

impl FrameSample {
    /// Locate `phase` on a clip of `total_frame` frames
    ///
    /// The exact frame is `phase * (total_frame - 1)`. Phases outside
    /// `[0, 1]` are clamped first.
    pub fn at_phase(phase: f32, total_frame: u32) -> Self {
        let phase = if phase.is_nan() {
            0.0
        } else {
            phase.clamp(0.0, 1.0)
        };
        let exact = phase * total_frame.saturating_sub(1) as f32;
        let low = exact.floor();

        Self {
            low: low as usize,
            high: exact.ceil() as usize,
            fraction: exact - low,
        }
    }

    /// Clamp the frame pair to a key array of `len` entries
    ///
    /// `high` is limited to the last key and `low` never exceeds the reduced
    /// `high`. Returns `None` for an empty key array.
    pub fn clamp_to(&self, len: usize) -> Option<(usize, usize)> {
        let last = len.checked_sub(1)?;
        let high = self.high.min(last);
        Some((self.low.min(high), high))
    }
}

fn sample_vec3(keys: &[Vec3], frame: FrameSample) -> Option<Vec3> {
    let (low, high) = frame.clamp_to(keys.len())?;
    Some(keys[low].lerp(keys[high], frame.fraction))
}

fn sample_quat(keys: &[Quat], frame: FrameSample) -> Option<Quat> {
    let (low, high) = frame.clamp_to(keys.len())?;
    Some(keys[low].slerp(keys[high], frame.fraction).normalize())
}

/// Sample one channel into a local transform
///
/// Each component clamps against its own key count. A component without
/// any keys keeps the value from `bind_pose`; that is reported once when the
/// clip is loaded, so sampling only traces it.
pub fn sample_channel(
    channel: &AnimationChannel,
    frame: FrameSample,
    bind_pose: &Transform,
) -> Transform {
    let position = sample_vec3(&channel.position_keys, frame).unwrap_or_else(|| {
        log::trace!("Channel {} has no position keys", channel.name);
        bind_pose.position
    });
    let rotation = sample_quat(&channel.rotation_keys, frame).unwrap_or_else(|| {
        log::trace!("Channel {} has no rotation keys", channel.name);
        bind_pose.rotation
    });
    let scale = sample_vec3(&channel.scaling_keys, frame).unwrap_or_else(|| {
        log::trace!("Channel {} has no scaling keys", channel.name);
        bind_pose.scale
    });

    Transform::new(position, rotation, scale)
}
