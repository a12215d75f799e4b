use glam::Mat4;

use crate::asset::RawBone;
use crate::transform::Transform;

/// Runtime bone of a [`RuntimeSkeleton`](super::RuntimeSkeleton)
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    name: String,
    index: usize,
    parent: Option<usize>,
    bind_pose: Transform,
    inverse_bind_pose: Mat4,
    pub(super) local: Transform,
    pub(super) world: Transform,
}

impl Bone {
    pub(super) fn from_raw(index: usize, raw: &RawBone) -> Self {
        Self {
            name: raw.name.clone(),
            index,
            parent: raw.parent_index,
            bind_pose: raw.bind_pose,
            inverse_bind_pose: raw.inverse_bind_pose,
            local: raw.bind_pose,
            world: raw.bind_pose,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based index in the skeleton
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn bind_pose(&self) -> &Transform {
        &self.bind_pose
    }

    pub fn inverse_bind_pose(&self) -> &Mat4 {
        &self.inverse_bind_pose
    }

    /// Current transform relative to the parent
    pub fn local(&self) -> &Transform {
        &self.local
    }

    /// Current transform in model space, as of the last world update
    pub fn world(&self) -> &Transform {
        &self.world
    }

    /// Skinning matrix: world transform followed by the inverse bind pose
    pub fn skinning_matrix(&self) -> Mat4 {
        self.world.to_matrix() * self.inverse_bind_pose
    }

    pub(super) fn reset_to_bind_pose(&mut self) {
        self.local = self.bind_pose;
    }
}
