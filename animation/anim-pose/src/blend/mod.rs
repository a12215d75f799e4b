//! Multi-clip blend requests, per-bone weight resolution and pose blending

mod pose;
mod resolver;
mod state;

pub use pose::AnimationPose;
pub use resolver::{BlendWeightResolver, WEIGHT_EPSILON};
pub use state::{BlendClip, BlendState, BlendStateWithClipData, ResolvedClip};
