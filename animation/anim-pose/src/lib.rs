//! # anim_pose - Skeletal Pose Evaluation
//!
//! Computes the final pose of a skinned character every animation tick from
//! one or more overlapping clips, per-bone blend masks and a locomotion
//! state machine.
//!
//! ## Features
//!
//! - Load-once asset cache shared between characters
//! - Per-bone weight normalization for masked multi-clip blends
//! - Keyframe sampling tolerant of channels shorter than their clip
//! - Single-pass world transform propagation and skinning matrices
//! - Pose cross-fades on locomotion state changes
//! - JSON asset loading behind the `serde-support` feature
//!
//! ## Example
//!
//! ```no_run
//! use anim_pose::{
//!     AssetCache, BlendState, BlendWeightResolver, MemoryLoader, RuntimeSkeleton,
//! };
//!
//! # fn main() -> anim_pose::Result<()> {
//! let cache = AssetCache::new(MemoryLoader::new());
//!
//! let definition = cache.skeleton("characters/hero.skeleton")?;
//! let mut skeleton = RuntimeSkeleton::build_skeleton(&definition)?;
//!
//! let blend = BlendState::single(
//!     "characters/hero/walk.clip",
//!     "characters/hero/walk.map",
//!     "characters/hero/full_body.mask",
//!     0.5,
//! );
//! let resolved = BlendWeightResolver::new(&cache).resolve(&blend)?;
//! skeleton.apply_animation(&resolved)?;
//!
//! for node in skeleton.output_animation_result().nodes {
//!     println!("bone {}: {:?}", node.index, node.transform);
//! }
//! # Ok(())
//! # }
//! ```

pub mod animator;
pub mod asset;
pub mod blend;
pub mod error;
pub mod fsm;
pub mod skeleton;
pub mod transform;

pub use animator::{AnimationTick, CharacterAnimator, ClipBinding, LocomotionConfig};
#[cfg(feature = "serde-support")]
pub use asset::JsonAssetLoader;
pub use asset::{
    AnimSkeletonMap, AnimationChannel, AnimationClip, AssetCache, AssetKind, AssetLoader,
    BoneBlendMask, MemoryLoader, RawBone, SkeletonDefinition,
};
pub use blend::{
    AnimationPose, BlendClip, BlendState, BlendStateWithClipData, BlendWeightResolver,
    ResolvedClip,
};
pub use error::{AnimError, Result};
pub use fsm::{LocomotionFsm, LocomotionSignals, LocomotionState, SignalValue, next_state};
pub use skeleton::{AnimationResult, AnimationResultElement, Bone, RuntimeSkeleton};
pub use transform::Transform;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
