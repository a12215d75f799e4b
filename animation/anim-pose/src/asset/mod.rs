//! Animation assets, their loaders and the shared asset cache

mod cache;
mod loader;
mod types;

use std::fmt;

pub use cache::{AssetCache, CachedAsset};
#[cfg(feature = "serde-support")]
pub use loader::JsonAssetLoader;
pub use loader::{AssetLoader, MemoryLoader};
pub use types::{
    AnimSkeletonMap, AnimationChannel, AnimationClip, BoneBlendMask, RawBone, SkeletonDefinition,
};

/// The four kinds of asset the cache manages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Skeleton,
    AnimationClip,
    SkeletonMap,
    BlendMask,
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Skeleton => "Skeleton definition",
            Self::AnimationClip => "Animation clip",
            Self::SkeletonMap => "Animation skeleton map",
            Self::BlendMask => "Bone blend mask",
        };
        f.write_str(name)
    }
}
