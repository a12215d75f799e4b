//! Asset loading interface and the bundled loaders
//!
//! The cache never parses anything itself: it asks an [`AssetLoader`] for the
//! asset at a path and keeps the result. Two loaders ship with the crate:
//!
//! - [`MemoryLoader`] serves assets registered up front, for embedders that
//!   parse their own formats and for tests.
//! - `JsonAssetLoader` (feature `serde-support`) reads JSON documents from a
//!   base directory.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::AssetKind;
use super::types::{AnimSkeletonMap, AnimationClip, BoneBlendMask, SkeletonDefinition};
use crate::error::{AnimError, Result};

/// Source of parsed animation assets
pub trait AssetLoader: Send + Sync {
    /// Load a skeleton definition
    fn load_skeleton_definition(&self, path: &str) -> Result<SkeletonDefinition>;

    /// Load an animation clip
    fn load_animation_clip(&self, path: &str) -> Result<AnimationClip>;

    /// Load a clip-node to skeleton-bone map
    fn load_anim_skeleton_map(&self, path: &str) -> Result<AnimSkeletonMap>;

    /// Load a per-bone blend mask
    fn load_bone_blend_mask(&self, path: &str) -> Result<BoneBlendMask>;
}

impl<L: AssetLoader + ?Sized> AssetLoader for Box<L> {
    fn load_skeleton_definition(&self, path: &str) -> Result<SkeletonDefinition> {
        (**self).load_skeleton_definition(path)
    }

    fn load_animation_clip(&self, path: &str) -> Result<AnimationClip> {
        (**self).load_animation_clip(path)
    }

    fn load_anim_skeleton_map(&self, path: &str) -> Result<AnimSkeletonMap> {
        (**self).load_anim_skeleton_map(path)
    }

    fn load_bone_blend_mask(&self, path: &str) -> Result<BoneBlendMask> {
        (**self).load_bone_blend_mask(path)
    }
}

/// Loader serving assets registered in memory
#[derive(Debug, Default)]
pub struct MemoryLoader {
    skeletons: HashMap<String, SkeletonDefinition>,
    clips: HashMap<String, AnimationClip>,
    skeleton_maps: HashMap<String, AnimSkeletonMap>,
    masks: HashMap<String, BoneBlendMask>,
    /// Number of successful or failed load calls
    loads: AtomicUsize,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_skeleton<S: Into<String>>(&mut self, path: S, skeleton: SkeletonDefinition) {
        self.skeletons.insert(path.into(), skeleton);
    }

    pub fn insert_clip<S: Into<String>>(&mut self, path: S, clip: AnimationClip) {
        self.clips.insert(path.into(), clip);
    }

    pub fn insert_skeleton_map<S: Into<String>>(&mut self, path: S, map: AnimSkeletonMap) {
        self.skeleton_maps.insert(path.into(), map);
    }

    pub fn insert_mask<S: Into<String>>(&mut self, path: S, mask: BoneBlendMask) {
        self.masks.insert(path.into(), mask);
    }

    /// Builder form of [`MemoryLoader::insert_skeleton`]
    pub fn with_skeleton<S: Into<String>>(mut self, path: S, skeleton: SkeletonDefinition) -> Self {
        self.insert_skeleton(path, skeleton);
        self
    }

    pub fn with_clip<S: Into<String>>(mut self, path: S, clip: AnimationClip) -> Self {
        self.insert_clip(path, clip);
        self
    }

    pub fn with_skeleton_map<S: Into<String>>(mut self, path: S, map: AnimSkeletonMap) -> Self {
        self.insert_skeleton_map(path, map);
        self
    }

    pub fn with_mask<S: Into<String>>(mut self, path: S, mask: BoneBlendMask) -> Self {
        self.insert_mask(path, mask);
        self
    }

    /// How many times any `load_*` method has been called
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    fn fetch<T: Clone>(
        &self,
        assets: &HashMap<String, T>,
        kind: AssetKind,
        path: &str,
    ) -> Result<T> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        assets
            .get(path)
            .cloned()
            .ok_or_else(|| AnimError::AssetNotFound {
                kind,
                path: path.to_string(),
            })
    }
}

impl AssetLoader for MemoryLoader {
    fn load_skeleton_definition(&self, path: &str) -> Result<SkeletonDefinition> {
        self.fetch(&self.skeletons, AssetKind::Skeleton, path)
    }

    fn load_animation_clip(&self, path: &str) -> Result<AnimationClip> {
        self.fetch(&self.clips, AssetKind::AnimationClip, path)
    }

    fn load_anim_skeleton_map(&self, path: &str) -> Result<AnimSkeletonMap> {
        self.fetch(&self.skeleton_maps, AssetKind::SkeletonMap, path)
    }

    fn load_bone_blend_mask(&self, path: &str) -> Result<BoneBlendMask> {
        self.fetch(&self.masks, AssetKind::BlendMask, path)
    }
}

#[cfg(feature = "serde-support")]
pub use json::JsonAssetLoader;

#[cfg(feature = "serde-support")]
mod json {
    use std::fs;
    use std::io;
    use std::path::{Path, PathBuf};

    use serde::de::DeserializeOwned;

    use super::{AnimError, AssetKind, AssetLoader, Result};
    use crate::asset::types::{AnimSkeletonMap, AnimationClip, BoneBlendMask, SkeletonDefinition};

    /// Loader reading JSON assets relative to a base directory
    #[derive(Debug, Clone)]
    pub struct JsonAssetLoader {
        base_path: PathBuf,
    }

    impl JsonAssetLoader {
        pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
            Self {
                base_path: base_path.as_ref().to_path_buf(),
            }
        }

        pub fn base_path(&self) -> &Path {
            &self.base_path
        }

        fn read<T: DeserializeOwned>(&self, kind: AssetKind, path: &str) -> Result<T> {
            let full_path = self.base_path.join(path);
            let contents = fs::read_to_string(&full_path).map_err(|e| {
                if e.kind() == io::ErrorKind::NotFound {
                    AnimError::AssetNotFound {
                        kind,
                        path: path.to_string(),
                    }
                } else {
                    AnimError::Io(e)
                }
            })?;

            serde_json::from_str(&contents).map_err(|e| AnimError::Parse {
                path: path.to_string(),
                reason: e.to_string(),
            })
        }
    }

    impl AssetLoader for JsonAssetLoader {
        fn load_skeleton_definition(&self, path: &str) -> Result<SkeletonDefinition> {
            self.read(AssetKind::Skeleton, path)
        }

        fn load_animation_clip(&self, path: &str) -> Result<AnimationClip> {
            self.read(AssetKind::AnimationClip, path)
        }

        fn load_anim_skeleton_map(&self, path: &str) -> Result<AnimSkeletonMap> {
            self.read(AssetKind::SkeletonMap, path)
        }

        fn load_bone_blend_mask(&self, path: &str) -> Result<BoneBlendMask> {
            self.read(AssetKind::BlendMask, path)
        }
    }
}
