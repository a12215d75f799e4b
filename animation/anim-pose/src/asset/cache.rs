//! Load-once asset cache keyed by path
//!
//! Every asset kind has its own map from path to a shared [`Arc`] handle.
//! Entries are created lazily on the first request and are never evicted.
//!
//! The cache is `Send + Sync`, but a miss is not atomic: two threads asking
//! for the same uncached path may both invoke the loader, and the later
//! insert replaces the earlier one. Asset content is deterministic per path
//! so this only costs a duplicate load.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use super::AssetKind;
use super::loader::AssetLoader;
use super::types::{AnimSkeletonMap, AnimationClip, BoneBlendMask, SkeletonDefinition};
use crate::error::Result;

mod sealed {
    use super::{Arc, AssetCache, AssetLoader, HashMap, PoisonError, Result, RwLock};

    /// Path-keyed storage for one asset kind
    #[derive(Debug)]
    pub struct AssetStore<T> {
        entries: RwLock<HashMap<String, Arc<T>>>,
    }

    impl<T> Default for AssetStore<T> {
        fn default() -> Self {
            Self {
                entries: RwLock::new(HashMap::new()),
            }
        }
    }

    impl<T> AssetStore<T> {
        // Stored assets are immutable, so a poisoned lock still guards valid data
        pub fn get(&self, path: &str) -> Option<Arc<T>> {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            entries.get(path).cloned()
        }

        pub fn insert(&self, path: &str, asset: Arc<T>) {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.insert(path.to_string(), asset);
        }

        pub fn len(&self) -> usize {
            self.entries
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }
    }

    pub trait Sealed: Sized {
        fn load<L: AssetLoader + ?Sized>(loader: &L, path: &str) -> Result<Self>;
        fn store<L>(cache: &AssetCache<L>) -> &AssetStore<Self>;

        /// Report problems in a freshly loaded asset
        fn inspect(&self, _path: &str) {}
    }
}

use sealed::{AssetStore, Sealed};

/// Asset types the cache can hold
pub trait CachedAsset: Sealed + Send + Sync + 'static {
    const KIND: AssetKind;
}

macro_rules! cached_asset {
    ($ty:ty, $kind:expr, $load:ident, $field:ident $(, $inspect:path)?) => {
        impl Sealed for $ty {
            fn load<L: AssetLoader + ?Sized>(loader: &L, path: &str) -> Result<Self> {
                loader.$load(path)
            }

            fn store<L>(cache: &AssetCache<L>) -> &AssetStore<Self> {
                &cache.$field
            }

            $(
                fn inspect(&self, path: &str) {
                    $inspect(self, path);
                }
            )?
        }

        impl CachedAsset for $ty {
            const KIND: AssetKind = $kind;
        }
    };
}

cached_asset!(
    SkeletonDefinition,
    AssetKind::Skeleton,
    load_skeleton_definition,
    skeletons
);
cached_asset!(
    AnimationClip,
    AssetKind::AnimationClip,
    load_animation_clip,
    clips,
    AnimationClip::warn_missing_keys
);
cached_asset!(
    AnimSkeletonMap,
    AssetKind::SkeletonMap,
    load_anim_skeleton_map,
    skeleton_maps
);
cached_asset!(
    BoneBlendMask,
    AssetKind::BlendMask,
    load_bone_blend_mask,
    masks
);

/// Shared cache of skeletons, clips, skeleton maps and blend masks
///
/// Construct one per asset domain and pass it by reference to the blend
/// resolver and the character animators that need it.
#[derive(Debug)]
pub struct AssetCache<L> {
    loader: L,
    skeletons: AssetStore<SkeletonDefinition>,
    clips: AssetStore<AnimationClip>,
    skeleton_maps: AssetStore<AnimSkeletonMap>,
    masks: AssetStore<BoneBlendMask>,
}

impl<L: AssetLoader> AssetCache<L> {
    /// Create an empty cache backed by `loader`
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            skeletons: AssetStore::default(),
            clips: AssetStore::default(),
            skeleton_maps: AssetStore::default(),
            masks: AssetStore::default(),
        }
    }

    /// Return the cached asset at `path`, loading it on first use
    ///
    /// Loader errors are returned unchanged and nothing is cached for the
    /// path, so a later call retries the load.
    pub fn get_or_load<T: CachedAsset>(&self, path: &str) -> Result<Arc<T>> {
        let store = T::store(self);
        if let Some(asset) = store.get(path) {
            log::trace!("{} cache hit: {path}", T::KIND);
            return Ok(asset);
        }

        log::debug!("{} cache miss, loading {path}", T::KIND);
        let asset = T::load(&self.loader, path)?;
        asset.inspect(path);
        let asset = Arc::new(asset);
        store.insert(path, Arc::clone(&asset));
        Ok(asset)
    }

    pub fn skeleton(&self, path: &str) -> Result<Arc<SkeletonDefinition>> {
        self.get_or_load(path)
    }

    pub fn clip(&self, path: &str) -> Result<Arc<AnimationClip>> {
        self.get_or_load(path)
    }

    pub fn skeleton_map(&self, path: &str) -> Result<Arc<AnimSkeletonMap>> {
        self.get_or_load(path)
    }

    pub fn mask(&self, path: &str) -> Result<Arc<BoneBlendMask>> {
        self.get_or_load(path)
    }

    /// Check whether an asset of kind `T` is already cached at `path`
    pub fn contains<T: CachedAsset>(&self, path: &str) -> bool {
        T::store(self).get(path).is_some()
    }

    /// Total number of cached assets across all kinds
    pub fn len(&self) -> usize {
        self.skeletons.len() + self.clips.len() + self.skeleton_maps.len() + self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The loader backing this cache
    pub fn loader(&self) -> &L {
        &self.loader
    }
}
