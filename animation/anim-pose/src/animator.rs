//! Per-character animation driver
//!
//! [`CharacterAnimator`] ties the pieces together for one character: it
//! steps the locomotion state machine, advances the playback phase of the
//! state's clip, resolves and samples it, cross-fades from the previous pose
//! after a state change and produces the skinning matrices.

use std::collections::BTreeMap;

use crate::asset::{AssetCache, AssetLoader, SkeletonDefinition};
use crate::blend::{AnimationPose, BlendState, BlendWeightResolver};
use crate::error::{AnimError, Result};
use crate::fsm::{LocomotionFsm, LocomotionSignals, LocomotionState};
use crate::skeleton::{AnimationResult, RuntimeSkeleton};

/// Default playback rate of clip frames
pub const DEFAULT_FRAMES_PER_SECOND: f32 = 30.0;
/// Default cross-fade length after a state change
pub const DEFAULT_CROSS_FADE_SECONDS: f32 = 0.2;

#[cfg(feature = "serde-support")]
const fn default_frames_per_second() -> f32 {
    DEFAULT_FRAMES_PER_SECOND
}

#[cfg(feature = "serde-support")]
const fn default_cross_fade_seconds() -> f32 {
    DEFAULT_CROSS_FADE_SECONDS
}

/// Clip played while the state machine is in a given state
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ClipBinding {
    pub clip_file_path: String,
    pub anim_skel_map_path: String,
    pub mask_file_path: String,
    /// Wrap the phase at the end of the clip instead of holding the last frame
    #[cfg_attr(feature = "serde-support", serde(default))]
    pub looping: bool,
}

impl ClipBinding {
    pub fn new(
        clip_file_path: impl Into<String>,
        anim_skel_map_path: impl Into<String>,
        mask_file_path: impl Into<String>,
        looping: bool,
    ) -> Self {
        Self {
            clip_file_path: clip_file_path.into(),
            anim_skel_map_path: anim_skel_map_path.into(),
            mask_file_path: mask_file_path.into(),
            looping,
        }
    }
}

/// Playback settings and the state to clip table of a character
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct LocomotionConfig {
    #[cfg_attr(
        feature = "serde-support",
        serde(default = "default_frames_per_second")
    )]
    pub frames_per_second: f32,
    /// Zero disables cross-fading
    #[cfg_attr(
        feature = "serde-support",
        serde(default = "default_cross_fade_seconds")
    )]
    pub cross_fade_seconds: f32,
    pub clips: BTreeMap<LocomotionState, ClipBinding>,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            frames_per_second: DEFAULT_FRAMES_PER_SECOND,
            cross_fade_seconds: DEFAULT_CROSS_FADE_SECONDS,
            clips: BTreeMap::new(),
        }
    }
}

impl LocomotionConfig {
    pub fn with_binding(mut self, state: LocomotionState, binding: ClipBinding) -> Self {
        self.clips.insert(state, binding);
        self
    }

    pub fn binding(&self, state: LocomotionState) -> Result<&ClipBinding> {
        self.clips
            .get(&state)
            .ok_or(AnimError::UnknownClipTable(state))
    }

    /// Check that every state has a clip
    pub fn validate(&self) -> Result<()> {
        for state in LocomotionState::ALL {
            self.binding(state)?;
        }
        Ok(())
    }
}

/// Outcome of one [`CharacterAnimator::tick`]
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationTick {
    pub state: LocomotionState,
    pub state_changed: bool,
    /// Phase the state's clip was sampled at
    pub phase: f32,
    pub result: AnimationResult,
}

#[derive(Debug, Clone)]
struct CrossFade {
    from: AnimationPose,
    elapsed: f32,
    duration: f32,
}

/// Animation state of one character
#[derive(Debug, Clone)]
pub struct CharacterAnimator {
    config: LocomotionConfig,
    skeleton: RuntimeSkeleton,
    fsm: LocomotionFsm,
    phase: f32,
    clip_finished: bool,
    fade: Option<CrossFade>,
}

impl CharacterAnimator {
    /// Create an idle animator for `definition`
    ///
    /// Fails when the skeleton is malformed or the config leaves a state
    /// without a clip.
    pub fn new(definition: &SkeletonDefinition, config: LocomotionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            skeleton: RuntimeSkeleton::build_skeleton(definition)?,
            fsm: LocomotionFsm::new(),
            phase: 0.0,
            clip_finished: false,
            fade: None,
        })
    }

    /// Create an animator for the skeleton cached at `skeleton_path`
    pub fn from_cache<L: AssetLoader>(
        cache: &AssetCache<L>,
        skeleton_path: &str,
        config: LocomotionConfig,
    ) -> Result<Self> {
        let definition = cache.skeleton(skeleton_path)?;
        Self::new(&definition, config)
    }

    pub fn state(&self) -> LocomotionState {
        self.fsm.state()
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn skeleton(&self) -> &RuntimeSkeleton {
        &self.skeleton
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Replace the runtime skeleton with one built from `definition`
    ///
    /// Any running cross-fade is dropped since its pose belongs to the old
    /// skeleton. On error the current skeleton is kept.
    pub fn rebuild_skeleton(&mut self, definition: &SkeletonDefinition) -> Result<()> {
        self.skeleton = RuntimeSkeleton::build_skeleton(definition)?;
        self.fade = None;
        Ok(())
    }

    /// Advance the character by `delta_seconds`
    ///
    /// # Arguments
    /// * `cache` - Asset cache holding the clips of the state table
    /// * `delta_seconds` - Time since the previous tick
    /// * `signals` - Controller signals for this tick; `clip_finish` is
    ///   forced on when the current clip ended on the previous tick
    pub fn tick<L: AssetLoader>(
        &mut self,
        cache: &AssetCache<L>,
        delta_seconds: f32,
        signals: &LocomotionSignals,
    ) -> Result<AnimationTick> {
        let mut signals = *signals;
        signals.clip_finish |= self.clip_finished;

        let state_changed = self.fsm.update(&signals);
        let state = self.fsm.state();
        if state_changed {
            let from = self.skeleton.local_pose();
            self.fade = (self.config.cross_fade_seconds > 0.0).then(|| CrossFade {
                from,
                elapsed: 0.0,
                duration: self.config.cross_fade_seconds,
            });
            self.phase = 0.0;
            self.clip_finished = false;
        }

        let binding = self.config.binding(state)?;
        let clip = cache.clip(&binding.clip_file_path)?;
        let span = clip.total_frame.saturating_sub(1) as f32;
        if span > 0.0 {
            self.phase += delta_seconds * self.config.frames_per_second / span;
        } else {
            self.phase = 1.0;
        }

        // Reported to the state machine on the next tick
        self.clip_finished = self.phase >= 1.0;
        if self.clip_finished {
            self.phase = if binding.looping {
                self.phase.fract()
            } else {
                1.0
            };
        }

        let blend_state = BlendState::single(
            binding.clip_file_path.as_str(),
            binding.anim_skel_map_path.as_str(),
            binding.mask_file_path.as_str(),
            self.phase,
        );
        let resolved = BlendWeightResolver::new(cache).resolve(&blend_state)?;
        let mut pose = self.skeleton.sample_pose(&resolved)?;

        if let Some(fade) = &mut self.fade {
            fade.elapsed += delta_seconds;
            let factor = (fade.elapsed / fade.duration).min(1.0);
            pose = AnimationPose::blend(&fade.from, &pose, factor)?;
            if factor >= 1.0 {
                self.fade = None;
            }
        }

        self.skeleton.apply_pose(&pose)?;

        Ok(AnimationTick {
            state,
            state_changed,
            phase: self.phase,
            result: self.skeleton.output_animation_result(),
        })
    }

    /// Evaluate a caller-supplied blend, bypassing the state machine
    ///
    /// Used for layered blends such as an upper-body clip over locomotion.
    pub fn play_blend<L: AssetLoader>(
        &mut self,
        cache: &AssetCache<L>,
        blend_state: &BlendState,
    ) -> Result<AnimationResult> {
        let resolved = BlendWeightResolver::new(cache).resolve(blend_state)?;
        self.skeleton.apply_animation(&resolved)?;
        Ok(self.skeleton.output_animation_result())
    }
}
