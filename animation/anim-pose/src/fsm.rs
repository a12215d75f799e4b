//! Locomotion state machine
//!
//! The machine reads a snapshot of three signals every tick and moves
//! between ten states. The transition function [`next_state`] is pure; the
//! current state lives in a [`LocomotionFsm`] owned by the caller.

use std::collections::HashMap;
use std::fmt;

/// Speeds above this count as moving
pub const MOVING_SPEED_THRESHOLD: f32 = 0.01;

/// Discrete locomotion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum LocomotionState {
    #[default]
    Idle,
    WalkStart,
    WalkRun,
    WalkStop,
    JumpStartFromIdle,
    JumpLoopFromIdle,
    JumpEndFromIdle,
    JumpStartFromWalkRun,
    JumpLoopFromWalkRun,
    JumpEndFromWalkRun,
}

impl LocomotionState {
    /// Every state, in declaration order
    pub const ALL: [Self; 10] = [
        Self::Idle,
        Self::WalkStart,
        Self::WalkRun,
        Self::WalkStop,
        Self::JumpStartFromIdle,
        Self::JumpLoopFromIdle,
        Self::JumpEndFromIdle,
        Self::JumpStartFromWalkRun,
        Self::JumpLoopFromWalkRun,
        Self::JumpEndFromWalkRun,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::WalkStart => "walk_start",
            Self::WalkRun => "walk_run",
            Self::WalkStop => "walk_stop",
            Self::JumpStartFromIdle => "jump_start_from_idle",
            Self::JumpLoopFromIdle => "jump_loop_from_idle",
            Self::JumpEndFromIdle => "jump_end_from_idle",
            Self::JumpStartFromWalkRun => "jump_start_from_walk_run",
            Self::JumpLoopFromWalkRun => "jump_loop_from_walk_run",
            Self::JumpEndFromWalkRun => "jump_end_from_walk_run",
        }
    }
}

impl fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw value of a named signal
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum SignalValue {
    Bool(bool),
    Float(f32),
}

/// Signal snapshot read by the state machine
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde-support",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LocomotionSignals {
    /// The current clip reached its end
    pub clip_finish: bool,
    pub jumping: bool,
    pub speed: f32,
}

impl LocomotionSignals {
    pub fn new(clip_finish: bool, jumping: bool, speed: f32) -> Self {
        Self {
            clip_finish,
            jumping,
            speed,
        }
    }

    /// Read `clip_finish`, `jumping` and `speed` from a named signal map
    ///
    /// Missing signals, and signals of the wrong kind, read as `false` or
    /// `0.0`.
    pub fn from_map(signals: &HashMap<String, SignalValue>) -> Self {
        let flag = |name: &str| matches!(signals.get(name), Some(SignalValue::Bool(true)));
        let speed = match signals.get("speed") {
            Some(SignalValue::Float(speed)) => *speed,
            _ => 0.0,
        };

        Self {
            clip_finish: flag("clip_finish"),
            jumping: flag("jumping"),
            speed,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.speed > MOVING_SPEED_THRESHOLD
    }
}

/// State that follows `state` under `signals`
pub fn next_state(state: LocomotionState, signals: &LocomotionSignals) -> LocomotionState {
    use LocomotionState::{
        Idle, JumpEndFromIdle, JumpEndFromWalkRun, JumpLoopFromIdle, JumpLoopFromWalkRun,
        JumpStartFromIdle, JumpStartFromWalkRun, WalkRun, WalkStart, WalkStop,
    };

    let finished = signals.clip_finish;
    let jumping = signals.jumping;
    let moving = signals.is_moving();

    match state {
        Idle if jumping => JumpStartFromIdle,
        Idle if moving => WalkStart,
        WalkStart if finished => WalkRun,
        WalkRun if jumping => JumpStartFromWalkRun,
        WalkRun if !moving => WalkStop,
        WalkStop if finished => Idle,
        JumpStartFromIdle if finished && jumping => JumpLoopFromIdle,
        JumpStartFromWalkRun if finished && jumping => JumpLoopFromWalkRun,
        JumpStartFromIdle | JumpStartFromWalkRun if finished => Idle,
        JumpLoopFromIdle if !jumping => JumpEndFromIdle,
        JumpLoopFromWalkRun if !jumping => JumpEndFromWalkRun,
        JumpEndFromIdle | JumpEndFromWalkRun if finished && moving => WalkRun,
        JumpEndFromIdle | JumpEndFromWalkRun if finished => Idle,
        unchanged => unchanged,
    }
}

/// Current locomotion state of one character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LocomotionFsm {
    state: LocomotionState,
}

impl LocomotionFsm {
    /// Machine in the idle state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: LocomotionState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> LocomotionState {
        self.state
    }

    /// Step once; returns whether the state changed
    pub fn update(&mut self, signals: &LocomotionSignals) -> bool {
        let next = next_state(self.state, signals);
        if next == self.state {
            return false;
        }

        log::debug!("Locomotion state {} -> {}", self.state, next);
        self.state = next;
        true
    }
}
