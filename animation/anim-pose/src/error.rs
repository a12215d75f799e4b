use std::io;
use thiserror::Error;

use crate::asset::AssetKind;
use crate::fsm::LocomotionState;

/// Error types for asset loading and pose evaluation
#[derive(Error, Debug)]
pub enum AnimError {
    /// I/O error while reading an asset
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The loader has no asset of this kind at the given path
    #[error("{kind} not found: {path}")]
    AssetNotFound { kind: AssetKind, path: String },

    /// The asset exists but could not be decoded
    #[error("Failed to parse {path}: {reason}")]
    Parse { path: String, reason: String },

    /// Skeleton definition is not array-backed
    #[error("Skeleton definition with {bones} bones is not flat")]
    NonFlatSkeleton { bones: usize },

    /// Skeleton definition is not flagged as topologically ordered
    #[error("Skeleton definition with {bones} bones is not in topological order")]
    UnorderedSkeleton { bones: usize },

    /// A bone refers to a parent that does not precede it
    #[error("Bone {bone} has parent {parent}, skeleton is not in topological order")]
    NotTopological { bone: usize, parent: usize },

    /// A bone refers to a parent outside the bone array
    #[error("Bone {bone} has parent {parent} but the skeleton only has {count} bones")]
    ParentOutOfRange {
        bone: usize,
        parent: usize,
        count: usize,
    },

    /// Two poses with different bone counts were blended
    #[error("Pose length mismatch: {left} bones vs {right} bones")]
    PoseLengthMismatch { left: usize, right: usize },

    /// A blend state without any clip was submitted
    #[error("Blend state contains no clips")]
    EmptyBlendState,

    /// The locomotion clip table has no binding for a state
    #[error("No clip bound to locomotion state {0}")]
    UnknownClipTable(LocomotionState),
}

/// Result type using AnimError
pub type Result<T> = std::result::Result<T, AnimError>;
