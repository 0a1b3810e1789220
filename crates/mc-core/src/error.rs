//! Error types for the Monte Carlo dice crates

use thiserror::Error;

use crate::FaceLabel;

/// Broad failure category of an [`McError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input: duplicate faces, unknown mode string, bad collaborator
    Validation,
    /// A value of the wrong scalar shape (non-finite number, unparsable weight)
    Type,
    /// A face label that the die does not have
    Lookup,
    /// File or serialization failure
    Io,
}

/// Core error type
#[derive(Error, Debug)]
pub enum McError {
    #[error("Face set must contain at least one face")]
    EmptyFaceSet,

    #[error("Duplicate face in face set: {0}")]
    DuplicateFace(FaceLabel),

    #[error("Invalid face: {0}")]
    InvalidFace(String),

    #[error("Face {0} is not present on this die")]
    UnknownFace(FaceLabel),

    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    #[error("Weight must not be negative, got {0}")]
    NegativeWeight(f64),

    #[error("Unknown result form '{0}', expected \"wide\" or \"narrow\"")]
    UnknownResultForm(String),

    #[error("A game needs at least one die")]
    EmptyDiceList,

    #[error("Die {die} does not share the face set of die 0")]
    MismatchedFaceSets { die: usize },

    #[error("Inconsistent play history: {0}")]
    InconsistentHistory(String),

    #[error("Sampling error: {0}")]
    Sampling(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McError {
    /// Failure category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            McError::EmptyFaceSet
            | McError::DuplicateFace(_)
            | McError::NegativeWeight(_)
            | McError::UnknownResultForm(_)
            | McError::EmptyDiceList
            | McError::MismatchedFaceSets { .. }
            | McError::InconsistentHistory(_)
            | McError::Sampling(_)
            | McError::Config(_) => ErrorKind::Validation,
            McError::InvalidFace(_) | McError::InvalidWeight(_) => ErrorKind::Type,
            McError::UnknownFace(_) => ErrorKind::Lookup,
            McError::Io(_) | McError::Json(_) => ErrorKind::Io,
        }
    }
}

/// Result type alias
pub type McResult<T> = Result<T, McError>;
