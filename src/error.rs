//! Errors reported by the clamp entry procedure.
//!
//! Running out of text is not an error: it is reported through
//! [`ClampOutcome`](crate::clamp::ClampOutcome). Only configurations or
//! inputs that would make the search meaningless are rejected here.

use crate::tree::NodeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClampError {
    #[error("line count must be at least 1")]
    ZeroLines,

    #[error("empty delimiter at position {0} must be the last entry")]
    MisplacedEmptyDelimiter(usize),

    #[error("truncation marker must not be empty")]
    EmptyMarker,

    #[error("step budget must be at least 1")]
    ZeroStepBudget,

    #[error("invalid clamp length: {0:?}")]
    InvalidLength(String),

    #[error("node {0:?} is not an attached element")]
    NotAnElement(NodeId),

    #[error("unusable line height {0:?}")]
    InvalidLineHeight(String),
}
