use thiserror::Error;

use crate::model::{Coordinate, ElementId};
use crate::target::DropTarget;

pub type Result<T> = std::result::Result<T, ReorderError>;

/// Reasons a drag step did not relocate anything.
///
/// None of these leave the tree half-modified: every operation that returns an
/// error keeps the tree it was given.
#[derive(Debug, Error)]
pub enum ReorderError {
    #[error("dragged element `{id}` is not in the tree")]
    UnresolvedSource { id: ElementId },

    #[error("no element at source {coordinate}")]
    SourceOutOfRange { coordinate: Coordinate },

    #[error("drop target {target} does not resolve to a location")]
    UnresolvedTarget { target: DropTarget },

    #[error("group `{group}` cannot be dropped on {target}")]
    InvalidStructuralMove { group: ElementId, target: String },

    #[error("destination {destination} is outside the tree")]
    OutOfRangeInsertion { destination: Coordinate },

    #[error("a drag of `{active}` is already in progress")]
    DragInProgress { active: ElementId },

    #[error("no drag in progress")]
    NoActiveDrag,

    #[error("duplicate element id `{id}`")]
    DuplicateId { id: ElementId },

    #[error("invalid seed: {0}")]
    Seed(#[from] serde_json::Error),
}

impl ReorderError {
    /// Errors a consistent tree/index pair should never produce.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::OutOfRangeInsertion { .. })
    }
}
