use crate::IndividualId;
use thiserror::Error;

/// Recoverable conditions reported by a layout rebuild or an interaction.
///
/// None of these is fatal: callers render nothing, keep the previous frame,
/// or retry, but never abort.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("graph contains no individuals")]
    EmptyGraph,
    #[error("individual {0} is not part of the graph")]
    UnknownIndividual(IndividualId),
    /// The rendering surface is not attached yet; retry after yielding once.
    #[error("render surface is not ready")]
    ContainerNotReady,
}

/// Error type for provider literal conversion failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseKindError {
    #[error("Invalid Gender value: {0}")]
    InvalidGender(String),
    #[error("Invalid RelationshipType value: {0}")]
    InvalidRelationshipType(String),
}
