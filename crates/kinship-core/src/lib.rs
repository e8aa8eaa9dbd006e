use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

pub mod error;
pub mod individual;
pub mod relationship;

pub use error::{LayoutError, ParseKindError};
pub use individual::{Gender, Individual};
pub use relationship::{Relationship, RelationshipClass, RelationshipType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndividualId(pub Uuid);

impl IndividualId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IndividualId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for IndividualId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RelationshipId(pub Uuid);

impl RelationshipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RelationshipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RelationshipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// View Types
// ============================================================================

/// Which generations a hierarchy expands into, relative to the perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ViewMode {
    Ancestors,
    Descendants,
    #[default]
    Both,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ancestors => write!(f, "ancestors"),
            Self::Descendants => write!(f, "descendants"),
            Self::Both => write!(f, "both"),
        }
    }
}

/// The individual used as hierarchy root together with the active view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Perspective {
    pub individual: IndividualId,
    pub mode: ViewMode,
}

impl Perspective {
    pub fn new(individual: IndividualId, mode: ViewMode) -> Self {
        Self { individual, mode }
    }
}
