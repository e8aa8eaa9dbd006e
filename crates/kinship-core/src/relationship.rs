use crate::{IndividualId, ParseKindError, RelationshipId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum RelationshipType {
    // Parent-child (individual1 is the parent)
    PARENT_CHILD,
    MOTHER_CHILD,
    FATHER_CHILD,
    ADOPTED_PARENT_CHILD,
    STEP_PARENT_CHILD,

    // Couples
    SPOUSE,
    PARTNER,

    // Siblings
    SIBLING,
    HALF_SIBLING,
    STEP_SIBLING,
}

/// Coarse classification that traversal code branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipClass {
    ParentChild,
    SpouseLike,
    SiblingLike,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 10] = [
        RelationshipType::PARENT_CHILD,
        RelationshipType::MOTHER_CHILD,
        RelationshipType::FATHER_CHILD,
        RelationshipType::ADOPTED_PARENT_CHILD,
        RelationshipType::STEP_PARENT_CHILD,
        RelationshipType::SPOUSE,
        RelationshipType::PARTNER,
        RelationshipType::SIBLING,
        RelationshipType::HALF_SIBLING,
        RelationshipType::STEP_SIBLING,
    ];

    pub fn class(self) -> RelationshipClass {
        match self {
            RelationshipType::PARENT_CHILD
            | RelationshipType::MOTHER_CHILD
            | RelationshipType::FATHER_CHILD
            | RelationshipType::ADOPTED_PARENT_CHILD
            | RelationshipType::STEP_PARENT_CHILD => RelationshipClass::ParentChild,
            RelationshipType::SPOUSE | RelationshipType::PARTNER => RelationshipClass::SpouseLike,
            RelationshipType::SIBLING
            | RelationshipType::HALF_SIBLING
            | RelationshipType::STEP_SIBLING => RelationshipClass::SiblingLike,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::PARENT_CHILD => "PARENT_CHILD",
            RelationshipType::MOTHER_CHILD => "MOTHER_CHILD",
            RelationshipType::FATHER_CHILD => "FATHER_CHILD",
            RelationshipType::ADOPTED_PARENT_CHILD => "ADOPTED_PARENT_CHILD",
            RelationshipType::STEP_PARENT_CHILD => "STEP_PARENT_CHILD",
            RelationshipType::SPOUSE => "SPOUSE",
            RelationshipType::PARTNER => "PARTNER",
            RelationshipType::SIBLING => "SIBLING",
            RelationshipType::HALF_SIBLING => "HALF_SIBLING",
            RelationshipType::STEP_SIBLING => "STEP_SIBLING",
        }
    }
}

impl FromStr for RelationshipType {
    type Err = ParseKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        RelationshipType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| ParseKindError::InvalidRelationshipType(value.to_string()))
    }
}

/// A typed link between two individuals.
///
/// Only parent-child types are directed: `individual1` is the parent and
/// `individual2` the child. Couples and siblings are symmetric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelationshipId,
    pub individual1: IndividualId,
    pub individual2: IndividualId,
    #[serde(rename = "type")]
    pub kind: RelationshipType,
}

impl Relationship {
    pub fn new(individual1: IndividualId, individual2: IndividualId, kind: RelationshipType) -> Self {
        Self {
            id: RelationshipId::new(),
            individual1,
            individual2,
            kind,
        }
    }

    pub fn class(&self) -> RelationshipClass {
        self.kind.class()
    }

    /// The endpoint opposite `id`, or `None` if `id` is not part of this relationship.
    pub fn other(&self, id: IndividualId) -> Option<IndividualId> {
        if self.individual1 == id {
            Some(self.individual2)
        } else if self.individual2 == id {
            Some(self.individual1)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_every_type_has_a_class() {
        let parent_child = RelationshipType::ALL
            .iter()
            .filter(|kind| kind.class() == RelationshipClass::ParentChild)
            .count();
        let spouse_like = RelationshipType::ALL
            .iter()
            .filter(|kind| kind.class() == RelationshipClass::SpouseLike)
            .count();
        let sibling_like = RelationshipType::ALL
            .iter()
            .filter(|kind| kind.class() == RelationshipClass::SiblingLike)
            .count();

        assert_eq!(parent_child, 5);
        assert_eq!(spouse_like, 2);
        assert_eq!(sibling_like, 3);
    }

    #[test]
    fn test_literal_roundtrip_matches_serde() {
        for kind in RelationshipType::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            assert_eq!(kind.as_str().parse::<RelationshipType>(), Ok(kind));
        }
        assert!("COUSIN".parse::<RelationshipType>().is_err());
    }

    #[test]
    fn test_other_endpoint() {
        let a = IndividualId(Uuid::from_u128(1));
        let b = IndividualId(Uuid::from_u128(2));
        let c = IndividualId(Uuid::from_u128(3));
        let rel = Relationship::new(a, b, RelationshipType::SPOUSE);

        assert_eq!(rel.other(a), Some(b));
        assert_eq!(rel.other(b), Some(a));
        assert_eq!(rel.other(c), None);
    }

    #[test]
    fn test_relationship_uses_type_field() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-0000000000aa",
            "individual1": "00000000-0000-0000-0000-000000000001",
            "individual2": "00000000-0000-0000-0000-000000000002",
            "type": "ADOPTED_PARENT_CHILD"
        }"#;
        let rel: Relationship = serde_json::from_str(json).unwrap();
        assert_eq!(rel.kind, RelationshipType::ADOPTED_PARENT_CHILD);
        assert_eq!(rel.class(), RelationshipClass::ParentChild);
    }
}
