use kinship_core::{Individual, IndividualId, Relationship, RelationshipClass};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Indexed, read-only view over one tree's individuals and relationships.
///
/// Adjacency lists keep relationship input order so every traversal built on
/// top of them is deterministic. Relationships that reference an unknown
/// individual are dropped while indexing.
#[derive(Debug, Default)]
pub struct GraphModel {
    individuals: Vec<Individual>,
    node_map: HashMap<IndividualId, usize>,
    relationships: Vec<Relationship>,
    children: Vec<Vec<IndividualId>>,
    parents: Vec<Vec<IndividualId>>,
    partners: Vec<Vec<IndividualId>>,
    siblings: Vec<Vec<IndividualId>>,
    dropped_relationships: usize,
}

impl GraphModel {
    pub fn new(individuals: Vec<Individual>, relationships: Vec<Relationship>) -> Self {
        let mut model = Self::default();
        for individual in individuals {
            model.add_individual(individual);
        }
        for relationship in relationships {
            model.add_relationship(relationship);
        }
        model
    }

    fn add_individual(&mut self, individual: Individual) {
        if self.node_map.contains_key(&individual.id) {
            tracing::warn!(
                "Ignoring duplicate individual {} ({})",
                individual.id,
                individual.full_name()
            );
            return;
        }
        self.node_map.insert(individual.id, self.individuals.len());
        self.individuals.push(individual);
        self.children.push(Vec::new());
        self.parents.push(Vec::new());
        self.partners.push(Vec::new());
        self.siblings.push(Vec::new());
    }

    fn add_relationship(&mut self, relationship: Relationship) {
        let (Some(&first), Some(&second)) = (
            self.node_map.get(&relationship.individual1),
            self.node_map.get(&relationship.individual2),
        ) else {
            if !self.node_map.contains_key(&relationship.individual1) {
                tracing::warn!(
                    "Dropping relationship {} because individual {} is missing from graph model",
                    relationship.id,
                    relationship.individual1
                );
            }
            if !self.node_map.contains_key(&relationship.individual2) {
                tracing::warn!(
                    "Dropping relationship {} because individual {} is missing from graph model",
                    relationship.id,
                    relationship.individual2
                );
            }
            self.dropped_relationships += 1;
            return;
        };

        if first == second {
            tracing::debug!("Ignoring self-referencing relationship {}", relationship.id);
            return;
        }

        let (a, b) = (relationship.individual1, relationship.individual2);
        match relationship.class() {
            RelationshipClass::ParentChild => {
                push_unique(&mut self.children[first], b);
                push_unique(&mut self.parents[second], a);
            }
            RelationshipClass::SpouseLike => {
                push_unique(&mut self.partners[first], b);
                push_unique(&mut self.partners[second], a);
            }
            RelationshipClass::SiblingLike => {
                push_unique(&mut self.siblings[first], b);
                push_unique(&mut self.siblings[second], a);
            }
        }
        self.relationships.push(relationship);
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn individual_count(&self) -> usize {
        self.individuals.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Number of relationships skipped because an endpoint was unknown.
    pub fn dropped_relationship_count(&self) -> usize {
        self.dropped_relationships
    }

    /// Individuals in provider order.
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn contains(&self, id: IndividualId) -> bool {
        self.node_map.contains_key(&id)
    }

    pub fn individual(&self, id: IndividualId) -> Option<&Individual> {
        self.node_map.get(&id).map(|&idx| &self.individuals[idx])
    }

    pub fn children(&self, id: IndividualId) -> &[IndividualId] {
        self.adjacent(&self.children, id)
    }

    pub fn parents(&self, id: IndividualId) -> &[IndividualId] {
        self.adjacent(&self.parents, id)
    }

    pub fn partners(&self, id: IndividualId) -> &[IndividualId] {
        self.adjacent(&self.partners, id)
    }

    pub fn has_parents(&self, id: IndividualId) -> bool {
        !self.parents(id).is_empty()
    }

    /// Individuals sharing at least one parent with `id`, followed by those
    /// linked through an explicit sibling relationship. Never contains `id`.
    pub fn siblings(&self, id: IndividualId) -> Vec<IndividualId> {
        let mut result = Vec::new();
        for &parent in self.parents(id) {
            for &child in self.children(parent) {
                if child != id {
                    push_unique(&mut result, child);
                }
            }
        }
        for &sibling in self.adjacent(&self.siblings, id) {
            push_unique(&mut result, sibling);
        }
        result
    }

    fn adjacent<'a>(&self, lists: &'a [Vec<IndividualId>], id: IndividualId) -> &'a [IndividualId] {
        self.node_map
            .get(&id)
            .map(|&idx| lists[idx].as_slice())
            .unwrap_or(&[])
    }
}

fn push_unique(list: &mut Vec<IndividualId>, id: IndividualId) {
    if !list.contains(&id) {
        list.push(id);
    }
}
