use crate::graph::GraphModel;
use kinship_core::{Individual, IndividualId};
use std::cmp::Reverse;
use std::collections::HashSet;

/// Why a particular individual was picked as the default perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootReason {
    /// Exactly one individual has no parents.
    SingleCandidate,
    /// Several parentless candidates; this one reaches the most descendants
    /// (ties broken by earliest birth date, then by id).
    MostDescendants,
    /// Every individual has a parent; the first one in provider order is used.
    FirstInList,
}

#[derive(Debug, Clone, Copy)]
pub struct RootSelection<'a> {
    pub individual: &'a Individual,
    pub reason: RootReason,
    pub descendant_count: usize,
}

impl RootSelection<'_> {
    pub fn id(&self) -> IndividualId {
        self.individual.id
    }
}

/// Picks the default perspective for a graph.
pub struct RootSelector;

impl RootSelector {
    pub fn select(graph: &GraphModel) -> Option<RootSelection<'_>> {
        let candidates: Vec<&Individual> = graph
            .individuals()
            .iter()
            .filter(|individual| !graph.has_parents(individual.id))
            .collect();

        if candidates.is_empty() {
            let first = graph.individuals().first()?;
            tracing::warn!(
                "No parentless individual found, falling back to first individual {}",
                first.id
            );
            return Some(RootSelection {
                individual: first,
                reason: RootReason::FirstInList,
                descendant_count: Self::count_descendants(graph, first.id),
            });
        }

        if let [only] = candidates.as_slice() {
            return Some(RootSelection {
                individual: *only,
                reason: RootReason::SingleCandidate,
                descendant_count: Self::count_descendants(graph, only.id),
            });
        }

        let best = candidates
            .into_iter()
            .map(|individual| (individual, Self::count_descendants(graph, individual.id)))
            .min_by_key(|(individual, count)| {
                (
                    Reverse(*count),
                    individual.birth_date.is_none(),
                    individual.birth_date,
                    individual.id,
                )
            })?;

        tracing::debug!(
            "Selected root {} ({}) with {} descendants",
            best.0.id,
            best.0.full_name(),
            best.1
        );

        Some(RootSelection {
            individual: best.0,
            reason: RootReason::MostDescendants,
            descendant_count: best.1,
        })
    }

    /// Distinct individuals reachable through parent-child edges from `id`.
    pub fn count_descendants(graph: &GraphModel, id: IndividualId) -> usize {
        let mut visited = HashSet::new();
        visited.insert(id);
        let mut stack = vec![id];

        while let Some(current) = stack.pop() {
            for &child in graph.children(current) {
                if visited.insert(child) {
                    stack.push(child);
                }
            }
        }

        visited.len() - 1
    }
}
