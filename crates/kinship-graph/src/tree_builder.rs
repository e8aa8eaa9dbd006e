use crate::graph::GraphModel;
use kinship_core::{Gender, Individual, IndividualId, LayoutError, ViewMode};
use std::collections::HashSet;

/// Upper bound accepted for a generation limit.
pub const MAX_GENERATION_LIMIT: u32 = 10;

/// One primary node of a hierarchy.
///
/// `children` is the next generation in the traversal direction: actual
/// children for descendant walks, parents for ancestor walks. Spouses are
/// satellites and never expanded here.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub individual: Individual,
    pub generation: u32,
    pub children: Vec<TreeNode>,
    pub spouses: Vec<Individual>,
}

impl TreeNode {
    fn leaf(individual: &Individual, generation: u32) -> Self {
        Self {
            individual: individual.clone(),
            generation,
            children: Vec::new(),
            spouses: Vec::new(),
        }
    }

    pub fn id(&self) -> IndividualId {
        self.individual.id
    }

    /// Pre-order walk over this node and every primary node below it.
    pub fn walk(&self) -> Vec<&TreeNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HierarchyStats {
    pub primary_count: usize,
    pub ancestor_count: usize,
    pub max_generation: u32,
}

/// The cycle-safe hierarchy for one perspective and view mode.
#[derive(Debug, Clone, PartialEq)]
pub struct Hierarchy {
    pub mode: ViewMode,
    pub root: TreeNode,
    /// Both mode: the perspective's parents, each expanded upward.
    pub ancestors: Vec<TreeNode>,
    /// Both mode: the perspective's siblings, each expanded downward.
    pub siblings: Vec<TreeNode>,
    pub stats: HierarchyStats,
}

impl Hierarchy {
    pub fn root_id(&self) -> IndividualId {
        self.root.id()
    }

    /// Every primary node: the root tree, then ancestors, then siblings.
    pub fn primary_nodes(&self) -> Vec<&TreeNode> {
        let mut nodes = self.root.walk();
        for tree in self.ancestors.iter().chain(self.siblings.iter()) {
            nodes.extend(tree.walk());
        }
        nodes
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeBuilder {
    max_generations: Option<u32>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop expanding past `limit` generations from the perspective.
    /// The limit is clamped to `1..=MAX_GENERATION_LIMIT`.
    pub fn with_max_generations(mut self, limit: Option<u32>) -> Self {
        self.max_generations = limit.map(|value| value.clamp(1, MAX_GENERATION_LIMIT));
        self
    }

    pub fn max_generations(&self) -> Option<u32> {
        self.max_generations
    }

    pub fn build(
        &self,
        graph: &GraphModel,
        perspective: IndividualId,
        mode: ViewMode,
    ) -> Result<Hierarchy, LayoutError> {
        if graph.is_empty() {
            return Err(LayoutError::EmptyGraph);
        }
        let individual = graph
            .individual(perspective)
            .ok_or(LayoutError::UnknownIndividual(perspective))?;

        let mut visited = HashSet::new();
        let mut hierarchy = match mode {
            ViewMode::Descendants => Hierarchy {
                mode,
                root: self.descendants(graph, individual, 0, &mut visited),
                ancestors: Vec::new(),
                siblings: Vec::new(),
                stats: HierarchyStats::default(),
            },
            ViewMode::Ancestors => Hierarchy {
                mode,
                root: self.ancestors(graph, individual, 0, &mut visited),
                ancestors: Vec::new(),
                siblings: Vec::new(),
                stats: HierarchyStats::default(),
            },
            ViewMode::Both => {
                let root = self.descendants(graph, individual, 0, &mut visited);

                let mut ancestors = Vec::new();
                if self.can_expand(0) {
                    let parents = self.sorted_parents(graph, perspective, &visited);
                    for parent in parents {
                        if visited.contains(&parent.id) {
                            continue;
                        }
                        ancestors.push(self.ancestors(graph, parent, 1, &mut visited));
                    }
                }

                let mut siblings = Vec::new();
                for sibling_id in graph.siblings(perspective) {
                    if visited.contains(&sibling_id) {
                        continue;
                    }
                    if let Some(sibling) = graph.individual(sibling_id) {
                        siblings.push(self.descendants(graph, sibling, 0, &mut visited));
                    }
                }

                Hierarchy {
                    mode,
                    root,
                    ancestors,
                    siblings,
                    stats: HierarchyStats::default(),
                }
            }
        };

        hierarchy.stats = Self::stats(&hierarchy);
        tracing::debug!(
            "Built {} hierarchy for {} with {} primary nodes",
            mode,
            perspective,
            hierarchy.stats.primary_count
        );
        Ok(hierarchy)
    }

    fn can_expand(&self, generation: u32) -> bool {
        self.max_generations.is_none_or(|limit| generation < limit)
    }

    fn descendants(
        &self,
        graph: &GraphModel,
        individual: &Individual,
        generation: u32,
        visited: &mut HashSet<IndividualId>,
    ) -> TreeNode {
        visited.insert(individual.id);
        let mut node = TreeNode::leaf(individual, generation);

        for &partner in graph.partners(individual.id) {
            if visited.contains(&partner) {
                continue;
            }
            if let Some(spouse) = graph.individual(partner) {
                node.spouses.push(spouse.clone());
            }
        }

        if !self.can_expand(generation) {
            return node;
        }

        for &child_id in graph.children(individual.id) {
            if visited.contains(&child_id) {
                continue;
            }
            if let Some(child) = graph.individual(child_id) {
                let child_node = self.descendants(graph, child, generation + 1, visited);
                node.children.push(child_node);
            }
        }
        node
    }

    fn ancestors(
        &self,
        graph: &GraphModel,
        individual: &Individual,
        generation: u32,
        visited: &mut HashSet<IndividualId>,
    ) -> TreeNode {
        visited.insert(individual.id);
        let mut node = TreeNode::leaf(individual, generation);

        if !self.can_expand(generation) {
            return node;
        }

        for parent in self.sorted_parents(graph, individual.id, visited) {
            // A sibling branch may have claimed this parent already.
            if visited.contains(&parent.id) {
                continue;
            }
            let parent_node = self.ancestors(graph, parent, generation + 1, visited);
            node.children.push(parent_node);
        }
        node
    }

    /// Unvisited parents of `id`, fathers before mothers.
    fn sorted_parents<'a>(
        &self,
        graph: &'a GraphModel,
        id: IndividualId,
        visited: &HashSet<IndividualId>,
    ) -> Vec<&'a Individual> {
        let mut parents: Vec<&Individual> = graph
            .parents(id)
            .iter()
            .filter(|parent| !visited.contains(*parent))
            .filter_map(|&parent| graph.individual(parent))
            .collect();
        parents.sort_by_key(|parent| parent.gender != Gender::MALE);
        parents
    }

    fn stats(hierarchy: &Hierarchy) -> HierarchyStats {
        let primaries = hierarchy.primary_nodes();
        let ancestor_count = match hierarchy.mode {
            ViewMode::Ancestors => primaries.len() - 1,
            ViewMode::Both => hierarchy.ancestors.iter().map(|tree| tree.walk().len()).sum(),
            ViewMode::Descendants => 0,
        };
        HierarchyStats {
            primary_count: primaries.len(),
            ancestor_count,
            max_generation: primaries
                .iter()
                .map(|node| node.generation)
                .max()
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_core::{Relationship, RelationshipType};
    use proptest::prelude::*;
    use uuid::Uuid;

    fn id(n: u128) -> IndividualId {
        IndividualId(Uuid::from_u128(n))
    }

    fn person(n: u128) -> Individual {
        Individual::new(id(n), &format!("P{}", n), "Test")
    }

    fn rel(a: u128, b: u128, kind: RelationshipType) -> Relationship {
        Relationship::new(id(a), id(b), kind)
    }

    fn ids(nodes: &[TreeNode]) -> Vec<IndividualId> {
        nodes.iter().map(TreeNode::id).collect()
    }

    /// A (1) with children B (2), C (3) and spouse S (4).
    fn example_graph() -> GraphModel {
        GraphModel::new(
            vec![person(1), person(2), person(3), person(4)],
            vec![
                rel(1, 2, RelationshipType::PARENT_CHILD),
                rel(1, 3, RelationshipType::PARENT_CHILD),
                rel(1, 4, RelationshipType::SPOUSE),
            ],
        )
    }

    #[test]
    fn test_descendants_collects_children_and_spouses() {
        let graph = example_graph();
        let hierarchy = TreeBuilder::new()
            .build(&graph, id(1), ViewMode::Descendants)
            .unwrap();

        assert_eq!(hierarchy.root_id(), id(1));
        assert_eq!(ids(&hierarchy.root.children), vec![id(2), id(3)]);
        assert_eq!(hierarchy.root.spouses.len(), 1);
        assert_eq!(hierarchy.root.spouses[0].id, id(4));
        assert_eq!(hierarchy.root.children[0].generation, 1);
        assert!(hierarchy.ancestors.is_empty());
        assert_eq!(hierarchy.stats.primary_count, 3);
        assert_eq!(hierarchy.stats.max_generation, 1);
    }

    #[test]
    fn test_unknown_perspective_is_reported() {
        let graph = example_graph();
        let result = TreeBuilder::new().build(&graph, id(42), ViewMode::Both);
        assert_eq!(result, Err(LayoutError::UnknownIndividual(id(42))));

        let empty = GraphModel::default();
        let result = TreeBuilder::new().build(&empty, id(1), ViewMode::Both);
        assert_eq!(result, Err(LayoutError::EmptyGraph));
    }

    #[test]
    fn test_descendant_cycle_terminates() {
        let graph = GraphModel::new(
            vec![person(1), person(2), person(3)],
            vec![
                rel(1, 2, RelationshipType::PARENT_CHILD),
                rel(2, 3, RelationshipType::PARENT_CHILD),
                rel(3, 1, RelationshipType::PARENT_CHILD),
            ],
        );
        let hierarchy = TreeBuilder::new()
            .build(&graph, id(1), ViewMode::Descendants)
            .unwrap();

        assert_eq!(hierarchy.stats.primary_count, 3);
        assert!(hierarchy.root.children[0].children[0].children.is_empty());
    }

    #[test]
    fn test_ancestors_list_father_first() {
        let mother = person(2).with_gender(Gender::FEMALE);
        let father = person(3).with_gender(Gender::MALE);
        let graph = GraphModel::new(
            vec![person(1), mother, father, person(4)],
            vec![
                rel(2, 1, RelationshipType::MOTHER_CHILD),
                rel(3, 1, RelationshipType::FATHER_CHILD),
                rel(4, 3, RelationshipType::PARENT_CHILD),
            ],
        );
        let hierarchy = TreeBuilder::new()
            .build(&graph, id(1), ViewMode::Ancestors)
            .unwrap();

        assert_eq!(ids(&hierarchy.root.children), vec![id(3), id(2)]);
        assert_eq!(ids(&hierarchy.root.children[0].children), vec![id(4)]);
        assert!(hierarchy.root.spouses.is_empty());
        assert_eq!(hierarchy.stats.ancestor_count, 3);
        assert_eq!(hierarchy.stats.max_generation, 2);
    }

    #[test]
    fn test_both_mode_side_lists() {
        // 10 and 11 are parents of 1 and 2; 1 has child 3; 2 has child 4; 12 is 10's father.
        let graph = GraphModel::new(
            vec![
                person(1),
                person(2),
                person(3),
                person(4),
                person(10).with_gender(Gender::FEMALE),
                person(11).with_gender(Gender::MALE),
                person(12),
            ],
            vec![
                rel(10, 1, RelationshipType::PARENT_CHILD),
                rel(11, 1, RelationshipType::PARENT_CHILD),
                rel(10, 2, RelationshipType::PARENT_CHILD),
                rel(1, 3, RelationshipType::PARENT_CHILD),
                rel(2, 4, RelationshipType::PARENT_CHILD),
                rel(12, 10, RelationshipType::PARENT_CHILD),
                rel(10, 11, RelationshipType::SPOUSE),
            ],
        );
        let hierarchy = TreeBuilder::new()
            .build(&graph, id(1), ViewMode::Both)
            .unwrap();

        assert_eq!(ids(&hierarchy.root.children), vec![id(3)]);
        assert_eq!(ids(&hierarchy.ancestors), vec![id(11), id(10)]);
        assert_eq!(ids(&hierarchy.ancestors[1].children), vec![id(12)]);
        assert_eq!(ids(&hierarchy.siblings), vec![id(2)]);
        assert_eq!(ids(&hierarchy.siblings[0].children), vec![id(4)]);
        assert_eq!(hierarchy.stats.ancestor_count, 3);
        assert_eq!(hierarchy.stats.primary_count, 7);
    }

    #[test]
    fn test_both_mode_skips_parent_reached_as_descendant() {
        // Malformed data: 2 is both the child and the parent of 1.
        let graph = GraphModel::new(
            vec![person(1), person(2)],
            vec![
                rel(1, 2, RelationshipType::PARENT_CHILD),
                rel(2, 1, RelationshipType::PARENT_CHILD),
            ],
        );
        let hierarchy = TreeBuilder::new()
            .build(&graph, id(1), ViewMode::Both)
            .unwrap();

        assert_eq!(ids(&hierarchy.root.children), vec![id(2)]);
        assert!(hierarchy.ancestors.is_empty());
    }

    #[test]
    fn test_generation_limit() {
        let graph = GraphModel::new(
            vec![person(1), person(2), person(3)],
            vec![
                rel(1, 2, RelationshipType::PARENT_CHILD),
                rel(2, 3, RelationshipType::PARENT_CHILD),
            ],
        );
        let builder = TreeBuilder::new().with_max_generations(Some(1));
        let hierarchy = builder.build(&graph, id(1), ViewMode::Descendants).unwrap();

        assert_eq!(hierarchy.stats.primary_count, 2);
        assert!(hierarchy.root.children[0].children.is_empty());
        assert_eq!(
            TreeBuilder::new().with_max_generations(Some(0)).max_generations(),
            Some(1)
        );
        assert_eq!(
            TreeBuilder::new().with_max_generations(Some(50)).max_generations(),
            Some(MAX_GENERATION_LIMIT)
        );
    }

    #[test]
    fn test_spouse_may_also_be_primary_once() {
        // 2 is a child of 1 and also married to 1's other child 3.
        let graph = GraphModel::new(
            vec![person(1), person(2), person(3)],
            vec![
                rel(1, 3, RelationshipType::PARENT_CHILD),
                rel(1, 2, RelationshipType::PARENT_CHILD),
                rel(3, 2, RelationshipType::PARTNER),
            ],
        );
        let hierarchy = TreeBuilder::new()
            .build(&graph, id(1), ViewMode::Descendants)
            .unwrap();

        let first_child = &hierarchy.root.children[0];
        assert_eq!(first_child.id(), id(3));
        assert_eq!(first_child.spouses[0].id, id(2));
        assert_eq!(ids(&hierarchy.root.children), vec![id(3), id(2)]);
    }

    fn relationship_type_strategy() -> impl Strategy<Value = RelationshipType> {
        prop_oneof![
            Just(RelationshipType::PARENT_CHILD),
            Just(RelationshipType::ADOPTED_PARENT_CHILD),
            Just(RelationshipType::SPOUSE),
            Just(RelationshipType::SIBLING),
            Just(RelationshipType::STEP_SIBLING),
        ]
    }

    /// Random graphs over 1..=8 individuals, cycles and duplicates included.
    fn graph_strategy() -> impl Strategy<Value = GraphModel> {
        proptest::collection::vec((1u128..=8, 1u128..=8, relationship_type_strategy()), 0..24)
            .prop_map(|edges| {
                let individuals = (1..=8).map(person).collect();
                let relationships = edges
                    .into_iter()
                    .map(|(a, b, kind)| rel(a, b, kind))
                    .collect();
                GraphModel::new(individuals, relationships)
            })
    }

    fn mode_strategy() -> impl Strategy<Value = ViewMode> {
        prop_oneof![
            Just(ViewMode::Ancestors),
            Just(ViewMode::Descendants),
            Just(ViewMode::Both),
        ]
    }

    proptest! {
        #[test]
        fn prop_no_duplicate_primary_nodes(
            graph in graph_strategy(),
            perspective in 1u128..=8,
            mode in mode_strategy()
        ) {
            let hierarchy = TreeBuilder::new().build(&graph, id(perspective), mode).unwrap();
            let primaries = hierarchy.primary_nodes();
            let unique: HashSet<IndividualId> = primaries.iter().map(|node| node.id()).collect();

            prop_assert_eq!(unique.len(), primaries.len());
            prop_assert_eq!(hierarchy.stats.primary_count, primaries.len());
        }

        #[test]
        fn prop_build_is_deterministic(
            graph in graph_strategy(),
            perspective in 1u128..=8,
            mode in mode_strategy()
        ) {
            let builder = TreeBuilder::new();
            let first = builder.build(&graph, id(perspective), mode).unwrap();
            let second = builder.build(&graph, id(perspective), mode).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
