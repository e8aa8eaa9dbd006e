use crate::Vec2;
use crate::position::PositionStore;
use crate::tree_builder::{Hierarchy, TreeNode};
use kinship_core::{IndividualId, ViewMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Geometry used by the layout engine. All values are canvas units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal slot reserved for one person.
    pub node_width: f32,
    /// Rendered card size, used for collision checks and link anchors.
    pub frame_width: f32,
    pub frame_height: f32,
    /// Distance between a person and each successive spouse to the right.
    pub spouse_offset: f32,
    /// Vertical distance between generations.
    pub level_height: f32,
    /// Gap between the perspective's subtree and each sibling subtree.
    pub sibling_padding: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub top_margin: f32,
    pub bottom_margin: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 200.0,
            frame_width: 160.0,
            frame_height: 120.0,
            spouse_offset: 200.0,
            level_height: 200.0,
            sibling_padding: 40.0,
            canvas_width: 1200.0,
            canvas_height: 800.0,
            top_margin: 80.0,
            bottom_margin: 100.0,
        }
    }
}

impl LayoutConfig {
    pub fn frame(&self) -> Vec2 {
        Vec2::new(self.frame_width, self.frame_height)
    }

    pub fn canvas(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }

    /// Width one person occupies including their spouses.
    pub fn footprint(&self, spouse_count: usize) -> f32 {
        self.node_width + spouse_count as f32 * self.spouse_offset
    }

    /// Where the perspective is placed for `mode`.
    pub fn origin(&self, mode: ViewMode) -> Vec2 {
        let x = self.canvas_width / 2.0;
        match mode {
            ViewMode::Descendants => Vec2::new(x, self.top_margin),
            ViewMode::Ancestors => Vec2::new(x, self.canvas_height - self.bottom_margin),
            ViewMode::Both => Vec2::new(x, self.canvas_height / 2.0),
        }
    }
}

/// Vertical direction in which tree children are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
}

impl Direction {
    fn sign(self) -> f32 {
        match self {
            Direction::Down => 1.0,
            Direction::Up => -1.0,
        }
    }
}

/// Horizontal space a subtree needs on each side of its node's x.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    pub left: f32,
    pub right: f32,
}

impl Extent {
    pub fn width(&self) -> f32 {
        self.left + self.right
    }
}

/// Subtree-width aware tree layout for all three view modes.
///
/// Each node is centered over its children band. Spouses sit to the right of
/// their partner, so subtrees are measured as asymmetric extents.
#[derive(Debug, Clone, Default)]
pub struct TreeLayouter {
    pub config: LayoutConfig,
}

impl TreeLayouter {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn layout(&self, hierarchy: &Hierarchy) -> PositionStore {
        let mut store = PositionStore::new();
        self.layout_into(hierarchy, &mut store);
        store
    }

    /// Replace the contents of `store` with positions for `hierarchy`.
    pub fn layout_into(&self, hierarchy: &Hierarchy, store: &mut PositionStore) {
        store.clear();

        let mut extents = HashMap::new();
        let origin = self.config.origin(hierarchy.mode);
        let root_extent = self.measure(&hierarchy.root, &mut extents);

        let root_direction = match hierarchy.mode {
            ViewMode::Ancestors => Direction::Up,
            ViewMode::Descendants | ViewMode::Both => Direction::Down,
        };
        self.place(&hierarchy.root, origin, root_direction, &extents, store);

        if hierarchy.mode == ViewMode::Both {
            self.place_ancestors(&hierarchy.ancestors, origin, &mut extents, store);
            self.place_siblings(&hierarchy.siblings, origin, root_extent, &mut extents, store);
        }

        let primary_count = store.len();
        for node in hierarchy.primary_nodes() {
            self.place_spouses(node, store);
        }

        tracing::debug!(
            "Laid out {} hierarchy: {} primary nodes, {} spouse satellites",
            hierarchy.mode,
            primary_count,
            store.len() - primary_count
        );
    }

    /// Extents of `node`'s subtree; the whole subtree is recorded in `extents`.
    pub fn measure(&self, node: &TreeNode, extents: &mut HashMap<IndividualId, Extent>) -> Extent {
        let children_width: f32 = node
            .children
            .iter()
            .map(|child| self.measure(child, extents).width())
            .sum();

        let half_node = self.config.node_width / 2.0;
        let spouse_room = node.spouses.len() as f32 * self.config.spouse_offset;
        let extent = Extent {
            left: half_node.max(children_width / 2.0),
            right: (half_node + spouse_room).max(children_width / 2.0),
        };
        extents.insert(node.id(), extent);
        extent
    }

    fn place(
        &self,
        node: &TreeNode,
        at: Vec2,
        direction: Direction,
        extents: &HashMap<IndividualId, Extent>,
        store: &mut PositionStore,
    ) {
        store.set(node.id(), at);

        let band: f32 = node
            .children
            .iter()
            .map(|child| Self::extent_of(child, extents).width())
            .sum();
        let child_y = at.y + direction.sign() * self.config.level_height;
        let mut cursor = at.x - band / 2.0;

        for child in &node.children {
            let extent = Self::extent_of(child, extents);
            self.place(
                child,
                Vec2::new(cursor + extent.left, child_y),
                direction,
                extents,
                store,
            );
            cursor += extent.width();
        }
    }

    /// The perspective's parents form one band a generation above it.
    fn place_ancestors(
        &self,
        ancestors: &[TreeNode],
        origin: Vec2,
        extents: &mut HashMap<IndividualId, Extent>,
        store: &mut PositionStore,
    ) {
        let measured: Vec<Extent> = ancestors
            .iter()
            .map(|tree| self.measure(tree, extents))
            .collect();
        let band: f32 = measured.iter().map(Extent::width).sum();
        let y = origin.y - self.config.level_height;
        let mut cursor = origin.x - band / 2.0;

        for (tree, extent) in ancestors.iter().zip(measured) {
            self.place(tree, Vec2::new(cursor + extent.left, y), Direction::Up, extents, store);
            cursor += extent.width();
        }
    }

    /// Siblings share the perspective's row, to the right of its subtree.
    fn place_siblings(
        &self,
        siblings: &[TreeNode],
        origin: Vec2,
        root_extent: Extent,
        extents: &mut HashMap<IndividualId, Extent>,
        store: &mut PositionStore,
    ) {
        let padding = self.config.sibling_padding;
        let mut cursor = origin.x + root_extent.right + padding;

        for tree in siblings {
            let extent = self.measure(tree, extents);
            self.place(
                tree,
                Vec2::new(cursor + extent.left, origin.y),
                Direction::Down,
                extents,
                store,
            );
            cursor += extent.width() + padding;
        }
    }

    fn place_spouses(&self, node: &TreeNode, store: &mut PositionStore) {
        let Some(anchor) = store.get(node.id()) else {
            return;
        };
        for (i, spouse) in node.spouses.iter().enumerate() {
            let at = Vec2::new(anchor.x + self.config.spouse_offset * (i + 1) as f32, anchor.y);
            if !store.set_if_absent(spouse.id, at) {
                tracing::debug!(
                    "Spouse {} of {} already placed, keeping existing position",
                    spouse.id,
                    node.id()
                );
            }
        }
    }

    fn extent_of(node: &TreeNode, extents: &HashMap<IndividualId, Extent>) -> Extent {
        extents.get(&node.id()).copied().unwrap_or_default()
    }
}
