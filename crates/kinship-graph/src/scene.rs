use crate::Vec2;
use crate::edge_router::{CubicBezier, EdgeRouter};
use crate::graph::GraphModel;
use crate::position::PositionStore;
use crate::tree_builder::{Hierarchy, TreeNode};
use kinship_core::{IndividualId, ViewMode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Share of the canvas a fitted tree occupies.
pub const FIT_FILL: f32 = 0.85;

/// Axis-aligned rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Frame of `size` centered on `center`, the way node positions are stored.
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            min: Vec2::new(center.x - size.x / 2.0, center.y - size.y / 2.0),
            max: Vec2::new(center.x + size.x / 2.0, center.y + size.y / 2.0),
        }
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.min.x + self.width() * 0.5,
            self.min.y + self.height() * 0.5,
        )
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SceneEdgeKind {
    ParentChild,
    Spouse,
    /// Both mode: perspective to a sibling with no shared parent on screen.
    Sibling,
}

/// A node as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub individual_id: IndividualId,
    pub x: f32,
    pub y: f32,
    pub is_root: bool,
    /// Set for spouse satellites: the primary node they are attached to.
    pub spouse_of: Option<IndividualId>,
    pub generation: u32,
}

/// Link topology without geometry. Parent-child links run parent to child.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeLink {
    pub source_id: IndividualId,
    pub target_id: IndividualId,
    pub kind: SceneEdgeKind,
}

impl EdgeLink {
    pub fn touches(&self, id: IndividualId) -> bool {
        self.source_id == id || self.target_id == id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderEdge {
    pub source_id: IndividualId,
    pub target_id: IndividualId,
    pub kind: SceneEdgeKind,
    pub path: CubicBezier,
}

impl RenderEdge {
    pub fn link(&self) -> EdgeLink {
        EdgeLink {
            source_id: self.source_id,
            target_id: self.target_id,
            kind: self.kind,
        }
    }

    pub fn touches(&self, id: IndividualId) -> bool {
        self.source_id == id || self.target_id == id
    }
}

/// Render nodes for every placed individual: primaries in hierarchy order,
/// then spouse satellites that are not primary nodes themselves.
///
/// Coordinates are read from `store` at call time.
pub fn collect_nodes(hierarchy: &Hierarchy, store: &PositionStore) -> Vec<RenderNode> {
    let root_id = hierarchy.root_id();
    let primaries = hierarchy.primary_nodes();
    let mut seen: HashSet<IndividualId> = HashSet::with_capacity(store.len());
    let mut nodes = Vec::with_capacity(store.len());

    for node in &primaries {
        let id = node.id();
        let Some(pos) = store.get(id) else {
            continue;
        };
        if seen.insert(id) {
            nodes.push(RenderNode {
                individual_id: id,
                x: pos.x,
                y: pos.y,
                is_root: id == root_id,
                spouse_of: None,
                generation: node.generation,
            });
        }
    }

    for node in &primaries {
        for spouse in &node.spouses {
            let Some(pos) = store.get(spouse.id) else {
                continue;
            };
            if seen.insert(spouse.id) {
                nodes.push(RenderNode {
                    individual_id: spouse.id,
                    x: pos.x,
                    y: pos.y,
                    is_root: false,
                    spouse_of: Some(node.id()),
                    generation: node.generation,
                });
            }
        }
    }

    nodes
}

/// Every link the hierarchy implies, deduplicated, in a stable order.
///
/// `graph` is consulted only to connect siblings to the perspective's
/// parents in both mode. A sibling sharing none of those parents is linked
/// to the perspective instead.
pub fn collect_links(hierarchy: &Hierarchy, graph: &GraphModel) -> Vec<EdgeLink> {
    let mut collector = LinkCollector::default();
    let root = &hierarchy.root;

    match hierarchy.mode {
        ViewMode::Ancestors => collector.upward(root),
        ViewMode::Descendants => collector.downward(root),
        ViewMode::Both => {
            collector.downward(root);
            for ancestor in &hierarchy.ancestors {
                collector.push(ancestor.id(), root.id(), SceneEdgeKind::ParentChild);
                collector.upward(ancestor);
            }
            for sibling in &hierarchy.siblings {
                let parents = graph.parents(sibling.id());
                let mut linked = false;
                for ancestor in &hierarchy.ancestors {
                    if parents.contains(&ancestor.id()) {
                        collector.push(ancestor.id(), sibling.id(), SceneEdgeKind::ParentChild);
                        linked = true;
                    }
                }
                if !linked {
                    collector.push(root.id(), sibling.id(), SceneEdgeKind::Sibling);
                }
                collector.downward(sibling);
            }
        }
    }

    for node in hierarchy.primary_nodes() {
        for spouse in &node.spouses {
            collector.push(node.id(), spouse.id, SceneEdgeKind::Spouse);
        }
    }

    collector.links
}

/// Route every link whose endpoints both have a position.
pub fn route_links(links: &[EdgeLink], store: &PositionStore, router: &EdgeRouter) -> Vec<RenderEdge> {
    links
        .iter()
        .filter_map(|link| route_link(link, store, router))
        .collect()
}

pub fn route_link(link: &EdgeLink, store: &PositionStore, router: &EdgeRouter) -> Option<RenderEdge> {
    let source = store.get(link.source_id)?;
    let target = store.get(link.target_id)?;
    Some(RenderEdge {
        source_id: link.source_id,
        target_id: link.target_id,
        kind: link.kind,
        path: router.route(link.kind, source, target),
    })
}

#[derive(Default)]
struct LinkCollector {
    links: Vec<EdgeLink>,
    seen: HashSet<EdgeLink>,
}

impl LinkCollector {
    fn push(&mut self, source_id: IndividualId, target_id: IndividualId, kind: SceneEdgeKind) {
        let link = EdgeLink {
            source_id,
            target_id,
            kind,
        };
        if self.seen.insert(link) {
            self.links.push(link);
        }
    }

    /// Tree children are real children.
    fn downward(&mut self, node: &TreeNode) {
        for child in &node.children {
            self.push(node.id(), child.id(), SceneEdgeKind::ParentChild);
            self.downward(child);
        }
    }

    /// Tree children are parents.
    fn upward(&mut self, node: &TreeNode) {
        for parent in &node.children {
            self.push(parent.id(), node.id(), SceneEdgeKind::ParentChild);
            self.upward(parent);
        }
    }
}

/// Scale and translation that fit a bounding box into the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitTransform {
    pub scale: f32,
    pub translate: Vec2,
}

impl Default for FitTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate: Vec2::default(),
        }
    }
}

impl FitTransform {
    /// Centers `bounds` in `canvas`, filling `fill` of the tighter axis.
    /// Returns `None` for degenerate bounds.
    pub fn fit(bounds: Rect, canvas: Vec2, fill: f32) -> Option<Self> {
        let width = bounds.width();
        let height = bounds.height();
        if width <= 0.0 || height <= 0.0 || canvas.x <= 0.0 || canvas.y <= 0.0 {
            return None;
        }

        let scale = fill / (width / canvas.x).max(height / canvas.y);
        let mid = bounds.center();
        Some(Self {
            scale,
            translate: Vec2::new(canvas.x / 2.0 - scale * mid.x, canvas.y / 2.0 - scale * mid.y),
        })
    }

    pub fn apply(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            point.x * self.scale + self.translate.x,
            point.y * self.scale + self.translate.y,
        )
    }

    /// Screen point back to canvas coordinates.
    pub fn invert(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            (point.x - self.translate.x) / self.scale,
            (point.y - self.translate.y) / self.scale,
        )
    }
}
