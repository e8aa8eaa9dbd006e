use crate::Vec2;
use crate::position::PositionStore;
use crate::scene::{EdgeLink, Rect, RenderEdge};
use kinship_core::IndividualId;

/// Result of a hit test at a given position. Nodes win over edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitResult {
    None,
    Node(IndividualId),
    Edge(EdgeLink),
}

/// Maps pointer positions (canvas coordinates) to nodes and links.
///
/// Holds no geometry of its own; node frames come from the position store at
/// query time and link curves from the routed edges.
#[derive(Debug, Clone, Copy)]
pub struct HitTester {
    /// Maximum distance from a link curve that still counts as a hit.
    edge_tolerance: f32,
    /// Samples along each bezier for distance computation.
    bezier_samples: usize,
}

impl Default for HitTester {
    fn default() -> Self {
        Self::new()
    }
}

impl HitTester {
    pub fn new() -> Self {
        Self {
            edge_tolerance: 8.0,
            bezier_samples: 48,
        }
    }

    pub fn with_tolerance(tolerance: f32) -> Self {
        Self {
            edge_tolerance: tolerance,
            ..Self::new()
        }
    }

    pub fn edge_tolerance(&self) -> f32 {
        self.edge_tolerance
    }

    pub fn hit_test(
        &self,
        pos: Vec2,
        store: &PositionStore,
        frame: Vec2,
        edges: &[RenderEdge],
    ) -> HitResult {
        if let Some(id) = self.hit_test_node(pos, store, frame) {
            return HitResult::Node(id);
        }
        if let Some(link) = self.hit_test_edge(pos, edges) {
            return HitResult::Edge(link);
        }
        HitResult::None
    }

    /// Node whose frame contains `pos`. Overlapping frames resolve to the
    /// closest center, then to the lowest id.
    pub fn hit_test_node(&self, pos: Vec2, store: &PositionStore, frame: Vec2) -> Option<IndividualId> {
        let mut best: Option<(IndividualId, f32)> = None;

        for id in store.sorted_ids() {
            let Some(center) = store.get(id) else {
                continue;
            };
            if !Rect::from_center_size(center, frame).contains(pos) {
                continue;
            }
            let dx = center.x - pos.x;
            let dy = center.y - pos.y;
            let dist_sq = dx * dx + dy * dy;
            match best {
                Some((_, best_dist)) if dist_sq >= best_dist => {}
                _ => best = Some((id, dist_sq)),
            }
        }

        best.map(|(id, _)| id)
    }

    /// Closest link within tolerance.
    pub fn hit_test_edge(&self, pos: Vec2, edges: &[RenderEdge]) -> Option<EdgeLink> {
        let mut best = None;
        let mut best_dist = self.edge_tolerance;

        for edge in edges {
            let dist = edge.path.point_distance(pos, self.bezier_samples);
            if dist < best_dist {
                best_dist = dist;
                best = Some(edge.link());
            }
        }

        best
    }
}
