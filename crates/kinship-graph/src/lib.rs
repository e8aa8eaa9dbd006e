pub mod collision;
pub mod edge_router;
pub mod graph;
pub mod hit_tester;
pub mod layout;
pub mod position;
pub mod root_selector;
pub mod scene;
pub mod tree_builder;

pub use collision::{CollisionConfig, CollisionReport, CollisionResolver};
pub use edge_router::{CubicBezier, EdgeRouter};
pub use graph::{GraphModel, Vec2};
pub use hit_tester::{HitResult, HitTester};
pub use layout::{Direction, Extent, LayoutConfig, TreeLayouter};
pub use position::PositionStore;
pub use root_selector::{RootReason, RootSelection, RootSelector};
pub use scene::{
    EdgeLink, FIT_FILL, FitTransform, Rect, RenderEdge, RenderNode, SceneEdgeKind, collect_links,
    collect_nodes, route_link, route_links,
};
pub use tree_builder::{Hierarchy, HierarchyStats, MAX_GENERATION_LIMIT, TreeBuilder, TreeNode};
