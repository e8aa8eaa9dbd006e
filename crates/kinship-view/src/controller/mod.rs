use crate::history::{ViewEntry, ViewHistory};
use crate::settings::ViewSettings;
use kinship_core::{IndividualId, LayoutError, Perspective, ViewMode};
use kinship_events::{Event, EventBus, EventListener};
use kinship_graph::{
    CollisionReport, CollisionResolver, EdgeRouter, FIT_FILL, FitTransform, GraphModel,
    Hierarchy, HitResult, HitTester, PositionStore, RenderEdge, RenderNode, RootSelector,
    TreeBuilder, TreeLayouter, Vec2, collect_links, collect_nodes, route_links,
};

mod pointer;

pub use pointer::DragSession;


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// Root chosen automatically from the graph.
    Default { mode: ViewMode },
    Perspective(Perspective),
}

impl ViewState {
    pub fn mode(&self) -> ViewMode {
        match self {
            ViewState::Default { mode } => *mode,
            ViewState::Perspective(perspective) => perspective.mode,
        }
    }

    fn entry(&self) -> ViewEntry {
        match self {
            ViewState::Default { mode } => ViewEntry::new(None, *mode),
            ViewState::Perspective(perspective) => {
                ViewEntry::new(Some(perspective.individual), perspective.mode)
            }
        }
    }

    fn from_entry(entry: ViewEntry) -> Self {
        match entry.perspective {
            Some(individual) => ViewState::Perspective(Perspective::new(individual, entry.mode)),
            None => ViewState::Default { mode: entry.mode },
        }
    }
}

/// Owns the view state of one tree and turns interactions into rebuilds.
///
/// Every rebuild runs tree building, layout and collision resolution into the
/// single `PositionStore`. Drags edit that store in place and only re-route
/// the links touching the dragged node.
pub struct InteractionController {
    graph: GraphModel,
    settings: ViewSettings,
    builder: TreeBuilder,
    layouter: TreeLayouter,
    resolver: CollisionResolver,
    router: EdgeRouter,
    hit_tester: HitTester,
    state: ViewState,
    history: ViewHistory,
    hierarchy: Option<Hierarchy>,
    positions: PositionStore,
    edges: Vec<RenderEdge>,
    last_collision: Option<CollisionReport>,
    surface_ready: bool,
    drag: Option<DragSession>,
    suppress_click: Option<IndividualId>,
    event_bus: Option<EventBus>,
}

impl InteractionController {
    pub fn new(graph: GraphModel, settings: ViewSettings) -> Self {
        let frame = settings.layout.frame();
        Self {
            builder: TreeBuilder::new().with_max_generations(settings.max_generations),
            layouter: TreeLayouter::new(settings.layout),
            resolver: CollisionResolver::new(settings.collision, frame),
            router: EdgeRouter::new(frame),
            hit_tester: HitTester::new(),
            state: ViewState::Default {
                mode: settings.default_mode,
            },
            history: ViewHistory::new(settings.history_limit),
            hierarchy: None,
            positions: PositionStore::new(),
            edges: Vec::new(),
            last_collision: None,
            surface_ready: true,
            drag: None,
            suppress_click: None,
            event_bus: None,
            graph,
            settings,
        }
    }

    /// Publish navigation intents and rebuild notifications onto `bus`.
    pub fn with_event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Enter the initial view. An unknown `perspective` falls back to the
    /// default view.
    pub fn open(&mut self, perspective: Option<IndividualId>) -> Result<(), LayoutError> {
        let mode = self.settings.default_mode;
        self.state = match perspective {
            Some(id) if self.graph.contains(id) => ViewState::Perspective(Perspective::new(id, mode)),
            Some(id) => {
                tracing::warn!("Initial perspective {} not found, using default view", id);
                ViewState::Default { mode }
            }
            None => ViewState::Default { mode },
        };
        self.rebuild()
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    pub fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn mode(&self) -> ViewMode {
        self.state.mode()
    }

    pub fn history(&self) -> &ViewHistory {
        &self.history
    }

    pub fn hierarchy(&self) -> Option<&Hierarchy> {
        self.hierarchy.as_ref()
    }

    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    pub fn last_collision_report(&self) -> Option<CollisionReport> {
        self.last_collision
    }

    /// The individual the current view is rooted at.
    pub fn effective_root(&self) -> Option<IndividualId> {
        match self.state {
            ViewState::Perspective(perspective) => Some(perspective.individual),
            ViewState::Default { .. } => RootSelector::select(&self.graph).map(|root| root.id()),
        }
    }

    pub fn perspective(&self) -> Option<Perspective> {
        self.effective_root()
            .map(|individual| Perspective::new(individual, self.mode()))
    }

    pub fn is_surface_ready(&self) -> bool {
        self.surface_ready
    }

    /// Mark the render surface attached or detached. Rebuilds fail with
    /// `ContainerNotReady` while detached.
    pub fn set_surface_ready(&mut self, ready: bool) {
        self.surface_ready = ready;
    }

    pub fn change_perspective(&mut self, id: IndividualId) -> Result<(), LayoutError> {
        self.navigate_to(id, self.mode())
    }

    /// Re-root on `id`. An ancestors view switches to descendants.
    pub fn set_as_root(&mut self, id: IndividualId) -> Result<(), LayoutError> {
        let mode = match self.mode() {
            ViewMode::Ancestors => ViewMode::Descendants,
            mode => mode,
        };
        self.navigate_to(id, mode)
    }

    fn navigate_to(&mut self, id: IndividualId, mode: ViewMode) -> Result<(), LayoutError> {
        if !self.graph.contains(id) {
            return Err(LayoutError::UnknownIndividual(id));
        }
        // Pinning the automatic root is still a change of view.
        let target = ViewState::Perspective(Perspective::new(id, mode));
        if self.state != target {
            self.history.push(self.state.entry());
        }
        self.state = target;
        tracing::info!("Perspective changed to {} ({})", id, mode);
        self.rebuild()
    }

    /// Restore the previous view, or the default view when there is none.
    pub fn return_to_previous(&mut self) -> Result<(), LayoutError> {
        self.state = match self.history.pop() {
            Some(entry) => match entry.perspective {
                Some(id) if !self.graph.contains(id) => {
                    tracing::warn!("Previous perspective {} no longer exists", id);
                    ViewState::Default { mode: entry.mode }
                }
                _ => ViewState::from_entry(entry),
            },
            None => {
                tracing::debug!("View history empty, returning to default view");
                ViewState::Default {
                    mode: ViewMode::Both,
                }
            }
        };
        self.rebuild()
    }

    /// Switch view mode for the current root without recording history.
    pub fn set_view_mode(&mut self, mode: ViewMode) -> Result<(), LayoutError> {
        self.state = match self.state {
            ViewState::Default { .. } => ViewState::Default { mode },
            ViewState::Perspective(perspective) => {
                ViewState::Perspective(Perspective::new(perspective.individual, mode))
            }
        };
        self.rebuild()
    }

    /// Recompute hierarchy, positions and links for the current state.
    pub fn rebuild(&mut self) -> Result<(), LayoutError> {
        let result = self.try_rebuild();
        if let Err(error) = &result {
            tracing::warn!("Layout rebuild failed: {}", error);
            self.publish(Event::LayoutFailed {
                error: error.to_string(),
            });
        }
        result
    }

    fn try_rebuild(&mut self) -> Result<(), LayoutError> {
        if !self.surface_ready {
            return Err(LayoutError::ContainerNotReady);
        }
        if self.graph.is_empty() {
            self.clear_scene();
            return Err(LayoutError::EmptyGraph);
        }

        let root = self.effective_root().ok_or(LayoutError::EmptyGraph)?;
        let mode = self.mode();
        let hierarchy = self.builder.build(&self.graph, root, mode)?;

        self.layouter.layout_into(&hierarchy, &mut self.positions);
        let report = self.resolver.resolve(&mut self.positions);
        let links = collect_links(&hierarchy, &self.graph);
        self.edges = route_links(&links, &self.positions, &self.router);

        tracing::info!(
            "Rebuilt {} view of {}: {} nodes, {} links, {} overlaps resolved",
            mode,
            root,
            self.positions.len(),
            self.edges.len(),
            report.initial - report.remaining
        );

        self.hierarchy = Some(hierarchy);
        self.last_collision = Some(report);
        self.drag = None;
        self.suppress_click = None;

        self.publish(Event::PerspectiveChanged {
            perspective: Some(root),
            mode,
        });
        self.publish(Event::LayoutRebuilt {
            node_count: self.positions.len(),
            edge_count: self.edges.len(),
        });
        Ok(())
    }

    fn clear_scene(&mut self) {
        self.hierarchy = None;
        self.positions.clear();
        self.edges.clear();
        self.last_collision = None;
    }

    /// Move `id` to `(x, y)` and re-route only the links touching it.
    pub fn drag(&mut self, id: IndividualId, x: f32, y: f32) -> Result<(), LayoutError> {
        if !self.positions.contains(id) {
            return Err(LayoutError::UnknownIndividual(id));
        }
        self.positions.set(id, Vec2::new(x, y));

        for edge in self.edges.iter_mut().filter(|edge| edge.touches(id)) {
            if let (Some(source), Some(target)) = (
                self.positions.get(edge.source_id),
                self.positions.get(edge.target_id),
            ) {
                edge.path = self.router.route(edge.kind, source, target);
            }
        }
        Ok(())
    }

    /// Render-ready nodes, read from the current positions.
    pub fn render_nodes(&self) -> Vec<RenderNode> {
        self.hierarchy
            .as_ref()
            .map(|hierarchy| collect_nodes(hierarchy, &self.positions))
            .unwrap_or_default()
    }

    pub fn render_edges(&self) -> &[RenderEdge] {
        &self.edges
    }

    /// Scale and translation fitting the whole tree into the canvas.
    pub fn fit_transform(&self) -> Option<FitTransform> {
        let bounds = self.positions.bounds(self.settings.layout.frame())?;
        FitTransform::fit(bounds, self.settings.layout.canvas(), FIT_FILL)
    }

    /// What lies under `point` (canvas coordinates).
    pub fn hit_test(&self, point: Vec2) -> HitResult {
        self.hit_tester.hit_test(
            point,
            &self.positions,
            self.settings.layout.frame(),
            &self.edges,
        )
    }

    fn publish(&self, event: Event) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }
}

impl EventListener for InteractionController {
    fn handle_event(&mut self, event: &Event) {
        let result = match event {
            Event::NodeClick { id } => {
                self.node_click(*id);
                Ok(())
            }
            Event::DragStart { id, x, y } => self.drag_start(*id, *x, *y),
            Event::DragMove { id, x, y } => self.drag_move(*id, *x, *y),
            Event::DragEnd { id, x, y } => self.drag_end(*id, *x, *y),
            Event::ViewAsRoot { id } => self.view_as_root(*id).map(|_| ()),
            Event::ChangePerspective { id } => self.change_perspective(*id),
            Event::ReturnToPrevious => self.return_to_previous(),
            Event::SetViewMode(mode) => self.set_view_mode(*mode),
            Event::Navigate(_)
            | Event::PerspectiveChanged { .. }
            | Event::LayoutRebuilt { .. }
            | Event::LayoutFailed { .. } => Ok(()),
        };
        if let Err(error) = result {
            tracing::warn!("Failed to handle {:?}: {}", event, error);
        }
    }
}
