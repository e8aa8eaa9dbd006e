use super::InteractionController;
use kinship_core::{IndividualId, LayoutError};
use kinship_events::{Event, NavigationIntent};
use kinship_graph::Vec2;

/// Pointer travel below which a drag still counts as a click.
pub const CLICK_SLOP: f32 = 3.0;

/// An in-progress drag of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub id: IndividualId,
    pub started_at: Vec2,
    pub moved: bool,
}

impl InteractionController {
    pub fn drag_session(&self) -> Option<DragSession> {
        self.drag
    }

    pub fn drag_start(&mut self, id: IndividualId, x: f32, y: f32) -> Result<(), LayoutError> {
        if !self.positions.contains(id) {
            return Err(LayoutError::UnknownIndividual(id));
        }
        self.suppress_click = None;
        self.drag = Some(DragSession {
            id,
            started_at: Vec2::new(x, y),
            moved: false,
        });
        Ok(())
    }

    pub fn drag_move(&mut self, id: IndividualId, x: f32, y: f32) -> Result<(), LayoutError> {
        if let Some(session) = self.drag.as_mut()
            && session.id == id
        {
            let dx = x - session.started_at.x;
            let dy = y - session.started_at.y;
            if dx * dx + dy * dy > CLICK_SLOP * CLICK_SLOP {
                session.moved = true;
            }
        }
        self.drag(id, x, y)
    }

    /// Finish a drag. A drag that moved the node swallows the click that
    /// the pointer release produces.
    pub fn drag_end(&mut self, id: IndividualId, x: f32, y: f32) -> Result<(), LayoutError> {
        self.drag_move(id, x, y)?;
        if let Some(session) = self.drag.take()
            && session.id == id
            && session.moved
        {
            self.suppress_click = Some(id);
        }
        Ok(())
    }

    /// Resolve a click on a node into a detail request, unless the click
    /// only ended a drag.
    pub fn node_click(&mut self, id: IndividualId) -> Option<NavigationIntent> {
        if self.suppress_click.take() == Some(id) {
            tracing::debug!("Ignoring click on {} after drag", id);
            return None;
        }
        let intent = NavigationIntent::OpenDetail(id);
        self.publish(Event::Navigate(intent));
        Some(intent)
    }

    /// Explicit "view as root" action on a node.
    pub fn view_as_root(&mut self, id: IndividualId) -> Result<NavigationIntent, LayoutError> {
        self.set_as_root(id)?;
        let intent = NavigationIntent::Reroot(id);
        self.publish(Event::Navigate(intent));
        Ok(intent)
    }
}
