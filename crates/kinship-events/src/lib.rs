use crossbeam_channel::{unbounded, Receiver, Sender};
use kinship_core::{IndividualId, ViewMode};
use serde::{Deserialize, Serialize};

/// What the host application should do in response to an interaction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum NavigationIntent {
    /// Show the detail page of an individual.
    OpenDetail(IndividualId),
    /// Re-root the tree on an individual.
    Reroot(IndividualId),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Event {
    // Pointer input (canvas coordinates)
    NodeClick {
        id: IndividualId,
    },
    DragStart {
        id: IndividualId,
        x: f32,
        y: f32,
    },
    DragMove {
        id: IndividualId,
        x: f32,
        y: f32,
    },
    DragEnd {
        id: IndividualId,
        x: f32,
        y: f32,
    },

    // View actions
    ViewAsRoot {
        id: IndividualId,
    },
    ChangePerspective {
        id: IndividualId,
    },
    ReturnToPrevious,
    SetViewMode(ViewMode),

    // Notifications published by the controller
    Navigate(NavigationIntent),
    PerspectiveChanged {
        perspective: Option<IndividualId>,
        mode: ViewMode,
    },
    LayoutRebuilt {
        node_count: usize,
        edge_count: usize,
    },
    LayoutFailed {
        error: String,
    },
}

#[derive(Clone)]
pub struct EventBus {
    tx: Sender<Event>,
    rx: Receiver<Event>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    pub fn receiver(&self) -> Receiver<Event> {
        self.rx.clone()
    }

    pub fn publish(&self, event: Event) {
        if self.tx.send(event).is_err() {
            tracing::warn!("Event bus disconnected, dropping event");
        }
    }

    /// Dispatch all pending events to a listener.
    ///
    /// Events the listener publishes while handling are dispatched in the
    /// same call, after the ones already queued.
    pub fn dispatch_to<L: EventListener>(&self, listener: &mut L) {
        while let Ok(event) = self.rx.try_recv() {
            tracing::trace!("Dispatching {:?}", event);
            listener.handle_event(&event);
        }
    }

    /// Take every pending event without dispatching.
    pub fn drain(&self) -> Vec<Event> {
        self.rx.try_iter().collect()
    }
}

/// Trait for components that respond to events.
/// Implement this to receive events from the EventBus.
pub trait EventListener {
    fn handle_event(&mut self, event: &Event);
}
