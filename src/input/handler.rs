use crate::{
    core::geo::{LatLng, Point},
    input::events::{InputEvent, MapEvent},
    prelude::{HashMap, VecDeque},
};

/// What the map should do in response to input
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A drag began
    StartDrag,
    /// Move the center so the drag that began at `anchor_center` is now
    /// displaced by `delta` pixels
    Pan { anchor_center: LatLng, delta: Point },
    /// The drag finished
    EndDrag,
    /// Hit-test markers at `position`
    Click { position: Point },
    /// The surface changed size
    Resize { size: Point },
}

/// Where the active drag started
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    pointer: Point,
    center: LatLng,
}

/// Event listener callback type
pub type EventCallback = Box<dyn Fn(&MapEvent) + Send + Sync>;

/// Event management system for the map
#[derive(Default)]
pub struct EventManager {
    /// Event listeners by event type
    listeners: HashMap<String, Vec<EventCallback>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.listeners
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }

    /// Emit an event to the queue
    pub fn emit(&mut self, event: MapEvent) {
        self.event_queue.push_back(event);
    }

    /// Deliver all queued events to their listeners, returning them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            if let Some(callbacks) = self.listeners.get(event.event_type()) {
                for callback in callbacks {
                    callback(event);
                }
            }
        }

        events
    }

    /// Drop every listener and pending event
    pub fn clear(&mut self) {
        self.listeners.clear();
        self.event_queue.clear();
    }
}

impl std::fmt::Debug for EventManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventManager")
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .field("event_queue", &self.event_queue)
            .finish()
    }
}

/// Turns pointer events into map actions
#[derive(Debug, Clone)]
pub struct InputHandler {
    pub enabled: bool,
    drag: Option<DragAnchor>,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            enabled: true,
            drag: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Forget any drag in progress without emitting an action
    pub fn cancel_drag(&mut self) {
        self.drag = None;
    }

    /// Handle one input event given the center at the time it arrived
    pub fn handle_event(&mut self, event: InputEvent, current_center: LatLng) -> Vec<Action> {
        if !self.enabled {
            return vec![];
        }

        match event {
            InputEvent::PointerDown { position } => {
                self.drag = Some(DragAnchor {
                    pointer: position,
                    center: current_center,
                });
                log::debug!("drag start at {:?}", position);
                vec![Action::StartDrag]
            }
            InputEvent::PointerMove { position } => match self.drag {
                Some(anchor) => vec![Action::Pan {
                    anchor_center: anchor.center,
                    delta: position.subtract(&anchor.pointer),
                }],
                None => vec![],
            },
            InputEvent::PointerUp | InputEvent::PointerLeave => match self.drag.take() {
                Some(_) => {
                    log::debug!("drag end");
                    vec![Action::EndDrag]
                }
                None => vec![],
            },
            InputEvent::Click { position } => vec![Action::Click { position }],
            InputEvent::Resize { size } => vec![Action::Resize { size }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    const CENTER: LatLng = LatLng::new(47.6062, -122.3321);

    #[test]
    fn test_drag_sequence() {
        let mut handler = InputHandler::new();

        let actions = handler.handle_event(
            InputEvent::PointerDown {
                position: Point::new(100.0, 100.0),
            },
            CENTER,
        );
        assert_eq!(actions, vec![Action::StartDrag]);
        assert!(handler.is_dragging());

        // the anchor center is the one captured on pointer down
        let moved = LatLng::new(0.0, 0.0);
        let actions = handler.handle_event(
            InputEvent::PointerMove {
                position: Point::new(130.0, 90.0),
            },
            moved,
        );
        assert_eq!(
            actions,
            vec![Action::Pan {
                anchor_center: CENTER,
                delta: Point::new(30.0, -10.0),
            }]
        );

        let actions = handler.handle_event(InputEvent::PointerLeave, CENTER);
        assert_eq!(actions, vec![Action::EndDrag]);
        assert!(!handler.is_dragging());
    }

    #[test]
    fn test_move_without_drag_does_nothing() {
        let mut handler = InputHandler::new();
        let actions = handler.handle_event(
            InputEvent::PointerMove {
                position: Point::new(5.0, 5.0),
            },
            CENTER,
        );
        assert!(actions.is_empty());
        assert!(handler.handle_event(InputEvent::PointerUp, CENTER).is_empty());
    }

    #[test]
    fn test_disabled_handler_ignores_input() {
        let mut handler = InputHandler::new();
        handler.enabled = false;
        let actions = handler.handle_event(
            InputEvent::Click {
                position: Point::new(1.0, 1.0),
            },
            CENTER,
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_listeners_receive_matching_events() {
        let mut events = EventManager::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        events.on("selectionchanged", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        events.emit(MapEvent::SelectionChanged {
            listing_id: Some("1".to_string()),
        });
        events.emit(MapEvent::ViewChanged {
            center: CENTER,
            zoom: 12,
        });
        let delivered = events.process_events();
        assert_eq!(delivered.len(), 2);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(events.process_events().is_empty());
    }
}
