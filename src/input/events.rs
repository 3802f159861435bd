use crate::{
    core::geo::{LatLng, Point},
    geolocation::UserLocation,
    tiles::source::MapStyle,
};
use serde::{Deserialize, Serialize};

/// Pointer input fed to the map, in container-relative pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Primary button pressed; starts a drag
    PointerDown { position: Point },
    /// Pointer moved; pans while a drag is active
    PointerMove { position: Point },
    /// Primary button released
    PointerUp,
    /// Pointer left the map surface; ends any drag
    PointerLeave,
    /// Press and release without movement, e.g. on a marker
    Click { position: Point },
    /// Map surface resized
    Resize { size: Point },
}

impl InputEvent {
    /// Gets the position associated with this event, if any
    pub fn position(&self) -> Option<Point> {
        match self {
            InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::Click { position } => Some(*position),
            _ => None,
        }
    }

    /// True for events that end a drag
    pub fn ends_drag(&self) -> bool {
        matches!(self, InputEvent::PointerUp | InputEvent::PointerLeave)
    }
}

/// Events the map emits to its host
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Center or zoom changed
    ViewChanged { center: LatLng, zoom: u8 },
    /// A marker was selected, or the selection was cleared
    SelectionChanged { listing_id: Option<String> },
    /// Geolocation succeeded
    LocationFound { location: UserLocation },
    /// Geolocation failed; `message` is user-facing
    LocationError { message: String },
    /// Imagery style switched
    StyleChanged { style: MapStyle },
    /// A listing was added to or removed from the favorites
    FavoriteChanged { listing_id: String, favorite: bool },
}

impl MapEvent {
    /// Listener key for this event
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::SelectionChanged { .. } => "selectionchanged",
            MapEvent::LocationFound { .. } => "locationfound",
            MapEvent::LocationError { .. } => "locationerror",
            MapEvent::StyleChanged { .. } => "stylechanged",
            MapEvent::FavoriteChanged { .. } => "favoritechanged",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_event_position() {
        let down = InputEvent::PointerDown {
            position: Point::new(100.0, 200.0),
        };
        assert_eq!(down.position(), Some(Point::new(100.0, 200.0)));
        assert_eq!(InputEvent::PointerUp.position(), None);
    }

    #[test]
    fn test_drag_enders() {
        assert!(InputEvent::PointerUp.ends_drag());
        assert!(InputEvent::PointerLeave.ends_drag());
        assert!(!InputEvent::Click {
            position: Point::default()
        }
        .ends_drag());
    }

    #[test]
    fn test_event_type_keys() {
        let event = MapEvent::SelectionChanged {
            listing_id: Some("3".to_string()),
        };
        assert_eq!(event.event_type(), "selectionchanged");
        assert_eq!(
            MapEvent::StyleChanged {
                style: MapStyle::Satellite
            }
            .event_type(),
            "stylechanged"
        );
        assert_eq!(
            MapEvent::FavoriteChanged {
                listing_id: "3".to_string(),
                favorite: true
            }
            .event_type(),
            "favoritechanged"
        );
    }
}
