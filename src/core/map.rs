//! The interactive map engine
//!
//! [`InteractiveMap`] owns all per-mount state: the viewport, the drag in
//! progress, the listings and their markers, the selection and its popup,
//! the user's location and per-tile download state. Hosts feed it pointer
//! events and control presses, draw what it reports, and drain
//! [`MapEvent`]s to keep their own views in sync.

use crate::{
    core::{
        bounds::Bounds,
        config::MapConfig,
        constants::{MARKER_HIT_HEIGHT, MARKER_HIT_HEIGHT_WITH_DISTANCE, MARKER_HIT_WIDTH},
        geo::{LatLng, Point},
        viewport::Viewport,
    },
    data::{geocode::geocode_location, listing::Listing},
    geolocation::{GeoPosition, GeolocationError, GeolocationProvider, UserLocation},
    input::{Action, EventManager, InputEvent, InputHandler, MapEvent},
    prelude::HashSet,
    layers::marker::{build_markers, ListingMarker},
    spatial::culling::Culling,
    tiles::{
        cache::TileKey,
        loader::{TileResult, TileState, TileTracker},
        source::MapStyle,
    },
    ui::{
        controls::{control_states, status_line, ControlState, MapControl},
        popup::PopupState,
    },
};

/// A marker with its current on-screen position
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub marker: ListingMarker,
    pub pixel: Point,
}

impl PlacedMarker {
    /// The clickable badge. It is taller when it carries a distance line.
    pub fn badge(&self) -> Bounds {
        let height = if self.marker.distance_miles.is_some() {
            MARKER_HIT_HEIGHT_WITH_DISTANCE
        } else {
            MARKER_HIT_HEIGHT
        };
        Bounds::badge(self.pixel, MARKER_HIT_WIDTH, height)
    }

    pub fn hit(&self, point: &Point) -> bool {
        self.badge().contains(point)
    }
}

/// One map instance, constructed fresh per mount
pub struct InteractiveMap {
    config: MapConfig,
    viewport: Viewport,
    input_handler: InputHandler,
    event_manager: EventManager,
    /// Pan offset when the current drag began
    drag_base_pan: Point,
    listings: Vec<Listing>,
    selected: Option<String>,
    favorites: HashSet<String>,
    popup: PopupState,
    user_location: Option<UserLocation>,
    location_error: Option<GeolocationError>,
    locating: bool,
    style: MapStyle,
    tiles: TileTracker,
}

impl Default for InteractiveMap {
    fn default() -> Self {
        Self::new(MapConfig::default())
    }
}

impl std::fmt::Debug for InteractiveMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractiveMap")
            .field("viewport", &self.viewport)
            .field("listings", &self.listings.len())
            .field("selected", &self.selected)
            .field("favorites", &self.favorites.len())
            .field("user_location", &self.user_location)
            .field("locating", &self.locating)
            .field("style", &self.style)
            .finish()
    }
}

impl InteractiveMap {
    pub fn new(config: MapConfig) -> Self {
        let mut viewport = Viewport::new(
            config.default_center,
            config.default_zoom,
            config.viewport_size,
        );
        viewport.set_zoom_limits(config.min_zoom, config.max_zoom);
        viewport.set_zoom(config.default_zoom);

        Self {
            style: config.tiles.style,
            config,
            viewport,
            input_handler: InputHandler::new(),
            event_manager: EventManager::new(),
            drag_base_pan: Point::default(),
            listings: Vec::new(),
            selected: None,
            favorites: HashSet::default(),
            popup: PopupState::default(),
            user_location: None,
            location_error: None,
            locating: false,
            tiles: TileTracker::new(),
        }
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport_size(&mut self, size: Point) {
        self.viewport.set_size(size);
    }

    fn emit_view_changed(&mut self) {
        self.event_manager.emit(MapEvent::ViewChanged {
            center: self.viewport.center,
            zoom: self.viewport.zoom,
        });
    }

    /// Replaces the listing set. A selection whose listing disappeared is
    /// cleared.
    pub fn set_listings(&mut self, listings: Vec<Listing>) {
        self.listings = listings;
        if let Some(id) = &self.selected {
            if !self.listings.iter().any(|l| &l.id == id) {
                log::debug!("selected listing {} no longer present", id);
                self.selected = None;
                self.popup.close();
                self.event_manager
                    .emit(MapEvent::SelectionChanged { listing_id: None });
            }
        }
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn listing(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }

    pub fn handle_input(&mut self, input: InputEvent) {
        let actions = self
            .input_handler
            .handle_event(input, self.viewport.center);

        for action in actions {
            match action {
                Action::StartDrag => {
                    self.drag_base_pan = self.viewport.pan;
                }
                Action::Pan {
                    anchor_center,
                    delta,
                } => {
                    self.viewport
                        .pan_from_anchor(anchor_center, delta, self.config.pan_mode);
                    self.viewport.pan = self.drag_base_pan.add(&delta);
                }
                Action::EndDrag => self.emit_view_changed(),
                Action::Click { position } => {
                    if let Some(id) = self.hit_test(&position) {
                        self.click_marker(&id);
                    }
                }
                Action::Resize { size } => self.set_viewport_size(size),
            }
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.input_handler.is_dragging()
    }

    pub fn zoom_in(&mut self) {
        self.step_zoom(1);
    }

    pub fn zoom_out(&mut self) {
        self.step_zoom(-1);
    }

    fn step_zoom(&mut self, delta: i32) {
        let before = self.viewport.zoom;
        self.viewport.zoom_by(delta);
        if self.viewport.zoom != before {
            self.emit_view_changed();
        }
    }

    /// Back to the user's location at the located zoom, or the default
    /// view when no location is known. Clears the pan offset.
    pub fn reset_view(&mut self) {
        match self.user_location {
            Some(location) => {
                self.viewport.set_center(location.lat_lng());
                self.viewport.set_zoom(self.config.located_zoom);
            }
            None => {
                self.viewport.set_center(self.config.default_center);
                self.viewport.set_zoom(self.config.default_zoom);
            }
        }
        self.viewport.reset_pan();
        self.emit_view_changed();
    }

    pub fn style(&self) -> MapStyle {
        self.style
    }

    pub fn toggle_style(&mut self) {
        self.style = self.style.toggled();
        log::info!("map style switched to {:?}", self.style);
        self.event_manager
            .emit(MapEvent::StyleChanged { style: self.style });
    }

    /// Marks a position request as outstanding. Returns false, and does
    /// nothing, if one already is.
    pub fn begin_locate(&mut self) -> bool {
        if self.locating {
            log::debug!("location request already outstanding");
            return false;
        }
        self.locating = true;
        self.location_error = None;
        true
    }

    /// Applies the outcome of the outstanding request. Ignored when no
    /// request is outstanding.
    pub fn finish_locate(&mut self, result: Result<GeoPosition, GeolocationError>) {
        if !self.locating {
            log::warn!("location result arrived with no request outstanding");
            return;
        }
        self.locating = false;

        match result {
            Ok(position) => {
                let location = UserLocation::from(position);
                log::info!(
                    "location found at ({:.4}, {:.4}), accuracy {:?}",
                    location.lat,
                    location.lng,
                    location.accuracy
                );
                self.user_location = Some(location);
                self.viewport.set_center(location.lat_lng());
                self.viewport.set_zoom(self.config.located_zoom);
                self.event_manager
                    .emit(MapEvent::LocationFound { location });
                self.emit_view_changed();
            }
            Err(e) => {
                log::warn!("geolocation failed: {:?}", e);
                self.event_manager.emit(MapEvent::LocationError {
                    message: e.to_string(),
                });
                self.location_error = Some(e);
            }
        }
    }

    /// Requests a position from `provider` and applies the result. Returns
    /// false if a request was already outstanding.
    pub async fn locate(&mut self, provider: &dyn GeolocationProvider) -> bool {
        if !self.begin_locate() {
            return false;
        }
        let options = self.config.geolocation.clone();
        let result = provider.current_position(&options).await;
        self.finish_locate(result);
        true
    }

    pub fn is_locating(&self) -> bool {
        self.locating
    }

    pub fn user_location(&self) -> Option<&UserLocation> {
        self.user_location.as_ref()
    }

    /// Injects a known location without moving the view
    pub fn set_user_location(&mut self, location: Option<UserLocation>) {
        self.user_location = location;
    }

    pub fn location_error(&self) -> Option<&GeolocationError> {
        self.location_error.as_ref()
    }

    pub fn location_error_message(&self) -> Option<String> {
        self.location_error.as_ref().map(|e| e.to_string())
    }

    pub fn dismiss_location_error(&mut self) {
        self.location_error = None;
    }

    /// Pixel position of the user dot and, if worth drawing, the accuracy
    /// ring diameter
    pub fn user_marker(&self) -> Option<(Point, Option<f64>)> {
        self.user_location.map(|location| {
            (
                self.viewport.lat_lng_to_pixel(&location.lat_lng()),
                location.accuracy_ring_diameter(),
            )
        })
    }

    /// Every listing's marker, nearest first when the user location is known
    pub fn markers(&self) -> Vec<ListingMarker> {
        build_markers(&self.listings, self.user_location.as_ref())
    }

    /// Markers on or near the visible surface, with their pixel positions
    pub fn visible_markers(&self) -> Vec<PlacedMarker> {
        self.markers()
            .into_iter()
            .filter_map(|marker| {
                let pixel = self.viewport.lat_lng_to_pixel(&marker.coordinates);
                Culling::marker_visible(self.viewport.size, &pixel, self.config.marker_margin)
                    .then_some(PlacedMarker { marker, pixel })
            })
            .collect()
    }

    /// The topmost marker under `point`. Later markers draw on top.
    pub fn hit_test(&self, point: &Point) -> Option<String> {
        self.visible_markers()
            .into_iter()
            .rev()
            .find(|placed| placed.hit(point))
            .map(|placed| placed.marker.id)
    }

    /// Toggles selection of `listing_id`. Returns false for an unknown id.
    pub fn click_marker(&mut self, listing_id: &str) -> bool {
        let Some(coordinates) = self
            .markers()
            .into_iter()
            .find(|m| m.id == listing_id)
            .map(|m| m.coordinates)
        else {
            return false;
        };

        if self.selected.as_deref() == Some(listing_id) {
            self.selected = None;
            self.popup.close();
        } else {
            self.selected = Some(listing_id.to_string());
            self.popup
                .open(listing_id, self.viewport.lat_lng_to_pixel(&coordinates));
        }

        log::debug!("selection is now {:?}", self.selected);
        self.event_manager.emit(MapEvent::SelectionChanged {
            listing_id: self.selected.clone(),
        });
        true
    }

    /// Selection pushed in from outside, e.g. the list view. Emits nothing.
    pub fn set_selected(&mut self, listing_id: Option<String>) {
        match &listing_id {
            Some(id) => {
                let pixel = self
                    .listing(id)
                    .map(|l| geocode_location(&l.location))
                    .map(|c| self.viewport.lat_lng_to_pixel(&c));
                match pixel {
                    Some(pixel) => self.popup.open(id.clone(), pixel),
                    None => self.popup.close(),
                }
            }
            None => self.popup.close(),
        }
        self.selected = listing_id;
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn popup(&self) -> &PopupState {
        &self.popup
    }

    /// Closes the popup; the selection stays
    pub fn close_popup(&mut self) {
        self.popup.close();
    }

    /// Tiles to draw in the current style, each with its on-screen offset
    pub fn visible_tiles(&self) -> Vec<(TileKey, Point)> {
        self.viewport
            .tiles_in_view()
            .into_iter()
            .map(|coord| (TileKey::new(self.style, coord), self.viewport.tile_offset(&coord)))
            .collect()
    }

    pub fn tile_url(&self, key: &TileKey) -> String {
        key.url()
    }

    /// True when `key` has not been requested yet; the caller should start
    /// its download.
    pub fn request_tile(&mut self, key: TileKey) -> bool {
        self.tiles.request(key)
    }

    pub fn record_tile(&mut self, result: &TileResult) {
        self.tiles.complete(result);
    }

    pub fn tile_state(&self, key: &TileKey) -> Option<&TileState> {
        self.tiles.state(key)
    }

    /// False until the first tile arrives
    pub fn tiles_loaded(&self) -> bool {
        self.tiles.any_loaded()
    }

    pub fn attribution(&self) -> &'static str {
        self.style.attribution()
    }

    pub fn status_line(&self) -> String {
        status_line(
            self.viewport.zoom,
            self.visible_markers().len(),
            self.user_location.is_some(),
        )
    }

    pub fn controls(&self) -> Vec<ControlState> {
        control_states(self.style, self.locating)
    }

    /// Runs a control. `Locate` only marks the request outstanding; the
    /// host resolves it with [`InteractiveMap::finish_locate`]. Returns false
    /// when the control is disabled.
    pub fn activate(&mut self, control: MapControl) -> bool {
        match control {
            MapControl::Locate => return self.begin_locate(),
            MapControl::ZoomIn => self.zoom_in(),
            MapControl::ZoomOut => self.zoom_out(),
            MapControl::Reset => self.reset_view(),
            MapControl::ToggleStyle => self.toggle_style(),
        }
        true
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    /// Drops listeners, pending events and the user's location. The map
    /// should not be used afterwards.
    /// Flips the favorite flag on a listing and returns the new state.
    /// Ids not in the current listings are ignored.
    pub fn toggle_favorite(&mut self, listing_id: &str) -> bool {
        if self.listing(listing_id).is_none() {
            return false;
        }
        let favorite = if self.favorites.remove(listing_id) {
            false
        } else {
            self.favorites.insert(listing_id.to_string());
            true
        };
        self.event_manager.emit(MapEvent::FavoriteChanged {
            listing_id: listing_id.to_string(),
            favorite,
        });
        favorite
    }

    pub fn is_favorite(&self, listing_id: &str) -> bool {
        self.favorites.contains(listing_id)
    }

    /// Favorited listings, in listing order
    pub fn favorites(&self) -> Vec<&Listing> {
        self.listings
            .iter()
            .filter(|l| self.favorites.contains(&l.id))
            .collect()
    }

    pub fn teardown(&mut self) {
        self.event_manager.clear();
        self.favorites.clear();
        self.input_handler.cancel_drag();
        self.user_location = None;
        self.location_error = None;
        self.locating = false;
        self.popup.close();
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::constants::DEFAULT_CENTER, geolocation::FixedLocator};

    fn fremont_map() -> InteractiveMap {
        let mut map = InteractiveMap::default();
        map.set_listings(vec![Listing::new("1", "Fremont", 18.0)]);
        map
    }

    fn position(lat: f64, lng: f64) -> GeoPosition {
        GeoPosition {
            latitude: lat,
            longitude: lng,
            accuracy: Some(25.0),
        }
    }

    #[test]
    fn test_fremont_end_to_end() {
        let mut map = fremont_map();

        let markers = map.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].coordinates, geocode_location("Fremont"));
        assert!(markers[0].distance_miles.is_none());
        assert!(markers[0].travel_time.is_none());

        map.set_user_location(Some(UserLocation {
            lat: 47.6062,
            lng: -122.3321,
            accuracy: None,
        }));
        let markers = map.markers();
        assert!(markers[0].distance_miles.unwrap() > 0.0);
        assert!(markers[0].travel_time.is_some());

        map.set_listings(vec![
            Listing::new("1", "Fremont", 18.0),
            Listing::new("2", "Beacon Hill", 20.0),
            Listing::new("3", "Downtown Seattle", 22.0),
        ]);
        let ids: Vec<_> = map.markers().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_click_toggles_selection_and_popup() {
        let mut map = fremont_map();

        assert!(map.click_marker("1"));
        assert_eq!(map.selected(), Some("1"));
        assert!(map.popup().is_open_for("1"));
        let expected = map.viewport().lat_lng_to_pixel(&geocode_location("Fremont"));
        assert_eq!(map.popup().pixel_position, expected);

        assert!(map.click_marker("1"));
        assert_eq!(map.selected(), None);
        assert!(!map.popup().is_open());

        assert!(!map.click_marker("nope"));

        let events = map.process_events();
        assert_eq!(
            events,
            vec![
                MapEvent::SelectionChanged {
                    listing_id: Some("1".to_string())
                },
                MapEvent::SelectionChanged { listing_id: None },
            ]
        );
    }

    #[test]
    fn test_single_selection() {
        let mut map = InteractiveMap::default();
        map.set_listings(vec![
            Listing::new("1", "Fremont", 18.0),
            Listing::new("2", "Ballard", 20.0),
        ]);
        map.click_marker("1");
        map.click_marker("2");
        assert_eq!(map.selected(), Some("2"));
        assert!(map.popup().is_open_for("2"));
    }

    #[test]
    fn test_click_event_hits_marker() {
        let mut map = fremont_map();
        let pixel = map.viewport().lat_lng_to_pixel(&geocode_location("Fremont"));

        map.handle_input(InputEvent::Click {
            position: Point::new(pixel.x, pixel.y - 5.0),
        });
        assert_eq!(map.selected(), Some("1"));

        // nowhere near the marker
        map.handle_input(InputEvent::Click {
            position: Point::new(pixel.x + 300.0, pixel.y + 300.0),
        });
        assert_eq!(map.selected(), Some("1"));
    }

    #[test]
    fn test_external_selection_emits_nothing() {
        let mut map = fremont_map();
        map.set_selected(Some("1".to_string()));
        assert!(map.popup().is_open_for("1"));
        map.set_selected(None);
        assert!(!map.popup().is_open());
        assert!(map.process_events().is_empty());
    }

    #[test]
    fn test_zoom_clamps() {
        let mut map = InteractiveMap::default();
        for _ in 0..5 {
            map.zoom_in();
        }
        assert_eq!(map.viewport().zoom, 17);
        map.zoom_in();
        map.zoom_in();
        assert_eq!(map.viewport().zoom, 18);

        let mut map = InteractiveMap::default();
        for _ in 0..8 {
            map.zoom_out();
        }
        assert_eq!(map.viewport().zoom, 4);
        map.zoom_out();
        map.zoom_out();
        assert_eq!(map.viewport().zoom, 3);
    }

    #[test]
    fn test_favorites_toggle_independently_of_selection() {
        let mut map = fremont_map();
        map.set_listings(vec![
            Listing::new("1", "Fremont", 18.0),
            Listing::new("2", "Ballard", 22.0),
        ]);

        assert!(map.toggle_favorite("2"));
        assert!(map.toggle_favorite("1"));
        assert!(map.is_favorite("2"));
        assert_eq!(map.selected(), None);
        let ids: Vec<_> = map.favorites().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        assert!(!map.toggle_favorite("2"));
        assert!(!map.is_favorite("2"));
        assert!(!map.toggle_favorite("missing"));

        let events = map.process_events();
        assert_eq!(
            events,
            vec![
                MapEvent::FavoriteChanged { listing_id: "2".into(), favorite: true },
                MapEvent::FavoriteChanged { listing_id: "1".into(), favorite: true },
                MapEvent::FavoriteChanged { listing_id: "2".into(), favorite: false },
            ]
        );

        map.teardown();
        assert!(!map.is_favorite("1"));
    }

    #[test]
    fn test_culling_keeps_distance_order() {
        let mut map = InteractiveMap::new(MapConfig {
            default_zoom: 13,
            ..MapConfig::default()
        });
        let names = [
            "Ballard",
            "Beacon Hill",
            "Fremont",
            "Queen Anne",
            "University District",
            "Capitol Hill",
            "Downtown Seattle",
        ];
        map.set_listings(names.iter().map(|n| Listing::new(*n, *n, 20.0)).collect());
        map.set_user_location(Some(UserLocation {
            lat: 47.6062,
            lng: -122.3321,
            accuracy: None,
        }));

        let all = map.markers();
        assert_eq!(all.len(), names.len());
        let distances: Vec<f64> = all.iter().map(|m| m.distance_miles.unwrap()).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(all[0].id, "Downtown Seattle");

        let visible: Vec<String> = map.visible_markers().into_iter().map(|p| p.marker.id).collect();
        assert!(!visible.is_empty() && visible.len() < all.len());
        assert!(!visible.contains(&"Ballard".to_string()));

        let expected: Vec<String> = all
            .into_iter()
            .map(|m| m.id)
            .filter(|id| visible.contains(id))
            .collect();
        assert_eq!(visible, expected);
    }

    #[test]
    fn test_unvalidated_config_cannot_escape_zoom_range() {
        let mut map = InteractiveMap::new(MapConfig {
            min_zoom: 0,
            max_zoom: 22,
            default_zoom: 1,
            ..MapConfig::default()
        });
        assert_eq!(map.viewport().zoom, 3);
        for _ in 0..5 {
            map.zoom_out();
        }
        assert_eq!(map.viewport().zoom, 3);
        for _ in 0..30 {
            map.zoom_in();
        }
        assert_eq!(map.viewport().zoom, 18);
    }

    #[test]
    fn test_drag_pans_and_clamps_latitude() {
        let mut map = InteractiveMap::default();
        map.handle_input(InputEvent::PointerDown {
            position: Point::new(400.0, 300.0),
        });
        map.handle_input(InputEvent::PointerMove {
            position: Point::new(400.0, 300.0 + 1.0e7),
        });
        assert_eq!(map.viewport().center.lat, 85.0);
        assert_eq!(map.viewport().pan, Point::new(0.0, 1.0e7));

        map.handle_input(InputEvent::PointerUp);
        assert!(!map.is_dragging());

        // moves after release do nothing
        let center = map.viewport().center;
        map.handle_input(InputEvent::PointerMove {
            position: Point::new(0.0, 0.0),
        });
        assert_eq!(map.viewport().center, center);
    }

    #[test]
    fn test_reset_view() {
        let mut map = InteractiveMap::default();
        map.handle_input(InputEvent::PointerDown {
            position: Point::new(0.0, 0.0),
        });
        map.handle_input(InputEvent::PointerMove {
            position: Point::new(120.0, 40.0),
        });
        map.handle_input(InputEvent::PointerUp);
        map.zoom_in();

        map.reset_view();
        assert_eq!(map.viewport().center, DEFAULT_CENTER);
        assert_eq!(map.viewport().zoom, 12);
        assert_eq!(map.viewport().pan, Point::default());

        map.set_user_location(Some(UserLocation {
            lat: 47.65,
            lng: -122.35,
            accuracy: None,
        }));
        map.reset_view();
        assert_eq!(map.viewport().center, LatLng::new(47.65, -122.35));
        assert_eq!(map.viewport().zoom, 14);
    }

    #[test]
    fn test_locate_success_and_duplicate() {
        let mut map = InteractiveMap::default();
        assert!(map.begin_locate());
        assert!(map.is_locating());
        assert!(!map.begin_locate());
        assert!(!map.controls()[0].enabled);

        map.finish_locate(Ok(position(47.6685, -122.3834)));
        assert!(!map.is_locating());
        assert_eq!(map.viewport().center, LatLng::new(47.6685, -122.3834));
        assert_eq!(map.viewport().zoom, 14);
        assert!(map.status_line().ends_with("Location enabled"));

        // a stray second result is ignored
        map.finish_locate(Ok(position(0.0, 0.0)));
        assert_eq!(map.viewport().center, LatLng::new(47.6685, -122.3834));
    }

    #[test]
    fn test_locate_failure_leaves_view() {
        let mut map = InteractiveMap::default();
        let before = map.viewport().clone();

        map.begin_locate();
        map.finish_locate(Err(GeolocationError::PermissionDenied));
        assert_eq!(map.viewport(), &before);
        assert_eq!(
            map.location_error_message().as_deref(),
            Some("Location access denied. Please enable location services.")
        );

        map.dismiss_location_error();
        assert!(map.location_error().is_none());
    }

    #[tokio::test]
    async fn test_locate_with_provider() {
        let mut map = InteractiveMap::default();
        let provider = FixedLocator::at(LatLng::new(47.6205, -122.3212), Some(40.0));
        assert!(map.locate(&provider).await);

        let (_, ring) = map.user_marker().unwrap();
        assert_eq!(ring, Some(4.0));
        assert!(map
            .process_events()
            .iter()
            .any(|e| matches!(e, MapEvent::LocationFound { .. })));
    }

    #[test]
    fn test_style_toggle_changes_tile_keys() {
        let mut map = InteractiveMap::default();
        let (key, _) = map.visible_tiles()[0];
        assert_eq!(key.style, MapStyle::Standard);
        assert!(map.activate(MapControl::ToggleStyle));
        let (key, _) = map.visible_tiles()[0];
        assert_eq!(key.style, MapStyle::Satellite);
        assert_eq!(map.attribution(), "© Esri");
    }

    #[test]
    fn test_status_line_counts_visible_markers() {
        let mut map = InteractiveMap::default();
        map.set_listings(crate::data::listing::sample_listings());
        assert_eq!(map.status_line(), "Zoom: 12 • 4 babysitters shown");

        for _ in 0..6 {
            map.zoom_in();
        }
        // at zoom 18 only downtown is on screen
        assert_eq!(map.status_line(), "Zoom: 18 • 1 babysitters shown");
    }

    #[test]
    fn test_teardown_drops_listeners() {
        use std::sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        };
        let mut map = fremont_map();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        map.on("selectionchanged", move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        map.click_marker("1");
        map.teardown();
        map.process_events();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(map.user_location().is_none());
    }
}
