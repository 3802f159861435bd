use sittermap::{
    constants::{MAX_ZOOM, MIN_ZOOM},
    distance_miles, geocode_location, sample_listings, travel_time_label, InputEvent,
    InteractiveMap, LatLng, Listing, MapConfig, MapControl, MapEvent, MapStyle, Point,
    TileCoord, UserLocation, Viewport,
};
use std::sync::{Arc, Mutex};

fn downtown() -> UserLocation {
    UserLocation {
        lat: 47.6062,
        lng: -122.3321,
        accuracy: Some(50.0),
    }
}

#[test]
fn test_tiles_cover_view_at_every_zoom() {
    let center = LatLng::new(47.6062, -122.3321);
    for zoom in MIN_ZOOM..=MAX_ZOOM {
        let viewport = Viewport::new(center, zoom, Point::new(800.0, 600.0));
        let tiles = viewport.tiles_in_view();
        let n = TileCoord::grid_size(zoom);

        assert!(!tiles.is_empty(), "no tiles at zoom {}", zoom);
        assert!(tiles.len() <= 7 * 6, "too many tiles at zoom {}", zoom);
        for tile in &tiles {
            assert_eq!(tile.z, zoom);
            assert!((tile.x as i64) < n && (tile.y as i64) < n);
        }

        let center_tile = TileCoord::from_lat_lng(&center, zoom).unwrap();
        assert!(tiles.contains(&center_tile), "center tile missing at zoom {}", zoom);
    }
}

#[test]
fn test_sample_listings_with_user_location() {
    let mut map = InteractiveMap::new(MapConfig::seattle());
    map.set_listings(sample_listings());
    map.set_user_location(Some(downtown()));

    let markers = map.markers();
    assert_eq!(markers.len(), sample_listings().len());

    let distances: Vec<f64> = markers.iter().map(|m| m.distance_miles.unwrap()).collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));

    for marker in &markers {
        let miles = distance_miles(&downtown().lat_lng(), &marker.coordinates);
        assert_eq!(marker.travel_time.as_deref(), Some(travel_time_label(miles).as_str()));
    }
}

#[test]
fn test_click_drag_and_listeners() {
    let mut map = InteractiveMap::default();
    map.set_listings(vec![Listing::new("1", "Fremont", 18.0)]);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    map.on("selectionchanged", move |event| {
        if let MapEvent::SelectionChanged { listing_id } = event {
            sink.lock().unwrap().push(listing_id.clone());
        }
    });

    // just inside the bottom of the badge
    let anchor = map.viewport().lat_lng_to_pixel(&geocode_location("Fremont"));
    let on_badge = Point::new(anchor.x, anchor.y - 2.0);
    map.handle_input(InputEvent::Click { position: on_badge });
    assert_eq!(map.selected(), Some("1"));
    assert!(map.popup().is_open_for("1"));

    map.handle_input(InputEvent::Click { position: on_badge });
    assert_eq!(map.selected(), None);

    map.process_events();
    assert_eq!(*seen.lock().unwrap(), vec![Some("1".to_string()), None]);

    let before = map.viewport().center;
    map.handle_input(InputEvent::PointerDown {
        position: Point::new(10.0, 10.0),
    });
    map.handle_input(InputEvent::PointerMove {
        position: Point::new(110.0, 10.0),
    });
    map.handle_input(InputEvent::PointerUp);
    // dragging right reveals what lies to the west
    assert!(map.viewport().center.lng < before.lng);
    assert_eq!(map.viewport().center.lat, before.lat);
}

#[test]
fn test_controls_drive_the_view() {
    let mut map = InteractiveMap::new(MapConfig::seattle());

    assert!(map.activate(MapControl::ZoomIn));
    assert_eq!(map.viewport().zoom, 13);
    map.activate(MapControl::ZoomOut);
    map.activate(MapControl::ZoomOut);
    assert_eq!(map.viewport().zoom, 11);

    map.activate(MapControl::ToggleStyle);
    assert_eq!(map.style(), MapStyle::Satellite);
    assert!(map.visible_tiles().iter().all(|(key, _)| key.style == MapStyle::Satellite));

    assert!(map.activate(MapControl::Locate));
    assert!(map.is_locating());
    let locate = map
        .controls()
        .into_iter()
        .find(|c| c.control == MapControl::Locate)
        .unwrap();
    assert!(!locate.enabled);

    map.activate(MapControl::Reset);
    assert_eq!(map.viewport().zoom, 12);
}
