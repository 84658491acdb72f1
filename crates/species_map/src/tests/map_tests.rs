use super::*;
use shared::protocol::parse_event_date;

const SURFACE: &str = "map";

fn setup() -> (Arc<HeadlessMapRenderer>, MapSynchronizer) {
    let renderer = Arc::new(HeadlessMapRenderer::with_surfaces([SURFACE]));
    let synchronizer = MapSynchronizer::new(renderer.clone(), MapSettings::default());
    (renderer, synchronizer)
}

fn record_at(lat: f64, lng: f64) -> OccurrenceRecord {
    OccurrenceRecord::new("Panthera tigris").with_coordinates(lat, lng)
}

fn tiger_record() -> OccurrenceRecord {
    let mut record = record_at(26.5, 80.9);
    record.locality = Some("Corbett".into());
    record.event_date = parse_event_date("2023-05-01");
    record
}

fn default_view() -> Viewport {
    Viewport::View(MapView::new(LatLng::new(20.0, 85.0), 5))
}

/// Fails every tile layer request; everything else is delegated.
struct TilelessRenderer(HeadlessMapRenderer);

impl MapRenderer for TilelessRenderer {
    fn create_map(&self, surface: &SurfaceId, initial: MapView) -> Result<MapId, MapError> {
        self.0.create_map(surface, initial)
    }
    fn add_tile_layer(&self, _map: MapId, layer: &TileLayer) -> Result<LayerId, MapError> {
        Err(MapError::Unavailable(format!("tiles {}", layer.url_template)))
    }
    fn create_layer_group(&self, map: MapId) -> Result<LayerId, MapError> {
        self.0.create_layer_group(map)
    }
    fn clear_layer_group(&self, map: MapId, group: LayerId) {
        self.0.clear_layer_group(map, group)
    }
    fn add_marker(&self, map: MapId, group: LayerId, marker: MarkerSpec) {
        self.0.add_marker(map, group, marker)
    }
    fn fit_bounds(&self, map: MapId, bounds: LatLngBounds) {
        self.0.fit_bounds(map, bounds)
    }
    fn set_view(&self, map: MapId, view: MapView) {
        self.0.set_view(map, view)
    }
    fn destroy_map(&self, map: MapId) -> Result<(), MapError> {
        self.0.destroy_map(map)
    }
}

#[test]
fn mount_shows_default_view_with_tiles_and_empty_group() {
    let (renderer, synchronizer) = setup();

    let handle = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");

    let map_id = handle.map_id().expect("initialized");
    let map = renderer.map(map_id).expect("live map");
    assert_eq!(map.viewport, default_view());
    assert_eq!(map.tile_layers.len(), 1);
    assert_eq!(map.tile_layers[0].1, TileLayer::default());
    assert_eq!(map.layer_groups.len(), 1);
    assert!(map.markers().is_empty());
}

#[test]
fn initialize_is_idempotent() {
    let (renderer, synchronizer) = setup();
    let mut handle = synchronizer.attach(SurfaceId::new(SURFACE));
    assert!(!handle.is_initialized());

    synchronizer.initialize(&mut handle).expect("first init");
    let first = handle.map_id();
    synchronizer.initialize(&mut handle).expect("second init");

    assert_eq!(handle.map_id(), first);
    assert_eq!(renderer.live_maps(), 1);
    let map = renderer.map(first.expect("map id")).expect("live map");
    assert_eq!(map.tile_layers.len(), 1);
    assert_eq!(map.layer_groups.len(), 1);
}

#[test]
fn unknown_surface_is_reported() {
    let (renderer, synchronizer) = setup();

    let err = synchronizer
        .mount(SurfaceId::new("sidebar"))
        .err()
        .expect("must fail");

    assert!(matches!(err, MapError::SurfaceNotFound(ref s) if s.0 == "sidebar"));
    assert_eq!(renderer.live_maps(), 0);
}

#[test]
fn missing_map_library_is_reported() {
    let synchronizer = MapSynchronizer::default();

    let err = synchronizer
        .mount(SurfaceId::new(SURFACE))
        .err()
        .expect("must fail");

    assert!(matches!(err, MapError::Unavailable(_)));
}

#[test]
fn busy_surface_refuses_second_map() {
    let (_renderer, synchronizer) = setup();
    let _first = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");

    let err = synchronizer
        .mount(SurfaceId::new(SURFACE))
        .err()
        .expect("must fail");

    assert!(matches!(err, MapError::SurfaceInUse(_)));
}

#[test]
fn teardown_frees_surface_for_remount() {
    let (renderer, synchronizer) = setup();
    let handle = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");

    synchronizer.teardown(handle).expect("teardown");
    assert_eq!(renderer.live_maps(), 0);

    let again = synchronizer.mount(SurfaceId::new(SURFACE)).expect("remount");
    assert!(again.is_initialized());
    assert_eq!(renderer.live_maps(), 1);
}

#[test]
fn dropping_handle_releases_map() {
    let (renderer, synchronizer) = setup();
    {
        let _handle = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");
        assert_eq!(renderer.live_maps(), 1);
    }
    assert_eq!(renderer.live_maps(), 0);
}

#[test]
fn uninitialized_handle_skips_sync_and_teardown() {
    let (renderer, synchronizer) = setup();
    let mut handle = synchronizer.attach(SurfaceId::new(SURFACE));

    assert_eq!(synchronizer.sync(&mut handle, &[tiger_record()]), None);
    synchronizer.teardown(handle).expect("nothing to release");
    assert_eq!(renderer.live_maps(), 0);
}

#[test]
fn failed_initialization_rolls_back_map() {
    let renderer = Arc::new(TilelessRenderer(HeadlessMapRenderer::with_surfaces([
        SURFACE,
    ])));
    let synchronizer = MapSynchronizer::new(renderer.clone(), MapSettings::default());
    let mut handle = synchronizer.attach(SurfaceId::new(SURFACE));

    let err = synchronizer.initialize(&mut handle).expect_err("must fail");

    assert!(matches!(err, MapError::Unavailable(_)));
    assert!(!handle.is_initialized());
    assert_eq!(renderer.0.live_maps(), 0);
}

#[test]
fn single_record_becomes_marker_with_popup() {
    let (renderer, synchronizer) = setup();
    let mut handle = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");

    let summary = synchronizer
        .sync(&mut handle, &[tiger_record()])
        .expect("initialized");

    assert_eq!(summary.markers, 1);
    let markers = renderer.markers(handle.map_id().expect("map id"));
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].position, LatLng::new(26.5, 80.9));
    assert_eq!(
        markers[0].popup.to_html(),
        "<b>Panthera tigris</b><br>Locality: Corbett<br>Date: 5/1/2023"
    );
    let Viewport::Fitted(bounds) = summary.viewport else {
        panic!("expected fitted viewport");
    };
    assert!(bounds.contains(LatLng::new(26.5, 80.9)));
}

#[test]
fn marker_count_matches_mappable_records() {
    let (renderer, synchronizer) = setup();
    let mut handle = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");
    let mut no_coords = OccurrenceRecord::new("Panthera tigris");
    no_coords.locality = Some("Unknown".into());
    let records = vec![
        record_at(10.0, 20.0),
        no_coords,
        record_at(95.0, 20.0),
        record_at(0.0, 0.0),
        record_at(-33.9, 151.2),
    ];

    let summary = synchronizer.sync(&mut handle, &records).expect("initialized");

    assert_eq!(summary.markers, 3);
    assert_eq!(renderer.markers(handle.map_id().expect("map id")).len(), 3);
}

#[test]
fn fitted_bounds_are_padded_around_all_markers() {
    let (renderer, synchronizer) = setup();
    let mut handle = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");
    let records = vec![record_at(10.0, 20.0), record_at(30.0, 60.0), record_at(15.0, 45.0)];

    synchronizer.sync(&mut handle, &records).expect("initialized");

    let viewport = renderer
        .viewport(handle.map_id().expect("map id"))
        .expect("live map");
    let Viewport::Fitted(bounds) = viewport else {
        panic!("expected fitted viewport, got {viewport:?}");
    };
    assert!((bounds.south_west.lat - 8.0).abs() < 1e-9);
    assert!((bounds.south_west.lng - 16.0).abs() < 1e-9);
    assert!((bounds.north_east.lat - 32.0).abs() < 1e-9);
    assert!((bounds.north_east.lng - 64.0).abs() < 1e-9);
    for record in &records {
        assert!(bounds.contains(record.position().expect("mappable")));
    }
}

#[test]
fn nothing_mappable_returns_to_default_view() {
    let (renderer, synchronizer) = setup();
    let mut handle = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");
    synchronizer
        .sync(&mut handle, &[record_at(10.0, 20.0), record_at(30.0, 60.0)])
        .expect("initialized");

    let summary = synchronizer
        .sync(&mut handle, &[OccurrenceRecord::new("Panthera tigris")])
        .expect("initialized");

    let map_id = handle.map_id().expect("map id");
    assert_eq!(summary.markers, 0);
    assert_eq!(summary.viewport, default_view());
    assert!(renderer.markers(map_id).is_empty());
    assert_eq!(renderer.viewport(map_id), Some(default_view()));
}

#[test]
fn repeated_sync_produces_same_scene() {
    let (renderer, synchronizer) = setup();
    let mut handle = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");
    let map_id = handle.map_id().expect("map id");
    let records = vec![tiger_record(), record_at(12.0, 77.5)];

    let first = synchronizer.sync(&mut handle, &records);
    let scene = renderer.map(map_id);
    let second = synchronizer.sync(&mut handle, &records);

    assert_eq!(first, second);
    assert_eq!(renderer.map(map_id), scene);
    assert_eq!(renderer.markers(map_id).len(), 2);
}

#[test]
fn custom_settings_drive_default_view_and_padding() {
    let renderer = Arc::new(HeadlessMapRenderer::with_surfaces([SURFACE]));
    let settings = MapSettings {
        default_view: MapView::new(LatLng::new(0.0, 0.0), 2),
        fit_padding: 0.0,
        ..MapSettings::default()
    };
    let synchronizer = MapSynchronizer::new(renderer.clone(), settings);
    let mut handle = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");

    let fitted = synchronizer
        .sync(&mut handle, &[record_at(10.0, 20.0), record_at(30.0, 60.0)])
        .expect("initialized");
    let empty = synchronizer.sync(&mut handle, &[]).expect("initialized");

    assert_eq!(
        fitted.viewport,
        Viewport::Fitted(LatLngBounds {
            south_west: LatLng::new(10.0, 20.0),
            north_east: LatLng::new(30.0, 60.0),
        })
    );
    assert_eq!(
        empty.viewport,
        Viewport::View(MapView::new(LatLng::new(0.0, 0.0), 2))
    );
}

#[test]
fn fitted_viewport_near_the_poles_stays_in_range() {
    let (renderer, synchronizer) = setup();
    let mut handle = synchronizer.mount(SurfaceId::new(SURFACE)).expect("mount");
    let records = vec![record_at(-85.0, -175.0), record_at(89.5, 179.0)];

    let summary = synchronizer.sync(&mut handle, &records).expect("initialized");

    let Viewport::Fitted(bounds) = summary.viewport else {
        panic!("expected fitted viewport");
    };
    assert_eq!(bounds.south_west, LatLng::new(-90.0, -180.0));
    assert_eq!(bounds.north_east, LatLng::new(90.0, 180.0));
    assert_eq!(
        renderer.viewport(handle.map_id().expect("map id")),
        Some(summary.viewport)
    );
}
