//! In-memory [`MapRenderer`] that keeps the scene as plain data.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use tracing::debug;

use super::{
    geo::{LatLngBounds, MapView, Viewport},
    renderer::{LayerId, MapError, MapId, MapRenderer, MarkerSpec, SurfaceId, TileLayer},
};

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessMap {
    pub surface: SurfaceId,
    pub viewport: Viewport,
    pub tile_layers: Vec<(LayerId, TileLayer)>,
    pub layer_groups: Vec<(LayerId, Vec<MarkerSpec>)>,
}

impl HeadlessMap {
    pub fn markers(&self) -> Vec<MarkerSpec> {
        self.layer_groups
            .iter()
            .flat_map(|(_, markers)| markers.iter().cloned())
            .collect()
    }

    fn group_mut(&mut self, group: LayerId) -> Option<&mut Vec<MarkerSpec>> {
        self.layer_groups
            .iter_mut()
            .find(|(id, _)| *id == group)
            .map(|(_, markers)| markers)
    }
}

#[derive(Default)]
struct Scene {
    next_id: u64,
    surfaces: HashMap<SurfaceId, Option<MapId>>,
    maps: HashMap<MapId, HeadlessMap>,
}

impl Scene {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn live_map(&mut self, map: MapId) -> Result<&mut HeadlessMap, MapError> {
        self.maps.get_mut(&map).ok_or(MapError::UnknownMap(map))
    }
}

#[derive(Default)]
pub struct HeadlessMapRenderer {
    scene: Mutex<Scene>,
}

impl HeadlessMapRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_surfaces<I, S>(surfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let renderer = Self::new();
        for surface in surfaces {
            renderer.register_surface(SurfaceId::new(surface));
        }
        renderer
    }

    pub fn register_surface(&self, surface: SurfaceId) {
        self.scene().surfaces.entry(surface).or_insert(None);
    }

    pub fn map(&self, map: MapId) -> Option<HeadlessMap> {
        self.scene().maps.get(&map).cloned()
    }

    pub fn markers(&self, map: MapId) -> Vec<MarkerSpec> {
        self.map(map).map(|m| m.markers()).unwrap_or_default()
    }

    pub fn viewport(&self, map: MapId) -> Option<Viewport> {
        self.scene().maps.get(&map).map(|m| m.viewport)
    }

    pub fn live_maps(&self) -> usize {
        self.scene().maps.len()
    }

    fn scene(&self) -> MutexGuard<'_, Scene> {
        self.scene.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MapRenderer for HeadlessMapRenderer {
    fn create_map(&self, surface: &SurfaceId, initial: MapView) -> Result<MapId, MapError> {
        let mut scene = self.scene();
        match scene.surfaces.get(surface) {
            None => return Err(MapError::SurfaceNotFound(surface.clone())),
            Some(Some(_)) => return Err(MapError::SurfaceInUse(surface.clone())),
            Some(None) => {}
        }
        let map = MapId(scene.next_id());
        scene.surfaces.insert(surface.clone(), Some(map));
        scene.maps.insert(
            map,
            HeadlessMap {
                surface: surface.clone(),
                viewport: Viewport::View(initial),
                tile_layers: Vec::new(),
                layer_groups: Vec::new(),
            },
        );
        Ok(map)
    }

    fn add_tile_layer(&self, map: MapId, layer: &TileLayer) -> Result<LayerId, MapError> {
        let mut scene = self.scene();
        let id = LayerId(scene.next_id());
        scene.live_map(map)?.tile_layers.push((id, layer.clone()));
        Ok(id)
    }

    fn create_layer_group(&self, map: MapId) -> Result<LayerId, MapError> {
        let mut scene = self.scene();
        let id = LayerId(scene.next_id());
        scene.live_map(map)?.layer_groups.push((id, Vec::new()));
        Ok(id)
    }

    fn clear_layer_group(&self, map: MapId, group: LayerId) {
        let mut scene = self.scene();
        match scene.live_map(map).ok().and_then(|m| m.group_mut(group)) {
            Some(markers) => markers.clear(),
            None => debug!(?map, ?group, "clear on unknown layer group ignored"),
        }
    }

    fn add_marker(&self, map: MapId, group: LayerId, marker: MarkerSpec) {
        let mut scene = self.scene();
        match scene.live_map(map).ok().and_then(|m| m.group_mut(group)) {
            Some(markers) => markers.push(marker),
            None => debug!(?map, ?group, "marker for unknown layer group ignored"),
        }
    }

    fn fit_bounds(&self, map: MapId, bounds: LatLngBounds) {
        if let Ok(live) = self.scene().live_map(map) {
            live.viewport = Viewport::Fitted(bounds);
        }
    }

    fn set_view(&self, map: MapId, view: MapView) {
        if let Ok(live) = self.scene().live_map(map) {
            live.viewport = Viewport::View(view);
        }
    }

    fn destroy_map(&self, map: MapId) -> Result<(), MapError> {
        let mut scene = self.scene();
        let removed = scene.maps.remove(&map).ok_or(MapError::UnknownMap(map))?;
        scene.surfaces.insert(removed.surface, None);
        Ok(())
    }
}
