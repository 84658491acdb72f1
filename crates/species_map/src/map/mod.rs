//! Projection of an occurrence record sequence onto a live map.

pub mod geo;
pub mod headless;
pub mod popup;
pub mod renderer;

use std::sync::Arc;

use shared::domain::{LatLng, OccurrenceRecord};
use tracing::{debug, info, warn};

pub use geo::{LatLngBounds, MapView, Viewport};
pub use headless::{HeadlessMap, HeadlessMapRenderer};
pub use popup::MarkerPopup;
pub use renderer::{
    LayerId, MapError, MapId, MapRenderer, MarkerSpec, MissingMapRenderer, SurfaceId, TileLayer,
};

use crate::display::DEFAULT_DATE_FORMAT;

pub const DEFAULT_FIT_PADDING: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    /// Shown on mount and whenever nothing is mappable.
    pub default_view: MapView,
    pub fit_padding: f64,
    pub tile_layer: TileLayer,
    pub date_format: String,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_view: MapView::new(LatLng::new(20.0, 85.0), 5),
            fit_padding: DEFAULT_FIT_PADDING,
            tile_layer: TileLayer::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct MountedMap {
    map: MapId,
    markers: LayerId,
}

/// A map bound to one drawing surface.
///
/// Dropping an initialized handle destroys its map; use
/// [`MapSynchronizer::teardown`] to observe destruction errors.
pub struct MapHandle {
    surface: SurfaceId,
    renderer: Arc<dyn MapRenderer>,
    mounted: Option<MountedMap>,
}

impl MapHandle {
    pub fn surface(&self) -> &SurfaceId {
        &self.surface
    }

    pub fn map_id(&self) -> Option<MapId> {
        self.mounted.map(|m| m.map)
    }

    pub fn is_initialized(&self) -> bool {
        self.mounted.is_some()
    }
}

impl Drop for MapHandle {
    fn drop(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            if let Err(err) = self.renderer.destroy_map(mounted.map) {
                warn!(surface = %self.surface, error = %err, "failed to release map on drop");
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncSummary {
    pub markers: usize,
    pub viewport: Viewport,
}

pub struct MapSynchronizer {
    renderer: Arc<dyn MapRenderer>,
    settings: MapSettings,
}

impl Default for MapSynchronizer {
    fn default() -> Self {
        Self::new(Arc::new(MissingMapRenderer), MapSettings::default())
    }
}

impl MapSynchronizer {
    pub fn new(renderer: Arc<dyn MapRenderer>, settings: MapSettings) -> Self {
        Self { renderer, settings }
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Handle for `surface` with no map created yet.
    pub fn attach(&self, surface: SurfaceId) -> MapHandle {
        MapHandle {
            surface,
            renderer: Arc::clone(&self.renderer),
            mounted: None,
        }
    }

    /// Creates the map, its base tiles and its marker group. No-op when the
    /// handle is already initialized.
    pub fn initialize(&self, handle: &mut MapHandle) -> Result<(), MapError> {
        if handle.mounted.is_some() {
            return Ok(());
        }

        let renderer = &handle.renderer;
        let map = renderer.create_map(&handle.surface, self.settings.default_view)?;
        let markers = renderer
            .add_tile_layer(map, &self.settings.tile_layer)
            .and_then(|_| renderer.create_layer_group(map));
        let markers = match markers {
            Ok(markers) => markers,
            Err(err) => {
                if let Err(cleanup) = renderer.destroy_map(map) {
                    warn!(
                        surface = %handle.surface,
                        error = %cleanup,
                        "failed to release half-built map"
                    );
                }
                return Err(err);
            }
        };

        handle.mounted = Some(MountedMap { map, markers });
        info!(surface = %handle.surface, map = map.0, "map initialized");
        Ok(())
    }

    pub fn mount(&self, surface: SurfaceId) -> Result<MapHandle, MapError> {
        let mut handle = self.attach(surface);
        self.initialize(&mut handle)?;
        Ok(handle)
    }

    /// Replaces every marker with the mappable subset of `records` and moves
    /// the viewport to fit them, or back to the default view when none are
    /// mappable. Returns `None` for a handle that was never initialized.
    pub fn sync(
        &self,
        handle: &mut MapHandle,
        records: &[OccurrenceRecord],
    ) -> Option<SyncSummary> {
        let Some(MountedMap { map, markers }) = handle.mounted else {
            debug!(surface = %handle.surface, "sync skipped: map not initialized");
            return None;
        };
        let renderer = &handle.renderer;

        renderer.clear_layer_group(map, markers);

        let mut positions = Vec::new();
        for record in records {
            let Some(position) = record.position() else {
                continue;
            };
            renderer.add_marker(
                map,
                markers,
                MarkerSpec {
                    position,
                    popup: MarkerPopup::for_record(record, &self.settings.date_format),
                },
            );
            positions.push(position);
        }

        let viewport = match LatLngBounds::enclosing(positions.iter().copied()) {
            Some(bounds) => {
                let padded = bounds.pad(self.settings.fit_padding);
                renderer.fit_bounds(map, padded);
                Viewport::Fitted(padded)
            }
            None => {
                renderer.set_view(map, self.settings.default_view);
                Viewport::View(self.settings.default_view)
            }
        };

        debug!(
            surface = %handle.surface,
            records = records.len(),
            markers = positions.len(),
            "map synced"
        );
        Some(SyncSummary {
            markers: positions.len(),
            viewport,
        })
    }

    /// Destroys the handle's map. Consuming the handle keeps this to one call.
    pub fn teardown(&self, mut handle: MapHandle) -> Result<(), MapError> {
        let Some(mounted) = handle.mounted.take() else {
            return Ok(());
        };
        handle.renderer.destroy_map(mounted.map)?;
        info!(surface = %handle.surface, map = mounted.map.0, "map released");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/map_tests.rs"]
mod tests;
