use std::fmt;

use shared::domain::LatLng;
use thiserror::Error;

use super::{
    geo::{LatLngBounds, MapView},
    popup::MarkerPopup,
};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name(pub u64);
    };
}

id_newtype!(MapId);
id_newtype!(LayerId);

/// Drawing surface a map is bound to, e.g. a container element id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub String);

impl SurfaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".into(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub popup: MarkerPopup,
}

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map renderer is unavailable: {0}")]
    Unavailable(String),
    #[error("drawing surface {0} does not exist")]
    SurfaceNotFound(SurfaceId),
    #[error("drawing surface {0} already hosts a map")]
    SurfaceInUse(SurfaceId),
    #[error("map {0:?} is not live")]
    UnknownMap(MapId),
}

/// Capabilities the map library has to provide.
///
/// Resource operations (creating and destroying maps and layers) can fail and
/// report it. Scene updates on a live map cannot.
pub trait MapRenderer: Send + Sync {
    fn create_map(&self, surface: &SurfaceId, initial: MapView) -> Result<MapId, MapError>;
    fn add_tile_layer(&self, map: MapId, layer: &TileLayer) -> Result<LayerId, MapError>;
    fn create_layer_group(&self, map: MapId) -> Result<LayerId, MapError>;
    fn clear_layer_group(&self, map: MapId, group: LayerId);
    fn add_marker(&self, map: MapId, group: LayerId, marker: MarkerSpec);
    fn fit_bounds(&self, map: MapId, bounds: LatLngBounds);
    fn set_view(&self, map: MapId, view: MapView);
    fn destroy_map(&self, map: MapId) -> Result<(), MapError>;
}

pub struct MissingMapRenderer;

impl MapRenderer for MissingMapRenderer {
    fn create_map(&self, surface: &SurfaceId, _initial: MapView) -> Result<MapId, MapError> {
        Err(MapError::Unavailable(format!(
            "no map library loaded for surface {surface}"
        )))
    }

    fn add_tile_layer(&self, map: MapId, _layer: &TileLayer) -> Result<LayerId, MapError> {
        Err(MapError::UnknownMap(map))
    }

    fn create_layer_group(&self, map: MapId) -> Result<LayerId, MapError> {
        Err(MapError::UnknownMap(map))
    }

    fn clear_layer_group(&self, _map: MapId, _group: LayerId) {}

    fn add_marker(&self, _map: MapId, _group: LayerId, _marker: MarkerSpec) {}

    fn fit_bounds(&self, _map: MapId, _bounds: LatLngBounds) {}

    fn set_view(&self, _map: MapId, _view: MapView) {}

    fn destroy_map(&self, map: MapId) -> Result<(), MapError> {
        Err(MapError::UnknownMap(map))
    }
}
