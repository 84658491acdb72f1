use std::{fs, io::ErrorKind, path::Path, str::FromStr};

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::domain::LatLng;
use tracing::warn;
use url::Url;

use crate::{
    display::{is_valid_date_format, DEFAULT_DATE_FORMAT},
    map::{MapSettings, MapView, TileLayer, DEFAULT_FIT_PADDING},
};

pub const SETTINGS_FILE: &str = "species_map.toml";
const MAX_ZOOM: u8 = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub api_base_url: String,
    pub default_center_lat: f64,
    pub default_center_lon: f64,
    pub default_zoom: u8,
    pub fit_padding: f64,
    pub tile_url: String,
    pub tile_attribution: String,
    pub date_format: String,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        let tiles = TileLayer::default();
        Self {
            api_base_url: "http://127.0.0.1:8000".into(),
            default_center_lat: 20.0,
            default_center_lon: 85.0,
            default_zoom: 5,
            fit_padding: DEFAULT_FIT_PADDING,
            tile_url: tiles.url_template,
            tile_attribution: tiles.attribution,
            date_format: DEFAULT_DATE_FORMAT.into(),
            log_filter: "info".into(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_base_url: Option<String>,
    default_center_lat: Option<f64>,
    default_center_lon: Option<f64>,
    default_zoom: Option<u8>,
    fit_padding: Option<f64>,
    tile_url: Option<String>,
    tile_attribution: Option<String>,
    date_format: Option<String>,
    log_filter: Option<String>,
}

/// Defaults, then `species_map.toml` in the working directory, then the
/// process environment.
pub fn load_settings() -> Result<Settings> {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// A missing file is not an error; an unreadable or malformed one is.
pub fn load_settings_from(
    path: &Path,
    env: impl Fn(&str) -> Option<String>,
) -> Result<Settings> {
    let mut settings = Settings::default();

    match fs::read_to_string(path) {
        Ok(raw) => {
            let file_cfg: FileSettings = toml::from_str(&raw)
                .with_context(|| format!("invalid settings file '{}'", path.display()))?;
            settings.apply_file(file_cfg);
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read settings file '{}'", path.display()))
        }
    }

    settings.apply_env(&env);
    Ok(settings)
}

impl Settings {
    pub fn api_base_url(&self) -> Result<Url> {
        Url::parse(&self.api_base_url)
            .with_context(|| format!("invalid api base url '{}'", self.api_base_url))
    }

    pub fn default_view(&self) -> MapView {
        MapView::new(
            LatLng::new(self.default_center_lat, self.default_center_lon),
            self.default_zoom,
        )
    }

    pub fn map_settings(&self) -> MapSettings {
        MapSettings {
            default_view: self.default_view(),
            fit_padding: self.fit_padding,
            tile_layer: TileLayer {
                url_template: self.tile_url.clone(),
                attribution: self.tile_attribution.clone(),
            },
            date_format: self.date_format.clone(),
        }
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.api_base_url {
            self.api_base_url = v;
        }
        if let Some(v) = file.default_center_lat {
            self.set_center_lat(v);
        }
        if let Some(v) = file.default_center_lon {
            self.set_center_lon(v);
        }
        if let Some(v) = file.default_zoom {
            self.set_zoom(v);
        }
        if let Some(v) = file.fit_padding {
            self.set_fit_padding(v);
        }
        if let Some(v) = file.tile_url {
            self.tile_url = v;
        }
        if let Some(v) = file.tile_attribution {
            self.tile_attribution = v;
        }
        if let Some(v) = file.date_format {
            self.set_date_format(v);
        }
        if let Some(v) = file.log_filter {
            self.log_filter = v;
        }
    }

    fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("SPECIES_API_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = env("APP__API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = parsed_env(env, "APP__DEFAULT_CENTER_LAT") {
            self.set_center_lat(v);
        }
        if let Some(v) = parsed_env(env, "APP__DEFAULT_CENTER_LON") {
            self.set_center_lon(v);
        }
        if let Some(v) = parsed_env(env, "APP__DEFAULT_ZOOM") {
            self.set_zoom(v);
        }
        if let Some(v) = parsed_env(env, "APP__FIT_PADDING") {
            self.set_fit_padding(v);
        }
        if let Some(v) = env("APP__TILE_URL") {
            self.tile_url = v;
        }
        if let Some(v) = env("APP__DATE_FORMAT") {
            self.set_date_format(v);
        }
        if let Some(v) = env("APP__LOG_FILTER") {
            self.log_filter = v;
        }
    }

    fn set_center_lat(&mut self, lat: f64) {
        if lat.is_finite() && (-90.0..=90.0).contains(&lat) {
            self.default_center_lat = lat;
        } else {
            warn!(lat, "ignoring out-of-range default center latitude");
        }
    }

    fn set_center_lon(&mut self, lon: f64) {
        if lon.is_finite() && (-180.0..=180.0).contains(&lon) {
            self.default_center_lon = lon;
        } else {
            warn!(lon, "ignoring out-of-range default center longitude");
        }
    }

    fn set_zoom(&mut self, zoom: u8) {
        if zoom <= MAX_ZOOM {
            self.default_zoom = zoom;
        } else {
            warn!(zoom, max = MAX_ZOOM, "ignoring default zoom above maximum");
        }
    }

    fn set_fit_padding(&mut self, padding: f64) {
        if padding.is_finite() && padding >= 0.0 {
            self.fit_padding = padding;
        } else {
            warn!(padding, "ignoring negative or non-finite fit padding");
        }
    }

    fn set_date_format(&mut self, format: String) {
        if is_valid_date_format(&format) {
            self.date_format = format;
        } else {
            warn!(format = %format, "ignoring invalid date format");
        }
    }
}

fn parsed_env<T: FromStr>(env: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = env(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparseable setting");
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
