use shared::domain::LatLng;

/// Axis-aligned lat/lng rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn from_point(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Smallest bounds holding every point, `None` for an empty input.
    pub fn enclosing(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::from_point(points.next()?);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Grows every side by `ratio` times the span of its axis, clamped to the
    /// geographic range.
    pub fn pad(&self, ratio: f64) -> Self {
        let lat_buffer = (self.north_east.lat - self.south_west.lat).abs() * ratio;
        let lng_buffer = (self.north_east.lng - self.south_west.lng).abs() * ratio;
        Self {
            south_west: clamped(
                self.south_west.lat - lat_buffer,
                self.south_west.lng - lng_buffer,
            ),
            north_east: clamped(
                self.north_east.lat + lat_buffer,
                self.north_east.lng + lng_buffer,
            ),
        }
    }

    pub fn contains(&self, point: LatLng) -> bool {
        (self.south_west.lat..=self.north_east.lat).contains(&point.lat)
            && (self.south_west.lng..=self.north_east.lng).contains(&point.lng)
    }
}

fn clamped(lat: f64, lng: f64) -> LatLng {
    LatLng::new(lat.clamp(-90.0, 90.0), lng.clamp(-180.0, 180.0))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

impl MapView {
    pub const fn new(center: LatLng, zoom: u8) -> Self {
        Self { center, zoom }
    }
}

/// What the map was last told to show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    View(MapView),
    Fitted(LatLngBounds),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosing_covers_all_points() {
        let points = [
            LatLng::new(10.0, 20.0),
            LatLng::new(30.0, 60.0),
            LatLng::new(-5.0, 40.0),
        ];
        let bounds = LatLngBounds::enclosing(points).expect("bounds");
        assert_eq!(bounds.south_west, LatLng::new(-5.0, 20.0));
        assert_eq!(bounds.north_east, LatLng::new(30.0, 60.0));
        assert!(points.iter().all(|p| bounds.contains(*p)));
        assert!(LatLngBounds::enclosing(std::iter::empty()).is_none());
    }

    #[test]
    fn pad_grows_each_side_by_span_ratio() {
        let bounds = LatLngBounds {
            south_west: LatLng::new(10.0, 20.0),
            north_east: LatLng::new(30.0, 60.0),
        };
        let padded = bounds.pad(0.1);
        assert!((padded.south_west.lat - 8.0).abs() < 1e-9);
        assert!((padded.south_west.lng - 16.0).abs() < 1e-9);
        assert!((padded.north_east.lat - 32.0).abs() < 1e-9);
        assert!((padded.north_east.lng - 64.0).abs() < 1e-9);
    }

    #[test]
    fn padding_stays_inside_geographic_range() {
        let bounds = LatLngBounds {
            south_west: LatLng::new(-80.0, -170.0),
            north_east: LatLng::new(80.0, 170.0),
        };
        let padded = bounds.pad(0.1);
        assert_eq!(padded.south_west, LatLng::new(-90.0, -180.0));
        assert_eq!(padded.north_east, LatLng::new(90.0, 180.0));
        assert!(padded.south_west.is_valid() && padded.north_east.is_valid());
    }

    #[test]
    fn single_point_pads_to_itself() {
        let point = LatLng::new(26.5, 80.9);
        let padded = LatLngBounds::from_point(point).pad(0.1);
        assert_eq!(padded, LatLngBounds::from_point(point));
        assert!(padded.contains(point));
    }
}
