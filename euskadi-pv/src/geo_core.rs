use geo::BoundingRect;
use log::debug;

use crate::collect::global_variables::{
    DEFAULT_MAP_CENTER, DEFAULT_MAP_ZOOM, MAP_HEIGHT_PX, MAP_WIDTH_PX,
};

/// Bounding box structure (WGS84 degrees)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64, // min longitude
    pub min_y: f64, // min latitude
    pub max_x: f64, // max longitude
    pub max_y: f64, // max latitude
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn from_rect(rect: geo::Rect<f64>) -> Self {
        BoundingBox::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    /// Smallest box covering both
    pub fn union(&self, other: &BoundingBox) -> Self {
        BoundingBox::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Centre as (lat, lon), the order Leaflet expects
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_y + self.max_y) / 2.0,
            (self.min_x + self.max_x) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Bounding box of a set of GeoJSON geometries
    /// Geometries that cannot be converted to geo types are skipped.
    pub fn of_geometries<'a, I>(geometries: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a geojson::Geometry>,
    {
        geometries
            .into_iter()
            .filter_map(|geometry| {
                let geo_geom: geo::Geometry<f64> = match geometry.try_into() {
                    Ok(g) => g,
                    Err(e) => {
                        debug!("Skipping geometry in bounds computation: {}", e);
                        return None;
                    }
                };
                geo_geom.bounding_rect().map(BoundingBox::from_rect)
            })
            .reduce(|acc, bbox| acc.union(&bbox))
    }
}

/// Initial map position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    /// (lat, lon)
    pub center: (f64, f64),
    pub zoom: u8,
    pub bbox: Option<BoundingBox>,
}

impl Default for MapView {
    fn default() -> Self {
        MapView {
            center: DEFAULT_MAP_CENTER,
            zoom: DEFAULT_MAP_ZOOM,
            bbox: None,
        }
    }
}

impl MapView {
    /// Fit the map on a bounding box, or fall back to the Euskadi default view
    pub fn fit(bbox: Option<BoundingBox>) -> Self {
        match bbox {
            Some(bbox) => MapView {
                center: bbox.center(),
                zoom: Self::zoom_for(&bbox),
                bbox: Some(bbox),
            },
            None => MapView::default(),
        }
    }

    /// Highest web-mercator zoom level (1..=18) at which the box fits the map size
    /// Uses the equirectangular approximation for the latitude span.
    fn zoom_for(bbox: &BoundingBox) -> u8 {
        let zoom_for_span = |span: f64, pixels: u32| -> f64 {
            if span <= 0.0 {
                return 18.0;
            }
            (360.0 * pixels as f64 / (256.0 * span)).log2().floor()
        };
        let zoom = zoom_for_span(bbox.width(), MAP_WIDTH_PX)
            .min(zoom_for_span(bbox.height(), MAP_HEIGHT_PX));
        zoom.clamp(1.0, 18.0) as u8
    }
}
