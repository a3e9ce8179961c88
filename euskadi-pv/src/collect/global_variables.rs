use std::path::PathBuf;

pub const OUTPUT_PATH: &str = "./output";

/// Statistics CSV shipped next to the dashboard
pub const DEFAULT_CSV_PATH: &str = "data copy.csv";
/// Municipal boundaries of Euskadi
pub const DEFAULT_GEOJSON_PATH: &str = "euskadi.geojson";
/// Encoding of the statistics CSV (resolved by encoding_rs, latin1 -> windows-1252)
pub const DEFAULT_ENCODING: &str = "latin1";

/// CSV headers (fixed schema)
pub const CODE_COLUMN: &str = "Codigo municipio";
pub const NAME_COLUMN: &str = "Municipio";
pub const METRIC_COLUMN: &str = "2022";

/// GeoJSON property holding the municipality code
pub const REGION_CODE_PROPERTY: &str = "ud_kodea";
/// Property carrying the fill color in the exported FeatureCollection
pub const FILL_PROPERTY: &str = "fill";

pub const MAP_TITLE: &str = "Potencia Fotovoltaica en Municipios de Euskadi";
pub const MAP_DESCRIPTION: &str =
    "Mapa que muestra la potencia fotovoltaica instalada (kW por 10,000 habitantes) en 2022";
pub const LEGEND_CAPTION: &str = "Potencia Fotovoltaica (kW por 10,000 habitantes)";
pub const TOOLTIP_NAME_ALIAS: &str = "Municipio:";
pub const TOOLTIP_VALUE_ALIAS: &str = "Potencia Fotovoltaica:";

/// Map centre used when the view carries no geometry (lat, lon)
pub const DEFAULT_MAP_CENTER: (f64, f64) = (42.9, -2.5);
pub const DEFAULT_MAP_ZOOM: u8 = 8;

pub fn get_output_path() -> PathBuf {
    PathBuf::from(OUTPUT_PATH)
}

/// Size of the rendered map in pixels
pub const MAP_WIDTH_PX: u32 = 700;
pub const MAP_HEIGHT_PX: u32 = 500;
