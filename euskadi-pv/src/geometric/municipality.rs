use anyhow::{Context, Result};
use geojson::{Feature as GeoJsonFeature, GeoJson, Geometry, JsonObject, JsonValue};
use log::info;
use std::path::Path;

use crate::collect::global_variables::REGION_CODE_PROPERTY;
use crate::commons::basic_functions::normalize_region_code;

/// One municipality boundary from the GeoJSON file
#[derive(Debug, Clone, PartialEq)]
pub struct Municipality {
    /// Normalized `ud_kodea` (trimmed)
    pub region_code: String,
    /// Polygon / MultiPolygon, passed through untouched
    pub geometry: Option<Geometry>,
    /// Remaining feature properties
    pub properties: JsonObject,
}

/// Ordered collection of municipality boundaries
#[derive(Debug, Clone, Default)]
pub struct MunicipalityCollection {
    pub municipalities: Vec<Municipality>,
}

impl MunicipalityCollection {
    /// Load boundaries from a GeoJSON file
    /// Any I/O or parse failure is fatal: there is no partial fallback.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read GeoJSON file: {}", path.display()))?;
        let collection = Self::from_geojson(&bytes)
            .with_context(|| format!("Invalid boundary file: {}", path.display()))?;

        info!(
            "Loaded {} municipality boundaries from {}",
            collection.len(),
            path.display()
        );
        Ok(collection)
    }

    /// Load boundaries from GeoJSON bytes (FeatureCollection or a single Feature)
    pub fn from_geojson(geojson_data: &[u8]) -> Result<Self> {
        let geojson_str =
            std::str::from_utf8(geojson_data).context("GeoJSON data is not valid UTF-8")?;
        let geojson: GeoJson = geojson_str.parse().context("Failed to parse GeoJSON")?;

        let features = match geojson {
            GeoJson::FeatureCollection(fc) => fc.features,
            GeoJson::Feature(f) => vec![f],
            GeoJson::Geometry(_) => {
                anyhow::bail!("GeoJSON must be a Feature or FeatureCollection");
            }
        };

        let municipalities = features
            .into_iter()
            .enumerate()
            .map(|(idx, feature)| {
                Self::feature_to_municipality(feature)
                    .with_context(|| format!("Malformed feature at index {}", idx))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MunicipalityCollection { municipalities })
    }

    fn feature_to_municipality(feature: GeoJsonFeature) -> Result<Municipality> {
        let mut properties = feature.properties.unwrap_or_default();
        let raw_code = properties
            .remove(REGION_CODE_PROPERTY)
            .with_context(|| format!("Feature has no '{}' property", REGION_CODE_PROPERTY))?;
        let region_code = normalize_region_code(&property_to_string(&raw_code)?);

        Ok(Municipality {
            region_code,
            geometry: feature.geometry,
            properties,
        })
    }

    pub fn len(&self) -> usize {
        self.municipalities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.municipalities.is_empty()
    }

    pub fn municipalities(&self) -> &[Municipality] {
        &self.municipalities
    }

    /// Iterate over the normalized region codes
    pub fn region_codes(&self) -> impl Iterator<Item = &str> {
        self.municipalities.iter().map(|m| m.region_code.as_str())
    }
}

/// Cast a property value to its string form
fn property_to_string(value: &JsonValue) -> Result<String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        JsonValue::Bool(b) => Ok(b.to_string()),
        JsonValue::Null => anyhow::bail!("'{}' is null", REGION_CODE_PROPERTY),
        other => anyhow::bail!("'{}' has unsupported value {}", REGION_CODE_PROPERTY, other),
    }
}
