use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::choropleth::color_scale::ColorScale;
use crate::collect::global_variables::{
    FILL_PROPERTY, LEGEND_CAPTION, MAP_DESCRIPTION, MAP_HEIGHT_PX, MAP_TITLE, MAP_WIDTH_PX,
    METRIC_COLUMN, NAME_COLUMN, REGION_CODE_PROPERTY, TOOLTIP_NAME_ALIAS, TOOLTIP_VALUE_ALIAS,
};
use crate::geo_core::MapView;
use crate::pipeline::view::DerivedView;

/// Everything the map page needs
#[derive(Debug, Clone)]
pub struct Choropleth {
    pub view: DerivedView,
    pub scale: ColorScale,
    pub map_view: MapView,
    /// Number of codes shared by both inputs
    pub common_codes: usize,
}

impl Choropleth {
    /// Derived view as a FeatureCollection with ud_kodea, Municipio, 2022 and fill
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .view
            .rows
            .iter()
            .map(|row| {
                let mut properties = JsonObject::new();
                properties.insert(
                    REGION_CODE_PROPERTY.to_string(),
                    JsonValue::from(row.region_code.clone()),
                );
                properties.insert(NAME_COLUMN.to_string(), JsonValue::from(row.label.clone()));
                properties.insert(METRIC_COLUMN.to_string(), JsonValue::from(row.value));
                properties.insert(
                    FILL_PROPERTY.to_string(),
                    JsonValue::from(self.scale.hex_at(row.value)),
                );

                Feature {
                    bbox: None,
                    geometry: row.geometry.clone(),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }

    /// Save the FeatureCollection to `<output_path>/<name>.geojson`
    pub fn to_geojson<P: AsRef<Path>>(&self, output_path: P, name: Option<&str>) -> Result<PathBuf> {
        let output_path = output_path.as_ref();
        fs::create_dir_all(output_path).with_context(|| {
            format!("Failed to create output directory: {}", output_path.display())
        })?;

        let name = name.unwrap_or("choropleth");
        let output_file = output_path.join(format!("{}.geojson", name));
        let geojson = GeoJson::FeatureCollection(self.to_feature_collection());
        fs::write(&output_file, geojson.to_string())
            .with_context(|| format!("Failed to write GeoJSON file: {}", output_file.display()))?;

        info!("Choropleth GeoJSON saved to: {}", output_file.display());
        Ok(output_file)
    }

    /// Self-contained Leaflet page: fill per region, hover tooltips, legend
    pub fn to_html(&self) -> Result<String> {
        let geojson = GeoJson::FeatureCollection(self.to_feature_collection()).to_string();
        let stops = serde_json::to_string(&self.scale.hex_stops())
            .context("Failed to serialize legend colors")?;
        let (lat, lon) = self.map_view.center;

        let html = PAGE_TEMPLATE
            .replace("{{TITLE}}", &escape_html(MAP_TITLE))
            .replace("{{DESCRIPTION}}", &escape_html(MAP_DESCRIPTION))
            .replace("{{CAPTION}}", &escape_html(LEGEND_CAPTION))
            .replace("{{WIDTH}}", &MAP_WIDTH_PX.to_string())
            .replace("{{HEIGHT}}", &MAP_HEIGHT_PX.to_string())
            .replace("{{LAT}}", &lat.to_string())
            .replace("{{LON}}", &lon.to_string())
            .replace("{{ZOOM}}", &self.map_view.zoom.to_string())
            .replace("{{VMIN}}", &self.scale.vmin.to_string())
            .replace("{{VMAX}}", &self.scale.vmax.to_string())
            .replace("{{STOPS}}", &stops)
            .replace("{{NAME_KEY}}", NAME_COLUMN)
            .replace("{{VALUE_KEY}}", METRIC_COLUMN)
            .replace("{{NAME_ALIAS}}", &escape_html(TOOLTIP_NAME_ALIAS))
            .replace("{{VALUE_ALIAS}}", &escape_html(TOOLTIP_VALUE_ALIAS))
            .replace("{{COMMON_CODES}}", &self.common_codes.to_string())
            // Last: the data may contain any of the markers above
            .replace("{{GEOJSON}}", &geojson.replace("</", "<\\/"));

        Ok(html)
    }

    /// Save the page to `<output_path>/index.html`
    pub fn save_html<P: AsRef<Path>>(&self, output_path: P) -> Result<PathBuf> {
        let output_path = output_path.as_ref();
        fs::create_dir_all(output_path).with_context(|| {
            format!("Failed to create output directory: {}", output_path.display())
        })?;

        let output_file = output_path.join("index.html");
        fs::write(&output_file, self.to_html()?)
            .with_context(|| format!("Failed to write HTML file: {}", output_file.display()))?;

        info!("Choropleth page saved to: {}", output_file.display());
        Ok(output_file)
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  #map { width: {{WIDTH}}px; height: {{HEIGHT}}px; }
  .legend { background: white; padding: 6px 8px; font: 12px sans-serif; }
  .legend .bar { width: 200px; height: 10px; }
</style>
</head>
<body>
<h1>{{TITLE}}</h1>
<p>{{DESCRIPTION}}</p>
<div id="map"></div>
<p>Número de combinaciones de códigos con datos de 2022: {{COMMON_CODES}}</p>
<script>
  var data = {{GEOJSON}};
  var stops = {{STOPS}};
  // Data values go through textContent, never straight into tooltip markup
  function escapeText(value) {
    var span = document.createElement('span');
    span.textContent = String(value);
    return span.innerHTML;
  }
  var map = L.map('map').setView([{{LAT}}, {{LON}}], {{ZOOM}});
  L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
    attribution: '&copy; OpenStreetMap contributors'
  }).addTo(map);
  L.geoJSON(data, {
    style: function (feature) {
      return {
        fillColor: feature.properties['fill'],
        fillOpacity: 0.7,
        color: '#000000',
        opacity: 0.2,
        weight: 1
      };
    },
    onEachFeature: function (feature, layer) {
      var p = feature.properties;
      layer.bindTooltip(
        '<b>{{NAME_ALIAS}}</b> ' + escapeText(p['{{NAME_KEY}}']) +
        '<br><b>{{VALUE_ALIAS}}</b> ' + Number(p['{{VALUE_KEY}}']).toLocaleString()
      );
    }
  }).addTo(map);
  var legend = L.control({ position: 'topright' });
  legend.onAdd = function () {
    var div = L.DomUtil.create('div', 'legend');
    div.innerHTML = '<div>{{CAPTION}}</div>' +
      '<div class="bar" style="background: linear-gradient(to right, ' + stops.join(', ') + ')"></div>' +
      '<div>{{VMIN}} &ndash; {{VMAX}}</div>';
    return div;
  };
  legend.addTo(map);
</script>
</body>
</html>
"#;
