// Example: join inline statistics onto inline boundaries and export the map
use anyhow::Result;
use euskadi_pv::collect::stats_csv::parse_stats_csv;
use euskadi_pv::geometric::municipality::MunicipalityCollection;
use euskadi_pv::{Pipeline, PipelineConfig, PipelineInputs, ThousandsSeparator};

fn main() -> Result<()> {
    println!("=== Example: choropleth from GeoJSON ===\n");

    let geojson_data = r#"
    {
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ud_kodea": "01059" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-2.8, 42.8], [-2.6, 42.8], [-2.6, 42.9], [-2.8, 42.8]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ud_kodea": "48020" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-3.0, 43.2], [-2.9, 43.2], [-2.9, 43.3], [-3.0, 43.2]]]
                }
            }
        ]
    }
    "#;
    let csv_data = "Codigo municipio;Municipio;2022\n1059;Vitoria-Gasteiz;1.234,5\n48020;Bilbao;48,0\n";

    // The sample uses '.' as thousands separator
    let config = PipelineConfig {
        thousands_separator: ThousandsSeparator::Period,
        ..PipelineConfig::default()
    };
    let inputs = PipelineInputs {
        stats: parse_stats_csv(
            csv_data.as_bytes(),
            encoding_rs::UTF_8,
            config.thousands_separator,
        )?,
        municipalities: MunicipalityCollection::from_geojson(geojson_data.as_bytes())?,
    };

    let pipeline = Pipeline::new(config);
    let choropleth = pipeline.run(&inputs)?;

    for row in &choropleth.view.rows {
        println!(
            "  {} ({}): {} -> {}",
            row.label,
            row.region_code,
            row.value,
            choropleth.scale.hex_at(row.value)
        );
    }
    println!(
        "\nMap centre: {:?}, zoom {}",
        choropleth.map_view.center, choropleth.map_view.zoom
    );

    choropleth.to_geojson("./output", None)?;
    choropleth.save_html("./output")?;

    Ok(())
}
