pub mod config;
pub mod join;
pub mod view;

use anyhow::Result;
use log::{error, info, warn};
use std::path::Path;

use crate::choropleth::color_scale::ColorScale;
use crate::choropleth::export::Choropleth;
use crate::collect::global_variables::LEGEND_CAPTION;
use crate::collect::stats_csv::{load_stats_csv, StatsRecord};
use crate::error::PipelineError;
use crate::geo_core::{BoundingBox, MapView};
use crate::geometric::municipality::MunicipalityCollection;

use self::config::PipelineConfig;
use self::join::{left_join, JoinResult};
use self::view::DerivedView;

/// Both input tables, loaded once and passed to every stage
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub stats: Vec<StatsRecord>,
    pub municipalities: MunicipalityCollection,
}

/// Load -> normalize -> join -> filter, configured once
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Read the statistics CSV and the boundary file
    /// Either file missing or malformed aborts the run.
    pub fn load_inputs<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        csv_path: P,
        geojson_path: Q,
    ) -> Result<PipelineInputs> {
        let stats = load_stats_csv(csv_path, &self.config)?;
        let municipalities = MunicipalityCollection::from_path(geojson_path)?;
        Ok(PipelineInputs {
            stats,
            municipalities,
        })
    }

    /// Join the statistics onto the boundaries
    pub fn join(&self, inputs: &PipelineInputs) -> Result<JoinResult, PipelineError> {
        let result = left_join(&inputs.municipalities, &inputs.stats).inspect_err(|err| {
            error!("{}", err);
        })?;
        info!(
            "Joined {} statistics rows onto {} boundaries ({} rows, {} common codes)",
            inputs.stats.len(),
            inputs.municipalities.len(),
            result.rows.len(),
            result.common_codes.len()
        );
        Ok(result)
    }

    /// Run the whole pipeline and assemble the choropleth data
    /// `NoCommonCodes` and `EmptyView` are reported, never panicked on.
    pub fn run(&self, inputs: &PipelineInputs) -> Result<Choropleth, PipelineError> {
        let joined = self.join(inputs)?;
        let view = DerivedView::build(&joined.rows, self.config.exclude_zero);

        let Some((vmin, vmax)) = view.bounds() else {
            let err = PipelineError::EmptyView;
            warn!("{}", err);
            return Err(err);
        };
        info!(
            "Derived view: {} of {} rows, 2022 values in [{}, {}]",
            view.len(),
            joined.rows.len(),
            vmin,
            vmax
        );

        let scale = ColorScale::new(self.config.color_order, vmin, vmax, LEGEND_CAPTION);
        let map_view = MapView::fit(BoundingBox::of_geometries(
            view.rows.iter().filter_map(|row| row.geometry.as_ref()),
        ));

        Ok(Choropleth {
            view,
            scale,
            map_view,
            common_codes: joined.common_codes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometric::municipality::Municipality;
    use super::config::ColorOrder;
    use geojson::JsonObject;

    fn square(x: f64, y: f64) -> geojson::Geometry {
        geojson::Geometry::new(geojson::Value::Polygon(vec![vec![
            vec![x, y],
            vec![x + 0.1, y],
            vec![x + 0.1, y + 0.1],
            vec![x, y + 0.1],
            vec![x, y],
        ]]))
    }

    fn inputs(values: &[(&str, Option<f64>)]) -> PipelineInputs {
        let municipalities = MunicipalityCollection {
            municipalities: ["01001", "01002", "01003", "01004"]
                .iter()
                .enumerate()
                .map(|(idx, code)| Municipality {
                    region_code: code.to_string(),
                    geometry: Some(square(-3.0 + idx as f64 * 0.1, 42.8)),
                    properties: JsonObject::new(),
                })
                .collect(),
        };
        let stats = values
            .iter()
            .map(|(code, value)| StatsRecord {
                municipality_code: code.to_string(),
                municipality_name: Some(format!("Municipio {}", code)),
                value_2022: *value,
            })
            .collect();
        PipelineInputs {
            stats,
            municipalities,
        }
    }

    #[test]
    fn test_run_exclude_zero() {
        let inputs = inputs(&[
            ("01001", Some(12.0)),
            ("01002", Some(0.0)),
            ("01003", None),
            ("01004", Some(7.5)),
        ]);
        let pipeline = Pipeline::new(PipelineConfig::default());
        let choropleth = pipeline.run(&inputs).unwrap();

        assert_eq!(choropleth.view.values().collect::<Vec<_>>(), vec![12.0, 7.5]);
        assert_eq!((choropleth.scale.vmin, choropleth.scale.vmax), (7.5, 12.0));
        assert_eq!(choropleth.common_codes, 4);
        assert!(choropleth.map_view.bbox.is_some());
    }

    #[test]
    fn test_run_keep_zero() {
        let inputs = inputs(&[
            ("01001", Some(12.0)),
            ("01002", Some(0.0)),
            ("01003", None),
            ("01004", Some(7.5)),
        ]);
        let pipeline = Pipeline::new(PipelineConfig {
            exclude_zero: false,
            color_order: ColorOrder::RedYellowGreen,
            ..PipelineConfig::default()
        });
        let choropleth = pipeline.run(&inputs).unwrap();

        assert_eq!(choropleth.view.values().collect::<Vec<_>>(), vec![12.0, 0.0, 7.5]);
        assert_eq!(choropleth.view.bounds(), Some((0.0, 12.0)));
        assert_eq!(choropleth.scale.hex_at(0.0), "#ff0000");
    }

    #[test]
    fn test_run_no_common_codes() {
        let inputs = inputs(&[("1001", Some(1.0)), ("999", Some(2.0))]);
        let pipeline = Pipeline::new(PipelineConfig::default());
        assert!(matches!(
            pipeline.run(&inputs),
            Err(PipelineError::NoCommonCodes { .. })
        ));
    }

    #[test]
    fn test_run_empty_view() {
        let inputs = inputs(&[("01001", Some(0.0)), ("01002", None)]);
        let pipeline = Pipeline::new(PipelineConfig::default());
        assert_eq!(pipeline.run(&inputs).unwrap_err(), PipelineError::EmptyView);
    }
}
