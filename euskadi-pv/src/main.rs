use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{error, info, warn};
use std::path::PathBuf;
use std::process::ExitCode;

use euskadi_pv::collect::global_variables::{
    get_output_path, DEFAULT_CSV_PATH, DEFAULT_GEOJSON_PATH,
};
use euskadi_pv::{ColorOrder, Pipeline, PipelineConfig, PipelineError, ThousandsSeparator};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThousandsArg {
    Period,
    #[value(name = "none")]
    NoSeparator,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorOrderArg {
    GreenYellowRed,
    RedYellowGreen,
}

/// Choropleth of installed photovoltaic power per municipality in Euskadi
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Statistics CSV (';' separated, columns "Codigo municipio", "Municipio", "2022")
    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    csv: PathBuf,

    /// Municipal boundaries (GeoJSON with a "ud_kodea" property)
    #[arg(long, default_value = DEFAULT_GEOJSON_PATH)]
    geojson: PathBuf,

    /// JSON pipeline configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for choropleth.geojson and index.html
    #[arg(long)]
    out: Option<PathBuf>,

    /// Encoding label of the CSV (e.g. latin1, utf-8)
    #[arg(long)]
    encoding: Option<String>,

    #[arg(long, value_enum)]
    thousands_separator: Option<ThousandsArg>,

    /// Drop municipalities whose 2022 value is 0
    #[arg(long)]
    exclude_zero: Option<bool>,

    #[arg(long, value_enum)]
    color_order: Option<ColorOrderArg>,

    /// Print the derived view as a table
    #[arg(long)]
    summary: bool,
}

impl Args {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)?,
            None => PipelineConfig::default(),
        };

        if let Some(encoding) = &self.encoding {
            config.encoding = encoding.clone();
        }
        if let Some(thousands) = self.thousands_separator {
            config.thousands_separator = match thousands {
                ThousandsArg::Period => ThousandsSeparator::Period,
                ThousandsArg::NoSeparator => ThousandsSeparator::None,
            };
        }
        if let Some(exclude_zero) = self.exclude_zero {
            config.exclude_zero = exclude_zero;
        }
        if let Some(order) = self.color_order {
            config.color_order = match order {
                ColorOrderArg::GreenYellowRed => ColorOrder::GreenYellowRed,
                ColorOrderArg::RedYellowGreen => ColorOrder::RedYellowGreen,
            };
        }

        Ok(config)
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let pipeline = Pipeline::new(args.pipeline_config()?);
    info!("Pipeline config: {:?}", pipeline.config());

    let inputs = pipeline.load_inputs(&args.csv, &args.geojson)?;

    let choropleth = match pipeline.run(&inputs) {
        Ok(choropleth) => choropleth,
        // Already logged by the pipeline
        Err(PipelineError::NoCommonCodes { .. }) => return Ok(ExitCode::from(2)),
        Err(PipelineError::EmptyView) => {
            warn!("No map rendered");
            return Ok(ExitCode::SUCCESS);
        }
    };

    let output_path = args.out.unwrap_or_else(get_output_path);
    choropleth.to_geojson(&output_path, None)?;
    choropleth.save_html(&output_path)?;

    if args.summary {
        print_summary(&choropleth.view)?;
    }

    info!(
        "Número de combinaciones de códigos con datos de 2022: {}",
        choropleth.common_codes
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(feature = "polars")]
fn print_summary(view: &euskadi_pv::pipeline::view::DerivedView) -> Result<()> {
    println!("{}", view.to_polars_df()?);
    Ok(())
}

#[cfg(not(feature = "polars"))]
fn print_summary(view: &euskadi_pv::pipeline::view::DerivedView) -> Result<()> {
    for row in &view.rows {
        println!("{}\t{}\t{}", row.region_code, row.label, row.value);
    }
    Ok(())
}
