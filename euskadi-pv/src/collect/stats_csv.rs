use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim};
use encoding_rs::Encoding;
use log::{debug, info};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::commons::basic_functions::{normalize_municipality_code, parse_locale_decimal};
use crate::pipeline::config::{PipelineConfig, ThousandsSeparator};

/// One row of the photovoltaic statistics file, after normalization
#[derive(Debug, Clone, PartialEq)]
pub struct StatsRecord {
    /// Normalized join key (see normalize_municipality_code)
    pub municipality_code: String,
    pub municipality_name: Option<String>,
    /// Installed PV power in 2022 (kW per 10,000 inhabitants)
    pub value_2022: Option<f64>,
}

/// Row deserialized from the CSV (headers: Codigo municipio;Municipio;2022;...)
/// Short rows leave the trailing cells empty; only the code column is required.
#[derive(Debug, Deserialize)]
struct StatsCsvRecord {
    #[serde(rename = "Codigo municipio")]
    codigo_municipio: String,
    #[serde(rename = "Municipio", default)]
    municipio: String,
    #[serde(rename = "2022", default)]
    value_2022: String,
}

/// Load the statistics CSV with the encoding and separators from `config`
pub fn load_stats_csv<P: AsRef<Path>>(path: P, config: &PipelineConfig) -> Result<Vec<StatsRecord>> {
    let path = path.as_ref();
    let encoding = config.resolve_encoding()?;

    let file = File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    let mut buffer = Vec::new();
    BufReader::new(file)
        .read_to_end(&mut buffer)
        .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;

    let records = parse_stats_csv(&buffer, encoding, config.thousands_separator)
        .with_context(|| format!("Failed to parse CSV file: {}", path.display()))?;

    info!(
        "Loaded {} statistics rows from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Decode and parse raw CSV bytes
/// Semicolon delimiter, header row required. A metric cell that does not parse
/// becomes None and the row is kept, as does a row with missing trailing cells.
pub fn parse_stats_csv(
    bytes: &[u8],
    encoding: &'static Encoding,
    thousands: ThousandsSeparator,
) -> Result<Vec<StatsRecord>> {
    let (decoded, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!("CSV contains bytes invalid for {}", encoding.name());
    }
    let decoded_str: &str = decoded.as_ref();

    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(decoded_str.as_bytes());

    let mut records = Vec::new();
    let mut malformed = 0usize;

    for (idx, result) in rdr.deserialize().enumerate() {
        let row: StatsCsvRecord =
            result.with_context(|| format!("Failed to deserialize CSV record {}", idx + 1))?;

        let value_2022 = parse_locale_decimal(&row.value_2022, thousands);
        if value_2022.is_none() && !row.value_2022.is_empty() {
            debug!("Row {}: unparseable 2022 value {:?}", idx + 1, row.value_2022);
            malformed += 1;
        } else if thousands == ThousandsSeparator::Period
            && row.value_2022.contains('.')
            && !row.value_2022.contains(',')
        {
            debug!(
                "Row {}: 2022 value {:?} has a '.' but no decimal comma, read as {:?}",
                idx + 1,
                row.value_2022,
                value_2022
            );
        }

        records.push(StatsRecord {
            municipality_code: normalize_municipality_code(&row.codigo_municipio),
            municipality_name: Some(row.municipio).filter(|name| !name.is_empty()),
            value_2022,
        });
    }

    if malformed > 0 {
        info!("{} rows have a 2022 value that could not be parsed", malformed);
    }

    Ok(records)
}
