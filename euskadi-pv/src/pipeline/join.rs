use geojson::{Geometry, JsonObject};
use std::collections::{HashMap, HashSet};

use crate::collect::stats_csv::StatsRecord;
use crate::error::PipelineError;
use crate::geometric::municipality::MunicipalityCollection;

/// A municipality boundary with the statistics row it matched, if any
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedMunicipality {
    pub region_code: String,
    pub geometry: Option<Geometry>,
    pub properties: JsonObject,
    pub municipality_name: Option<String>,
    pub value_2022: Option<f64>,
}

/// Result of the join: rows plus the codes both inputs share
#[derive(Debug, Clone)]
pub struct JoinResult {
    pub rows: Vec<JoinedMunicipality>,
    pub common_codes: HashSet<String>,
}

/// Codes present in both the statistics rows and the boundaries
pub fn common_codes(stats: &[StatsRecord], municipalities: &MunicipalityCollection) -> HashSet<String> {
    let stats_codes: HashSet<&str> = stats.iter().map(|r| r.municipality_code.as_str()).collect();
    municipalities
        .region_codes()
        .filter(|code| stats_codes.contains(code))
        .map(str::to_string)
        .collect()
}

/// Left outer join of the statistics onto the boundaries
/// Every boundary appears once per matching statistics row, or once with
/// absent name/value when nothing matches. Fails only when the inputs share no code.
pub fn left_join(
    municipalities: &MunicipalityCollection,
    stats: &[StatsRecord],
) -> Result<JoinResult, PipelineError> {
    let common_codes = common_codes(stats, municipalities);
    if common_codes.is_empty() {
        let stats_codes: HashSet<&str> =
            stats.iter().map(|r| r.municipality_code.as_str()).collect();
        let region_codes: HashSet<&str> = municipalities.region_codes().collect();
        return Err(PipelineError::NoCommonCodes {
            stats_codes: stats_codes.len(),
            region_codes: region_codes.len(),
        });
    }

    let mut by_code: HashMap<&str, Vec<&StatsRecord>> = HashMap::new();
    for record in stats {
        by_code
            .entry(record.municipality_code.as_str())
            .or_default()
            .push(record);
    }

    let mut rows = Vec::with_capacity(municipalities.len());
    for municipality in municipalities.municipalities() {
        match by_code.get(municipality.region_code.as_str()) {
            Some(matches) => {
                for record in matches {
                    rows.push(JoinedMunicipality {
                        region_code: municipality.region_code.clone(),
                        geometry: municipality.geometry.clone(),
                        properties: municipality.properties.clone(),
                        municipality_name: record.municipality_name.clone(),
                        value_2022: record.value_2022,
                    });
                }
            }
            None => rows.push(JoinedMunicipality {
                region_code: municipality.region_code.clone(),
                geometry: municipality.geometry.clone(),
                properties: municipality.properties.clone(),
                municipality_name: None,
                value_2022: None,
            }),
        }
    }

    Ok(JoinResult { rows, common_codes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometric::municipality::Municipality;

    fn boundaries(codes: &[&str]) -> MunicipalityCollection {
        MunicipalityCollection {
            municipalities: codes
                .iter()
                .map(|code| Municipality {
                    region_code: code.to_string(),
                    geometry: None,
                    properties: JsonObject::new(),
                })
                .collect(),
        }
    }

    fn stat(code: &str, name: &str, value: Option<f64>) -> StatsRecord {
        StatsRecord {
            municipality_code: code.to_string(),
            municipality_name: Some(name.to_string()),
            value_2022: value,
        }
    }

    #[test]
    fn test_one_to_one_join_keeps_geometry_count() {
        let geo = boundaries(&["01059", "48020", "20069"]);
        let stats = vec![
            stat("48020", "Bilbao", Some(12.0)),
            stat("01059", "Vitoria-Gasteiz", Some(7.5)),
            stat("99999", "Elsewhere", Some(1.0)),
        ];

        let result = left_join(&geo, &stats).unwrap();
        assert_eq!(result.rows.len(), geo.len());
        assert_eq!(result.common_codes.len(), 2);

        // Geometry order is preserved
        assert_eq!(result.rows[0].region_code, "01059");
        assert_eq!(result.rows[0].value_2022, Some(7.5));
        assert_eq!(result.rows[1].municipality_name.as_deref(), Some("Bilbao"));
        assert_eq!(result.rows[2].region_code, "20069");
        assert_eq!(result.rows[2].municipality_name, None);
        assert_eq!(result.rows[2].value_2022, None);
    }

    #[test]
    fn test_duplicate_stats_multiply_rows() {
        let geo = boundaries(&["01059", "48020"]);
        let stats = vec![
            stat("01059", "Vitoria-Gasteiz", Some(1.0)),
            stat("01059", "Vitoria-Gasteiz (bis)", Some(2.0)),
        ];

        let result = left_join(&geo, &stats).unwrap();
        assert_eq!(result.rows.len(), 3);
        assert_eq!(result.rows[0].value_2022, Some(1.0));
        assert_eq!(result.rows[1].value_2022, Some(2.0));
        assert_eq!(result.rows[2].region_code, "48020");
    }

    #[test]
    fn test_duplicate_boundaries_each_match() {
        let geo = boundaries(&["01059", "01059"]);
        let stats = vec![stat("01059", "Vitoria-Gasteiz", Some(1.0))];

        let result = left_join(&geo, &stats).unwrap();
        assert_eq!(result.rows.len(), 2);
        assert!(result.rows.iter().all(|r| r.value_2022 == Some(1.0)));
    }

    #[test]
    fn test_no_common_codes() {
        let geo = boundaries(&["01059", "48020"]);
        // A three-character code is not padded and never matches
        let stats = vec![stat("159", "Lost zeros", Some(3.0))];

        let err = left_join(&geo, &stats).unwrap_err();
        assert_eq!(
            err,
            PipelineError::NoCommonCodes {
                stats_codes: 1,
                region_codes: 2
            }
        );
    }

    #[test]
    fn test_common_codes() {
        let geo = boundaries(&["01059", "48020", "20069"]);
        let stats = vec![stat("20069", "Donostia", None), stat("48020", "Bilbao", None)];
        let codes = common_codes(&stats, &geo);
        assert_eq!(codes.len(), 2);
        assert!(codes.contains("20069"));
        assert!(!codes.contains("01059"));
    }
}
