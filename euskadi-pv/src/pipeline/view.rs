use geojson::Geometry;

use crate::pipeline::join::JoinedMunicipality;

/// One region handed to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRow {
    pub region_code: String,
    /// Tooltip label: municipality name, or the region code when unnamed
    pub label: String,
    pub value: f64,
    pub geometry: Option<Geometry>,
}

/// Filtered view of the joined table, the data the map is drawn from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedView {
    pub rows: Vec<ViewRow>,
}

impl DerivedView {
    /// Keep rows with a 2022 value; with `exclude_zero`, also drop exact zeros
    pub fn build(joined: &[JoinedMunicipality], exclude_zero: bool) -> Self {
        let rows = joined
            .iter()
            .filter_map(|row| {
                let value = row.value_2022?;
                if exclude_zero && value == 0.0 {
                    return None;
                }
                Some(ViewRow {
                    region_code: row.region_code.clone(),
                    label: row
                        .municipality_name
                        .clone()
                        .unwrap_or_else(|| row.region_code.clone()),
                    value,
                    geometry: row.geometry.clone(),
                })
            })
            .collect();

        DerivedView { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.value)
    }

    /// (min, max) of the values, None for an empty view
    pub fn bounds(&self) -> Option<(f64, f64)> {
        self.values().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geojson::JsonObject;

    fn joined(values: &[Option<f64>]) -> Vec<JoinedMunicipality> {
        values
            .iter()
            .enumerate()
            .map(|(idx, value)| JoinedMunicipality {
                region_code: format!("0100{}", idx),
                geometry: None,
                properties: JsonObject::new(),
                municipality_name: Some(format!("Municipio {}", idx)),
                value_2022: *value,
            })
            .collect()
    }

    #[test]
    fn test_exclude_zero() {
        let rows = joined(&[Some(12.0), Some(0.0), None, Some(7.5)]);
        let view = DerivedView::build(&rows, true);
        assert_eq!(view.values().collect::<Vec<_>>(), vec![12.0, 7.5]);
    }

    #[test]
    fn test_keep_zero() {
        let rows = joined(&[Some(12.0), Some(0.0), None, Some(7.5)]);
        let view = DerivedView::build(&rows, false);
        assert_eq!(view.values().collect::<Vec<_>>(), vec![12.0, 0.0, 7.5]);
    }

    #[test]
    fn test_bounds() {
        let rows = joined(&[Some(12.0), Some(0.0), Some(7.5)]);
        let view = DerivedView::build(&rows, false);
        assert_eq!(view.bounds(), Some((0.0, 12.0)));
        assert_eq!(DerivedView::default().bounds(), None);
    }

    #[test]
    fn test_label_falls_back_to_code() {
        let mut rows = joined(&[Some(3.0)]);
        rows[0].municipality_name = None;
        let view = DerivedView::build(&rows, true);
        assert_eq!(view.rows[0].label, "01000");
    }

    #[test]
    fn test_empty_view() {
        let rows = joined(&[None, Some(0.0)]);
        assert!(DerivedView::build(&rows, true).is_empty());
    }
}
