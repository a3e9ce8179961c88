use anyhow::{Context, Result};
use polars::prelude::*;

use crate::collect::global_variables::{METRIC_COLUMN, NAME_COLUMN, REGION_CODE_PROPERTY};
use crate::pipeline::view::DerivedView;

impl DerivedView {
    /// Convert the view to a Polars DataFrame (ud_kodea, Municipio, 2022)
    pub fn to_polars_df(&self) -> Result<DataFrame> {
        let mut code_vec: Vec<String> = Vec::with_capacity(self.len());
        let mut label_vec: Vec<String> = Vec::with_capacity(self.len());
        let mut value_vec: Vec<f64> = Vec::with_capacity(self.len());

        for row in &self.rows {
            code_vec.push(row.region_code.clone());
            label_vec.push(row.label.clone());
            value_vec.push(row.value);
        }

        let df = df! [
            REGION_CODE_PROPERTY => code_vec,
            NAME_COLUMN => label_vec,
            METRIC_COLUMN => value_vec,
        ]
        .context("Failed to create DataFrame")?;

        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::view::ViewRow;

    #[test]
    fn test_to_polars_df() {
        let view = DerivedView {
            rows: vec![ViewRow {
                region_code: "48020".to_string(),
                label: "Bilbao".to_string(),
                value: 12.0,
                geometry: None,
            }],
        };

        let df = view.to_polars_df().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(df.width(), 3);
        assert!(df.column("ud_kodea").is_ok());
        assert!(df.column("2022").is_ok());
    }
}
