pub mod global_variables;
pub mod stats_csv;
