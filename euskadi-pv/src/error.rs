use thiserror::Error;

/// Pipeline outcomes that stop rendering without being a crash
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// No statistics code matches a boundary code
    #[error(
        "No common codes between 'Codigo municipio' and 'ud_kodea' ({stats_codes} statistics codes, {region_codes} region codes). Check the code formats."
    )]
    NoCommonCodes {
        stats_codes: usize,
        region_codes: usize,
    },
    /// Every joined row was filtered out of the derived view
    #[error("No valid data in the column '2022' to display on the map.")]
    EmptyView,
}
