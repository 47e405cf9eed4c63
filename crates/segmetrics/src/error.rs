use segmetrics_core::BufferError;

/// Which input of the metrics facade an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputRole {
    Original,
    Candidate,
    GroundTruth,
}

impl std::fmt::Display for InputRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            InputRole::Original => "original",
            InputRole::Candidate => "candidate",
            InputRole::GroundTruth => "ground truth",
        })
    }
}

/// Errors returned by the metrics facade.
///
/// All of them are precondition failures raised before any scorer runs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    #[error("{role} buffer is missing (zero pixels)")]
    NullInput { role: InputRole },

    #[error("{role} dimensions {got:?} do not match expected {expected:?} (width, height)")]
    DimensionMismatch {
        role: InputRole,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error(transparent)]
    Buffer(#[from] BufferError),
}

/// Errors from reading or writing a JSON metrics configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
