//! Error types for the pipeline layer.

use thiserror::Error;

/// Errors produced by the pipeline stages and their input loaders.
///
/// `Format` and `Reference` describe a single bad input row. Loaders count
/// and log them instead of propagating, so they only surface to callers of
/// the row-level parse functions.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A delimited or fixed-width row did not have the expected shape.
    #[error("malformed row in {source_name}: {detail}")]
    Format { source_name: String, detail: String },
    /// A row references an id the record store does not know.
    #[error("{source_name} references unknown {kind} '{id}'")]
    Reference {
        source_name: String,
        kind: &'static str,
        id: String,
    },
    /// A required input is missing or the configuration is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Records(#[from] floorvote_records::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("delimited file error: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to parse configuration: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid state table: {0}")]
    States(#[from] crate::states::StateTableError),
}

impl PipelineError {
    pub fn format(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        PipelineError::Format {
            source_name: source_name.into(),
            detail: detail.into(),
        }
    }

    pub fn reference(source_name: impl Into<String>, kind: &'static str, id: impl Into<String>) -> Self {
        PipelineError::Reference {
            source_name: source_name.into(),
            kind,
            id: id.into(),
        }
    }

    /// True for errors that concern one input row only.
    pub fn is_row_level(&self) -> bool {
        matches!(self, PipelineError::Format { .. } | PipelineError::Reference { .. })
    }
}
