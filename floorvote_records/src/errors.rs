//! Error types for the record layer.

/// Errors that can occur while constructing records or building a store.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A bill identifier did not have the `kind-number` shape.
    #[error("invalid bill id '{0}'")]
    InvalidBillId(String),
    /// The record snapshot could not be decoded.
    #[error("failed to decode record snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
    /// The record snapshot could not be read.
    #[error("failed to read record snapshot: {0}")]
    Io(#[from] std::io::Error),
}
