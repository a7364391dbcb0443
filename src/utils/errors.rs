use thiserror::Error;

use crate::api::dashboard::ApiError;

/// Failures a dashboard flow can end in
///
/// Every flow handles its own error locally (inline message, logged no-op,
/// or unchanged prior state); the variants only tell the caller which of the
/// three failure classes happened.
#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    /// The request was rejected, timed out or returned a non-success status
    #[error("{0}")]
    Api(#[from] ApiError),
    /// The payload arrived but an expected field is missing or malformed
    #[error("Malformed payload: {0}")]
    Payload(String),
    /// A series the prediction view needs is absent from the payload
    #[error("Missing {0} series in prediction payload")]
    MissingSeries(&'static str),
    /// Fields are present but carry nothing to show
    #[error("Empty result: {0}")]
    EmptyResult(String),
    /// The page has no region with this id
    #[error("Missing region '{0}'")]
    MissingRegion(String),
    /// A view was used before it was initialized
    #[error("View not initialized: {0}")]
    NotInitialized(&'static str),
    #[error("Render failed: {0}")]
    Render(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
