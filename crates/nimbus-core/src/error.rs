//! Error taxonomy for scale operations.
//!
//! Four user-facing kinds: bad arguments (`Usage`), an ineligible
//! deployment or region (`Validation`), an identifier that does not
//! resolve (`NotFound`), and everything else from the control plane
//! (`Remote`), which passes through with its original diagnostic chain.

use thiserror::Error;

/// Result type alias for scale operations.
pub type ScaleResult<T> = Result<T, ScaleError>;

/// Errors surfaced by argument resolution and scale orchestration.
#[derive(Debug, Error)]
pub enum ScaleError {
    /// Bad argument count or shape. Reported before any I/O.
    #[error("{0}")]
    Usage(String),

    /// Well-formed arguments naming an ineligible deployment or an
    /// invalid region. Reported before the update call.
    #[error("{0}")]
    Validation(String),

    /// The deployment identifier did not resolve.
    #[error("deployment not found: {0}")]
    NotFound(String),

    /// Any other lookup/update failure, surfaced unchanged.
    #[error(transparent)]
    Remote(#[from] anyhow::Error),
}
