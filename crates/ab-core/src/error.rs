//! Error types for the A/B decision workspace.

use thiserror::Error;

/// Workspace error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A parameter or observation summary lies outside the family's valid
    /// domain (non-positive shape/scale, successes exceeding trials, a
    /// zero-point quadrature order). Never silently clamped.
    #[error("Domain error: {0}")]
    Domain(String),

    /// Numeric failure inside an otherwise valid computation.
    #[error("Computation error: {0}")]
    Computation(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
