//! Common value types for posterior summaries and decision statistics.

use serde::{Deserialize, Serialize};

/// First two central moments of a posterior distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    /// Posterior mean.
    pub mean: f64,

    /// Posterior variance (non-negative for any in-domain parameters).
    pub variance: f64,
}

impl Moments {
    /// Create a new moments pair.
    pub fn new(mean: f64, variance: f64) -> Self {
        Self { mean, variance }
    }

    /// Posterior standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Expected opportunity loss of shipping each arm of a two-armed experiment.
///
/// `risk_a` is the expected amount by which arm B beats arm A when B is in
/// fact the better arm (and symmetrically for `risk_b`). Both components are
/// non-negative in expectation; quadrature error may leave a tiny negative
/// residual when the arms are indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskEstimate {
    /// Expected loss from choosing arm A.
    pub risk_a: f64,

    /// Expected loss from choosing arm B.
    pub risk_b: f64,
}

impl RiskEstimate {
    /// Create a new risk pair.
    pub fn new(risk_a: f64, risk_b: f64) -> Self {
        Self { risk_a, risk_b }
    }
}
