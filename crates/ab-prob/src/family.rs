//! The conjugate-family capability set and the shared risk algorithm.
//!
//! A family contributes four primitives (posterior update, moments,
//! quadrature rule, CDF/mean oracles); the two-arm risk computation is
//! written once against those primitives and shared by every family.

use ab_core::{Error, Moments, Result, RiskEstimate};
use serde::{Deserialize, Serialize};

use crate::beta::BetaFamily;
use crate::normal::NormalFamily;
use crate::quadrature::QuadratureRule;

/// Default number of quadrature points for [`ConjugateFamily::risk`].
pub const DEFAULT_RISK_POINTS: usize = 24;

/// Scale on which posterior moments are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MomentScale {
    /// Moments of the random variable X itself.
    Natural,
    /// Moments of ln X, for quantities compared multiplicatively
    /// (e.g. revenue per user).
    Log,
}

/// Capability set of a conjugate two-arm distribution family.
///
/// All operations are pure associated functions: a posterior is fully
/// described by its natural parameter pair `(par1, par2)` and no state is
/// carried between calls.
pub trait ConjugateFamily {
    /// Prior summary consumed by [`Self::posterior`].
    type Prior: Copy;
    /// Observation summary consumed by [`Self::posterior`].
    type Data: Copy;

    /// Closed-form conjugate update of `prior` with `data`.
    ///
    /// Returns the posterior natural parameter pair. Fails with
    /// [`Error::Domain`] when either summary lies outside the family's valid
    /// domain; no partial result is produced.
    fn posterior(prior: Self::Prior, data: Self::Data) -> Result<(f64, f64)>;

    /// First two central moments of the posterior at `(par1, par2)`,
    /// on the requested [`MomentScale`].
    fn moments(par1: f64, par2: f64, scale: MomentScale) -> Result<Moments>;

    /// n-point quadrature rule tailored to the posterior at `(par1, par2)`.
    fn gq(n: usize, par1: f64, par2: f64) -> Result<QuadratureRule>;

    /// Cumulative distribution function at `x` for the posterior.
    fn cdf(x: f64, par1: f64, par2: f64) -> Result<f64>;

    /// Posterior mean at `(par1, par2)`.
    fn mean(par1: f64, par2: f64) -> Result<f64>;

    /// Expected opportunity loss of shipping each arm.
    ///
    /// Uses the decomposition `max(A,B) = A·1{A≥B} + B·1{B>A}`: each term is
    /// an integral over one arm's posterior with the other arm's CDF as the
    /// indicator mass, approximated by an n-point rule from [`Self::gq`].
    /// The loss of an arm is then `E[max(A,B)]` minus that arm's mean.
    fn risk(
        a_par1: f64,
        a_par2: f64,
        b_par1: f64,
        b_par2: f64,
        n: usize,
    ) -> Result<RiskEstimate> {
        if n == 0 {
            return Err(Error::Domain(
                "risk requires at least one quadrature point".into(),
            ));
        }
        let rule_a = Self::gq(n, a_par1, a_par2)?;
        let rule_b = Self::gq(n, b_par1, b_par2)?;

        let mut gq_est = 0.0;
        for (&x, &w) in rule_a.nodes.iter().zip(rule_a.weights.iter()) {
            gq_est += x * Self::cdf(x, b_par1, b_par2)? * w;
        }
        for (&x, &w) in rule_b.nodes.iter().zip(rule_b.weights.iter()) {
            gq_est += x * Self::cdf(x, a_par1, a_par2)? * w;
        }

        let mean_a = Self::mean(a_par1, a_par2)?;
        let mean_b = Self::mean(b_par1, b_par2)?;
        Ok(RiskEstimate::new(gq_est - mean_a, gq_est - mean_b))
    }
}

/// Capability tag for callers that select a family at runtime
/// (e.g. per-metric configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FamilyKind {
    /// Beta-Binomial arm (conversion-style metrics).
    Beta,
    /// Normal-Normal arm (revenue/latency-style metrics).
    Normal,
}

impl FamilyKind {
    /// Posterior moments for the tagged family.
    pub fn moments(self, par1: f64, par2: f64, scale: MomentScale) -> Result<Moments> {
        match self {
            FamilyKind::Beta => BetaFamily::moments(par1, par2, scale),
            FamilyKind::Normal => NormalFamily::moments(par1, par2, scale),
        }
    }

    /// Quadrature rule for the tagged family.
    pub fn gq(self, n: usize, par1: f64, par2: f64) -> Result<QuadratureRule> {
        match self {
            FamilyKind::Beta => BetaFamily::gq(n, par1, par2),
            FamilyKind::Normal => NormalFamily::gq(n, par1, par2),
        }
    }

    /// CDF for the tagged family.
    pub fn cdf(self, x: f64, par1: f64, par2: f64) -> Result<f64> {
        match self {
            FamilyKind::Beta => BetaFamily::cdf(x, par1, par2),
            FamilyKind::Normal => NormalFamily::cdf(x, par1, par2),
        }
    }

    /// Posterior mean for the tagged family.
    pub fn mean(self, par1: f64, par2: f64) -> Result<f64> {
        match self {
            FamilyKind::Beta => BetaFamily::mean(par1, par2),
            FamilyKind::Normal => NormalFamily::mean(par1, par2),
        }
    }

    /// Two-arm risk for the tagged family.
    pub fn risk(
        self,
        a_par1: f64,
        a_par2: f64,
        b_par1: f64,
        b_par2: f64,
        n: usize,
    ) -> Result<RiskEstimate> {
        match self {
            FamilyKind::Beta => BetaFamily::risk(a_par1, a_par2, b_par1, b_par2, n),
            FamilyKind::Normal => NormalFamily::risk(a_par1, a_par2, b_par1, b_par2, n),
        }
    }
}
