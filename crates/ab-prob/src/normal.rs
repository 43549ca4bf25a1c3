//! Normal-Normal conjugate family with precision weighting, for
//! revenue/latency-style metrics.

use ab_core::{Error, Moments, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal as NormalDist};

use crate::family::{ConjugateFamily, MomentScale};
use crate::quadrature::{self, QuadratureRule};

/// Mass-below-zero threshold above which log-scale moments are flagged as
/// inexact.
pub const EPSILON: f64 = 1e-4;

/// Gaussian observation summary: sample location, spread, and the relative
/// precision contribution (observation count or inverse-variance multiplier).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianSummary {
    /// Sample mean / location.
    pub mean: f64,
    /// Sample standard deviation; must be > 0.
    pub sd: f64,
    /// Relative precision weight; must be > 0.
    pub weight: f64,
}

impl GaussianSummary {
    /// Create an observation summary (validated at update time).
    pub fn new(mean: f64, sd: f64, weight: f64) -> Self {
        Self { mean, sd, weight }
    }
}

/// Conjugate Normal-Normal arm.
pub struct NormalFamily;

fn check_summary(label: &str, s: GaussianSummary) -> Result<()> {
    if !s.mean.is_finite() {
        return Err(Error::Domain(format!(
            "{} mean must be finite, got {}",
            label, s.mean
        )));
    }
    if !s.sd.is_finite() || s.sd <= 0.0 {
        return Err(Error::Domain(format!(
            "{} sd must be finite and > 0, got {}",
            label, s.sd
        )));
    }
    if !s.weight.is_finite() || s.weight <= 0.0 {
        return Err(Error::Domain(format!(
            "{} weight must be finite and > 0, got {}",
            label, s.weight
        )));
    }
    Ok(())
}

fn check_params(par1: f64, par2: f64) -> Result<()> {
    if !par1.is_finite() {
        return Err(Error::Domain(format!(
            "Normal location must be finite, got {}",
            par1
        )));
    }
    if !par2.is_finite() || par2 <= 0.0 {
        return Err(Error::Domain(format!(
            "Normal scale must be finite and > 0, got {}",
            par2
        )));
    }
    Ok(())
}

impl ConjugateFamily for NormalFamily {
    type Prior = GaussianSummary;
    type Data = GaussianSummary;

    /// Precision-weighted Gaussian update: posterior precision is the sum of
    /// the weighted precisions, the location their precision-weighted mean.
    fn posterior(prior: Self::Prior, data: Self::Data) -> Result<(f64, f64)> {
        check_summary("prior", prior)?;
        check_summary("data", data)?;

        let inv_var_prior = prior.weight / (prior.sd * prior.sd);
        let inv_var_data = data.weight / (data.sd * data.sd);
        let var = 1.0 / (inv_var_prior + inv_var_data);

        let loc = var * (inv_var_prior * prior.mean + inv_var_data * data.mean);
        Ok((loc, var.sqrt()))
    }

    /// Natural scale: `(par1, par2²)`. Log scale: log-normal-style
    /// approximation `(ln par1, (par2/par1)²)`, advisory-flagged when more
    /// than [`EPSILON`] of the posterior mass lies below zero.
    fn moments(par1: f64, par2: f64, scale: MomentScale) -> Result<Moments> {
        check_params(par1, par2)?;
        let m = match scale {
            MomentScale::Natural => Moments::new(par1, par2 * par2),
            MomentScale::Log => {
                if par1 <= 0.0 {
                    return Err(Error::Domain(format!(
                        "log-scale moments require a positive location, got {}",
                        par1
                    )));
                }
                let mass_below_zero = Self::cdf(0.0, par1, par2)?;
                if mass_below_zero > EPSILON {
                    log::warn!(
                        "normal log moments: P(X < 0) = {:.3e} exceeds {:.0e}; \
                         log approximation is inexact",
                        mass_below_zero,
                        EPSILON
                    );
                }
                Moments::new(par1.ln(), (par2 / par1).powi(2))
            }
        };
        Ok(m)
    }

    /// Probabilists' Gauss-Hermite rule mapped onto the posterior support by
    /// `x ↦ par2·x + par1`; weights are already normalized to unit mass.
    fn gq(n: usize, par1: f64, par2: f64) -> Result<QuadratureRule> {
        check_params(par1, par2)?;
        let mut rule = quadrature::gauss_hermite_norm(n)?;
        for x in &mut rule.nodes {
            *x = par2 * *x + par1;
        }
        Ok(rule)
    }

    fn cdf(x: f64, par1: f64, par2: f64) -> Result<f64> {
        let dist = NormalDist::new(par1, par2)
            .map_err(|e| Error::Domain(format!("invalid Normal({}, {}): {}", par1, par2, e)))?;
        Ok(dist.cdf(x))
    }

    fn mean(par1: f64, par2: f64) -> Result<f64> {
        check_params(par1, par2)?;
        Ok(par1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posterior_update() {
        let (loc, scale) = NormalFamily::posterior(
            GaussianSummary::new(0.0, 1.0, 1.0),
            GaussianSummary::new(1.0, 1.0, 1.0),
        )
        .unwrap();
        assert!((loc - 0.5).abs() < 1e-12);
        assert!((scale - 0.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_posterior_tightens_variance() {
        let prior = GaussianSummary::new(10.0, 2.0, 1.0);
        let data = GaussianSummary::new(12.0, 3.0, 1.0);
        let (_, scale) = NormalFamily::posterior(prior, data).unwrap();
        let var = scale * scale;
        assert!(var < (prior.sd * prior.sd).min(data.sd * data.sd));
    }

    #[test]
    fn test_posterior_weight_scales_precision() {
        // Heavier data weight pulls the posterior toward the data mean.
        let prior = GaussianSummary::new(0.0, 1.0, 1.0);
        let light = NormalFamily::posterior(prior, GaussianSummary::new(1.0, 1.0, 1.0)).unwrap();
        let heavy = NormalFamily::posterior(prior, GaussianSummary::new(1.0, 1.0, 9.0)).unwrap();
        assert!(heavy.0 > light.0);
        assert!((heavy.0 - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_posterior_invalid_inputs() {
        let ok = GaussianSummary::new(0.0, 1.0, 1.0);
        assert!(NormalFamily::posterior(GaussianSummary::new(0.0, 0.0, 1.0), ok).is_err());
        assert!(NormalFamily::posterior(ok, GaussianSummary::new(0.0, -1.0, 1.0)).is_err());
        assert!(NormalFamily::posterior(ok, GaussianSummary::new(0.0, 1.0, 0.0)).is_err());
        assert!(NormalFamily::posterior(GaussianSummary::new(f64::NAN, 1.0, 1.0), ok).is_err());
    }

    #[test]
    fn test_natural_moments() {
        let m = NormalFamily::moments(3.0, 0.5, MomentScale::Natural).unwrap();
        assert_eq!(m.mean, 3.0);
        assert!((m.variance - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_log_moments_far_from_zero() {
        // P(X < 0) is negligible here, so no advisory applies and the
        // approximation is tight.
        let m = NormalFamily::moments(100.0, 1.0, MomentScale::Log).unwrap();
        assert!((m.mean - 100.0f64.ln()).abs() < 1e-12);
        assert!((m.variance - 1e-4).abs() < 1e-15);
    }

    #[test]
    fn test_log_moments_near_zero_still_return() {
        // A third of the mass sits below zero: the advisory fires but the
        // call still produces the (inexact) log approximation.
        let m = NormalFamily::moments(0.5, 1.0, MomentScale::Log).unwrap();
        assert!((m.mean - 0.5f64.ln()).abs() < 1e-12);
        assert!((m.variance - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_log_moments_nonpositive_location() {
        assert!(NormalFamily::moments(0.0, 1.0, MomentScale::Log).is_err());
        assert!(NormalFamily::moments(-2.0, 1.0, MomentScale::Log).is_err());
    }

    #[test]
    fn test_variance_nonnegative_both_scales() {
        let cases = [(0.01, 0.5), (1.0, 1.0), (250.0, 40.0)];
        for &(loc, scale) in &cases {
            for s in [MomentScale::Natural, MomentScale::Log] {
                let m = NormalFamily::moments(loc, scale, s).unwrap();
                assert!(m.variance >= 0.0, "({}, {}) {:?}", loc, scale, s);
            }
        }
    }

    #[test]
    fn test_gq_rescaled_rule() {
        let rule = NormalFamily::gq(9, 2.0, 0.25).unwrap();
        assert_eq!(rule.len(), 9);
        let total: f64 = rule.weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!((rule.expectation(|x| x) - 2.0).abs() < 1e-10);
        let second = rule.expectation(|x| (x - 2.0) * (x - 2.0));
        assert!((second - 0.0625).abs() < 1e-10);
    }

    #[test]
    fn test_gq_invalid_scale() {
        assert!(NormalFamily::gq(9, 0.0, 0.0).is_err());
        assert!(NormalFamily::gq(9, 0.0, -1.0).is_err());
    }

    #[test]
    fn test_cdf_basics() {
        assert!((NormalFamily::cdf(0.0, 0.0, 1.0).unwrap() - 0.5).abs() < 1e-12);
        let upper = NormalFamily::cdf(1.96, 0.0, 1.0).unwrap();
        assert!((upper - 0.975).abs() < 1e-3);
        assert!(NormalFamily::cdf(0.0, 0.0, 0.0).is_err());
    }
}
