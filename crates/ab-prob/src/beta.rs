//! Beta-Binomial conjugate family for conversion-style metrics.

use ab_core::{Error, Moments, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{Beta as BetaDist, ContinuousCDF};
use statrs::function::gamma::digamma;

use crate::family::{ConjugateFamily, MomentScale};
use crate::math::trigamma;
use crate::quadrature::{self, QuadratureRule};

/// Beta natural parameter pair; both components strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetaParams {
    /// Shape parameter alpha.
    pub alpha: f64,
    /// Shape parameter beta.
    pub beta: f64,
}

impl BetaParams {
    /// Create a parameter pair (validated at update time).
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }
}

/// Binomial observation summary: successes out of trials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinomialCount {
    /// Number of successful trials.
    pub successes: u64,
    /// Total number of trials; must be at least `successes`.
    pub trials: u64,
}

impl BinomialCount {
    /// Create an observation summary (validated at update time).
    pub fn new(successes: u64, trials: u64) -> Self {
        Self { successes, trials }
    }
}

/// Conjugate Beta-Binomial arm.
pub struct BetaFamily;

fn check_params(par1: f64, par2: f64) -> Result<()> {
    if !par1.is_finite() || par1 <= 0.0 {
        return Err(Error::Domain(format!(
            "Beta alpha must be finite and > 0, got {}",
            par1
        )));
    }
    if !par2.is_finite() || par2 <= 0.0 {
        return Err(Error::Domain(format!(
            "Beta beta must be finite and > 0, got {}",
            par2
        )));
    }
    Ok(())
}

impl ConjugateFamily for BetaFamily {
    type Prior = BetaParams;
    type Data = BinomialCount;

    /// `alpha' = alpha + successes`, `beta' = beta + trials − successes`.
    ///
    /// Zero-failure data (`successes == trials`) is valid: the beta
    /// increment is simply zero.
    fn posterior(prior: Self::Prior, data: Self::Data) -> Result<(f64, f64)> {
        check_params(prior.alpha, prior.beta)?;
        if data.successes > data.trials {
            return Err(Error::Domain(format!(
                "successes ({}) cannot exceed trials ({})",
                data.successes, data.trials
            )));
        }
        let alpha = prior.alpha + data.successes as f64;
        let beta = prior.beta + (data.trials - data.successes) as f64;
        Ok((alpha, beta))
    }

    /// Natural scale: ordinary Beta moments. Log scale: moments of ln X via
    /// digamma/trigamma differences.
    fn moments(par1: f64, par2: f64, scale: MomentScale) -> Result<Moments> {
        check_params(par1, par2)?;
        let s = par1 + par2;
        let m = match scale {
            MomentScale::Natural => Moments::new(par1 / s, par1 * par2 / (s * s * (s + 1.0))),
            MomentScale::Log => Moments::new(
                digamma(par1) - digamma(s),
                trigamma(par1) - trigamma(s),
            ),
        };
        Ok(m)
    }

    /// Shifted-Jacobi rule whose weight is exactly the Beta(par1, par2)
    /// kernel, so the normalized weights approximate the posterior measure.
    fn gq(n: usize, par1: f64, par2: f64) -> Result<QuadratureRule> {
        quadrature::gauss_jacobi_shifted(n, par1, par2)
    }

    fn cdf(x: f64, par1: f64, par2: f64) -> Result<f64> {
        let dist = BetaDist::new(par1, par2)
            .map_err(|e| Error::Domain(format!("invalid Beta({}, {}): {}", par1, par2, e)))?;
        Ok(dist.cdf(x))
    }

    fn mean(par1: f64, par2: f64) -> Result<f64> {
        check_params(par1, par2)?;
        Ok(par1 / (par1 + par2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_posterior_update() {
        let (a, b) = BetaFamily::posterior(
            BetaParams::new(1.0, 1.0),
            BinomialCount::new(50, 100),
        )
        .unwrap();
        assert_eq!(a, 51.0);
        assert_eq!(b, 51.0);
    }

    #[test]
    fn test_posterior_empty_data_returns_prior() {
        let prior = BetaParams::new(3.5, 7.25);
        let (a, b) = BetaFamily::posterior(prior, BinomialCount::new(0, 0)).unwrap();
        assert_eq!(a, prior.alpha);
        assert_eq!(b, prior.beta);
    }

    #[test]
    fn test_posterior_zero_failures_accepted() {
        let (a, b) = BetaFamily::posterior(
            BetaParams::new(1.0, 1.0),
            BinomialCount::new(20, 20),
        )
        .unwrap();
        assert_eq!(a, 21.0);
        assert_eq!(b, 1.0);
        assert!(b > 0.0);
    }

    #[test]
    fn test_posterior_invalid_inputs() {
        assert!(BetaFamily::posterior(
            BetaParams::new(0.0, 1.0),
            BinomialCount::new(1, 2)
        )
        .is_err());
        assert!(BetaFamily::posterior(
            BetaParams::new(1.0, -2.0),
            BinomialCount::new(1, 2)
        )
        .is_err());
        assert!(BetaFamily::posterior(
            BetaParams::new(1.0, 1.0),
            BinomialCount::new(3, 2)
        )
        .is_err());
    }

    #[test]
    fn test_posterior_stays_positive() {
        let priors = [(0.5, 0.5), (1.0, 1.0), (30.0, 5.0)];
        let data = [(0u64, 0u64), (0, 10), (10, 10), (7, 19)];
        for &(pa, pb) in &priors {
            for &(s, t) in &data {
                let (a, b) =
                    BetaFamily::posterior(BetaParams::new(pa, pb), BinomialCount::new(s, t))
                        .unwrap();
                assert!(a > 0.0 && b > 0.0, "prior=({},{}) data=({},{})", pa, pb, s, t);
            }
        }
    }

    #[test]
    fn test_natural_moments() {
        let m = BetaFamily::moments(51.0, 51.0, MomentScale::Natural).unwrap();
        assert!((m.mean - 0.5).abs() < 1e-12);
        let expected_var = 51.0 * 51.0 / (102.0 * 102.0 * 103.0);
        assert!((m.variance - expected_var).abs() < 1e-15);
    }

    #[test]
    fn test_log_moments_match_digamma() {
        let m = BetaFamily::moments(51.0, 51.0, MomentScale::Log).unwrap();
        let expected_mean = digamma(51.0) - digamma(102.0);
        assert!((m.mean - expected_mean).abs() < 1e-12);
        // E[ln X] for a Beta concentrated at 0.5 sits just below ln(0.5).
        assert!((m.mean - 0.5f64.ln()).abs() < 0.01);
        assert!(m.mean < 0.5f64.ln());
        assert!(m.variance > 0.0);
    }

    #[test]
    fn test_variance_nonnegative_both_scales() {
        let cases = [(0.5, 0.5), (1.0, 1.0), (2.0, 300.0), (5000.0, 3000.0)];
        for &(a, b) in &cases {
            for scale in [MomentScale::Natural, MomentScale::Log] {
                let m = BetaFamily::moments(a, b, scale).unwrap();
                assert!(m.variance >= 0.0, "({}, {}) {:?}", a, b, scale);
            }
        }
    }

    #[test]
    fn test_moments_invalid_params() {
        assert!(BetaFamily::moments(0.0, 1.0, MomentScale::Natural).is_err());
        assert!(BetaFamily::moments(1.0, f64::INFINITY, MomentScale::Log).is_err());
    }

    #[test]
    fn test_gq_matches_posterior_measure() {
        let rule = BetaFamily::gq(16, 14.0, 6.0).unwrap();
        assert_eq!(rule.len(), 16);
        let total: f64 = rule.weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        let mean = BetaFamily::mean(14.0, 6.0).unwrap();
        assert!((rule.expectation(|x| x) - mean).abs() < 1e-9);
    }

    #[test]
    fn test_cdf_basics() {
        assert!((BetaFamily::cdf(0.5, 2.0, 2.0).unwrap() - 0.5).abs() < 1e-12);
        assert!((BetaFamily::cdf(1.0, 3.0, 4.0).unwrap() - 1.0).abs() < 1e-12);
        assert!(BetaFamily::cdf(0.5, -1.0, 2.0).is_err());
    }
}
