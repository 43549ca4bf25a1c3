//! Element-wise batched evaluation over independent experiments.
//!
//! Every helper treats each index as its own experiment; nothing is shared
//! across indices, so callers may shard batches across threads freely.

use ab_core::{Error, Result, RiskEstimate};

use crate::family::ConjugateFamily;

/// Update a single prior against a slice of per-experiment summaries
/// (scalar-over-array broadcast).
pub fn posterior_batch<F: ConjugateFamily>(
    prior: F::Prior,
    data: &[F::Data],
) -> Result<Vec<(f64, f64)>> {
    data.iter().map(|&d| F::posterior(prior, d)).collect()
}

/// Update paired priors and summaries element-wise.
///
/// Fails with [`Error::Domain`] when the slices differ in length.
pub fn posterior_batch_paired<F: ConjugateFamily>(
    priors: &[F::Prior],
    data: &[F::Data],
) -> Result<Vec<(f64, f64)>> {
    if priors.len() != data.len() {
        return Err(Error::Domain(format!(
            "batch shape mismatch: {} priors vs {} data summaries",
            priors.len(),
            data.len()
        )));
    }
    priors
        .iter()
        .zip(data.iter())
        .map(|(&p, &d)| F::posterior(p, d))
        .collect()
}

/// Two-arm risk over a slice of `((a_par1, a_par2), (b_par1, b_par2))`
/// parameter pairs.
pub fn risk_batch<F: ConjugateFamily>(
    arms: &[((f64, f64), (f64, f64))],
    n: usize,
) -> Result<Vec<RiskEstimate>> {
    arms.iter()
        .map(|&((a1, a2), (b1, b2))| F::risk(a1, a2, b1, b2, n))
        .collect()
}
