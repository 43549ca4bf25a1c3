//! Gaussian quadrature rules tailored to posterior distributions.
//!
//! Rules are built with the Golub-Welsch algorithm: the nodes of an n-point
//! rule are the eigenvalues of the symmetric tridiagonal Jacobi matrix of the
//! weight function's orthogonal-polynomial recurrence, and the weights are
//! the squared first components of the corresponding eigenvectors.
//!
//! Because the eigenvector matrix is orthogonal, the squared first components
//! sum to exactly 1, so the returned weights are already normalized to a
//! probability measure. This avoids evaluating gamma-function ratios that
//! overflow for the large shape parameters produced by high-traffic
//! experiments.

use ab_core::{Error, Result};

/// An n-point quadrature rule over a posterior's support.
///
/// `nodes` are evaluation points in ascending order; `weights` are
/// non-negative and sum to 1, so `Σ f(nodes[i]) * weights[i]` approximates
/// `E[f(X)]` under the posterior.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadratureRule {
    /// Evaluation points, ascending.
    pub nodes: Vec<f64>,
    /// Probability weights, same length as `nodes`.
    pub weights: Vec<f64>,
}

impl QuadratureRule {
    /// Number of points in the rule.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the rule holds no points.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Discrete expectation `Σ f(nodes[i]) * weights[i]`.
    pub fn expectation(&self, f: impl Fn(f64) -> f64) -> f64 {
        self.nodes
            .iter()
            .zip(self.weights.iter())
            .map(|(&x, &w)| f(x) * w)
            .sum()
    }
}

/// Gauss-Hermite rule for the probabilists' weight `exp(-x²/2)`.
///
/// Approximates expectations under a standard Normal; callers rescale the
/// nodes affinely for other locations and scales. Weights sum to 1.
pub fn gauss_hermite_norm(n: usize) -> Result<QuadratureRule> {
    check_order(n)?;
    // Monic probabilists' Hermite recurrence: He_{k+1} = x·He_k − k·He_{k−1},
    // so the Jacobi matrix has zero diagonal and off-diagonal sqrt(k).
    let d = vec![0.0; n];
    let mut e = vec![0.0; n];
    for (k, ek) in e.iter_mut().enumerate().take(n - 1) {
        *ek = ((k + 1) as f64).sqrt();
    }
    golub_welsch(d, e)
}

/// Shifted Gauss-Jacobi rule on [0, 1] for the Beta kernel
/// `x^(alpha−1) · (1−x)^(beta−1)`.
///
/// Approximates expectations under a Beta(`alpha`, `beta`) posterior.
/// Weights sum to 1. Requires `alpha > 0` and `beta > 0`.
pub fn gauss_jacobi_shifted(n: usize, alpha: f64, beta: f64) -> Result<QuadratureRule> {
    check_order(n)?;
    if !alpha.is_finite() || alpha <= 0.0 {
        return Err(Error::Domain(format!(
            "Jacobi rule requires alpha finite and > 0, got {}",
            alpha
        )));
    }
    if !beta.is_finite() || beta <= 0.0 {
        return Err(Error::Domain(format!(
            "Jacobi rule requires beta finite and > 0, got {}",
            beta
        )));
    }

    // Standard Jacobi exponents on [-1, 1] under x = (1 + t) / 2:
    // (1 − t)^al · (1 + t)^be with al = beta − 1, be = alpha − 1.
    let al = beta - 1.0;
    let be = alpha - 1.0;
    let s = al + be;

    let mut d = vec![0.0; n];
    let mut e = vec![0.0; n];
    d[0] = (be - al) / (s + 2.0);
    for k in 1..n {
        let kf = k as f64;
        let t = 2.0 * kf + s;
        d[k] = (be * be - al * al) / (t * (t + 2.0));
        // Off-diagonal squared from the monic Jacobi three-term recurrence;
        // k = 1 uses the cancelled form, which stays finite as s → −1.
        let b2 = if k == 1 {
            4.0 * (1.0 + al) * (1.0 + be) / ((2.0 + s) * (2.0 + s) * (3.0 + s))
        } else {
            4.0 * kf * (kf + al) * (kf + be) * (kf + s) / (t * t * (t + 1.0) * (t - 1.0))
        };
        e[k - 1] = b2.sqrt();
    }

    let mut rule = golub_welsch(d, e)?;
    for x in &mut rule.nodes {
        *x = 0.5 * (*x + 1.0);
    }
    Ok(rule)
}

fn check_order(n: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::Domain(
            "quadrature order must be a positive integer".into(),
        ));
    }
    Ok(())
}

/// Solve the Jacobi-matrix eigenproblem and assemble the sorted rule.
///
/// `d` is the diagonal, `e` the off-diagonal (`e[k]` couples rows k and k+1;
/// the last slot is workspace).
fn golub_welsch(mut d: Vec<f64>, mut e: Vec<f64>) -> Result<QuadratureRule> {
    let z = eigen_first_components(&mut d, &mut e)?;
    let n = d.len();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| d[i].total_cmp(&d[j]));

    let nodes: Vec<f64> = order.iter().map(|&i| d[i]).collect();
    let weights: Vec<f64> = order.iter().map(|&i| z[i] * z[i]).collect();
    Ok(QuadratureRule { nodes, weights })
}

/// Implicit-shift QL iteration for a symmetric tridiagonal matrix.
///
/// Diagonalizes `d`/`e` in place and returns the first component of each
/// eigenvector: every Givens rotation is applied to the tracked row as it
/// would be to the full eigenvector matrix, so `out[i]` ends up as the first
/// component of the eigenvector belonging to eigenvalue `d[i]`.
fn eigen_first_components(d: &mut [f64], e: &mut [f64]) -> Result<Vec<f64>> {
    let n = d.len();
    let mut z = vec![0.0; n];
    z[0] = 1.0;
    if n == 1 {
        return Ok(z);
    }

    for l in 0..n {
        let mut iter = 0;
        loop {
            // Find the first negligible off-diagonal element at or after l.
            let mut m = l;
            while m < n - 1 {
                let dd = d[m].abs() + d[m + 1].abs();
                if e[m].abs() <= f64::EPSILON * dd {
                    break;
                }
                m += 1;
            }
            if m == l {
                break;
            }
            iter += 1;
            if iter > 50 {
                return Err(Error::Computation(
                    "tridiagonal eigensolve did not converge".into(),
                ));
            }

            // Shift: eigenvalue of the leading 2x2 closest to d[l].
            let mut g = (d[l + 1] - d[l]) / (2.0 * e[l]);
            let mut r = g.hypot(1.0);
            g = d[m] - d[l] + e[l] / (g + if g >= 0.0 { r } else { -r });

            let mut s = 1.0;
            let mut c = 1.0;
            let mut p = 0.0;
            let mut underflow = false;
            for i in (l..m).rev() {
                let mut f = s * e[i];
                let b = c * e[i];
                r = f.hypot(g);
                e[i + 1] = r;
                if r == 0.0 {
                    d[i + 1] -= p;
                    e[m] = 0.0;
                    underflow = true;
                    break;
                }
                s = f / r;
                c = g / r;
                g = d[i + 1] - p;
                r = (d[i] - g) * s + 2.0 * c * b;
                p = s * r;
                d[i + 1] = g + p;
                g = c * r - b;

                f = z[i + 1];
                z[i + 1] = s * z[i] + c * f;
                z[i] = c * z[i] - s * f;
            }
            if underflow {
                continue;
            }
            d[l] -= p;
            e[l] = g;
            e[m] = 0.0;
        }
    }
    Ok(z)
}
