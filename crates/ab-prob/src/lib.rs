//! Probability building blocks for two-armed Bayesian A/B decisions.
//!
//! This crate hosts the conjugate-family math consumed by experiment
//! analysis:
//! - closed-form posterior updates (Beta-Binomial, Normal-Normal)
//! - posterior summary moments, optionally on the log scale
//! - Gaussian-quadrature risk (expected opportunity loss) for two arms
//!
//! Every operation is a pure function of its inputs; batched evaluation over
//! independent experiments lives in [`batch`].

pub mod batch;
pub mod beta;
pub mod family;
pub mod math;
pub mod normal;
pub mod quadrature;

pub use beta::{BetaFamily, BetaParams, BinomialCount};
pub use family::{ConjugateFamily, FamilyKind, MomentScale, DEFAULT_RISK_POINTS};
pub use normal::{GaussianSummary, NormalFamily};
pub use quadrature::QuadratureRule;
