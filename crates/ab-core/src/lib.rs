//! Core types shared across the A/B decision workspace.
//!
//! This crate holds the pieces every other crate depends on:
//! - the error taxonomy (`Error`, `Result`)
//! - plain value types for posterior summaries and risk estimates

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Moments, RiskEstimate};
