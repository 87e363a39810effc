//! optimization — least-squares stack and unified error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used for model fitting: an Argmin-backed
//! nonlinear least-squares minimizer (`lsq_optimizer`) and a single
//! error/result surface (`errors`). Callers implement residuals, choose
//! tolerances and budgets, and obtain fitted parameters and diagnostics
//! without touching backend solver details.
//!
//! Conventions
//! -----------
//! - Parameters, residuals, gradients and Jacobians are `ndarray`-based
//!   aliases (`Theta`, `Residuals`, `Grad`, `Jacobian`).
//! - Public entrypoints that can fail return `OptResult<T>`; callers never
//!   see raw Argmin errors.
//! - This module does no I/O; progress output exists only behind the
//!   `obs_slog` feature when `LsqOptions::verbose` is set.
//!
//! Downstream usage
//! ----------------
//! - `mixture::fitter` fits Gaussian sums to intensity histograms.
//! - `dwell::kinetics` fits exponential decays to dwell-time histograms.
//! - `inference::covariance` reuses `compute_jacobian` for standard errors.

pub mod errors;
pub mod lsq_optimizer;

// Downstream crates can write
//
//     use trace_kinetics::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::lsq_optimizer::prelude::*;
}
