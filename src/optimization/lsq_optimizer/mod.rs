//! lsq_optimizer — argmin-powered nonlinear least-squares minimizer.
//!
//! Purpose
//! -------
//! Provide a high-level optimization layer for fitting models to data by
//! minimizing `c(θ) = ½·Σ r_i(θ)²`. Callers implement a single trait,
//! [`LeastSquares`], and invoke [`minimize`] to run L-BFGS with a
//! configurable line search, tolerances, iteration and time budgets, and
//! finite-difference fallbacks.
//!
//! Key behaviors
//! -------------
//! - Convert user residuals `r(θ)` into Argmin-compatible cost functions via
//!   [`adapter::ArgMinAdapter`]; the gradient is `Jᵀr`.
//! - Expose a single entrypoint [`minimize`] that:
//!   - validates the initial guess with [`LeastSquares::check`],
//!   - selects an L-BFGS solver via [`builders`] based on [`LineSearcher`],
//!   - executes the solver via [`run::run_lbfgs`], and
//!   - normalizes results into an [`OptimOutcome`].
//! - Provide finite-difference Jacobians in [`finite_diff`] when analytic
//!   derivatives are missing; [`compute_jacobian`] is also used by the
//!   covariance code after a fit.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`LeastSquares::residuals`] returns a vector of fixed length for a
//!   given data payload, and treats invalid inputs as recoverable
//!   [`OptError`](crate::optimization::errors::OptError) values.
//! - [`OptimOutcome::converged`] is `true` only for solver-declared
//!   convergence; iteration or time budget exhaustion is reported as a
//!   non-converged outcome, and model layers decide whether that is fatal.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover the cost/gradient convention, FD
//!   fallbacks, configuration validation and termination mapping.
//! - [`api`] tests run full solves on linear problems; the mixture and
//!   dwell fitters exercise the optimizer on nonlinear models.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::finite_diff::compute_jacobian;
pub use self::traits::{LeastSquares, LineSearcher, LsqOptions, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Jacobian, Residuals, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{LeastSquares, LineSearcher, LsqOptions, OptimOutcome, Tolerances};
    pub use super::types::{Jacobian, Residuals, Theta};
}
