//! lsq_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Name the `ndarray` shapes and Argmin solver generics used by the
//! least-squares optimizer in one place so the rest of the stack never
//! spells out `LBFGS<MoreThuenteLineSearch<Array1<f64>, ...>, ...>`.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` have length `p` (number of free parameters).
//! - `Residuals` has length `m` (number of observations).
//! - `Jacobian` is dense `m × p`, row `i` holding `∂r_i/∂θ`.
//! - `Cost` is the scalar `½·‖r‖²`.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ`.
pub type Theta = Array1<f64>;

/// Gradient of the cost, `∇c(θ) = Jᵀr`.
pub type Grad = Array1<f64>;

/// Residual vector `r(θ) = f(x; θ) − y`.
pub type Residuals = Array1<f64>;

/// Dense residual Jacobian, `m × p`.
pub type Jacobian = Array2<f64>;

/// Scalar objective `c(θ) = ½·Σ r_i²`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver
/// (e.g. `"cost_count"`, `"gradient_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Hager–Zhang line search specialized to this crate's numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate's numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
