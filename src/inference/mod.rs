//! inference — post-fit uncertainty for least-squares estimates.
//!
//! Purpose
//! -------
//! Provide standard errors and covariance matrices for parameters fitted by
//! `optimization::lsq_optimizer`, using the Gauss–Newton information
//! `JᵀJ` and the residual variance at the optimum.
//!
//! Conventions
//! -----------
//! - All functions are pure (no I/O, no global state) and report failures
//!   as `OptResult`.
//! - Covariances are expressed in the optimizer's parameter space `θ`.

pub mod covariance;

pub use self::covariance::{lsq_covariance, lsq_standard_errors};

pub mod prelude {
    pub use super::covariance::{lsq_covariance, lsq_standard_errors};
}
