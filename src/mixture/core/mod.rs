//! core — Gaussian-mixture building blocks.
//!
//! Purpose
//! -------
//! Collect the pieces every mixture workflow needs: the [`Mode`] and
//! [`MixtureComponent`] types, the [`MixtureModel`] evaluator with its
//! analytic Jacobian, the [`MixtureData`] container and histogram
//! builders, and option structs for fitting and HMM seeding.
//!
//! Conventions
//! -----------
//! - Flat parameter layout per component: `(A, μ, σ)` in 1-D,
//!   `(A, μ_A, σ_A, μ_B, σ_B)` in 2-D.
//! - This module performs no I/O and no logging.

pub mod component;
pub mod data;
pub mod model;
pub mod options;

pub use self::component::{MixtureComponent, Mode, flatten_components};
pub use self::data::{Coords, MixtureData, histogram_1d, histogram_2d};
pub use self::model::{MixtureModel, Positivity};
pub use self::options::{DEFAULT_P_SELF, FitOptions, InitOptions};
