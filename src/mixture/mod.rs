//! mixture — Gaussian-mixture state discovery and HMM seeding.
//!
//! Purpose
//! -------
//! Turn an observed distribution of a single-molecule signal into starting
//! parameters for a Gaussian-emission HMM: model the distribution as a sum
//! of Gaussians, fit it by least squares, expand fitted components into
//! (possibly degenerate) states, and derive means, covariances, start
//! probabilities, and a sticky transition matrix.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the data containers ([`MixtureData`], histograms), the
//!   component types, the evaluable [`MixtureModel`] with its analytic
//!   Jacobian, and the option structs.
//! - [`fitter`] runs the least-squares fit and reports [`MixtureFit`];
//!   non-convergence is always an error.
//! - [`degeneracy`] maps fitted components onto HMM states.
//! - [`hmm_init`] builds [`HmmParams`] from those states.
//! - [`report`] renders component and model summaries as text.
//!
//! Conventions
//! -----------
//! - Flat parameters are laid out per component as `(A, μ, σ)` (1-D) or
//!   `(A, μ_A, σ_A, μ_B, σ_B)` (2-D).
//! - Everything except [`report`]'s writers is pure and performs no I/O
//!   or logging.
//! - Errors surface as [`MixtureError`]; optimizer errors arrive as
//!   [`MixtureError::FitFailure`].
//!
//! Downstream usage
//! ----------------
//! 1. Bin samples with [`histogram_1d`] / [`histogram_2d`].
//! 2. [`fit_mixture`] with an initial guess.
//! 3. [`expand_degenerate`] the fitted components.
//! 4. [`initialize_hmm`] and optionally [`save_model_summary`].

pub mod core;
pub mod degeneracy;
pub mod errors;
pub mod fitter;
pub mod hmm_init;
pub mod report;

pub use self::core::{
    Coords, DEFAULT_P_SELF, FitOptions, InitOptions, MixtureComponent, MixtureData, MixtureModel,
    Mode, Positivity, flatten_components, histogram_1d, histogram_2d,
};
pub use self::degeneracy::{StateDescriptor, components_from_flat, expand_degenerate};
pub use self::errors::{MixtureError, MixtureResult};
pub use self::fitter::{MixtureFit, fit_mixture};
pub use self::hmm_init::{HmmParams, initialize_hmm};
pub use self::report::{save_model_summary, write_components, write_model_summary};

pub mod prelude {
    pub use super::{
        Coords, FitOptions, HmmParams, InitOptions, MixtureComponent, MixtureData, MixtureError,
        MixtureFit, MixtureModel, MixtureResult, Mode, StateDescriptor, expand_degenerate,
        fit_mixture, histogram_1d, histogram_2d, initialize_hmm,
    };
}
