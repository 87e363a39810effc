//! MixtureFitter — least-squares fit of a Gaussian sum to observed values.
//!
//! Purpose
//! -------
//! Fit a [`MixtureModel`] to a histogram (or any sampled surface) starting
//! from a user-supplied guess, through the crate's L-BFGS least-squares
//! optimizer, and report the fitted parameters as both a flat vector and
//! typed components.
//!
//! Key behaviors
//! -------------
//! - Rejects guesses with no components, non-finite entries or an arity
//!   inconsistent with the mode before any optimization work.
//! - Treats only solver-declared convergence as success. An exhausted
//!   iteration budget (`tols.max_iter`) or time budget (`max_time`) is a
//!   [`MixtureError::FitFailure`]; the initial guess is never returned as if
//!   fitted.
//! - Canonicalizes the estimate (non-negative amplitude/width under
//!   [`Positivity::Absolute`](crate::mixture::core::Positivity)) so start
//!   weights derived from it are meaningful.
//! - Optionally attaches Gauss–Newton standard errors.
use crate::{
    inference::lsq_standard_errors,
    mixture::{
        core::{FitOptions, MixtureComponent, MixtureData, MixtureModel},
        degeneracy::components_from_flat,
        errors::{MixtureError, MixtureResult},
    },
    optimization::lsq_optimizer::{OptimOutcome, minimize},
};
use ndarray::Array1;

/// Result of a converged mixture fit.
///
/// - `params`: canonical flat parameter vector (same layout as the guess).
/// - `components`: `params` split into typed components, in fit order.
/// - `outcome`: optimizer diagnostics (cost, iterations, status).
/// - `std_errors`: per-parameter standard errors, when requested and
///   defined (`n_points > n_params`).
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureFit {
    pub params: Array1<f64>,
    pub components: Vec<MixtureComponent>,
    pub outcome: OptimOutcome,
    pub std_errors: Option<Array1<f64>>,
}

impl MixtureFit {
    pub fn n_components(&self) -> usize {
        self.components.len()
    }
}

/// Fit `model` to `data` from `initial_guess`.
///
/// # Errors
/// [`MixtureError::FitFailure`] for an invalid guess, any optimizer error,
/// or a run that ends without convergence.
pub fn fit_mixture(
    model: &MixtureModel, data: &MixtureData, initial_guess: Array1<f64>, opts: &FitOptions,
) -> MixtureResult<MixtureFit> {
    validate_guess(model, &initial_guess)?;
    let outcome = minimize(model, initial_guess, data, &opts.lsq)?;
    if !outcome.converged {
        return Err(MixtureError::FitFailure {
            reason: format!(
                "optimizer stopped without converging after {} iterations ({})",
                outcome.iterations, outcome.status
            ),
        });
    }

    let params = model.canonicalize(outcome.theta_hat.view());
    let components = components_from_flat(params.view(), model.mode)?;
    let std_errors = if opts.std_errors && data.len() > params.len() {
        Some(lsq_standard_errors(model, &params, data)?)
    } else {
        None
    };
    Ok(MixtureFit { params, components, outcome, std_errors })
}

fn validate_guess(model: &MixtureModel, guess: &Array1<f64>) -> MixtureResult<()> {
    let arity = model.mode.arity();
    if guess.is_empty() {
        return Err(MixtureError::FitFailure {
            reason: "initial guess contains no components".to_string(),
        });
    }
    if guess.len() % arity != 0 {
        return Err(MixtureError::FitFailure {
            reason: format!(
                "initial guess length {} is not a multiple of the component arity {arity}",
                guess.len()
            ),
        });
    }
    if let Some((index, value)) = guess.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(MixtureError::FitFailure {
            reason: format!("initial guess has non-finite value {value} at index {index}"),
        });
    }
    Ok(())
}
