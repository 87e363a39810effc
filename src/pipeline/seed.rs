//! Fit → expand → initialize, as one call.
use crate::{
    mixture::{
        FitOptions, HmmParams, InitOptions, MixtureData, MixtureFit, MixtureModel,
        StateDescriptor, expand_degenerate, fit_mixture, initialize_hmm,
    },
    pipeline::errors::PipelineResult,
};
use ndarray::Array1;

/// Options for [`seed_hmm`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SeedOptions {
    pub fit: FitOptions,
    pub init: InitOptions,
}

impl SeedOptions {
    pub fn new(fit: FitOptions, init: InitOptions) -> Self {
        SeedOptions { fit, init }
    }
}

/// Everything produced while seeding an HMM from a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HmmSeed {
    pub fit: MixtureFit,
    pub states: Vec<StateDescriptor>,
    pub params: HmmParams,
}

/// Fit `model` to `data`, expand the components by `degeneracy`, and seed
/// HMM parameters from the resulting states.
///
/// # Errors
/// Any [`MixtureError`](crate::mixture::MixtureError) from the three steps,
/// wrapped in [`PipelineError::Mixture`](crate::pipeline::PipelineError).
pub fn seed_hmm(
    model: &MixtureModel, data: &MixtureData, guess: Array1<f64>, degeneracy: &[usize],
    opts: &SeedOptions,
) -> PipelineResult<HmmSeed> {
    let fit = fit_mixture(model, data, guess, &opts.fit)?;
    log::debug!(
        "mixture fit converged after {} iterations (cost {:.3e})",
        fit.outcome.iterations,
        fit.outcome.cost
    );
    let states = expand_degenerate(&fit.components, degeneracy)?;
    let params = initialize_hmm(&states, model.mode, &opts.init)?;
    log::info!("seeded {}-state HMM from {} components", params.n_states(), fit.n_components());
    Ok(HmmSeed { fit, states, params })
}
