//! The state-decoding seam.
//!
//! Decoding (Viterbi, posterior argmax, ...) is supplied by the caller. The
//! pipeline only needs a label per observation row.
use crate::{
    mixture::HmmParams,
    pipeline::errors::{PipelineError, PipelineResult},
};
use ndarray::ArrayView2;

/// Assigns a 0-based state label to each observation row.
///
/// `observations` is `n × dims`, as produced by
/// [`Trace::observations`](crate::trace::Trace::observations). The returned
/// path must have exactly `n` entries. Implementations are shared across
/// worker threads during batch analysis.
pub trait StateDecoder: Sync {
    fn decode(&self, params: &HmmParams, observations: ArrayView2<f64>)
    -> PipelineResult<Vec<usize>>;
}

/// Labels each observation with the state whose mean is nearest in
/// Euclidean distance. Ignores transitions; useful as a baseline and for
/// well-separated states.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestMeanDecoder;

impl StateDecoder for NearestMeanDecoder {
    fn decode(
        &self, params: &HmmParams, observations: ArrayView2<f64>,
    ) -> PipelineResult<Vec<usize>> {
        if observations.ncols() != params.dims() {
            return Err(PipelineError::DecoderFailed {
                reason: format!(
                    "observations have {} columns, model has {} dims",
                    observations.ncols(),
                    params.dims()
                ),
            });
        }
        let path = observations
            .rows()
            .into_iter()
            .map(|obs| {
                params
                    .means
                    .rows()
                    .into_iter()
                    .map(|mean| (&mean - &obs).mapv(|d| d * d).sum())
                    .enumerate()
                    .fold((0, f64::INFINITY), |best, (i, d)| if d < best.1 { (i, d) } else { best })
                    .0
            })
            .collect();
        Ok(path)
    }
}
