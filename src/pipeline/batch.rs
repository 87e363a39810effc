//! Per-trace decoding and segmentation, in parallel over a batch, plus the
//! batch-level lifetime summary.
use crate::{
    dwell::{
        AggregationPolicy, LifetimeSummary, SegmentOptions, StateLifetimes, cumulate_lifetimes,
        pool_lifetimes, split_trace,
    },
    mixture::{HmmParams, Mode},
    pipeline::{
        decoder::StateDecoder,
        errors::{PipelineError, PipelineResult},
    },
    trace::Trace,
};
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

/// Options for [`analyze_trace`] / [`analyze_batch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalysisOptions {
    pub segment: SegmentOptions,
}

/// Decoded path and dwell times of one trace.
///
/// `lifetimes` always tracks every model state, so analyses of the same
/// model aggregate without a state-count mismatch.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceAnalysis {
    pub path: Vec<usize>,
    pub lifetimes: StateLifetimes,
}

/// Batch-level lifetimes.
///
/// - `cumulative`: run-aligned sums ([`cumulate_lifetimes`]).
/// - `pooled`: every event, trace by trace ([`pool_lifetimes`]).
/// - `summaries`: per-state statistics of `pooled`; `None` for a state
///   with no events.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub cumulative: StateLifetimes,
    pub pooled: StateLifetimes,
    pub summaries: Vec<Option<LifetimeSummary>>,
}

/// Decode `trace` under `params` and split the path into dwell times.
///
/// # Errors
/// - [`PipelineError::EmptyModel`] / [`PipelineError::UnsupportedDims`] for
///   unusable parameters.
/// - [`PipelineError::Trace`] when the trace lacks the model's channels.
/// - Decoder errors as returned, and [`PipelineError::PathLengthMismatch`]
///   when the path does not cover every observation.
/// - [`PipelineError::Dwell`] for labels outside the model.
pub fn analyze_trace<D: StateDecoder + ?Sized>(
    trace: &Trace, params: &HmmParams, decoder: &D, opts: &AnalysisOptions,
) -> PipelineResult<TraceAnalysis> {
    let mode = mode_of(params)?;
    let max_state = params.n_states().checked_sub(1).ok_or(PipelineError::EmptyModel)?;

    let observations = trace.observations(mode)?;
    let path = decoder.decode(params, observations.view())?;
    if path.len() != observations.nrows() {
        return Err(PipelineError::PathLengthMismatch {
            expected: observations.nrows(),
            actual: path.len(),
        });
    }

    let lifetimes = split_trace(&path, Some(max_state), &opts.segment)?;
    log::debug!("trace of {} samples: {} dwell events", path.len(), lifetimes.total_events());
    Ok(TraceAnalysis { path, lifetimes })
}

/// [`analyze_trace`] over every trace, in parallel.
///
/// Results are returned in input order; a failing trace yields an `Err` in
/// its slot and does not affect the others.
pub fn analyze_batch<D: StateDecoder + ?Sized>(
    traces: &[Trace], params: &HmmParams, decoder: &D, opts: &AnalysisOptions,
) -> Vec<PipelineResult<TraceAnalysis>> {
    log::info!("analyzing {} traces with a {}-state model", traces.len(), params.n_states());
    let results: Vec<PipelineResult<TraceAnalysis>> = traces
        .par_iter()
        .enumerate()
        .map(|(i, trace)| {
            let result = analyze_trace(trace, params, decoder, opts);
            if let Err(e) = &result {
                log::warn!("trace {i}: {e}. Skipping...");
            }
            result
        })
        .collect();
    let failed = results.iter().filter(|r| r.is_err()).count();
    log::info!("analyzed {} traces, {failed} failed", results.len() - failed);
    results
}

/// Aggregate the lifetimes of successful analyses.
///
/// # Errors
/// [`PipelineError::Dwell`] for an empty batch, differing state counts, or
/// (under [`AggregationPolicy::Strict`]) differing run counts.
pub fn summarize_batch(
    analyses: &[TraceAnalysis], policy: AggregationPolicy,
) -> PipelineResult<BatchSummary> {
    let lifetimes: Vec<StateLifetimes> = analyses.iter().map(|a| a.lifetimes.clone()).collect();
    let cumulative = cumulate_lifetimes(&lifetimes, policy)?;
    let pooled = pool_lifetimes(&lifetimes)?;
    let summaries = pooled
        .per_state
        .iter()
        .map(|events| LifetimeSummary::from_lifetimes(events).ok())
        .collect();
    Ok(BatchSummary { cumulative, pooled, summaries })
}

fn mode_of(params: &HmmParams) -> PipelineResult<Mode> {
    match params.dims() {
        1 => Ok(Mode::OneD),
        2 => Ok(Mode::TwoD),
        dims => Err(PipelineError::UnsupportedDims { dims }),
    }
}
