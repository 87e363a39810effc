//! Integration tests for the histogram → HMM seed → batch dwell pipeline.
//!
//! Purpose
//! -------
//! - Validate the end-to-end workflow: pooled signal histogram, Gaussian
//!   mixture fit, HMM seeding, decoding a batch of traces with a
//!   caller-supplied decoder, and aggregating dwell times.
//! - Exercise realistic shapes (two well-separated FRET states, traces of
//!   different lengths) rather than toy edge cases only.
//!
//! Coverage
//! --------
//! - `mixture`: `histogram_1d`, `fit_mixture` via `seed_hmm`, report writers.
//! - `trace`: `Trace::new`, `observations`, `predicted_series`.
//! - `pipeline`: `seed_hmm`, `analyze_batch`, `summarize_batch`.
//! - `dwell`: `split_trace`, `pool_lifetimes` semantics through the summary.
//!
//! Exclusions
//! ----------
//! - Optimizer configuration edge cases and per-layer validation, which
//!   are covered by unit tests.
//! - Python bindings.
use ndarray::{Array1, ArrayView2};
use statrs::distribution::{ContinuousCDF, Normal};
use trace_kinetics::{
    dwell::{AggregationPolicy, SegmentOptions, split_trace},
    mixture::{
        FitOptions, HmmParams, InitOptions, MixtureModel, Mode, histogram_1d, save_model_summary,
        write_components,
    },
    optimization::lsq_optimizer::{LineSearcher, LsqOptions, Tolerances},
    pipeline::{
        AnalysisOptions, PipelineError, PipelineResult, SeedOptions, StateDecoder, analyze_batch,
        seed_hmm, summarize_batch,
    },
    trace::{Channel, Trace, TraceError},
};

const MEANS: [f64; 2] = [0.3, 0.7];

/// Purpose
/// -------
/// Deterministic samples whose histogram is close to a two-component
/// Gaussian mixture: normal quantiles at `(j + 0.5)/n` per state.
fn pooled_samples() -> Array1<f64> {
    let mut out = Vec::new();
    for (mean, sd, n) in [(MEANS[0], 0.05, 600), (MEANS[1], 0.06, 400)] {
        let normal = Normal::new(mean, sd).unwrap();
        out.extend((0..n).map(|j| normal.inverse_cdf((j as f64 + 0.5) / n as f64)));
    }
    Array1::from(out)
}

/// Expand alternating run lengths, starting in state `first`, into a path.
fn path_from_runs(first: usize, runs: &[usize]) -> Vec<usize> {
    let mut path = Vec::new();
    let mut state = first;
    for &len in runs {
        path.extend(std::iter::repeat(state).take(len));
        state = 1 - state;
    }
    path
}

/// A ratio-only trace at the state means with small deterministic jitter.
fn trace_for(path: &[usize]) -> Trace {
    let n = path.len();
    let ratio: Vec<f64> =
        path.iter().enumerate().map(|(i, &s)| MEANS[s] + 0.02 * (i as f64).sin()).collect();
    Trace::new(
        Array1::linspace(0.0, 0.1 * (n - 1) as f64, n),
        None,
        None,
        Some(Array1::from(ratio)),
    )
    .unwrap()
}

/// Labels rows by a fixed threshold between two 1-D state means.
struct ThresholdDecoder;

impl StateDecoder for ThresholdDecoder {
    fn decode(
        &self, params: &HmmParams, observations: ArrayView2<f64>,
    ) -> PipelineResult<Vec<usize>> {
        if params.n_states() != 2 || observations.ncols() != 1 {
            return Err(PipelineError::DecoderFailed {
                reason: "threshold decoder handles two 1-D states only".to_string(),
            });
        }
        let cut = 0.5 * (params.means[[0, 0]] + params.means[[1, 0]]);
        Ok(observations.column(0).iter().map(|&v| usize::from(v > cut)).collect())
    }
}

fn seed_options() -> SeedOptions {
    let tols = Tolerances::new(Some(1e-4), Some(1e-12), Some(2000)).unwrap();
    let lsq = LsqOptions::new(tols, LineSearcher::MoreThuente, false, None, None).unwrap();
    SeedOptions::new(FitOptions::new(lsq, true), InitOptions::default())
}

fn seeded_params() -> HmmParams {
    let data = histogram_1d(pooled_samples().view(), 50, Some((0.0, 1.0))).unwrap();
    let model = MixtureModel::new(Mode::OneD);
    let guess = Array1::from(vec![80.0, 0.35, 0.08, 40.0, 0.65, 0.08]);
    seed_hmm(&model, &data, guess, &[1, 1], &seed_options()).unwrap().params
}

#[test]
// Purpose
// -------
// The histogram fit recovers both states and seeds a consistent HMM.
//
// Given
// -----
// - 600 samples at N(0.3, 0.05²) and 400 at N(0.7, 0.06²), 50 bins.
//
// Expect
// ------
// - Means within 0.01 of the truth, σ² near the truth, start probabilities
//   near 0.6 / 0.4, sticky transition rows.
fn seed_hmm_from_histogram_recovers_states() {
    let params = seeded_params();

    assert_eq!(params.n_states(), 2);
    assert!((params.means[[0, 0]] - 0.3).abs() < 0.01);
    assert!((params.means[[1, 0]] - 0.7).abs() < 0.01);
    assert!((params.covars[[0, 0, 0]].sqrt() - 0.05).abs() < 0.01);
    assert!((params.covars[[1, 0, 0]].sqrt() - 0.06).abs() < 0.01);
    assert!((params.start_prob[0] - 0.6).abs() < 0.05);
    assert!((params.start_prob.sum() - 1.0).abs() < 1e-12);
    assert!((params.trans_mat[[0, 0]] - 0.96).abs() < 1e-12);
    assert!((params.trans_mat[[0, 1]] - 0.04).abs() < 1e-12);
}

#[test]
// Purpose
// -------
// Batch decoding, isolation of a bad trace, and lifetime aggregation.
//
// Given
// -----
// - Three traces with known run structure plus one intensity-only trace.
// - The seeded model and a threshold decoder.
//
// Expect
// ------
// - Decoded paths equal the designed paths; the intensity-only trace fails
//   alone with MissingChannel.
// - Pooled lifetimes equal the concatenation of per-path segmentations.
fn analyze_batch_and_summarize() {
    let params = seeded_params();
    let paths = [
        path_from_runs(0, &[5, 3, 8, 2, 6]),
        path_from_runs(1, &[4, 4, 7, 3]),
        path_from_runs(0, &[2, 9, 5, 5, 1]),
    ];
    let mut traces: Vec<Trace> = paths.iter().map(|p| trace_for(p)).collect();
    traces.insert(
        1,
        Trace::new(Array1::linspace(0.0, 0.3, 4), Some(Array1::ones(4)), Some(Array1::ones(4)), None)
            .unwrap(),
    );

    let results = analyze_batch(&traces, &params, &ThresholdDecoder, &AnalysisOptions::default());

    assert_eq!(results.len(), 4);
    assert!(matches!(
        results[1],
        Err(PipelineError::Trace(TraceError::MissingChannel { channel: Channel::Ratio }))
    ));
    let analyses: Vec<_> = results.into_iter().filter_map(Result::ok).collect();
    assert_eq!(analyses.len(), 3);
    for (analysis, path) in analyses.iter().zip(&paths) {
        assert_eq!(&analysis.path, path);
    }

    let summary = summarize_batch(&analyses, AggregationPolicy::TruncateToShortest).unwrap();

    let mut expected_pooled = vec![Vec::new(), Vec::new()];
    for path in &paths {
        let single = split_trace(path, Some(1), &SegmentOptions::default()).unwrap();
        for (pooled, events) in expected_pooled.iter_mut().zip(single.per_state) {
            pooled.extend(events);
        }
    }
    assert_eq!(summary.pooled.per_state, expected_pooled);
    // First trace: state 0 runs 5, 8 (last run 6 skipped) → intervals 4, 7.
    assert_eq!(&summary.pooled.per_state[0][..2], &[4, 7]);
    assert_eq!(summary.summaries[0].unwrap().count, expected_pooled[0].len());
    assert!(summary.summaries[1].unwrap().mean > 0.0);
}

#[test]
// Purpose
// -------
// Plot series and the persisted summary agree with the seeded model.
//
// Given
// -----
// - One decoded trace; a temporary directory.
//
// Expect
// ------
// - Predicted values are the decoded state means.
// - The summary file holds the four sections in order.
// - Component lines are printed for both fitted states.
fn series_and_reports() {
    let data = histogram_1d(pooled_samples().view(), 50, Some((0.0, 1.0))).unwrap();
    let model = MixtureModel::new(Mode::OneD);
    let guess = Array1::from(vec![80.0, 0.35, 0.08, 40.0, 0.65, 0.08]);
    let seed = seed_hmm(&model, &data, guess, &[1, 1], &seed_options()).unwrap();

    let path = path_from_runs(0, &[3, 2, 3]);
    let trace = trace_for(&path);
    let points = trace.predicted_series(Channel::Ratio, &path, &seed.params).unwrap();
    for (point, &state) in points.iter().zip(&path) {
        assert_eq!(point.predicted, Some(seed.params.means[[state, 0]]));
    }

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("hmm_model.txt");
    save_model_summary(&file, &seed.params).unwrap();
    let text = std::fs::read_to_string(&file).unwrap();
    let order: Vec<usize> =
        ["Means", "Covariances (sigma^2)", "Start probability", "Transition matrix"]
            .iter()
            .map(|label| text.find(label).unwrap())
            .collect();
    assert!(text.starts_with("HMM\n"));
    assert!(order.windows(2).all(|w| w[0] < w[1]));

    let mut buf = Vec::new();
    write_components(&mut buf, &seed.fit.components).unwrap();
    let listing = String::from_utf8(buf).unwrap();
    assert!(listing.contains("Gaussian 1:"));
    assert!(listing.contains("Gaussian 2:"));
}
