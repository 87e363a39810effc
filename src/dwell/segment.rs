//! Segmentation of decoded state paths into per-state dwell times.
//!
//! A decoded path is a sequence of 0-based state labels, one per sample.
//! Every maximal run of a constant label is one dwell event for that state.
//! The final run is usually still in progress when recording stops, so it is
//! excluded by default ([`SegmentOptions::skip_last`]).
use crate::dwell::errors::{DwellError, DwellResult};

/// How a run of `k` identical samples is converted into a dwell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DwellCount {
    /// `k − 1`: sampling intervals spent in the state before leaving.
    #[default]
    Intervals,
    /// `k`: number of samples in the run.
    Samples,
}

impl DwellCount {
    fn measure(self, run: usize) -> usize {
        match self {
            DwellCount::Intervals => run.saturating_sub(1),
            DwellCount::Samples => run,
        }
    }
}

/// Segmentation options.
///
/// - `skip_last`: drop the final run of the path (default `true`).
/// - `count`: dwell measure per run (default [`DwellCount::Intervals`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentOptions {
    pub skip_last: bool,
    pub count: DwellCount,
}

impl SegmentOptions {
    pub fn new(skip_last: bool, count: DwellCount) -> Self {
        SegmentOptions { skip_last, count }
    }
}

impl Default for SegmentOptions {
    fn default() -> Self {
        SegmentOptions { skip_last: true, count: DwellCount::Intervals }
    }
}

/// Dwell events per state, in the order they occurred.
///
/// `per_state[s]` lists the dwell values recorded for state `s`; a state
/// that was never visited has an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateLifetimes {
    pub per_state: Vec<Vec<usize>>,
}

impl StateLifetimes {
    pub fn new(per_state: Vec<Vec<usize>>) -> Self {
        StateLifetimes { per_state }
    }

    /// `n` states with no recorded events.
    pub fn empty(n: usize) -> Self {
        StateLifetimes { per_state: vec![Vec::new(); n] }
    }

    pub fn n_states(&self) -> usize {
        self.per_state.len()
    }

    pub fn state(&self, s: usize) -> Option<&[usize]> {
        self.per_state.get(s).map(Vec::as_slice)
    }

    pub fn total_events(&self) -> usize {
        self.per_state.iter().map(Vec::len).sum()
    }
}

/// Split a decoded state path into per-state dwell times.
///
/// `max_state` fixes the number of tracked states to `max_state + 1`; when
/// `None` it is inferred from the largest label in `path` (an empty path
/// then tracks no states).
///
/// # Errors
/// [`DwellError::OutOfRangeState`] for a label above `max_state`.
pub fn split_trace(
    path: &[usize], max_state: Option<usize>, opts: &SegmentOptions,
) -> DwellResult<StateLifetimes> {
    let n_states = match max_state {
        Some(max) => {
            if let Some((index, &state)) = path.iter().enumerate().find(|(_, s)| **s > max) {
                return Err(DwellError::OutOfRangeState { index, state, max });
            }
            max + 1
        }
        None => path.iter().max().map_or(0, |m| m + 1),
    };

    let mut runs = runs_of(path);
    if opts.skip_last {
        runs.pop();
    }

    let mut out = StateLifetimes::empty(n_states);
    for (state, len) in runs {
        out.per_state[state].push(opts.count.measure(len));
    }
    Ok(out)
}

/// Maximal constant runs as `(label, length)`.
fn runs_of(path: &[usize]) -> Vec<(usize, usize)> {
    let mut runs: Vec<(usize, usize)> = Vec::new();
    for &s in path {
        match runs.last_mut() {
            Some((label, len)) if *label == s => *len += 1,
            _ => runs.push((s, 1)),
        }
    }
    runs
}
