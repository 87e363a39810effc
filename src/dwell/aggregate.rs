//! Combine per-trace dwell lists across a batch.
//!
//! Two views are offered:
//! - [`cumulate_lifetimes`]: element-wise sum at matching run index, for
//!   batches whose traces share a run structure.
//! - [`pool_lifetimes`]: concatenation of every trace's events, the usual
//!   input to dwell histograms and decay fits.
//!
//! Inputs are never mutated; both return a fresh [`StateLifetimes`].
use crate::dwell::{
    errors::{DwellError, DwellResult},
    segment::StateLifetimes,
};

/// Handling of differing per-state run counts in [`cumulate_lifetimes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AggregationPolicy {
    /// Differing counts are an error.
    #[default]
    Strict,
    /// Sum only the leading runs every trace has.
    TruncateToShortest,
}

/// Element-wise sum of dwell lists, per state, across `traces`.
///
/// # Errors
/// - [`DwellError::EmptyBatch`] for no traces.
/// - [`DwellError::StateCountMismatch`] when traces track different numbers
///   of states.
/// - [`DwellError::LengthMismatch`] under [`AggregationPolicy::Strict`] when
///   a state's run count differs from the first trace's.
pub fn cumulate_lifetimes(
    traces: &[StateLifetimes], policy: AggregationPolicy,
) -> DwellResult<StateLifetimes> {
    let first = check_batch(traces)?;

    let mut out = Vec::with_capacity(first.n_states());
    for (state, lead) in first.per_state.iter().enumerate() {
        let len = match policy {
            AggregationPolicy::Strict => {
                for (trace, t) in traces.iter().enumerate().skip(1) {
                    let actual = t.per_state[state].len();
                    if actual != lead.len() {
                        return Err(DwellError::LengthMismatch {
                            state,
                            trace,
                            expected: lead.len(),
                            actual,
                        });
                    }
                }
                lead.len()
            }
            AggregationPolicy::TruncateToShortest => {
                traces.iter().map(|t| t.per_state[state].len()).min().unwrap_or(0)
            }
        };

        let summed: Vec<usize> =
            (0..len).map(|k| traces.iter().map(|t| t.per_state[state][k]).sum()).collect();
        out.push(summed);
    }
    Ok(StateLifetimes::new(out))
}

/// Concatenate every trace's dwell events per state, in trace order.
///
/// # Errors
/// [`DwellError::EmptyBatch`] or [`DwellError::StateCountMismatch`].
pub fn pool_lifetimes(traces: &[StateLifetimes]) -> DwellResult<StateLifetimes> {
    let first = check_batch(traces)?;

    let mut out = StateLifetimes::empty(first.n_states());
    for t in traces {
        for (pooled, events) in out.per_state.iter_mut().zip(&t.per_state) {
            pooled.extend_from_slice(events);
        }
    }
    Ok(out)
}

fn check_batch(traces: &[StateLifetimes]) -> DwellResult<&StateLifetimes> {
    let first = traces.first().ok_or(DwellError::EmptyBatch)?;
    let expected = first.n_states();
    if let Some((trace, t)) = traces.iter().enumerate().find(|(_, t)| t.n_states() != expected) {
        return Err(DwellError::StateCountMismatch { trace, expected, actual: t.n_states() });
    }
    Ok(first)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lifetimes(lists: &[&[usize]]) -> StateLifetimes {
        StateLifetimes::new(lists.iter().map(|l| l.to_vec()).collect())
    }

    #[test]
    // Purpose
    // -------
    // Matching run structures sum element-wise and inputs stay untouched.
    //
    // Given
    // -----
    // - {0: [2, 3], 1: [1]} and {0: [4, 1], 1: [5]}.
    //
    // Expect
    // ------
    // - {0: [6, 4], 1: [6]}; the first input is unchanged.
    fn cumulate_sums_matching_runs() {
        let a = lifetimes(&[&[2, 3], &[1]]);
        let b = lifetimes(&[&[4, 1], &[5]]);
        let batch = [a.clone(), b];

        let out = cumulate_lifetimes(&batch, AggregationPolicy::Strict).unwrap();

        assert_eq!(out, lifetimes(&[&[6, 4], &[6]]));
        assert_eq!(batch[0], a);
    }

    #[test]
    // Purpose
    // -------
    // Differing run counts fail under Strict and truncate on request.
    //
    // Given
    // -----
    // - {0: [2, 3], 1: [1]} and {0: [4], 1: [5]}.
    //
    // Expect
    // ------
    // - Strict: LengthMismatch { state 0, trace 1, expected 2, actual 1 }.
    // - TruncateToShortest: {0: [6], 1: [6]}.
    fn cumulate_length_policies() {
        let batch = [lifetimes(&[&[2, 3], &[1]]), lifetimes(&[&[4], &[5]])];

        assert_eq!(
            cumulate_lifetimes(&batch, AggregationPolicy::Strict).unwrap_err(),
            DwellError::LengthMismatch { state: 0, trace: 1, expected: 2, actual: 1 }
        );
        assert_eq!(
            cumulate_lifetimes(&batch, AggregationPolicy::TruncateToShortest).unwrap(),
            lifetimes(&[&[6], &[6]])
        );
    }

    #[test]
    // Purpose
    // -------
    // Batch-level shape errors.
    //
    // Given
    // -----
    // - An empty batch; traces tracking 2 and 3 states.
    //
    // Expect
    // ------
    // - EmptyBatch; StateCountMismatch for both aggregators.
    fn batch_shape_errors() {
        assert_eq!(
            cumulate_lifetimes(&[], AggregationPolicy::Strict).unwrap_err(),
            DwellError::EmptyBatch
        );
        assert_eq!(pool_lifetimes(&[]).unwrap_err(), DwellError::EmptyBatch);

        let batch = [StateLifetimes::empty(2), StateLifetimes::empty(3)];
        let expected = DwellError::StateCountMismatch { trace: 1, expected: 2, actual: 3 };
        assert_eq!(cumulate_lifetimes(&batch, AggregationPolicy::Strict).unwrap_err(), expected);
        assert_eq!(pool_lifetimes(&batch).unwrap_err(), expected);
    }

    #[test]
    // Purpose
    // -------
    // Pooling concatenates in trace order regardless of run counts.
    //
    // Given
    // -----
    // - {0: [2, 3], 1: []} and {0: [4], 1: [5, 6]}.
    //
    // Expect
    // ------
    // - {0: [2, 3, 4], 1: [5, 6]}.
    fn pool_concatenates_in_trace_order() {
        let batch = [lifetimes(&[&[2, 3], &[]]), lifetimes(&[&[4], &[5, 6]])];

        let out = pool_lifetimes(&batch).unwrap();

        assert_eq!(out, lifetimes(&[&[2, 3, 4], &[5, 6]]));
    }

    #[test]
    // Purpose
    // -------
    // The single-state two-trace case sums position by position.
    //
    // Given
    // -----
    // - {0: [1, 2]} and {0: [3, 4]}.
    //
    // Expect
    // ------
    // - {0: [4, 6]}.
    fn cumulate_single_state_pair() {
        let batch = [lifetimes(&[&[1, 2]]), lifetimes(&[&[3, 4]])];

        let out = cumulate_lifetimes(&batch, AggregationPolicy::Strict).unwrap();

        assert_eq!(out, lifetimes(&[&[4, 6]]));
    }
}
