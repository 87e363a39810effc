//! Degeneracy expansion: map fitted components onto HMM states.
//!
//! Two kinetically distinct states can share the same observable value, so a
//! single fitted component may seed several states. `degeneracy[i]` is the
//! number of states component `i` contributes; zero drops it.
use crate::mixture::{
    core::{MixtureComponent, Mode},
    errors::{MixtureError, MixtureResult},
};
use ndarray::ArrayView1;

/// One HMM state seeded from a fitted component.
///
/// - `state`: position in the expanded state list.
/// - `source`: index of the component it was copied from.
/// - `component`: the component's values (shared by all its copies).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateDescriptor {
    pub state: usize,
    pub source: usize,
    pub component: MixtureComponent,
}

/// Expand fitted components by their multiplicities, in fit order.
///
/// # Errors
/// [`MixtureError::DegeneracyMismatch`] when the two slices differ in length.
pub fn expand_degenerate(
    components: &[MixtureComponent], degeneracy: &[usize],
) -> MixtureResult<Vec<StateDescriptor>> {
    if components.len() != degeneracy.len() {
        return Err(MixtureError::DegeneracyMismatch {
            components: components.len(),
            degeneracy: degeneracy.len(),
        });
    }

    let mut states = Vec::with_capacity(degeneracy.iter().sum());
    for (source, (component, &copies)) in components.iter().zip(degeneracy).enumerate() {
        for _ in 0..copies {
            states.push(StateDescriptor { state: states.len(), source, component: *component });
        }
    }
    Ok(states)
}

/// Split a flat parameter vector into typed components.
///
/// # Errors
/// [`MixtureError::MalformedParameters`] when the length is not a multiple
/// of `mode.arity()`.
pub fn components_from_flat(
    params: ArrayView1<f64>, mode: Mode,
) -> MixtureResult<Vec<MixtureComponent>> {
    let arity = mode.arity();
    if params.len() % arity != 0 {
        return Err(MixtureError::MalformedParameters { len: params.len(), arity });
    }
    let flat = params.to_vec();
    flat.chunks_exact(arity).map(|chunk| MixtureComponent::from_slice(mode, chunk)).collect()
}
