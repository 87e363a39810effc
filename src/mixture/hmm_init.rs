//! HMM seeding from expanded mixture states.
//!
//! Builds Gaussian-emission HMM starting parameters from a list of
//! [`StateDescriptor`]s:
//! - emission means and diagonal covariances (`σ²` per axis);
//! - start probabilities proportional to each state's population weight;
//! - a "sticky" transition matrix with `p_self` on the diagonal.
use crate::mixture::{
    core::{InitOptions, Mode},
    degeneracy::StateDescriptor,
    errors::{MixtureError, MixtureResult},
};
use ndarray::{Array1, Array2, Array3, ArrayView1};

/// Starting parameters for a Gaussian-emission HMM.
///
/// Shapes, with `N` states and `D` observation axes:
/// - `means`: `N × D`
/// - `covars`: `N × D × D`, diagonal
/// - `start_prob`: `N`, sums to 1
/// - `trans_mat`: `N × N`, rows sum to 1
#[derive(Debug, Clone, PartialEq)]
pub struct HmmParams {
    pub means: Array2<f64>,
    pub covars: Array3<f64>,
    pub start_prob: Array1<f64>,
    pub trans_mat: Array2<f64>,
}

impl HmmParams {
    pub fn n_states(&self) -> usize {
        self.means.nrows()
    }

    pub fn dims(&self) -> usize {
        self.means.ncols()
    }

    /// Emission mean of state `i`, or `None` when out of range.
    pub fn state_mean(&self, i: usize) -> Option<ArrayView1<'_, f64>> {
        (i < self.n_states()).then(|| self.means.row(i))
    }
}

/// Seed HMM parameters from `states`.
///
/// # Errors
/// Checked in this order:
/// - [`MixtureError::InsufficientStates`] for fewer than two states.
/// - [`MixtureError::ModeMismatch`] when a state's component is not `mode`.
/// - [`MixtureError::InvalidWeight`] for a negative or non-finite weight.
///   Only a negative amplitude can make the weight negative; a negative
///   width (possible for 2-D fits, which evaluate σ as given) seeds the
///   same parameters as its absolute value.
/// - [`MixtureError::DegenerateInitialization`] when all weights are zero.
pub fn initialize_hmm(
    states: &[StateDescriptor], mode: Mode, opts: &InitOptions,
) -> MixtureResult<HmmParams> {
    let n = states.len();
    if n < 2 {
        return Err(MixtureError::InsufficientStates { n });
    }
    if let Some(bad) = states.iter().find(|s| s.component.mode() != mode) {
        return Err(MixtureError::ModeMismatch { expected: mode, found: bad.component.mode() });
    }

    let dims = mode.dims();
    let mut means = Array2::zeros((n, dims));
    let mut covars = Array3::zeros((n, dims, dims));
    let mut weights = Array1::zeros(n);
    for (i, s) in states.iter().enumerate() {
        for (d, (mu, sigma)) in s.component.means().into_iter().zip(s.component.stds()).enumerate() {
            means[[i, d]] = mu;
            covars[[i, d, d]] = sigma * sigma;
        }
        let w = s.component.weight();
        if !w.is_finite() || w < 0.0 {
            return Err(MixtureError::InvalidWeight { state: i, value: w });
        }
        weights[i] = w;
    }

    let total = weights.sum();
    if total <= 0.0 {
        return Err(MixtureError::DegenerateInitialization);
    }
    let start_prob = weights / total;

    let p_self = opts.p_self();
    let off = (1.0 - p_self) / (n - 1) as f64;
    let trans_mat = Array2::from_shape_fn((n, n), |(i, j)| if i == j { p_self } else { off });

    Ok(HmmParams { means, covars, start_prob, trans_mat })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixture::{
        core::{Coords, MixtureComponent, MixtureModel},
        degeneracy::expand_degenerate,
    };
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Shapes and values of seeded parameters in both modes.
    // - Stochasticity of start probabilities and transition rows.
    // - The ordered validation errors.
    // -------------------------------------------------------------------------

    fn states_1d(specs: &[(f64, f64, f64)]) -> Vec<StateDescriptor> {
        let comps: Vec<MixtureComponent> = specs
            .iter()
            .map(|&(amplitude, mean, std)| MixtureComponent::OneD { amplitude, mean, std })
            .collect();
        expand_degenerate(&comps, &vec![1; comps.len()]).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // 1-D seeding follows the A·σ weighting and sticky transitions.
    //
    // Given
    // -----
    // - States (A=10, μ=0.2, σ=0.1) and (A=30, μ=0.7, σ=0.1), p_self = 0.9.
    //
    // Expect
    // ------
    // - means [[0.2], [0.7]], covars diag 0.01, start [0.25, 0.75],
    //   trans [[0.9, 0.1], [0.1, 0.9]].
    fn initialize_hmm_1d_values() {
        let states = states_1d(&[(10.0, 0.2, 0.1), (30.0, 0.7, 0.1)]);
        let opts = InitOptions::new(0.9).unwrap();

        let hmm = initialize_hmm(&states, Mode::OneD, &opts).unwrap();

        assert_eq!(hmm.n_states(), 2);
        assert_eq!(hmm.dims(), 1);
        assert_eq!(hmm.means, array![[0.2], [0.7]]);
        assert_abs_diff_eq!(hmm.covars[[0, 0, 0]], 0.01, epsilon = 1e-15);
        assert_abs_diff_eq!(hmm.start_prob[0], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(hmm.start_prob[1], 0.75, epsilon = 1e-12);
        let expected = array![[0.9, 0.1], [0.1, 0.9]];
        for (got, want) in hmm.trans_mat.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*got, *want, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // 2-D seeding has zero off-diagonal covariance and rows summing to 1.
    //
    // Given
    // -----
    // - Three 2-D states, default p_self.
    //
    // Expect
    // ------
    // - covars[i, 0, 1] == covars[i, 1, 0] == 0, diag = σ², every
    //   transition row sums to 1 with 0.02 off-diagonal.
    fn initialize_hmm_2d_shapes_and_rows() {
        let comps = [
            MixtureComponent::TwoD { amplitude: 5.0, mean_a: 1.0, std_a: 0.2, mean_b: 2.0, std_b: 0.3 },
            MixtureComponent::TwoD { amplitude: 2.0, mean_a: 3.0, std_a: 0.5, mean_b: 1.0, std_b: 0.4 },
        ];
        let states = expand_degenerate(&comps, &[2, 1]).unwrap();

        let hmm = initialize_hmm(&states, Mode::TwoD, &InitOptions::default()).unwrap();

        assert_eq!(hmm.covars.dim(), (3, 2, 2));
        for i in 0..3 {
            assert_eq!(hmm.covars[[i, 0, 1]], 0.0);
            assert_eq!(hmm.covars[[i, 1, 0]], 0.0);
            assert_abs_diff_eq!(hmm.trans_mat.row(i).sum(), 1.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(hmm.covars[[2, 1, 1]], 0.16, epsilon = 1e-12);
        assert_abs_diff_eq!(hmm.trans_mat[[0, 1]], 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(hmm.start_prob.sum(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hmm.start_prob[0], hmm.start_prob[1], epsilon = 1e-15);
        assert_eq!(hmm.state_mean(2).unwrap().to_vec(), vec![3.0, 1.0]);
        assert!(hmm.state_mean(3).is_none());
    }

    #[test]
    // Purpose
    // -------
    // Validation errors surface in their documented order.
    //
    // Given
    // -----
    // - One state; a 1-D state under TwoD; a negative weight; all-zero
    //   weights.
    //
    // Expect
    // ------
    // - InsufficientStates, ModeMismatch, InvalidWeight,
    //   DegenerateInitialization respectively.
    fn initialize_hmm_error_order() {
        let opts = InitOptions::default();

        let single = states_1d(&[(1.0, 0.1, 0.1)]);
        assert_eq!(
            initialize_hmm(&single, Mode::TwoD, &opts).unwrap_err(),
            MixtureError::InsufficientStates { n: 1 }
        );

        let pair = states_1d(&[(1.0, 0.1, 0.1), (1.0, 0.5, 0.1)]);
        assert_eq!(
            initialize_hmm(&pair, Mode::TwoD, &opts).unwrap_err(),
            MixtureError::ModeMismatch { expected: Mode::TwoD, found: Mode::OneD }
        );

        let negative = states_1d(&[(1.0, 0.1, 0.1), (-2.0, 0.5, 0.1)]);
        assert!(matches!(
            initialize_hmm(&negative, Mode::OneD, &opts).unwrap_err(),
            MixtureError::InvalidWeight { state: 1, .. }
        ));

        let zero = states_1d(&[(0.0, 0.1, 0.1), (0.0, 0.5, 0.1)]);
        assert_eq!(
            initialize_hmm(&zero, Mode::OneD, &opts).unwrap_err(),
            MixtureError::DegenerateInitialization
        );
    }

    #[test]
    // Purpose
    // -------
    // Seeded emissions describe the same peaks as the mixture they came
    // from: rebuilding a Gaussian sum from means, covariances and start
    // probabilities keeps the ordering of peak heights.
    //
    // Given
    // -----
    // - Components (A=10, μ=0.2, σ=0.1), (30, 0.5, 0.08), (20, 0.8, 0.12).
    // - Rebuilt amplitudes `start_prob_i / σ_i`, which undo the A·σ weights
    //   up to one common factor.
    //
    // Expect
    // ------
    // - Evaluated at each seeded mean, the original and rebuilt models rank
    //   the states identically (1, 2, 0 from highest).
    fn seeded_emissions_preserve_peak_order() {
        let specs = [(10.0, 0.2, 0.1), (30.0, 0.5, 0.08), (20.0, 0.8, 0.12)];
        let original: Vec<f64> = specs.iter().flat_map(|&(a, m, s)| [a, m, s]).collect();
        let hmm = initialize_hmm(&states_1d(&specs), Mode::OneD, &InitOptions::default()).unwrap();

        let mut rebuilt = Vec::new();
        for i in 0..hmm.n_states() {
            let sigma = hmm.covars[[i, 0, 0]].sqrt();
            rebuilt.extend([hmm.start_prob[i] / sigma, hmm.means[[i, 0]], sigma]);
        }
        let at_means = Coords::OneD(hmm.means.column(0).to_owned());
        let model = MixtureModel::new(Mode::OneD);
        let before = model.evaluate(Array1::from(original).view(), &at_means).unwrap();
        let after = model.evaluate(Array1::from(rebuilt).view(), &at_means).unwrap();

        let rank = |y: &Array1<f64>| {
            let mut idx: Vec<usize> = (0..y.len()).collect();
            idx.sort_by(|&i, &j| y[j].total_cmp(&y[i]));
            idx
        };
        assert_eq!(rank(&before), vec![1, 2, 0]);
        assert_eq!(rank(&after), rank(&before));
    }

    #[test]
    // Purpose
    // -------
    // A 2-D fit that lands on a negative width is the same model as its
    // positive twin and seeds the same HMM.
    //
    // Given
    // -----
    // - Two 2-D states; the second copy flips the sign of one `std_a`.
    //
    // Expect
    // ------
    // - Both seed successfully with identical parameters.
    fn initialize_hmm_2d_ignores_width_sign() {
        let comp = |std_a: f64| {
            [
                MixtureComponent::TwoD { amplitude: 5.0, mean_a: 1.0, std_a, mean_b: 2.0, std_b: 0.3 },
                MixtureComponent::TwoD { amplitude: 2.0, mean_a: 3.0, std_a: 0.5, mean_b: 1.0, std_b: 0.4 },
            ]
        };
        let opts = InitOptions::default();
        let positive = expand_degenerate(&comp(0.2), &[1, 1]).unwrap();
        let flipped = expand_degenerate(&comp(-0.2), &[1, 1]).unwrap();

        let a = initialize_hmm(&positive, Mode::TwoD, &opts).unwrap();
        let b = initialize_hmm(&flipped, Mode::TwoD, &opts).unwrap();

        assert_eq!(a, b);
    }
}
