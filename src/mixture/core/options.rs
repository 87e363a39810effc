//! Configuration for mixture fitting and HMM seeding.
use crate::{
    mixture::errors::{MixtureError, MixtureResult},
    optimization::lsq_optimizer::LsqOptions,
};

/// Default probability of staying in the same state between samples.
pub const DEFAULT_P_SELF: f64 = 0.96;

/// Options for [`fit_mixture`](crate::mixture::fitter::fit_mixture).
///
/// - `lsq`: optimizer configuration (tolerances, iteration budget
///   `tols.max_iter`, wall-clock budget `max_time`, line search).
/// - `std_errors`: compute Gauss–Newton standard errors after a converged
///   fit (skipped automatically when there are no more points than
///   parameters).
#[derive(Debug, Clone, PartialEq)]
pub struct FitOptions {
    pub lsq: LsqOptions,
    pub std_errors: bool,
}

impl FitOptions {
    pub fn new(lsq: LsqOptions, std_errors: bool) -> Self {
        FitOptions { lsq, std_errors }
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions { lsq: LsqOptions::default(), std_errors: true }
    }
}

/// Options for [`initialize_hmm`](crate::mixture::hmm_init::initialize_hmm).
///
/// `p_self` fills the diagonal of the seeded transition matrix; the
/// remaining `1 − p_self` is spread evenly over the other states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitOptions {
    p_self: f64,
}

impl InitOptions {
    /// # Errors
    /// [`MixtureError::InvalidSelfTransition`] unless `0 ≤ p_self ≤ 1`.
    pub fn new(p_self: f64) -> MixtureResult<Self> {
        if !p_self.is_finite() || !(0.0..=1.0).contains(&p_self) {
            return Err(MixtureError::InvalidSelfTransition { value: p_self });
        }
        Ok(InitOptions { p_self })
    }

    pub fn p_self(&self) -> f64 {
        self.p_self
    }
}

impl Default for InitOptions {
    fn default() -> Self {
        InitOptions { p_self: DEFAULT_P_SELF }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // `InitOptions::new` accepts the closed unit interval only.
    //
    // Given
    // -----
    // - 0.0, 1.0, -0.1, 1.5, NaN.
    //
    // Expect
    // ------
    // - The bounds are accepted; the rest are `InvalidSelfTransition`.
    fn init_options_validate_p_self() {
        assert!(InitOptions::new(0.0).is_ok());
        assert!(InitOptions::new(1.0).is_ok());
        assert_eq!(
            InitOptions::new(-0.1),
            Err(MixtureError::InvalidSelfTransition { value: -0.1 })
        );
        assert!(InitOptions::new(1.5).is_err());
        assert!(InitOptions::new(f64::NAN).is_err());
        assert_eq!(InitOptions::default().p_self(), DEFAULT_P_SELF);
    }
}
