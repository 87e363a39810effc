//! Dwell-time kinetics: histograms, summary statistics, and a single
//! exponential decay fit.
//!
//! For a memoryless state the dwell histogram decays as `A·exp(−λ·x)`; the
//! fitted `λ` is the exit rate per sampling interval and `1/λ` the mean
//! lifetime.
use crate::{
    dwell::errors::{DwellError, DwellResult},
    optimization::{
        errors::{OptError, OptResult},
        lsq_optimizer::{Jacobian, LeastSquares, LsqOptions, OptimOutcome, Residuals, Theta, minimize},
    },
};
use ndarray::{Array1, Array2, array};
use statrs::statistics::Statistics;

/// Counts of each dwell value `0..=max`.
///
/// Returns `(values, counts)` as `f64` arrays of equal length; both are
/// empty for an empty input.
pub fn dwell_histogram(lifetimes: &[usize]) -> (Array1<f64>, Array1<f64>) {
    let Some(&max) = lifetimes.iter().max() else {
        return (Array1::zeros(0), Array1::zeros(0));
    };
    let mut counts = Array1::<f64>::zeros(max + 1);
    for &d in lifetimes {
        counts[d] += 1.0;
    }
    let values = Array1::from_iter((0..=max).map(|d| d as f64));
    (values, counts)
}

/// Descriptive statistics of one state's dwell events.
///
/// - `std_dev`: sample standard deviation, `None` with fewer than two events.
/// - `rate`: `1/mean`, `None` when the mean is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifetimeSummary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: Option<f64>,
    pub rate: Option<f64>,
}

impl LifetimeSummary {
    /// # Errors
    /// [`DwellError::EmptyLifetimes`] for an empty slice.
    pub fn from_lifetimes(lifetimes: &[usize]) -> DwellResult<Self> {
        if lifetimes.is_empty() {
            return Err(DwellError::EmptyLifetimes);
        }
        let values: Vec<f64> = lifetimes.iter().map(|&d| d as f64).collect();
        let mean = values.iter().mean();
        let std_dev = (values.len() > 1).then(|| values.iter().std_dev());
        let rate = (mean > 0.0).then(|| 1.0 / mean);
        Ok(LifetimeSummary { count: values.len(), mean, std_dev, rate })
    }
}

/// Result of [`fit_decay`].
///
/// `outcome` describes the fit to the histogram divided by its largest
/// count, so `outcome.cost` is relative to that peak.
#[derive(Debug, Clone, PartialEq)]
pub struct DecayFit {
    pub amplitude: f64,
    pub rate: f64,
    pub outcome: OptimOutcome,
}

impl DecayFit {
    /// Mean lifetime in sampling intervals.
    pub fn mean_lifetime(&self) -> f64 {
        1.0 / self.rate
    }

    /// Mean lifetime in time units, for sampling interval `dt`.
    pub fn mean_lifetime_in(&self, dt: f64) -> f64 {
        dt / self.rate
    }
}

/// Dwell histogram the decay is fitted to.
#[derive(Debug, Clone)]
struct DecayData {
    x: Array1<f64>,
    y: Array1<f64>,
}

/// `θ = (ln A, ln λ)`, residual `A·exp(−λ·x) − y`.
///
/// The log parameterization keeps both amplitude and rate positive for any
/// step the line search takes, so `exp(−λ·x)` stays bounded by one.
struct ExponentialDecay;

impl ExponentialDecay {
    fn natural(theta: &Theta) -> (f64, f64) {
        (theta[0].exp(), theta[1].exp())
    }
}

impl LeastSquares for ExponentialDecay {
    type Data = DecayData;

    fn residuals(&self, theta: &Theta, data: &DecayData) -> OptResult<Residuals> {
        let (a, rate) = Self::natural(theta);
        Ok(data.x.mapv(|x| a * (-rate * x).exp()) - &data.y)
    }

    fn check(&self, theta: &Theta, data: &DecayData) -> OptResult<()> {
        if theta.len() != 2 {
            return Err(OptError::ThetaLengthMismatch { expected: 2, actual: theta.len() });
        }
        if data.x.len() != data.y.len() {
            return Err(OptError::InvalidProblem {
                reason: format!("{} dwell values but {} counts", data.x.len(), data.y.len()),
            });
        }
        Ok(())
    }

    /// `∂f/∂ln A = f`, `∂f/∂ln λ = −λ·x·f` with `f = A·exp(−λ·x)`.
    fn jacobian(&self, theta: &Theta, data: &DecayData) -> OptResult<Jacobian> {
        let (a, rate) = Self::natural(theta);
        let mut jac = Array2::zeros((data.x.len(), 2));
        for (i, &x) in data.x.iter().enumerate() {
            let f = a * (-rate * x).exp();
            jac[[i, 0]] = f;
            jac[[i, 1]] = -rate * x * f;
        }
        Ok(jac)
    }
}

/// Fit `A·exp(−λ·x)` to the dwell histogram of `lifetimes`.
///
/// `initial` is `(A, λ)`; it defaults to `(max count, 1/mean)`. Both must
/// be positive, and the fitted values are positive as well.
///
/// # Errors
/// - [`DwellError::EmptyLifetimes`] for an empty slice.
/// - [`DwellError::DecayFitFailed`] when the histogram has a single bin,
///   the default guess is undefined (all dwells zero), the guess is not
///   positive, the optimizer fails, or it stops without converging.
pub fn fit_decay(
    lifetimes: &[usize], initial: Option<(f64, f64)>, opts: &LsqOptions,
) -> DwellResult<DecayFit> {
    let summary = LifetimeSummary::from_lifetimes(lifetimes)?;
    let (x, y) = dwell_histogram(lifetimes);
    if x.len() < 2 {
        return Err(DwellError::DecayFitFailed {
            reason: "dwell histogram has a single bin".to_string(),
        });
    }

    let scale = y.fold(0.0_f64, |m, &c| m.max(c));
    let (a0, rate0) = match initial {
        Some(guess) => guess,
        None => {
            let rate = summary.rate.ok_or_else(|| DwellError::DecayFitFailed {
                reason: "mean dwell is zero; no default rate".to_string(),
            })?;
            (scale, rate)
        }
    };
    if !(a0 > 0.0 && rate0 > 0.0 && a0.is_finite() && rate0.is_finite()) {
        return Err(DwellError::DecayFitFailed {
            reason: format!("initial guess (A={a0}, rate={rate0}) must be positive and finite"),
        });
    }

    let data = DecayData { x, y: y / scale };
    let outcome = minimize(&ExponentialDecay, array![(a0 / scale).ln(), rate0.ln()], &data, opts)?;
    if !outcome.converged {
        return Err(DwellError::DecayFitFailed {
            reason: format!("optimizer stopped without converging ({})", outcome.status),
        });
    }
    let (relative_amplitude, rate) = ExponentialDecay::natural(&outcome.theta_hat);
    Ok(DecayFit { amplitude: scale * relative_amplitude, rate, outcome })
}
