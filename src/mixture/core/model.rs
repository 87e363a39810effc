//! MixtureModel — sums of unnormalized Gaussians and their derivatives.
//!
//! Purpose
//! -------
//! Evaluate `f(x; θ) = Σ_k A_k·exp(−½((x−μ_k)/σ_k)²)` (1-D) or the
//! product form over two axes (2-D) at a set of coordinates, provide the
//! analytic Jacobian `∂f/∂θ` for least-squares fitting, and plug both into
//! the optimizer through [`LeastSquares`].
//!
//! Key behaviors
//! -------------
//! - [`Positivity::Absolute`] evaluates with `|A|` and `|σ|`, so any real θ
//!   describes a non-negative peak; [`Positivity::AsGiven`] uses θ verbatim.
//!   1-D models default to `Absolute`, 2-D models to `AsGiven`.
//! - Empty θ (zero components) evaluates to all zeros.
//! - [`MixtureModel::canonicalize`] maps θ to the representative with
//!   non-negative amplitude and width without changing the model output.
//!
//! Invariants & assumptions
//! ------------------------
//! - θ length is a multiple of [`Mode::arity`].
//! - Coordinate mode equals model mode.
//! - Evaluation is pure; a zero width yields non-finite output, which the
//!   optimizer reports as a non-finite residual.
use crate::{
    mixture::{
        core::{
            component::Mode,
            data::{Coords, MixtureData},
        },
        errors::{MixtureError, MixtureResult},
    },
    optimization::{
        errors::OptResult,
        lsq_optimizer::{Jacobian, LeastSquares, Residuals, Theta},
    },
};
use ndarray::{Array1, Array2, ArrayView1, s};

/// Sign convention for amplitudes and widths during evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Positivity {
    /// Use `|A|` and `|σ|`.
    Absolute,
    /// Use `A` and `σ` as given.
    AsGiven,
}

/// Gaussian-sum evaluator for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MixtureModel {
    pub mode: Mode,
    pub positivity: Positivity,
}

impl MixtureModel {
    /// Model with the default positivity for `mode`.
    pub fn new(mode: Mode) -> Self {
        let positivity = match mode {
            Mode::OneD => Positivity::Absolute,
            Mode::TwoD => Positivity::AsGiven,
        };
        MixtureModel { mode, positivity }
    }

    pub fn with_positivity(mut self, positivity: Positivity) -> Self {
        self.positivity = positivity;
        self
    }

    /// Number of components encoded in `params`.
    ///
    /// # Errors
    /// [`MixtureError::MalformedParameters`] if the length is not a multiple
    /// of the arity.
    pub fn n_components(&self, params: ArrayView1<f64>) -> MixtureResult<usize> {
        let arity = self.mode.arity();
        if params.len() % arity != 0 {
            return Err(MixtureError::MalformedParameters { len: params.len(), arity });
        }
        Ok(params.len() / arity)
    }

    /// Evaluate the Gaussian sum at every coordinate.
    ///
    /// # Errors
    /// - [`MixtureError::MalformedParameters`] on a bad θ length.
    /// - [`MixtureError::ModeMismatch`] if `coords` has the other mode.
    pub fn evaluate(&self, params: ArrayView1<f64>, coords: &Coords) -> MixtureResult<Array1<f64>> {
        let n_comp = self.prepare(params, coords)?;
        let arity = self.mode.arity();
        let mut out = Array1::<f64>::zeros(coords.len());
        for k in 0..n_comp {
            let p = params.slice(s![k * arity..(k + 1) * arity]);
            let amp = self.amp(p[0]);
            match coords {
                Coords::OneD(x) => {
                    let (mu, sigma) = (p[1], self.width(p[2]));
                    out.zip_mut_with(x, |o, &xi| *o += amp * gauss(xi, mu, sigma));
                }
                Coords::TwoD { a, b } => {
                    let (mu_a, sigma_a) = (p[1], self.width(p[2]));
                    let (mu_b, sigma_b) = (p[3], self.width(p[4]));
                    for ((o, &xa), &xb) in out.iter_mut().zip(a.iter()).zip(b.iter()) {
                        *o += amp * gauss(xa, mu_a, sigma_a) * gauss(xb, mu_b, sigma_b);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Analytic Jacobian `∂f(x_i)/∂θ_j`, shape `n_points × θ.len()`.
    ///
    /// Per component with `e = exp(−½z²)`, `z = (x−μ)/σ`:
    /// - `∂A = s·e` where `s = sign(A)` under `Absolute` and 1 otherwise,
    /// - `∂μ = A'·e·(x−μ)/σ²`,
    /// - `∂σ = A'·e·(x−μ)²/σ³`,
    ///
    /// with `A'` the effective amplitude. The width derivative is the same
    /// for `|σ|` and `σ` because the term depends on `σ²` only. In 2-D the
    /// other axis' factor multiplies each term.
    ///
    /// # Errors
    /// As [`MixtureModel::evaluate`].
    pub fn jacobian(&self, params: ArrayView1<f64>, coords: &Coords) -> MixtureResult<Array2<f64>> {
        let n_comp = self.prepare(params, coords)?;
        let arity = self.mode.arity();
        let mut jac = Array2::<f64>::zeros((coords.len(), params.len()));
        for k in 0..n_comp {
            let c0 = k * arity;
            let p = params.slice(s![c0..c0 + arity]);
            let amp = self.amp(p[0]);
            let amp_sign = self.amp_sign(p[0]);
            match coords {
                Coords::OneD(x) => {
                    let (mu, sigma) = (p[1], p[2]);
                    for (i, &xi) in x.iter().enumerate() {
                        let d = xi - mu;
                        let e = gauss(xi, mu, sigma);
                        jac[(i, c0)] = amp_sign * e;
                        jac[(i, c0 + 1)] = amp * e * d / (sigma * sigma);
                        jac[(i, c0 + 2)] = amp * e * d * d / (sigma * sigma * sigma);
                    }
                }
                Coords::TwoD { a, b } => {
                    let (mu_a, sigma_a, mu_b, sigma_b) = (p[1], p[2], p[3], p[4]);
                    for (i, (&xa, &xb)) in a.iter().zip(b.iter()).enumerate() {
                        let (da, db) = (xa - mu_a, xb - mu_b);
                        let ea = gauss(xa, mu_a, sigma_a);
                        let eb = gauss(xb, mu_b, sigma_b);
                        let e = ea * eb;
                        jac[(i, c0)] = amp_sign * e;
                        jac[(i, c0 + 1)] = amp * e * da / (sigma_a * sigma_a);
                        jac[(i, c0 + 2)] = amp * e * da * da / (sigma_a * sigma_a * sigma_a);
                        jac[(i, c0 + 3)] = amp * e * db / (sigma_b * sigma_b);
                        jac[(i, c0 + 4)] = amp * e * db * db / (sigma_b * sigma_b * sigma_b);
                    }
                }
            }
        }
        Ok(jac)
    }

    /// Replace amplitudes and widths by their absolute values under
    /// [`Positivity::Absolute`]; identity under [`Positivity::AsGiven`].
    pub fn canonicalize(&self, params: ArrayView1<f64>) -> Array1<f64> {
        let mut out = params.to_owned();
        if self.positivity == Positivity::AsGiven {
            return out;
        }
        let arity = self.mode.arity();
        let positive_slots: &[usize] = match self.mode {
            Mode::OneD => &[0, 2],
            Mode::TwoD => &[0, 2, 4],
        };
        for (j, v) in out.iter_mut().enumerate() {
            if positive_slots.contains(&(j % arity)) {
                *v = v.abs();
            }
        }
        out
    }

    // ---- helpers ----

    fn prepare(&self, params: ArrayView1<f64>, coords: &Coords) -> MixtureResult<usize> {
        let n_comp = self.n_components(params)?;
        if coords.mode() != self.mode {
            return Err(MixtureError::ModeMismatch { expected: self.mode, found: coords.mode() });
        }
        Ok(n_comp)
    }

    fn amp(&self, a: f64) -> f64 {
        match self.positivity {
            Positivity::Absolute => a.abs(),
            Positivity::AsGiven => a,
        }
    }

    fn amp_sign(&self, a: f64) -> f64 {
        match self.positivity {
            Positivity::Absolute => a.signum(),
            Positivity::AsGiven => 1.0,
        }
    }

    fn width(&self, sigma: f64) -> f64 {
        match self.positivity {
            Positivity::Absolute => sigma.abs(),
            Positivity::AsGiven => sigma,
        }
    }
}

#[inline]
fn gauss(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    (-0.5 * z * z).exp()
}

impl LeastSquares for MixtureModel {
    type Data = MixtureData;

    /// `r_i = f(x_i; θ) − y_i`.
    fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals> {
        let fitted = self.evaluate(theta.view(), &data.coords)?;
        Ok(fitted - &data.values)
    }

    /// θ must encode at least one component and the data must match the
    /// model's mode.
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()> {
        let n_comp = self.n_components(theta.view())?;
        if n_comp == 0 {
            return Err(MixtureError::FitFailure {
                reason: "initial guess contains no components".to_string(),
            }
            .into());
        }
        if data.mode() != self.mode {
            return Err(MixtureError::ModeMismatch { expected: self.mode, found: data.mode() }.into());
        }
        Ok(())
    }

    fn jacobian(&self, theta: &Theta, data: &Self::Data) -> OptResult<Jacobian> {
        Ok(MixtureModel::jacobian(self, theta.view(), &data.coords)?)
    }
}
