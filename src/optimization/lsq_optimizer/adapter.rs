//! Adapter that exposes a user `LeastSquares` model as an `argmin` problem.
//!
//! The cost handed to argmin is `c(θ) = ½·Σ r_i(θ)²` and its gradient is
//! `Jᵀr`, where `J` is the analytic residual Jacobian when the model
//! provides one and a finite-difference estimate otherwise.
use crate::optimization::{
    errors::OptResult,
    lsq_optimizer::{
        finite_diff::compute_jacobian,
        traits::LeastSquares,
        types::{Cost, Grad, Residuals, Theta},
        validation::{validate_grad, validate_residuals},
    },
};
use argmin::core::{CostFunction, Error, Gradient};

/// Bridges a user `LeastSquares` model to `argmin`'s `CostFunction` and
/// `Gradient`.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: LeastSquares> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: LeastSquares> ArgMinAdapter<'a, F> {
    /// Construct a new adapter over a residual model and its data.
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    /// Evaluate and validate `r(θ)`.
    pub fn residuals(&self, theta: &Theta) -> OptResult<Residuals> {
        let r = self.f.residuals(theta, self.data)?;
        validate_residuals(&r)?;
        Ok(r)
    }
}

impl<'a, F: LeastSquares> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// Evaluate `c(θ) = ½·r·r`.
    ///
    /// # Errors
    /// Propagates residual errors and `NonFiniteResidual` via `?`.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let r = self.residuals(theta)?;
        Ok(0.5 * r.dot(&r))
    }
}

impl<'a, F: LeastSquares> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// Evaluate `∇c(θ) = J(θ)ᵀ·r(θ)`.
    ///
    /// # Errors
    /// - Residual or Jacobian errors from the model.
    /// - Validation errors if the product is non-finite.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        let r = self.residuals(theta)?;
        let jac = compute_jacobian(self.f, theta, self.data, r.len())?;
        let grad = jac.t().dot(&r);
        validate_grad(&grad, theta.len())?;
        Ok(grad)
    }
}
