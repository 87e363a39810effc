//! lsq_optimizer::finite_diff — finite-difference residual Jacobians.
//!
//! Purpose
//! -------
//! Approximate `∂r/∂θ` when a [`LeastSquares`] model does not supply an
//! analytic Jacobian, and give the adapter and the covariance code a single
//! entry point, [`compute_jacobian`], that prefers the analytic path.
//!
//! Key behaviors
//! -------------
//! - Central differences first; forward differences when any residual
//!   evaluation failed or the central estimate does not validate.
//! - Errors raised inside the residual closure are captured in a shared
//!   `RefCell` (the `finitediff` closures cannot return `Result`) and
//!   re-raised after differencing.
//! - `finitediff` lays its Jacobian out one row per parameter; both paths
//!   transpose to the `n_residuals × n_params` convention before validation.
//! - Every returned Jacobian satisfies [`validate_jacobian`].
use crate::optimization::{
    errors::{OptError, OptResult},
    lsq_optimizer::{
        traits::LeastSquares,
        types::{Jacobian, Residuals, Theta},
        validation::validate_jacobian,
    },
};
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference Jacobian with error capture and validation.
///
/// `func` must route its own failures into `closure_err` and return a
/// vector of NaN; this helper clears the cell on entry and re-raises its
/// content afterwards.
///
/// # Errors
/// - The first error captured in `closure_err`.
/// - [`OptError::JacobianDimMismatch`] / [`OptError::InvalidGradient`] from
///   [`validate_jacobian`].
pub fn run_fd_jacobian<G: Fn(&Theta) -> Residuals>(
    theta: &Theta, func: &G, n_residuals: usize, closure_err: &RefCell<Option<OptError>>,
) -> OptResult<Jacobian> {
    closure_err.replace(None);
    let fd_jac = to_residual_rows(theta.forward_jacobian(func));
    if let Some(err) = closure_err.take() {
        return Err(err);
    }
    validate_jacobian(&fd_jac, n_residuals, theta.len())?;
    Ok(fd_jac)
}

/// compute_jacobian — analytic Jacobian if available, finite differences
/// otherwise.
///
/// Parameters
/// ----------
/// - `f`: the residual model.
/// - `theta`: point of evaluation.
/// - `data`: model data forwarded to `residuals`/`jacobian`.
/// - `n_residuals`: expected number of rows (length of `r(θ)`).
///
/// Errors
/// ------
/// - Any error other than `GradientNotImplemented` returned by
///   `f.jacobian`.
/// - Validation errors for the analytic or finite-difference estimate.
/// - Residual errors raised while differencing.
pub fn compute_jacobian<F: LeastSquares>(
    f: &F, theta: &Theta, data: &F::Data, n_residuals: usize,
) -> OptResult<Jacobian> {
    match f.jacobian(theta, data) {
        Ok(jac) => {
            validate_jacobian(&jac, n_residuals, theta.len())?;
            Ok(jac)
        }
        Err(OptError::GradientNotImplemented) => {
            let closure_err: RefCell<Option<OptError>> = RefCell::new(None);
            let residual_func = |theta: &Theta| -> Residuals {
                match f.residuals(theta, data) {
                    Ok(r) => r,
                    Err(e) => {
                        let mut slot = closure_err.borrow_mut();
                        if slot.is_none() {
                            *slot = Some(e);
                        }
                        Residuals::from_elem(n_residuals, f64::NAN)
                    }
                }
            };
            let fd_jac = to_residual_rows(theta.central_jacobian(&residual_func));
            if closure_err.borrow().is_some() {
                return run_fd_jacobian(theta, &residual_func, n_residuals, &closure_err);
            }
            match validate_jacobian(&fd_jac, n_residuals, theta.len()) {
                Ok(()) => Ok(fd_jac),
                Err(_) => run_fd_jacobian(theta, &residual_func, n_residuals, &closure_err),
            }
        }
        Err(e) => Err(e),
    }
}

fn to_residual_rows(per_param: Jacobian) -> Jacobian {
    per_param.reversed_axes().as_standard_layout().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Finite-difference Jacobians of a linear residual model.
    // - Preference for an analytic Jacobian when one is implemented.
    // - Propagation of residual errors raised during differencing.
    // -------------------------------------------------------------------------

    /// r_i(θ) = θ₀ + θ₁·x_i − y_i with no analytic Jacobian.
    struct Line;

    impl LeastSquares for Line {
        type Data = (Array1<f64>, Array1<f64>);

        fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals> {
            let (x, y) = data;
            Ok(x.mapv(|xi| theta[0] + theta[1] * xi) - y)
        }

        fn check(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<()> {
            Ok(())
        }
    }

    /// Same model, but the analytic Jacobian is deliberately scaled so the
    /// test can tell which path was taken.
    struct ScaledLine;

    impl LeastSquares for ScaledLine {
        type Data = (Array1<f64>, Array1<f64>);

        fn residuals(&self, theta: &Theta, data: &Self::Data) -> OptResult<Residuals> {
            Line.residuals(theta, data)
        }

        fn check(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<()> {
            Ok(())
        }

        fn jacobian(&self, _theta: &Theta, data: &Self::Data) -> OptResult<Jacobian> {
            let n = data.0.len();
            let mut jac = Jacobian::zeros((n, 2));
            for (i, &xi) in data.0.iter().enumerate() {
                jac[(i, 0)] = 10.0;
                jac[(i, 1)] = 10.0 * xi;
            }
            Ok(jac)
        }
    }

    /// Fails whenever θ₀ is above 0.5.
    struct Fragile;

    impl LeastSquares for Fragile {
        type Data = ();

        fn residuals(&self, theta: &Theta, _data: &()) -> OptResult<Residuals> {
            if theta[0] > 0.5 {
                return Err(OptError::InvalidProblem { reason: "theta out of range".to_string() });
            }
            Ok(theta.clone())
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }
    }

    #[test]
    // Purpose
    // -------
    // The FD Jacobian of a linear model equals its design matrix.
    //
    // Given
    // -----
    // - `x = [0, 1, 2]`, any `y`, `θ = [0.3, -1.2]`.
    //
    // Expect
    // ------
    // - Column 0 is all ones, column 1 equals `x`.
    fn fd_jacobian_of_linear_model_matches_design_matrix() {
        let data = (array![0.0, 1.0, 2.0], array![1.0, 2.0, 2.5]);
        let theta = array![0.3, -1.2];

        let jac = compute_jacobian(&Line, &theta, &data, 3).unwrap();

        assert_eq!(jac.dim(), (3, 2));
        for i in 0..3 {
            assert_abs_diff_eq!(jac[(i, 0)], 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(jac[(i, 1)], data.0[i], epsilon = 1e-6);
        }
    }

    #[test]
    // Purpose
    // -------
    // With as many residuals as parameters the FD Jacobian must not come
    // back transposed, since the shape check alone cannot catch that.
    //
    // Given
    // -----
    // - `x = [0, 1]`, `θ = [0.3, -1.2]`, so `J = [[1, 0], [1, 1]]`.
    //
    // Expect
    // ------
    // - `J[0, 1] = 0` and `J[1, 0] = 1`.
    fn fd_jacobian_of_square_problem_is_not_transposed() {
        let data = (array![0.0, 1.0], array![0.0, 0.0]);
        let theta = array![0.3, -1.2];

        let jac = compute_jacobian(&Line, &theta, &data, 2).unwrap();

        assert_eq!(jac.dim(), (2, 2));
        assert_abs_diff_eq!(jac[(0, 0)], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(jac[(0, 1)], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(jac[(1, 0)], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(jac[(1, 1)], 1.0, epsilon = 1e-6);
    }

    #[test]
    // Purpose
    // -------
    // An implemented analytic Jacobian takes priority over FD.
    //
    // Given
    // -----
    // - `ScaledLine`, whose analytic Jacobian is 10× the true one.
    //
    // Expect
    // ------
    // - The returned matrix carries the 10× scale.
    fn analytic_jacobian_is_preferred() {
        let data = (array![1.0, 2.0], array![0.0, 0.0]);

        let jac = compute_jacobian(&ScaledLine, &array![0.0, 0.0], &data, 2).unwrap();

        assert_eq!(jac[(1, 1)], 20.0);
    }

    #[test]
    // Purpose
    // -------
    // An analytic Jacobian with the wrong row count is rejected.
    //
    // Given
    // -----
    // - `ScaledLine` evaluated against an expected 5 residual rows.
    //
    // Expect
    // ------
    // - `JacobianDimMismatch`.
    fn analytic_jacobian_shape_is_validated() {
        let data = (array![1.0, 2.0], array![0.0, 0.0]);

        let err = compute_jacobian(&ScaledLine, &array![0.0, 0.0], &data, 5).unwrap_err();

        assert!(matches!(err, OptError::JacobianDimMismatch { .. }));
    }

    #[test]
    // Purpose
    // -------
    // A residual failure during differencing surfaces as the original error.
    //
    // Given
    // -----
    // - `Fragile` evaluated at θ₀ = 0.5, so the forward step crosses the
    //   failure threshold.
    //
    // Expect
    // ------
    // - `InvalidProblem` is returned.
    fn residual_error_inside_fd_is_propagated() {
        let err = compute_jacobian(&Fragile, &array![0.5], &(), 1).unwrap_err();

        assert!(matches!(err, OptError::InvalidProblem { .. }));
    }
}
