//! Validation helpers for least-squares optimization.
//!
//! This module centralizes the consistency checks used across the
//! optimizer interface:
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Inputs**: [`validate_theta_input`] rejects non-finite starting points;
//!   [`budget_from_secs`] turns a seconds value into a wall-clock budget.
//! - **Residuals / Jacobians**: [`validate_residuals`] and
//!   [`validate_jacobian`] enforce finiteness and the `m × p` shape.
//! - **Gradients**: [`validate_grad`] enforces dimension and finite entries.
//! - **Outcome**: [`validate_theta_hat`] and [`validate_value`] check the
//!   solver's best state before it is handed to callers.
use crate::optimization::{
    errors::{OptError, OptResult},
    lsq_optimizer::types::{Grad, Jacobian, Residuals, Theta},
};
use std::time::Duration;

/// Validate the optional gradient-norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost-change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Convert a wall-clock budget in seconds into a [`Duration`].
///
/// # Errors
/// Returns [`OptError::InvalidMaxTime`] for NaN, non-positive values, or
/// values too large for a `Duration`.
pub fn budget_from_secs(secs: f64) -> OptResult<Duration> {
    if secs.is_nan() || secs <= 0.0 {
        return Err(OptError::InvalidMaxTime { reason: "Time budget must be positive." });
    }
    Duration::try_from_secs_f64(secs).map_err(|_| OptError::InvalidMaxTime {
        reason: "Time budget is too large to represent.",
    })
}

/// Reject a starting point containing NaN or ±∞.
pub fn validate_theta_input(theta: &Theta) -> OptResult<()> {
    for (index, &value) in theta.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaInput { index, value });
        }
    }
    Ok(())
}

/// Validate that every residual is finite.
///
/// # Errors
/// [`OptError::NonFiniteResidual`] with the first offending index.
pub fn validate_residuals(residuals: &Residuals) -> OptResult<()> {
    for (index, &value) in residuals.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::NonFiniteResidual { index, value });
        }
    }
    Ok(())
}

/// Validate a residual Jacobian against its expected `n_residuals × n_params`
/// shape and finiteness.
///
/// # Errors
/// - [`OptError::JacobianDimMismatch`] on a shape mismatch.
/// - [`OptError::InvalidGradient`] for the first non-finite entry, reported
///   by column (parameter) index.
pub fn validate_jacobian(jac: &Jacobian, n_residuals: usize, n_params: usize) -> OptResult<()> {
    if jac.dim() != (n_residuals, n_params) {
        return Err(OptError::JacobianDimMismatch {
            expected: (n_residuals, n_params),
            found: jac.dim(),
        });
    }
    for ((_, col), &value) in jac.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index: col,
                value,
                reason: "Jacobian entries must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar cost is finite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Tolerance acceptance/rejection rules.
    // - Conversion of time budgets, including unrepresentable ones.
    // - Residual and Jacobian finiteness and shape checks.
    // - Outcome validation (`theta_hat` presence and finiteness).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tolerances must be strictly positive and finite; `None` is accepted.
    //
    // Given
    // -----
    // - A mix of valid, zero, negative and infinite tolerances.
    //
    // Expect
    // ------
    // - Only `None` and the positive finite value pass.
    fn tolerance_checks_reject_non_positive_and_non_finite() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-6)).is_ok());
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_cost(Some(-1.0)), Err(OptError::InvalidTolCost { .. })));
        assert!(matches!(
            verify_tol_cost(Some(f64::INFINITY)),
            Err(OptError::InvalidTolCost { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Time budgets outside what `Duration` can hold are errors, not panics.
    //
    // Given
    // -----
    // - 2.5 s; 1e30 s; +∞; 0; NaN.
    //
    // Expect
    // ------
    // - 2.5 s converts exactly; every other input is `InvalidMaxTime`.
    fn budget_from_secs_rejects_unrepresentable_values() {
        assert_eq!(budget_from_secs(2.5).unwrap(), Duration::from_millis(2500));
        for secs in [1e30, f64::INFINITY, 0.0, f64::NAN] {
            assert!(matches!(budget_from_secs(secs), Err(OptError::InvalidMaxTime { .. })));
        }
    }

    #[test]
    // Purpose
    // -------
    // The first non-finite residual must be reported with its index.
    //
    // Given
    // -----
    // - Residuals `[0.0, 1.0, NaN, ∞]`.
    //
    // Expect
    // ------
    // - `NonFiniteResidual { index: 2, .. }`.
    fn validate_residuals_reports_first_non_finite_entry() {
        let r = array![0.0, 1.0, f64::NAN, f64::INFINITY];

        let err = validate_residuals(&r).unwrap_err();

        assert!(matches!(err, OptError::NonFiniteResidual { index: 2, .. }));
    }

    #[test]
    // Purpose
    // -------
    // A Jacobian with swapped dimensions must be rejected.
    //
    // Given
    // -----
    // - A `3 × 5` matrix checked against an expected `5 × 3` shape.
    //
    // Expect
    // ------
    // - `JacobianDimMismatch` carrying both shapes.
    fn validate_jacobian_rejects_wrong_shape() {
        let jac = Array2::<f64>::zeros((3, 5));

        let err = validate_jacobian(&jac, 5, 3).unwrap_err();

        assert_eq!(err, OptError::JacobianDimMismatch { expected: (5, 3), found: (3, 5) });
    }

    #[test]
    // Purpose
    // -------
    // Non-finite Jacobian entries are reported against the parameter column.
    //
    // Given
    // -----
    // - A `2 × 3` Jacobian with NaN at `(1, 2)`.
    //
    // Expect
    // ------
    // - `InvalidGradient { index: 2, .. }`.
    fn validate_jacobian_reports_column_of_non_finite_entry() {
        let mut jac = Array2::<f64>::ones((2, 3));
        jac[(1, 2)] = f64::NAN;

        let err = validate_jacobian(&jac, 2, 3).unwrap_err();

        assert!(matches!(err, OptError::InvalidGradient { index: 2, .. }));
    }

    #[test]
    // Purpose
    // -------
    // `validate_theta_hat` distinguishes a missing estimate from a bad one.
    //
    // Given
    // -----
    // - `None`, a finite vector, and a vector with `-∞`.
    //
    // Expect
    // ------
    // - `MissingThetaHat`, `Ok`, `InvalidThetaHat` respectively.
    fn validate_theta_hat_handles_missing_and_non_finite() {
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(validate_theta_hat(Some(Array1::from(vec![1.0, 2.0]))).is_ok());
        assert!(matches!(
            validate_theta_hat(Some(array![0.0, f64::NEG_INFINITY])),
            Err(OptError::InvalidThetaHat { index: 1, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Starting points must be finite everywhere.
    //
    // Given
    // -----
    // - `θ₀ = [1.0, NaN]`.
    //
    // Expect
    // ------
    // - `InvalidThetaInput { index: 1, .. }`.
    fn validate_theta_input_rejects_nan() {
        let err = validate_theta_input(&array![1.0, f64::NAN]).unwrap_err();

        assert!(matches!(err, OptError::InvalidThetaInput { index: 1, .. }));
    }
}
