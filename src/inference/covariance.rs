//! inference::covariance — Gauss–Newton covariance and standard errors for
//! least-squares fits.
//!
//! Purpose
//! -------
//! Turn a converged least-squares estimate `θ̂` into parameter uncertainty:
//! `Cov(θ̂) ≈ s²·(JᵀJ)⁺` with `s² = ‖r(θ̂)‖² / (m − p)`, the same estimate
//! a classical `curve_fit` reports.
//!
//! Key behaviors
//! -------------
//! - Reuse [`compute_jacobian`] so analytic Jacobians are used when the
//!   model provides them and finite differences otherwise.
//! - Copy `JᵀJ` into a `nalgebra::DMatrix` and form the pseudoinverse by
//!   symmetric eigendecomposition; no explicit inverse is formed.
//! - Eigenvalues at or below `EIGEN_EPS · λ_max` are dropped, so weakly
//!   identified directions contribute nothing instead of blowing up.
//!
//! Invariants & assumptions
//! ------------------------
//! - `m > p` (more residuals than parameters); otherwise the residual
//!   variance is undefined and an error is returned.
//! - Errors are reported via [`OptResult<T>`].
use crate::optimization::{
    errors::{OptError, OptResult},
    lsq_optimizer::{LeastSquares, Theta, compute_jacobian},
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// Relative eigenvalue cutoff for the `JᵀJ` pseudoinverse.
pub const EIGEN_EPS: f64 = 1e-12;

/// lsq_covariance — `s²·(JᵀJ)⁺` at `theta_hat`.
///
/// Parameters
/// ----------
/// - `f`: residual model the estimate came from.
/// - `theta_hat`: fitted parameters.
/// - `data`: the data the model was fitted to.
///
/// Returns
/// -------
/// `p × p` covariance matrix of `θ̂`.
///
/// Errors
/// ------
/// - [`OptError::InvalidProblem`] when `m ≤ p`.
/// - Residual/Jacobian errors from the model or their validation.
pub fn lsq_covariance<F: LeastSquares>(
    f: &F, theta_hat: &Theta, data: &F::Data,
) -> OptResult<Array2<f64>> {
    let residuals = f.residuals(theta_hat, data)?;
    let m = residuals.len();
    let p = theta_hat.len();
    if m <= p {
        return Err(OptError::InvalidProblem {
            reason: format!("need more residuals than parameters for a covariance (m = {m}, p = {p})"),
        });
    }
    let jac = compute_jacobian(f, theta_hat, data, m)?;
    let s2 = residuals.dot(&residuals) / (m - p) as f64;
    let info = jac.t().dot(&jac);
    let mut info_nalg = DMatrix::<f64>::zeros(p, p);
    fill_dmatrix(&info, &mut info_nalg);
    Ok(pseudo_inverse(info_nalg, p) * s2)
}

/// lsq_standard_errors — square roots of the diagonal of [`lsq_covariance`].
pub fn lsq_standard_errors<F: LeastSquares>(
    f: &F, theta_hat: &Theta, data: &F::Data,
) -> OptResult<Array1<f64>> {
    let cov = lsq_covariance(f, theta_hat, data)?;
    Ok(cov.diag().mapv(|v| v.max(0.0).sqrt()))
}

// ---- Helper methods ----

/// Copy a symmetric `ndarray` matrix into a preallocated `DMatrix`.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    let n = src.ncols();
    for j in 0..n {
        for i in 0..n {
            dst[(i, j)] = src[[i, j]];
        }
    }
}

/// Moore–Penrose pseudoinverse of a symmetric PSD matrix,
/// `Σ_{λ_k > EIGEN_EPS·λ_max} q_k q_kᵀ / λ_k`.
fn pseudo_inverse(sym: DMatrix<f64>, n: usize) -> Array2<f64> {
    let eigen_decomp = sym.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;
    let lambda_max = eigenvals.iter().cloned().fold(0.0_f64, f64::max);
    let cutoff = EIGEN_EPS * lambda_max;
    let mut pinv = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigenvals.iter().enumerate() {
        if lambda > cutoff && lambda > 0.0 {
            for i in 0..n {
                for j in 0..n {
                    pinv[[i, j]] += q[(i, k)] * q[(j, k)] / lambda;
                }
            }
        }
    }
    pinv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::lsq_optimizer::{Jacobian, Residuals};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Agreement with the textbook OLS covariance `s²(XᵀX)⁻¹`.
    // - Pseudoinverse behavior on a rank-deficient matrix.
    // - Rejection of problems with too few residuals.
    // -------------------------------------------------------------------------

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

        fn jacobian(&self, _theta: &Theta, data: &Self::Data) -> OptResult<Jacobian> {
            let mut jac = Jacobian::ones((data.0.len(), 2));
            jac.column_mut(1).assign(&data.0);
            Ok(jac)
        }
    }

    #[test]
    // Purpose
    // -------
    // Standard errors of an OLS line match the closed form.
    //
    // Given
    // -----
    // - `x = [0, 1, 2, 3]`, `y = [0.1, 0.9, 2.1, 2.9]`, OLS estimate
    //   `θ̂ = [0.06, 0.96]`.
    //
    // Expect
    // ------
    // - `SE = sqrt(diag(s²(XᵀX)⁻¹))` with `s² = SSR/2`.
    fn standard_errors_match_closed_form_ols() {
        let x = array![0.0, 1.0, 2.0, 3.0];
        let y = array![0.1, 0.9, 2.1, 2.9];
        let data = (x, y);
        let theta_hat = array![0.06, 0.96];

        let se = lsq_standard_errors(&Line, &theta_hat, &data).unwrap();

        // XᵀX = [[4, 6], [6, 14]], det = 20, inverse = [[0.7, -0.3], [-0.3, 0.2]].
        let r = Line.residuals(&theta_hat, &data).unwrap();
        let s2 = r.dot(&r) / 2.0;
        assert_abs_diff_eq!(se[0], (s2 * 0.7).sqrt(), epsilon = 1e-10);
        assert_abs_diff_eq!(se[1], (s2 * 0.2).sqrt(), epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // A rank-deficient matrix is inverted on its range only.
    //
    // Given
    // -----
    // - `diag(4, 0)`.
    //
    // Expect
    // ------
    // - Pseudoinverse `diag(0.25, 0)`.
    fn pseudo_inverse_drops_null_directions() {
        let m = DMatrix::from_row_slice(2, 2, &[4.0, 0.0, 0.0, 0.0]);

        let pinv = pseudo_inverse(m, 2);

        assert_abs_diff_eq!(pinv[[0, 0]], 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(pinv[[1, 1]], 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // With `m == p` the residual variance is undefined.
    //
    // Given
    // -----
    // - Two points and two parameters.
    //
    // Expect
    // ------
    // - `InvalidProblem`.
    fn covariance_requires_more_residuals_than_parameters() {
        let data = (array![0.0, 1.0], array![0.0, 1.0]);

        let err = lsq_covariance(&Line, &array![0.0, 1.0], &data).unwrap_err();

        assert!(matches!(err, OptError::InvalidProblem { .. }));
    }
}
