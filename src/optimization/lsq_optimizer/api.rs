//! High-level entry point for minimizing a user-provided `LeastSquares`
//! problem.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente
//! line search, wraps the model in an `ArgMinAdapter` (cost `½‖r‖²`,
//! gradient `Jᵀr`), and delegates the run to `run_lbfgs`.
use crate::optimization::{
    errors::{OptError, OptResult},
    lsq_optimizer::{
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LeastSquares, LineSearcher, LsqOptions, OptimOutcome},
        types::Theta,
        validation::validate_theta_input,
    },
};

/// Minimize `½·Σ r_i(θ)²` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Rejects an empty or non-finite `theta0`.
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Builds the solver selected by `opts.line_searcher` and runs it under
///   the iteration and time budgets in `opts`.
///
/// # Errors
/// - [`OptError::InvalidProblem`] for an empty `theta0`.
/// - [`OptError::InvalidThetaInput`] for a non-finite `theta0`.
/// - Propagates errors from `f.check`, the builders, and `run_lbfgs`.
///
/// # Returns
/// An [`OptimOutcome`]. Callers that need a converged fit must inspect
/// `outcome.converged`; budget exhaustion is returned as a non-converged
/// outcome rather than an error.
///
/// # Example
/// ```no_run
/// use ndarray::{Array1, array};
/// use trace_kinetics::optimization::errors::OptResult;
/// use trace_kinetics::optimization::lsq_optimizer::{
///     minimize, LeastSquares, LsqOptions, Residuals, Theta,
/// };
///
/// struct Offset;
/// impl LeastSquares for Offset {
///     type Data = Array1<f64>;
///     fn residuals(&self, theta: &Theta, y: &Array1<f64>) -> OptResult<Residuals> {
///         Ok(y.mapv(|yi| theta[0] - yi))
///     }
///     fn check(&self, _: &Theta, _: &Array1<f64>) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = minimize(&Offset, array![0.0], &array![1.0, 2.0, 3.0], &LsqOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), trace_kinetics::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: LeastSquares>(
    f: &F, theta0: Theta, data: &F::Data, opts: &LsqOptions,
) -> OptResult<OptimOutcome> {
    if theta0.is_empty() {
        return Err(OptError::InvalidProblem {
            reason: "parameter vector must not be empty".to_string(),
        });
    }
    validate_theta_input(&theta0)?;
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
