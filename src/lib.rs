//! trace_kinetics — state discovery and dwell-time kinetics for
//! single-molecule traces, with optional Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and, with the `python-bindings`
//! feature, as the PyO3 bridge exposing the core routines to Python through
//! the `_trace_kinetics` extension module.
//!
//! Key behaviors
//! -------------
//! - [`mixture`]: Gaussian-sum models of signal histograms, least-squares
//!   fitting, degeneracy expansion, and HMM seeding.
//! - [`dwell`]: segmentation of decoded state paths, batch aggregation, and
//!   lifetime statistics.
//! - [`trace`]: validated trace container and plot-ready series.
//! - [`pipeline`]: end-to-end workflows over a batch of traces.
//! - [`optimization`] and [`inference`]: the L-BFGS least-squares engine and
//!   post-fit standard errors shared by the model layers.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; state labels are 0-based.
//! - Errors are rich enums per layer, converted to Python `ValueError` at
//!   the PyO3 boundary.
//! - Heavy numerical work lives in the inner modules; this file performs
//!   only FFI glue, argument extraction, and error mapping.

pub mod dwell;
pub mod inference;
pub mod mixture;
pub mod optimization;
pub mod pipeline;
pub mod trace;
pub mod utils;

#[cfg(feature = "python-bindings")]
use ndarray::Array1;

#[cfg(feature = "python-bindings")]
use numpy::{PyArray1, PyArray2, PyArray3};

#[cfg(feature = "python-bindings")]
use pyo3::{prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    dwell::{SegmentOptions, StateLifetimes},
    mixture::{
        Coords, FitOptions, HmmParams, InitOptions, MixtureData, MixtureFit, MixtureModel, Mode,
        components_from_flat, expand_degenerate,
    },
    utils::{
        array1_to_py, array2_to_py, array3_to_py, extract_array1, extract_dwell_count,
        extract_lsq_opts, extract_mode, extract_policy,
    },
};

/// GaussianFit — Python-facing result of `fit_gaussians`.
///
/// Exposes the fitted flat parameters, optional standard errors, and the
/// optimizer diagnostics of a converged [`MixtureFit`].
#[cfg(feature = "python-bindings")]
#[pyclass(module = "trace_kinetics")]
pub struct GaussianFit {
    pub inner: MixtureFit,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl GaussianFit {
    #[getter]
    pub fn params<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        array1_to_py(py, &self.inner.params)
    }

    #[getter]
    pub fn std_errors(&self) -> Option<Vec<f64>> {
        self.inner.std_errors.as_ref().map(|se| se.to_vec())
    }

    #[getter]
    pub fn cost(&self) -> f64 {
        self.inner.outcome.cost
    }

    #[getter]
    pub fn iterations(&self) -> usize {
        self.inner.outcome.iterations
    }

    #[getter]
    pub fn status(&self) -> String {
        self.inner.outcome.status.clone()
    }

    #[getter]
    pub fn fn_evals(&self) -> Vec<(String, u64)> {
        self.inner.outcome.fn_evals.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }
}

/// HmmInitials — seeded HMM parameters as NumPy arrays.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "trace_kinetics")]
pub struct HmmInitials {
    pub inner: HmmParams,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl HmmInitials {
    #[getter]
    pub fn means<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f64>>> {
        array2_to_py(py, &self.inner.means)
    }

    #[getter]
    pub fn covars<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray3<f64>>> {
        array3_to_py(py, &self.inner.covars)
    }

    #[getter]
    pub fn start_prob<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<f64>> {
        array1_to_py(py, &self.inner.start_prob)
    }

    #[getter]
    pub fn trans_mat<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f64>>> {
        array2_to_py(py, &self.inner.trans_mat)
    }

    #[getter]
    pub fn n_states(&self) -> usize {
        self.inner.n_states()
    }
}

/// Evaluate a 1-D Gaussian sum at `x`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (x, params), text_signature = "(x, params, /)")]
fn gauss_1d<'py>(
    py: Python<'py>, x: &Bound<'py, PyAny>, params: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let coords = Coords::OneD(extract_array1(py, x, "x")?);
    let theta = extract_array1(py, params, "params")?;
    let y = MixtureModel::new(Mode::OneD).evaluate(theta.view(), &coords)?;
    Ok(array1_to_py(py, &y))
}

/// Evaluate a 2-D Gaussian sum at the paired points `(a[i], b[i])`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (a, b, params), text_signature = "(a, b, params, /)")]
fn gauss_2d<'py>(
    py: Python<'py>, a: &Bound<'py, PyAny>, b: &Bound<'py, PyAny>, params: &Bound<'py, PyAny>,
) -> PyResult<Bound<'py, PyArray1<f64>>> {
    let coords = Coords::TwoD { a: extract_array1(py, a, "a")?, b: extract_array1(py, b, "b")? };
    let theta = extract_array1(py, params, "params")?;
    let y = MixtureModel::new(Mode::TwoD).evaluate(theta.view(), &coords)?;
    Ok(array1_to_py(py, &y))
}

/// Fit a Gaussian sum to `values` observed at `a` (and `b` for 2-D).
///
/// The mode is 2-D when `b` is given, 1-D otherwise.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (
        a,
        values,
        guess,
        b = None,
        tol_grad = None,
        tol_cost = None,
        max_iter = None,
        line_searcher = None,
        lbfgs_mem = None,
        max_time = None,
        std_errors = true,
    ),
    text_signature = "(a, values, guess, /, b=None, tol_grad=1e-8, tol_cost=None, max_iter=500, line_searcher='MoreThuente', lbfgs_mem=None, max_time=None, std_errors=True)"
)]
#[allow(clippy::too_many_arguments)]
fn fit_gaussians<'py>(
    py: Python<'py>, a: &Bound<'py, PyAny>, values: &Bound<'py, PyAny>,
    guess: &Bound<'py, PyAny>, b: Option<&Bound<'py, PyAny>>, tol_grad: Option<f64>,
    tol_cost: Option<f64>, max_iter: Option<usize>, line_searcher: Option<&str>,
    lbfgs_mem: Option<usize>, max_time: Option<f64>, std_errors: bool,
) -> PyResult<GaussianFit> {
    let a = extract_array1(py, a, "a")?;
    let coords = match b {
        Some(b) => Coords::TwoD { a, b: extract_array1(py, b, "b")? },
        None => Coords::OneD(a),
    };
    let model = MixtureModel::new(coords.mode());
    let data = MixtureData::new(coords, extract_array1(py, values, "values")?)?;
    let guess: Array1<f64> = extract_array1(py, guess, "guess")?;
    let lsq = extract_lsq_opts(tol_grad, tol_cost, max_iter, line_searcher, lbfgs_mem, max_time)?;

    let fit = py.allow_threads(|| {
        crate::mixture::fit_mixture(&model, &data, guess, &FitOptions::new(lsq, std_errors))
    })?;
    Ok(GaussianFit { inner: fit })
}

/// Seed HMM parameters from fitted flat parameters and per-component
/// degeneracies.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (params, degeneracy, mode = None, p_self = None),
    text_signature = "(params, degeneracy, /, mode='1d', p_self=0.96)"
)]
fn generate_hmm_initials<'py>(
    py: Python<'py>, params: &Bound<'py, PyAny>, degeneracy: Vec<usize>, mode: Option<&str>,
    p_self: Option<f64>,
) -> PyResult<HmmInitials> {
    let mode = extract_mode(mode)?;
    let flat = extract_array1(py, params, "params")?;
    let components = components_from_flat(flat.view(), mode)?;
    let states = expand_degenerate(&components, &degeneracy)?;
    let init = match p_self {
        Some(p) => InitOptions::new(p)?,
        None => InitOptions::default(),
    };
    let inner = crate::mixture::initialize_hmm(&states, mode, &init)?;
    Ok(HmmInitials { inner })
}

/// Per-state dwell times of a decoded path.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(
    signature = (path, max_state = None, skip_last = true, count = None),
    text_signature = "(path, /, max_state=None, skip_last=True, count='intervals')"
)]
fn split_trace(
    path: Vec<usize>, max_state: Option<usize>, skip_last: bool, count: Option<&str>,
) -> PyResult<Vec<Vec<usize>>> {
    let opts = SegmentOptions::new(skip_last, extract_dwell_count(count)?);
    let out = crate::dwell::split_trace(&path, max_state, &opts)?;
    Ok(out.per_state)
}

/// Element-wise sum of per-state dwell lists across traces.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (traces, policy = None), text_signature = "(traces, /, policy='strict')")]
fn cumulate_lifetimes(traces: Vec<Vec<Vec<usize>>>, policy: Option<&str>) -> PyResult<Vec<Vec<usize>>> {
    let traces: Vec<StateLifetimes> = traces.into_iter().map(StateLifetimes::new).collect();
    let out = crate::dwell::cumulate_lifetimes(&traces, extract_policy(policy)?)?;
    Ok(out.per_state)
}

/// Write the plain-text model summary to `path`.
#[cfg(feature = "python-bindings")]
#[pyfunction]
#[pyo3(signature = (model, path), text_signature = "(model, path, /)")]
fn save_model(model: &HmmInitials, path: std::path::PathBuf) -> PyResult<()> {
    crate::mixture::save_model_summary(path, &model.inner)?;
    Ok(())
}

/// _trace_kinetics — PyO3 module initializer for the Python extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _trace_kinetics<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    m.add_class::<GaussianFit>()?;
    m.add_class::<HmmInitials>()?;
    m.add_function(wrap_pyfunction!(gauss_1d, m)?)?;
    m.add_function(wrap_pyfunction!(gauss_2d, m)?)?;
    m.add_function(wrap_pyfunction!(fit_gaussians, m)?)?;
    m.add_function(wrap_pyfunction!(generate_hmm_initials, m)?)?;
    m.add_function(wrap_pyfunction!(split_trace, m)?)?;
    m.add_function(wrap_pyfunction!(cumulate_lifetimes, m)?)?;
    m.add_function(wrap_pyfunction!(save_model, m)?)?;
    Ok(())
}
