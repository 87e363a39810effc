//! Python-boundary helpers: argument extraction and option parsing shared by
//! the bindings in the crate root.
#[cfg(feature = "python-bindings")]
use ndarray::{Array1, Array2, Array3};

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    dwell::{AggregationPolicy, DwellCount},
    mixture::{MixtureError, Mode},
    optimization::lsq_optimizer::{
        LineSearcher, LsqOptions, Tolerances, validation::budget_from_secs,
    },
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArray1,
    PyArray2,
    PyArray3,
    PyArrayMethods, // .readonly(), .reshape()
    PyReadonlyArray1,
};

/// Accept a NumPy array, a pandas Series, or any float sequence.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// [`extract_f64_array`] copied into an owned `Array1`; `name` labels errors.
#[cfg(feature = "python-bindings")]
pub fn extract_array1<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, name: &str,
) -> PyResult<Array1<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{name} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(Array1::from(slice.to_vec()))
}

/// Copy an `Array1` out to NumPy.
///
/// Outputs go through a row-major `Vec` so the crate's `ndarray` and the one
/// `numpy` links against never have to be the same release.
#[cfg(feature = "python-bindings")]
pub fn array1_to_py<'py>(py: Python<'py>, arr: &Array1<f64>) -> Bound<'py, PyArray1<f64>> {
    arr.to_vec().into_pyarray(py)
}

#[cfg(feature = "python-bindings")]
pub fn array2_to_py<'py>(py: Python<'py>, arr: &Array2<f64>) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let (rows, cols) = arr.dim();
    arr.iter().copied().collect::<Vec<f64>>().into_pyarray(py).reshape([rows, cols])
}

#[cfg(feature = "python-bindings")]
pub fn array3_to_py<'py>(py: Python<'py>, arr: &Array3<f64>) -> PyResult<Bound<'py, PyArray3<f64>>> {
    let (n, rows, cols) = arr.dim();
    arr.iter().copied().collect::<Vec<f64>>().into_pyarray(py).reshape([n, rows, cols])
}

#[cfg(feature = "python-bindings")]
pub fn extract_mode(mode: Option<&str>) -> PyResult<Mode> {
    mode.unwrap_or("1d").parse::<Mode>().map_err(PyValueError::new_err)
}

#[cfg(feature = "python-bindings")]
pub fn extract_dwell_count(count: Option<&str>) -> PyResult<DwellCount> {
    match count.unwrap_or("intervals").to_lowercase().as_str() {
        "intervals" => Ok(DwellCount::Intervals),
        "samples" => Ok(DwellCount::Samples),
        other => Err(PyValueError::new_err(format!(
            "invalid dwell count {other:?} (expected 'intervals' or 'samples')"
        ))),
    }
}

#[cfg(feature = "python-bindings")]
pub fn extract_policy(policy: Option<&str>) -> PyResult<AggregationPolicy> {
    match policy.unwrap_or("strict").to_lowercase().as_str() {
        "strict" => Ok(AggregationPolicy::Strict),
        "truncate" | "truncate_to_shortest" => Ok(AggregationPolicy::TruncateToShortest),
        other => Err(PyValueError::new_err(format!(
            "invalid aggregation policy {other:?} (expected 'strict' or 'truncate')"
        ))),
    }
}

/// Build optimizer options from keyword arguments; `None` keeps defaults.
#[cfg(feature = "python-bindings")]
pub fn extract_lsq_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, max_time: Option<f64>,
) -> PyResult<LsqOptions> {
    use std::str::FromStr;

    let defaults = LsqOptions::default().tols;
    let tols = Tolerances::new(
        tol_grad.or(defaults.tol_grad),
        tol_cost.or(defaults.tol_cost),
        max_iter.or(defaults.max_iter),
    )
    .map_err(MixtureError::from)?;

    let ls = match line_searcher {
        Some(name) => LineSearcher::from_str(name).map_err(MixtureError::from)?,
        None => LineSearcher::MoreThuente,
    };

    let budget = max_time.map(budget_from_secs).transpose().map_err(MixtureError::from)?;

    let opts = LsqOptions::new(tols, ls, false, lbfgs_mem, budget).map_err(MixtureError::from)?;
    Ok(opts)
}

