//! Observation containers for mixture fitting.
//!
//! Purpose
//! -------
//! Hold the coordinates at which a Gaussian sum is evaluated together with
//! the observed values it is fitted to, and build such containers from raw
//! samples by histogramming.
//!
//! Key behaviors
//! -------------
//! - [`Coords`] carries 1-D points or 2-D point pairs; its variant fixes the
//!   [`Mode`] the data can be fitted with.
//! - [`MixtureData::new`] enforces non-empty, equal-length, finite input.
//! - [`histogram_1d`] / [`histogram_2d`] bin raw samples into counts at bin
//!   centers. Samples outside the range are dropped; the upper edge of the
//!   last bin is inclusive. A degenerate automatic range (all samples equal)
//!   is widened to `[v − 0.5, v + 0.5]`.
//!
//! Conventions
//! -----------
//! - 2-D histograms are flattened row-major: index `i·bins_b + j` holds bin
//!   `(i, j)` with `i` along axis A and `j` along axis B.
use crate::mixture::{
    core::component::Mode,
    errors::{MixtureError, MixtureResult},
};
use ndarray::{Array1, ArrayView1};

/// Evaluation points of a mixture model.
#[derive(Debug, Clone, PartialEq)]
pub enum Coords {
    OneD(Array1<f64>),
    TwoD { a: Array1<f64>, b: Array1<f64> },
}

impl Coords {
    pub fn mode(&self) -> Mode {
        match self {
            Coords::OneD(_) => Mode::OneD,
            Coords::TwoD { .. } => Mode::TwoD,
        }
    }

    /// Number of evaluation points.
    pub fn len(&self) -> usize {
        match self {
            Coords::OneD(x) => x.len(),
            Coords::TwoD { a, .. } => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validated `(coordinates, observed values)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureData {
    pub coords: Coords,
    pub values: Array1<f64>,
}

impl MixtureData {
    /// Construct a validated container.
    ///
    /// # Errors
    /// - [`MixtureError::EmptyData`] when there are no points.
    /// - [`MixtureError::DataLengthMismatch`] when coordinate axes and values
    ///   differ in length.
    /// - [`MixtureError::NonFiniteData`] for the first NaN/±inf value or
    ///   coordinate.
    pub fn new(coords: Coords, values: Array1<f64>) -> MixtureResult<Self> {
        if values.is_empty() || coords.is_empty() {
            return Err(MixtureError::EmptyData);
        }
        match &coords {
            Coords::OneD(x) => {
                check_len(x.len(), values.len())?;
                check_finite(x.view())?;
            }
            Coords::TwoD { a, b } => {
                check_len(a.len(), b.len())?;
                check_len(a.len(), values.len())?;
                check_finite(a.view())?;
                check_finite(b.view())?;
            }
        }
        check_finite(values.view())?;
        Ok(MixtureData { coords, values })
    }

    pub fn mode(&self) -> Mode {
        self.coords.mode()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Bin 1-D samples into `bins` equal-width bins.
///
/// `range = None` uses `[min, max]` of the samples.
///
/// # Errors
/// - [`MixtureError::EmptyData`], [`MixtureError::NonFiniteData`] for bad
///   samples.
/// - [`MixtureError::InvalidBins`] for `bins == 0`.
/// - [`MixtureError::InvalidRange`] for a non-finite or inverted range.
pub fn histogram_1d(
    samples: ArrayView1<f64>, bins: usize, range: Option<(f64, f64)>,
) -> MixtureResult<MixtureData> {
    if samples.is_empty() {
        return Err(MixtureError::EmptyData);
    }
    check_finite(samples)?;
    let (lo, hi) = resolve_range(samples, range)?;
    let edges = Edges::new(lo, hi, bins)?;

    let mut counts = Array1::<f64>::zeros(bins);
    for &x in samples.iter() {
        if let Some(i) = edges.locate(x) {
            counts[i] += 1.0;
        }
    }
    MixtureData::new(Coords::OneD(edges.centers()), counts)
}

/// Bin paired samples `(a_k, b_k)` into a `bins.0 × bins.1` grid.
///
/// # Errors
/// As [`histogram_1d`], plus [`MixtureError::DataLengthMismatch`] when `a`
/// and `b` differ in length.
pub fn histogram_2d(
    a: ArrayView1<f64>, b: ArrayView1<f64>, bins: (usize, usize),
    range: Option<((f64, f64), (f64, f64))>,
) -> MixtureResult<MixtureData> {
    check_len(a.len(), b.len())?;
    if a.is_empty() {
        return Err(MixtureError::EmptyData);
    }
    check_finite(a)?;
    check_finite(b)?;
    let (range_a, range_b) = match range {
        Some((ra, rb)) => (Some(ra), Some(rb)),
        None => (None, None),
    };
    let (lo_a, hi_a) = resolve_range(a, range_a)?;
    let (lo_b, hi_b) = resolve_range(b, range_b)?;
    let edges_a = Edges::new(lo_a, hi_a, bins.0)?;
    let edges_b = Edges::new(lo_b, hi_b, bins.1)?;

    let n = bins.0 * bins.1;
    let mut counts = Array1::<f64>::zeros(n);
    for (&xa, &xb) in a.iter().zip(b.iter()) {
        if let (Some(i), Some(j)) = (edges_a.locate(xa), edges_b.locate(xb)) {
            counts[i * bins.1 + j] += 1.0;
        }
    }

    let centers_a = edges_a.centers();
    let centers_b = edges_b.centers();
    let mut coord_a = Array1::<f64>::zeros(n);
    let mut coord_b = Array1::<f64>::zeros(n);
    for i in 0..bins.0 {
        for j in 0..bins.1 {
            coord_a[i * bins.1 + j] = centers_a[i];
            coord_b[i * bins.1 + j] = centers_b[j];
        }
    }
    MixtureData::new(Coords::TwoD { a: coord_a, b: coord_b }, counts)
}

// ---- Helpers ----

struct Edges {
    lo: f64,
    hi: f64,
    bins: usize,
    width: f64,
}

impl Edges {
    fn new(lo: f64, hi: f64, bins: usize) -> MixtureResult<Self> {
        if bins == 0 {
            return Err(MixtureError::InvalidBins { bins });
        }
        Ok(Edges { lo, hi, bins, width: (hi - lo) / bins as f64 })
    }

    fn locate(&self, x: f64) -> Option<usize> {
        if x < self.lo || x > self.hi {
            return None;
        }
        let i = ((x - self.lo) / self.width).floor() as usize;
        Some(i.min(self.bins - 1))
    }

    fn centers(&self) -> Array1<f64> {
        Array1::from_shape_fn(self.bins, |i| self.lo + (i as f64 + 0.5) * self.width)
    }
}

fn resolve_range(samples: ArrayView1<f64>, range: Option<(f64, f64)>) -> MixtureResult<(f64, f64)> {
    let (lo, hi) = match range {
        Some(r) => r,
        None => {
            let lo = samples.iter().cloned().fold(f64::INFINITY, f64::min);
            let hi = samples.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
            if lo == hi { (lo - 0.5, hi + 0.5) } else { (lo, hi) }
        }
    };
    if !lo.is_finite() || !hi.is_finite() || lo >= hi {
        return Err(MixtureError::InvalidRange { lo, hi });
    }
    Ok((lo, hi))
}

fn check_len(coords: usize, values: usize) -> MixtureResult<()> {
    if coords != values {
        return Err(MixtureError::DataLengthMismatch { coords, values });
    }
    Ok(())
}

fn check_finite(values: ArrayView1<f64>) -> MixtureResult<()> {
    for (index, &value) in values.iter().enumerate() {
        if !value.is_finite() {
            return Err(MixtureError::NonFiniteData { index, value });
        }
    }
    Ok(())
}
