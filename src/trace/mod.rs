//! trace — a validated single-molecule trace and views aligned to it.
//!
//! A [`Trace`] carries a strictly increasing time axis plus up to three
//! sampled series: donor intensity (`A`), acceptor intensity (`B`) and their
//! ratio. It produces the observation matrix a decoder consumes and
//! [`TracePoint`] series for plotting, optionally overlaid with the mean of
//! each sample's decoded state.

pub mod errors;

pub use self::errors::{TraceError, TraceResult};

use crate::mixture::{HmmParams, Mode};
use ndarray::{Array1, Array2, ArrayView1};

/// A recorded series of a [`Trace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    A,
    B,
    Ratio,
}

impl Channel {
    pub fn name(self) -> &'static str {
        match self {
            Channel::A => "channel_a",
            Channel::B => "channel_b",
            Channel::Ratio => "ratio",
        }
    }
}

/// One plotted sample: time, observed value and, when a decoded path was
/// supplied, the decoded state's mean.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TracePoint {
    pub time: f64,
    pub value: f64,
    pub predicted: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    time: Array1<f64>,
    channel_a: Option<Array1<f64>>,
    channel_b: Option<Array1<f64>>,
    ratio: Option<Array1<f64>>,
}

impl Trace {
    /// Validate and assemble a trace.
    ///
    /// # Errors
    /// - [`TraceError::LengthMismatch`] when a series differs from `time`.
    /// - [`TraceError::NonFiniteValue`] for NaN/±inf anywhere.
    /// - [`TraceError::NonMonotonicTime`] unless `time` strictly increases.
    /// - [`TraceError::NegativeIntensity`] for a negative `A`/`B` sample.
    pub fn new(
        time: Array1<f64>, channel_a: Option<Array1<f64>>, channel_b: Option<Array1<f64>>,
        ratio: Option<Array1<f64>>,
    ) -> TraceResult<Self> {
        check_finite("time", time.view())?;
        if let Some(index) = (1..time.len()).find(|&i| time[i] <= time[i - 1]) {
            return Err(TraceError::NonMonotonicTime { index });
        }

        let n = time.len();
        for (channel, series) in
            [(Channel::A, &channel_a), (Channel::B, &channel_b), (Channel::Ratio, &ratio)]
        {
            let Some(series) = series else { continue };
            if series.len() != n {
                return Err(TraceError::LengthMismatch {
                    series: channel.name(),
                    expected: n,
                    actual: series.len(),
                });
            }
            check_finite(channel.name(), series.view())?;
            if channel != Channel::Ratio {
                if let Some((index, &value)) = series.iter().enumerate().find(|(_, v)| **v < 0.0) {
                    return Err(TraceError::NegativeIntensity { channel, index, value });
                }
            }
        }
        Ok(Trace { time, channel_a, channel_b, ratio })
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> ArrayView1<'_, f64> {
        self.time.view()
    }

    /// The samples of `channel`, if recorded.
    pub fn channel(&self, channel: Channel) -> TraceResult<ArrayView1<'_, f64>> {
        let series = match channel {
            Channel::A => &self.channel_a,
            Channel::B => &self.channel_b,
            Channel::Ratio => &self.ratio,
        };
        series.as_ref().map(Array1::view).ok_or(TraceError::MissingChannel { channel })
    }

    /// Observation matrix for a decoder: `n × 1` ratio (1-D) or `n × 2`
    /// `(A, B)` (2-D).
    ///
    /// # Errors
    /// [`TraceError::MissingChannel`] when a required series is absent.
    pub fn observations(&self, mode: Mode) -> TraceResult<Array2<f64>> {
        let columns: Vec<ArrayView1<f64>> = match mode {
            Mode::OneD => vec![self.channel(Channel::Ratio)?],
            Mode::TwoD => vec![self.channel(Channel::A)?, self.channel(Channel::B)?],
        };
        let mut obs = Array2::zeros((self.len(), columns.len()));
        for (j, col) in columns.iter().enumerate() {
            obs.column_mut(j).assign(col);
        }
        Ok(obs)
    }

    /// `(time, value)` points of `channel` with no prediction.
    pub fn series(&self, channel: Channel) -> TraceResult<Vec<TracePoint>> {
        let values = self.channel(channel)?;
        Ok(self
            .time
            .iter()
            .zip(values.iter())
            .map(|(&time, &value)| TracePoint { time, value, predicted: None })
            .collect())
    }

    /// Like [`series`](Self::series), with each point's `predicted` set to
    /// the mean of its decoded state on `channel`.
    ///
    /// A 1-D model predicts the ratio; a 2-D model predicts `A` and `B`.
    ///
    /// # Errors
    /// - [`TraceError::PathLengthMismatch`] when `path.len() != len()`.
    /// - [`TraceError::MissingChannel`] when `channel` is absent or the model
    ///   has no mean for it.
    /// - [`TraceError::OutOfRangeState`] for a state without a model row.
    pub fn predicted_series(
        &self, channel: Channel, path: &[usize], params: &HmmParams,
    ) -> TraceResult<Vec<TracePoint>> {
        if path.len() != self.len() {
            return Err(TraceError::PathLengthMismatch { expected: self.len(), actual: path.len() });
        }
        let column = match (params.dims(), channel) {
            (1, Channel::Ratio) => 0,
            (2, Channel::A) => 0,
            (2, Channel::B) => 1,
            _ => return Err(TraceError::MissingChannel { channel }),
        };

        let mut points = self.series(channel)?;
        for (index, (point, &state)) in points.iter_mut().zip(path).enumerate() {
            let mean = params.state_mean(state).ok_or(TraceError::OutOfRangeState {
                index,
                state,
                n_states: params.n_states(),
            })?;
            point.predicted = Some(mean[column]);
        }
        Ok(points)
    }
}

fn check_finite(series: &'static str, values: ArrayView1<f64>) -> TraceResult<()> {
    match values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        Some((index, &value)) => Err(TraceError::NonFiniteValue { series, index, value }),
        None => Ok(()),
    }
}
