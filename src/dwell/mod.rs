//! dwell — dwell-time extraction and statistics from decoded state paths.
//!
//! Purpose
//! -------
//! Convert the state sequence an HMM decoder assigns to a trace into
//! per-state dwell times, combine them across a batch of traces, and
//! summarize them (histograms, moments, exponential decay rates).
//!
//! Key behaviors
//! -------------
//! - [`segment`]: [`split_trace`] records every maximal constant run,
//!   excluding the unfinished final run by default.
//! - [`aggregate`]: [`cumulate_lifetimes`] sums run-aligned lists;
//!   [`pool_lifetimes`] concatenates events.
//! - [`kinetics`]: [`dwell_histogram`], [`LifetimeSummary`], and
//!   [`fit_decay`] through the crate's least-squares optimizer.
//!
//! Conventions
//! -----------
//! - State labels are 0-based; dwell values are in sampling intervals
//!   unless [`DwellCount::Samples`] is chosen.
//! - All functions are pure; inputs are never mutated.

pub mod aggregate;
pub mod errors;
pub mod kinetics;
pub mod segment;

pub use self::aggregate::{AggregationPolicy, cumulate_lifetimes, pool_lifetimes};
pub use self::errors::{DwellError, DwellResult};
pub use self::kinetics::{DecayFit, LifetimeSummary, dwell_histogram, fit_decay};
pub use self::segment::{DwellCount, SegmentOptions, StateLifetimes, split_trace};

pub mod prelude {
    pub use super::{
        AggregationPolicy, DecayFit, DwellCount, DwellError, DwellResult, LifetimeSummary,
        SegmentOptions, StateLifetimes, cumulate_lifetimes, fit_decay, pool_lifetimes, split_trace,
    };
}
