//! pipeline — end-to-end analysis from histogram to batch lifetimes.
//!
//! Purpose
//! -------
//! Compose the mixture, trace and dwell layers into the two workflows an
//! experiment needs:
//! 1. [`seed_hmm`]: fit a Gaussian mixture to the pooled signal histogram,
//!    expand degenerate components, and seed HMM parameters.
//! 2. [`analyze_batch`] + [`summarize_batch`]: decode every trace with a
//!    caller-supplied [`StateDecoder`], split paths into dwell times, and
//!    aggregate them across the batch.
//!
//! Conventions
//! -----------
//! - This is the only layer that logs (via the `log` facade); lower layers
//!   are pure.
//! - Traces are processed independently on the rayon pool; per-trace
//!   failures are returned in place, never short-circuiting the batch.
//! - Errors are [`PipelineError`], wrapping the layer errors.

pub mod batch;
pub mod decoder;
pub mod errors;
pub mod seed;

pub use self::batch::{
    AnalysisOptions, BatchSummary, TraceAnalysis, analyze_batch, analyze_trace, summarize_batch,
};
pub use self::decoder::{NearestMeanDecoder, StateDecoder};
pub use self::errors::{PipelineError, PipelineResult};
pub use self::seed::{HmmSeed, SeedOptions, seed_hmm};

pub mod prelude {
    pub use super::{
        AnalysisOptions, BatchSummary, HmmSeed, NearestMeanDecoder, PipelineError, PipelineResult,
        SeedOptions, StateDecoder, TraceAnalysis, analyze_batch, analyze_trace, seed_hmm,
        summarize_batch,
    };
}
