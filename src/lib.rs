//! Cyclic-voltammetry trace segmentation and feature extraction.
//!
//! A [`Trace`](voltammetry::Trace) is split into cycles, each cycle gets a turning point
//! separating its anodic and cathodic halves, degenerate cycles are rejected, and the
//! strict current extrema of the remaining ones are reported. Accepted cycles from any
//! number of traces can then be gathered in a
//! [`CycleAggregator`](voltammetry::CycleAggregator) for overlay and drift summaries.
pub mod voltammetry;
pub use voltammetry::{
    AnalysisConfig, AnalysisError, AnalysisResult, Cycle, CycleAggregator, CycleAnalyzer, Sample,
    Trace,
};
