pub mod aggregate;
pub mod assign;
pub mod config;
pub mod cycle;
pub mod error;
pub mod naming;
pub mod peaks;
pub mod pipeline;
pub mod plot;
pub mod source;
pub mod turning;
pub mod validate;
pub use aggregate::{CycleAggregator, DriftPoint, OverlaySeries};
pub use assign::{AssignStrategy, CycleAssigner, CycleBlock, DEFAULT_CYCLE_ID};
pub use config::{AnalysisConfig, ColumnNames};
pub use cycle::{AnalysisResult, Cycle, HalfCycle, HalfCycleKind, Peak, Rejection};
pub use error::AnalysisError;
pub use naming::{expected_cycle_range, MAX_CYCLE_RANGE};
pub use peaks::PeakKind;
pub use pipeline::{CvPipeline, CycleAnalyzer};
pub use plot::{
    render_cycle_png, render_drift_png, render_half_cycle_png, render_overlay_png, DriftAxis,
    PlotStyle,
};
pub use source::{CsvSource, ManualSource, Sample, Trace, TraceSource};
pub use turning::TurningPointStrategy;
pub use validate::{CycleValidator, RejectionReason};
