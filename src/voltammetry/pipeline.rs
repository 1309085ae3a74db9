use log::{debug, info, warn};
use crate::voltammetry::assign::{AssignStrategy, CycleAssigner};
use crate::voltammetry::config::AnalysisConfig;
use crate::voltammetry::cycle::{AnalysisResult, Cycle, Rejection};
use crate::voltammetry::error::AnalysisError;
use crate::voltammetry::peaks;
use crate::voltammetry::source::{Trace, TraceSource};
use crate::voltammetry::turning::TurningPointStrategy;
use crate::voltammetry::validate::CycleValidator;
/// Segmentation and feature extraction for a single trace.
#[derive(Clone, Copy, Debug)]
pub struct CycleAnalyzer {
    assigner: CycleAssigner,
    turning: TurningPointStrategy,
    validator: Option<CycleValidator>,
}
impl Default for CycleAnalyzer {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}
impl CycleAnalyzer {
    pub fn new(
        assign: AssignStrategy,
        turning: TurningPointStrategy,
        validator: Option<CycleValidator>,
    ) -> Self {
        Self {
            assigner: CycleAssigner::new(assign),
            turning,
            validator,
        }
    }
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            config.assign.strategy,
            config.turning.strategy,
            config.validation.validator(),
        )
    }
    /// Split `trace` into cycles, locate turning points, validate, then detect peaks on
    /// the accepted cycles. Rejections are collected and never stop the trace.
    pub fn analyze<'t>(&self, trace: &'t Trace) -> AnalysisResult<'t> {
        let mut result = AnalysisResult::new(trace.name());
        for block in self.assigner.split(trace) {
            let potentials: Vec<f64> = block.samples.iter().map(|s| s.potential).collect();
            let turning_index = self.turning.locate(&potentials);
            if let Some(validator) = &self.validator {
                if let Err(reason) = validator.validate(&potentials, turning_index) {
                    warn!("{}: cycle {} rejected: {}", trace.name(), block.cycle_id, reason);
                    result.rejected.push(Rejection {
                        cycle_id: block.cycle_id,
                        reason,
                    });
                    continue;
                }
            }
            let currents: Vec<f64> = block.samples.iter().map(|s| s.current).collect();
            let peak_indices = peaks::detect(&currents);
            debug!(
                "{}: cycle {} has {} samples, turning index {}, {} peak(s)",
                trace.name(),
                block.cycle_id,
                block.samples.len(),
                turning_index,
                peak_indices.len()
            );
            result.accepted.push(Cycle::new(
                block.cycle_id,
                block.samples,
                turning_index,
                peak_indices,
            ));
        }
        info!(
            "{}: {} cycle(s) accepted, {} rejected",
            trace.name(),
            result.accepted.len(),
            result.rejected.len()
        );
        result
    }
}
/// Pulls traces from a source and analyses them one at a time.
pub struct CvPipeline<S: TraceSource> {
    source: S,
    analyzer: CycleAnalyzer,
}
impl<S: TraceSource> CvPipeline<S> {
    pub fn new(source: S, analyzer: CycleAnalyzer) -> Self {
        Self { source, analyzer }
    }
    pub fn analyzer(&self) -> &CycleAnalyzer {
        &self.analyzer
    }
    /// Analyse the next trace. `Ok(None)` once the source is exhausted; an `Err` only
    /// concerns the trace that failed to load and the pipeline can be pumped again.
    pub fn pump_once(&mut self) -> Result<Option<AnalysisResult<'static>>, AnalysisError> {
        let Some(trace) = self.source.next_trace()? else {
            return Ok(None);
        };
        Ok(Some(self.analyzer.analyze(&trace).into_owned()))
    }
}
