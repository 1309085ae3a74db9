use serde::Serialize;
use crate::voltammetry::cycle::{AnalysisResult, Cycle};
use crate::voltammetry::source::Sample;
pub const DEFAULT_DRIFT_LIMIT: usize = 30;
/// Full potential/current series of one cycle, for superimposed plotting.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OverlaySeries {
    pub cycle_id: i64,
    pub potentials: Vec<f64>,
    pub currents: Vec<f64>,
}
/// Start-of-cycle values used to follow drift across cycles.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DriftPoint {
    /// Position within the bounded prefix, starting at 0.
    pub ordinal: usize,
    pub cycle_id: i64,
    pub start: Sample,
    /// Sample at the cycle's turning index, where the cathodic half starts.
    pub cathodic_start: Option<Sample>,
}
/// Caller-owned collection of accepted cycles across traces.
#[derive(Clone, Debug)]
pub struct CycleAggregator {
    cycles: Vec<Cycle<'static>>,
    drift_limit: usize,
    include_cathodic_start: bool,
}
impl Default for CycleAggregator {
    fn default() -> Self {
        Self::new()
    }
}
impl CycleAggregator {
    pub fn new() -> Self {
        Self {
            cycles: Vec::new(),
            drift_limit: DEFAULT_DRIFT_LIMIT,
            include_cathodic_start: true,
        }
    }
    pub fn with_drift_limit(mut self, drift_limit: usize) -> Self {
        self.drift_limit = drift_limit;
        self
    }
    pub fn with_cathodic_start(mut self, include: bool) -> Self {
        self.include_cathodic_start = include;
        self
    }
    pub fn push(&mut self, cycle: Cycle<'_>) {
        self.cycles.push(cycle.into_owned());
    }
    /// Take the accepted cycles of one trace; rejections are left with the caller.
    pub fn extend(&mut self, result: AnalysisResult<'_>) {
        for cycle in result.accepted {
            self.push(cycle);
        }
    }
    pub fn len(&self) -> usize {
        self.cycles.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
    /// Cycles ordered by id; equal ids keep their arrival order.
    pub fn sorted_cycles(&self) -> Vec<&Cycle<'static>> {
        let mut sorted: Vec<&Cycle<'static>> = self.cycles.iter().collect();
        sorted.sort_by_key(|c| c.cycle_id);
        sorted
    }
    pub fn overlay(&self) -> Vec<OverlaySeries> {
        self.sorted_cycles()
            .into_iter()
            .map(|c| OverlaySeries {
                cycle_id: c.cycle_id,
                potentials: c.potentials(),
                currents: c.currents(),
            })
            .collect()
    }
    pub fn drift(&self) -> Vec<DriftPoint> {
        self.sorted_cycles()
            .into_iter()
            .filter_map(|c| {
                let start = c.samples().first().copied()?;
                let cathodic_start = if self.include_cathodic_start {
                    c.turning_sample()
                } else {
                    None
                };
                Some((c.cycle_id, start, cathodic_start))
            })
            .take(self.drift_limit)
            .enumerate()
            .map(|(ordinal, (cycle_id, start, cathodic_start))| DriftPoint {
                ordinal,
                cycle_id,
                start,
                cathodic_start,
            })
            .collect()
    }
}
