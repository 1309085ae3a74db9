use std::borrow::Cow;
use serde::Serialize;
use crate::voltammetry::peaks::{self, PeakKind};
use crate::voltammetry::source::Sample;
use crate::voltammetry::validate::RejectionReason;
/// One accepted scan: time-sorted samples plus the features extracted from them.
#[derive(Clone, Debug, Serialize)]
pub struct Cycle<'a> {
    pub cycle_id: i64,
    samples: Cow<'a, [Sample]>,
    turning_index: usize,
    peak_indices: Vec<usize>,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfCycleKind {
    /// Rising potential, before the turning point.
    Anodic,
    /// Falling potential, from the turning point on.
    Cathodic,
}
/// Borrowed view over one side of a cycle's turning point.
#[derive(Clone, Copy, Debug)]
pub struct HalfCycle<'c> {
    pub kind: HalfCycleKind,
    pub samples: &'c [Sample],
}
impl HalfCycle<'_> {
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.time).collect()
    }
    pub fn currents(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.current).collect()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
/// A reportable extremum of the cycle's current.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Peak {
    pub index: usize,
    pub potential: f64,
    pub current: f64,
    pub kind: PeakKind,
}
impl<'a> Cycle<'a> {
    /// `samples` must already be sorted by time; `turning_index` is clamped to the length.
    pub fn new(
        cycle_id: i64,
        samples: Cow<'a, [Sample]>,
        turning_index: usize,
        peak_indices: Vec<usize>,
    ) -> Self {
        let turning_index = turning_index.min(samples.len());
        Self {
            cycle_id,
            samples,
            turning_index,
            peak_indices,
        }
    }
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
    pub fn len(&self) -> usize {
        self.samples.len()
    }
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
    pub fn turning_index(&self) -> usize {
        self.turning_index
    }
    pub fn peak_indices(&self) -> &[usize] {
        &self.peak_indices
    }
    pub fn potentials(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.potential).collect()
    }
    pub fn currents(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.current).collect()
    }
    pub fn anodic(&self) -> HalfCycle<'_> {
        HalfCycle {
            kind: HalfCycleKind::Anodic,
            samples: &self.samples[..self.turning_index],
        }
    }
    pub fn cathodic(&self) -> HalfCycle<'_> {
        HalfCycle {
            kind: HalfCycleKind::Cathodic,
            samples: &self.samples[self.turning_index..],
        }
    }
    /// Sample at the turning index, i.e. where the cathodic half starts.
    pub fn turning_sample(&self) -> Option<Sample> {
        self.samples.get(self.turning_index).copied()
    }
    pub fn peaks(&self) -> Vec<Peak> {
        let currents = self.currents();
        self.peak_indices
            .iter()
            .filter_map(|&index| {
                let kind = peaks::classify(&currents, index)?;
                let sample = self.samples[index];
                Some(Peak {
                    index,
                    potential: sample.potential,
                    current: sample.current,
                    kind,
                })
            })
            .collect()
    }
    /// Detach from the parent trace.
    pub fn into_owned(self) -> Cycle<'static> {
        Cycle {
            cycle_id: self.cycle_id,
            samples: Cow::Owned(self.samples.into_owned()),
            turning_index: self.turning_index,
            peak_indices: self.peak_indices,
        }
    }
}
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Rejection {
    pub cycle_id: i64,
    pub reason: RejectionReason,
}
/// Outcome of analysing one trace.
#[derive(Clone, Debug, Serialize)]
pub struct AnalysisResult<'a> {
    pub source_name: String,
    pub accepted: Vec<Cycle<'a>>,
    pub rejected: Vec<Rejection>,
}
impl<'a> AnalysisResult<'a> {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            accepted: Vec::new(),
            rejected: Vec::new(),
        }
    }
    pub fn into_owned(self) -> AnalysisResult<'static> {
        AnalysisResult {
            source_name: self.source_name,
            accepted: self.accepted.into_iter().map(Cycle::into_owned).collect(),
            rejected: self.rejected,
        }
    }
}
