use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use log::debug;
use serde::{Deserialize, Serialize};
use crate::voltammetry::source::{Sample, Trace};
use crate::voltammetry::AnalysisError;
/// Id given to every sample when no cycle structure can be derived.
pub const DEFAULT_CYCLE_ID: i64 = 1;
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignStrategy {
    /// A cycle ends when the sweep, after reversing once, turns back to its initial
    /// direction; the vertex sample starts the next cycle. One up-then-down sweep is
    /// one cycle.
    #[default]
    Reversal,
    /// Scan ordinal from a repeating key: a sample's id is how many times its exact
    /// potential setpoint has been seen so far.
    ScanCounter,
    /// Equal-length blocks mapped onto the cycle ids announced by the trace name.
    /// Assumes every cycle has the same number of rows.
    EvenPartition,
}
/// Contiguous or grouped samples sharing one cycle id, sorted by time.
#[derive(Clone, Debug)]
pub struct CycleBlock<'a> {
    pub cycle_id: i64,
    pub samples: Cow<'a, [Sample]>,
}
#[derive(Clone, Copy, Debug, Default)]
pub struct CycleAssigner {
    strategy: AssignStrategy,
}
impl CycleAssigner {
    pub fn new(strategy: AssignStrategy) -> Self {
        Self { strategy }
    }
    pub fn strategy(&self) -> AssignStrategy {
        self.strategy
    }
    /// Cycle id of every sample, index for index. Samples are not reordered.
    pub fn assign(&self, samples: &[Sample], expected_range: Option<&[i64]>) -> Vec<i64> {
        if samples.len() < 2 {
            return vec![DEFAULT_CYCLE_ID; samples.len()];
        }
        match self.strategy {
            AssignStrategy::Reversal => assign_by_reversal(samples),
            AssignStrategy::ScanCounter => assign_by_scan_counter(samples),
            AssignStrategy::EvenPartition => match expected_range {
                Some(range) if !range.is_empty() => assign_evenly(samples.len(), range),
                _ => vec![DEFAULT_CYCLE_ID; samples.len()],
            },
        }
    }
    /// Assign and group a trace into time-sorted cycle blocks, in order of first appearance.
    pub fn split<'a>(&self, trace: &'a Trace) -> Vec<CycleBlock<'a>> {
        let expected = trace.expected_cycle_range();
        let ids = self.assign(trace.samples(), expected.as_deref());
        let blocks = group_cycles(trace.samples(), &ids);
        debug!(
            "{}: {} samples -> {} cycle(s) via {}",
            trace.name(),
            trace.len(),
            blocks.len(),
            self.strategy
        );
        blocks
    }
}
fn assign_by_reversal(samples: &[Sample]) -> Vec<i64> {
    let mut ids = Vec::with_capacity(samples.len());
    let mut cycle_id = DEFAULT_CYCLE_ID;
    let mut sweep = 0.0;
    let mut previous = 0.0;
    let mut reversed = false;
    ids.push(cycle_id);
    for pair in samples.windows(2) {
        let delta = pair[1].potential - pair[0].potential;
        let direction = if delta > 0.0 {
            1.0
        } else if delta < 0.0 {
            -1.0
        } else {
            0.0
        };
        if direction != 0.0 {
            if sweep == 0.0 {
                sweep = direction;
            } else if direction != previous {
                if direction == sweep && reversed {
                    // the vertex sample opens the new cycle
                    cycle_id += 1;
                    reversed = false;
                    if let Some(vertex) = ids.last_mut() {
                        *vertex = cycle_id;
                    }
                } else if direction != sweep {
                    reversed = true;
                }
            }
            previous = direction;
        }
        ids.push(cycle_id);
    }
    ids
}
fn assign_by_scan_counter(samples: &[Sample]) -> Vec<i64> {
    let mut seen: HashMap<u64, i64> = HashMap::new();
    samples
        .iter()
        .map(|s| {
            // -0.0 and 0.0 are the same setpoint
            let key = (if s.potential == 0.0 { 0.0f64 } else { s.potential }).to_bits();
            let count = seen.entry(key).or_insert(0);
            *count += 1;
            *count
        })
        .collect()
}
fn assign_evenly(len: usize, range: &[i64]) -> Vec<i64> {
    let block_len = len / range.len();
    let last = range.len() - 1;
    (0..len)
        .map(|idx| {
            let block = if block_len == 0 {
                last
            } else {
                (idx / block_len).min(last)
            };
            range[block]
        })
        .collect()
}
/// Group samples by id, keeping the order in which ids first appear.
///
/// Blocks that are contiguous and already time-sorted borrow from `samples`; the rest
/// are copied and stably sorted by time.
pub fn group_cycles<'a>(samples: &'a [Sample], ids: &[i64]) -> Vec<CycleBlock<'a>> {
    let mut order: Vec<(i64, Vec<usize>)> = Vec::new();
    let mut slot: HashMap<i64, usize> = HashMap::new();
    for (idx, &id) in ids.iter().enumerate().take(samples.len()) {
        let at = *slot.entry(id).or_insert_with(|| {
            order.push((id, Vec::new()));
            order.len() - 1
        });
        order[at].1.push(idx);
    }
    order
        .into_iter()
        .map(|(cycle_id, indices)| {
            let first = indices[0];
            let last = indices[indices.len() - 1];
            let contiguous = last - first + 1 == indices.len();
            let block = &samples[first..=last];
            let sorted = block.windows(2).all(|w| w[0].time <= w[1].time);
            let samples = if contiguous && sorted {
                Cow::Borrowed(block)
            } else {
                let mut owned: Vec<Sample> = indices.iter().map(|&i| samples[i]).collect();
                owned.sort_by(|a, b| a.time.total_cmp(&b.time));
                Cow::Owned(owned)
            };
            CycleBlock { cycle_id, samples }
        })
        .collect()
}
impl fmt::Display for AssignStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssignStrategy::Reversal => "reversal",
            AssignStrategy::ScanCounter => "scan-counter",
            AssignStrategy::EvenPartition => "even-partition",
        })
    }
}
impl FromStr for AssignStrategy {
    type Err = AnalysisError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reversal" => Ok(AssignStrategy::Reversal),
            "scan-counter" => Ok(AssignStrategy::ScanCounter),
            "even-partition" => Ok(AssignStrategy::EvenPartition),
            other => Err(AnalysisError::Config(format!(
                "unknown cycle assignment {other:?} (expected reversal, scan-counter or even-partition)"
            ))),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    fn from_potentials(potentials: &[f64]) -> Vec<Sample> {
        potentials
            .iter()
            .enumerate()
            .map(|(i, &p)| Sample::new(i as f64 * 0.1, p, 0.0))
            .collect()
    }
    fn sweeps(cycles: usize) -> Vec<f64> {
        let mut p = Vec::new();
        for _ in 0..cycles {
            p.extend((0..10).map(|i| i as f64 * 0.05));
            p.extend((0..10).map(|i| 0.5 - i as f64 * 0.05));
        }
        p
    }
    #[test]
    fn single_sweep_is_one_cycle() {
        let samples = from_potentials(&sweeps(1));
        let ids = CycleAssigner::new(AssignStrategy::Reversal).assign(&samples, None);
        assert_eq!(ids, vec![1; 20]);
    }
    #[test]
    fn repeated_sweeps_are_numbered_in_order() {
        let samples = from_potentials(&sweeps(3));
        let ids = CycleAssigner::new(AssignStrategy::Reversal).assign(&samples, None);
        assert_eq!(&ids[..20], &[1; 20]);
        assert_eq!(&ids[20..40], &[2; 20]);
        assert_eq!(&ids[40..], &[3; 20]);
    }
    #[test]
    fn reversal_ignores_flat_steps() {
        let samples = from_potentials(&[0.0, 0.1, 0.1, 0.2, 0.1, 0.1, 0.0, 0.1, 0.2]);
        let ids = CycleAssigner::new(AssignStrategy::Reversal).assign(&samples, None);
        assert_eq!(ids, vec![1, 1, 1, 1, 1, 1, 2, 2, 2]);
    }
    #[test]
    fn scan_counter_counts_repeated_setpoints() {
        let samples = from_potentials(&[0.0, 0.1, 0.2, 0.1, 0.0, 0.1, 0.2, -0.0]);
        let ids = CycleAssigner::new(AssignStrategy::ScanCounter).assign(&samples, None);
        assert_eq!(ids, vec![1, 1, 1, 2, 2, 3, 2, 3]);
    }
    #[test]
    fn even_partition_gives_remainder_to_last_block() {
        let samples = from_potentials(&[0.0; 10]);
        let ids = CycleAssigner::new(AssignStrategy::EvenPartition).assign(&samples, Some(&[4, 5, 6]));
        assert_eq!(ids, vec![4, 4, 4, 5, 5, 5, 6, 6, 6, 6]);
    }
    #[test]
    fn even_partition_with_more_cycles_than_rows() {
        let samples = from_potentials(&[0.0; 3]);
        let ids = CycleAssigner::new(AssignStrategy::EvenPartition).assign(&samples, Some(&[1, 2, 3, 4]));
        assert_eq!(ids, vec![4, 4, 4]);
    }
    #[test]
    fn fallbacks_use_the_default_id() {
        let assigner = CycleAssigner::new(AssignStrategy::EvenPartition);
        assert_eq!(assigner.assign(&from_potentials(&[0.1, 0.2]), None), vec![1, 1]);
        assert_eq!(assigner.assign(&from_potentials(&[0.1, 0.2]), Some(&[])), vec![1, 1]);
        assert_eq!(assigner.assign(&from_potentials(&[0.1]), Some(&[3])), vec![1]);
        assert!(assigner.assign(&[], None).is_empty());
    }
    #[test]
    fn contiguous_sorted_blocks_borrow_the_trace() {
        let trace = Trace::new("sweeps_CV1-2", from_potentials(&sweeps(2)));
        let blocks = CycleAssigner::new(AssignStrategy::EvenPartition).split(&trace);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].cycle_id, 1);
        assert_eq!(blocks[1].cycle_id, 2);
        assert!(matches!(blocks[0].samples, Cow::Borrowed(_)));
        assert_eq!(blocks[1].samples.len(), 20);
    }
    #[test]
    fn interleaved_blocks_are_copied_and_time_sorted() {
        let samples = vec![
            Sample::new(0.3, 0.0, 1.0),
            Sample::new(0.1, 0.1, 2.0),
            Sample::new(0.2, 0.2, 3.0),
            Sample::new(0.0, 0.3, 4.0),
        ];
        let blocks = group_cycles(&samples, &[2, 1, 2, 1]);
        assert_eq!(blocks[0].cycle_id, 2);
        let times: Vec<f64> = blocks[0].samples.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0.2, 0.3]);
        assert!(matches!(blocks[1].samples, Cow::Owned(_)));
        let times: Vec<f64> = blocks[1].samples.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0.0, 0.1]);
    }
}
