use serde::Serialize;
use thiserror::Error;
pub const DEFAULT_MIN_RANGE: f64 = 0.01;
pub const DEFAULT_EDGE_MARGIN: usize = 10;
/// Why a segmented cycle was left out of the analysis.
#[derive(Clone, Copy, Debug, PartialEq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    #[error("potential range too small ({range:.4} V < {min_range} V)")]
    PotentialRangeTooSmall { range: f64, min_range: f64 },
    #[error("turning point too close to an edge (index {turning_index} of {len}, margin {edge_margin})")]
    TurningPointNearEdge {
        turning_index: usize,
        len: usize,
        edge_margin: usize,
    },
}
/// Guards against cycles that never swept or whose split leaves a near-empty half.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CycleValidator {
    min_range: f64,
    edge_margin: usize,
}
impl Default for CycleValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_RANGE, DEFAULT_EDGE_MARGIN)
    }
}
impl CycleValidator {
    pub fn new(min_range: f64, edge_margin: usize) -> Self {
        Self {
            min_range,
            edge_margin,
        }
    }
    pub fn min_range(&self) -> f64 {
        self.min_range
    }
    pub fn edge_margin(&self) -> usize {
        self.edge_margin
    }
    /// Check the rules in order; the first one that fails is reported.
    pub fn validate(&self, potentials: &[f64], turning_index: usize) -> Result<(), RejectionReason> {
        let range = potential_range(potentials);
        if range < self.min_range {
            return Err(RejectionReason::PotentialRangeTooSmall {
                range,
                min_range: self.min_range,
            });
        }
        let len = potentials.len();
        if turning_index < self.edge_margin || turning_index + self.edge_margin > len {
            return Err(RejectionReason::TurningPointNearEdge {
                turning_index,
                len,
                edge_margin: self.edge_margin,
            });
        }
        Ok(())
    }
}
/// `max - min` of the sequence; zero when empty.
pub fn potential_range(potentials: &[f64]) -> f64 {
    let Some(&first) = potentials.first() else {
        return 0.0;
    };
    let (min, max) = potentials
        .iter()
        .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    max - min
}
#[cfg(test)]
mod tests {
    use super::*;
    fn triangle(len: usize) -> Vec<f64> {
        let half = len / 2;
        (0..len)
            .map(|i| (if i < half { i } else { len - i }) as f64 * 0.01)
            .collect()
    }
    #[test]
    fn accepts_a_full_sweep() {
        let p = triangle(40);
        assert_eq!(CycleValidator::default().validate(&p, 20), Ok(()));
    }
    #[test]
    fn flat_cycle_is_rejected_for_range_first() {
        let p = [0.2; 5];
        let err = CycleValidator::default().validate(&p, 0).unwrap_err();
        assert!(matches!(err, RejectionReason::PotentialRangeTooSmall { .. }));
        assert!(err.to_string().starts_with("potential range too small"));
    }
    #[test]
    fn edges_are_inclusive_of_the_margin() {
        let p = triangle(40);
        let v = CycleValidator::default();
        assert!(v.validate(&p, 10).is_ok());
        assert!(v.validate(&p, 30).is_ok());
        assert!(v.validate(&p, 9).is_err());
        let err = v.validate(&p, 31).unwrap_err();
        assert!(err.to_string().starts_with("turning point too close to an edge"));
    }
    #[test]
    fn smaller_min_range_never_rejects_for_range() {
        let p = triangle(30);
        let span = potential_range(&p);
        for min_range in [span, span * 0.5, 0.0, -1.0] {
            let result = CycleValidator::new(min_range, 0).validate(&p, 15);
            assert!(!matches!(result, Err(RejectionReason::PotentialRangeTooSmall { .. })));
        }
    }
    #[test]
    fn margin_past_half_rejects_every_turning_index() {
        for len in [3usize, 10, 25, 40] {
            let p = triangle(len);
            let v = CycleValidator::new(0.0, len / 2 + 1);
            for turning_index in 0..=len {
                assert!(matches!(
                    v.validate(&p, turning_index),
                    Err(RejectionReason::TurningPointNearEdge { .. })
                ));
            }
        }
    }
    #[test]
    fn empty_cycle_has_zero_range() {
        assert_eq!(potential_range(&[]), 0.0);
        assert!(CycleValidator::default().validate(&[], 0).is_err());
    }
}
