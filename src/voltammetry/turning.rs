use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::voltammetry::AnalysisError;
/// How the anodic/cathodic split point of a cycle is found.
///
/// The two strategies disagree on noisy data, so the choice is always explicit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurningPointStrategy {
    /// Earlier of the global maximum and the global minimum. Extrema sitting on the
    /// first or last sample are not reversals and lose to interior ones.
    Extremum,
    /// First sample whose sweep direction differs from the last non-zero direction.
    /// Returns the first sample of the new direction.
    #[default]
    SignChange,
}
impl TurningPointStrategy {
    /// Index splitting `potentials` into `..idx` (anodic) and `idx..` (cathodic).
    ///
    /// Always `<= potentials.len()`. Sequences shorter than three samples, and sequences
    /// without a reversal, fall back to the midpoint.
    pub fn locate(self, potentials: &[f64]) -> usize {
        let midpoint = potentials.len() / 2;
        if potentials.len() < 3 {
            return midpoint;
        }
        let found = match self {
            TurningPointStrategy::Extremum => locate_extremum(potentials),
            TurningPointStrategy::SignChange => locate_sign_change(potentials),
        };
        found.unwrap_or(midpoint)
    }
}
fn locate_extremum(potentials: &[f64]) -> Option<usize> {
    let last = potentials.len() - 1;
    let (mut max_idx, mut min_idx) = (0, 0);
    for (idx, &value) in potentials.iter().enumerate() {
        if value > potentials[max_idx] {
            max_idx = idx;
        }
        if value < potentials[min_idx] {
            min_idx = idx;
        }
    }
    let interior = |idx: usize| idx > 0 && idx < last;
    match (interior(max_idx), interior(min_idx)) {
        (true, true) => Some(max_idx.min(min_idx)),
        (true, false) => Some(max_idx),
        (false, true) => Some(min_idx),
        (false, false) => None,
    }
}
fn locate_sign_change(potentials: &[f64]) -> Option<usize> {
    let mut previous = 0.0;
    for (idx, pair) in potentials.windows(2).enumerate() {
        let direction = sign(pair[1] - pair[0]);
        if direction == 0.0 {
            continue;
        }
        if previous != 0.0 && direction != previous {
            return Some(idx + 1);
        }
        previous = direction;
    }
    None
}
fn sign(delta: f64) -> f64 {
    if delta > 0.0 {
        1.0
    } else if delta < 0.0 {
        -1.0
    } else {
        0.0
    }
}
impl fmt::Display for TurningPointStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TurningPointStrategy::Extremum => "extremum",
            TurningPointStrategy::SignChange => "sign-change",
        })
    }
}
impl FromStr for TurningPointStrategy {
    type Err = AnalysisError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "extremum" => Ok(TurningPointStrategy::Extremum),
            "sign-change" => Ok(TurningPointStrategy::SignChange),
            other => Err(AnalysisError::Config(format!(
                "unknown turning point strategy {other:?} (expected extremum or sign-change)"
            ))),
        }
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    fn triangle(up: usize, down: usize, peak: f64) -> Vec<f64> {
        let mut v: Vec<f64> = (0..up).map(|i| peak * i as f64 / (up - 1) as f64).collect();
        v.extend((0..down).map(|j| peak * (1.0 - (j + 1) as f64 / down as f64)));
        v
    }
    fn direction(p: &[f64], i: usize) -> f64 {
        sign(p[i] - p[i - 1])
    }
    #[test]
    fn clean_triangle_agrees_on_the_apex() {
        let p = triangle(20, 20, 0.5);
        assert_eq!(TurningPointStrategy::Extremum.locate(&p), 19);
        // First sample after the apex.
        assert_eq!(TurningPointStrategy::SignChange.locate(&p), 20);
    }
    #[test]
    fn down_then_up_sweep() {
        let p: Vec<f64> = triangle(15, 15, 0.4).iter().map(|v| -v).collect();
        assert_eq!(TurningPointStrategy::Extremum.locate(&p), 14);
        assert_eq!(TurningPointStrategy::SignChange.locate(&p), 15);
    }
    #[test]
    fn extremum_prefers_the_earlier_interior_extremum() {
        // 0 -> 0.5 -> -0.5 -> 0: max at 5, min at 15.
        let mut p: Vec<f64> = (0..=5).map(|i| i as f64 * 0.1).collect();
        p.extend((1..=10).map(|i| 0.5 - i as f64 * 0.1));
        p.extend((1..=5).map(|i| -0.5 + i as f64 * 0.1));
        assert_eq!(TurningPointStrategy::Extremum.locate(&p), 5);
    }
    #[test]
    fn sign_change_skips_plateaus() {
        let p = [0.0, 0.1, 0.2, 0.2, 0.2, 0.1, 0.0];
        assert_eq!(TurningPointStrategy::SignChange.locate(&p), 5);
        let leading_flat = [0.3, 0.3, 0.3, 0.4, 0.5, 0.4];
        assert_eq!(TurningPointStrategy::SignChange.locate(&leading_flat), 5);
    }
    #[test]
    fn monotonic_and_short_inputs_fall_back_to_midpoint() {
        let ramp: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert_eq!(TurningPointStrategy::SignChange.locate(&ramp), 5);
        assert_eq!(TurningPointStrategy::Extremum.locate(&ramp), 5);
        assert_eq!(TurningPointStrategy::SignChange.locate(&[1.0, 0.0]), 1);
        assert_eq!(TurningPointStrategy::Extremum.locate(&[1.0]), 0);
        assert_eq!(TurningPointStrategy::Extremum.locate(&[]), 0);
        assert_eq!(TurningPointStrategy::SignChange.locate(&[0.2; 6]), 3);
    }
    #[test]
    fn sign_change_result_is_a_reversal_on_noisy_sweeps() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let len = rng.gen_range(3..60);
            let p: Vec<f64> = (0..len).map(|_| rng.gen_range(-1.0..1.0)).collect();
            let has_reversal = (2..len).any(|i| {
                let (a, b) = (direction(&p, i), direction(&p, i - 1));
                a != 0.0 && b != 0.0 && a != b
            });
            if !has_reversal {
                continue;
            }
            let i = TurningPointStrategy::SignChange.locate(&p);
            assert!(i >= 2 && i < len);
            assert_ne!(direction(&p, i), direction(&p, i - 1));
        }
    }
    #[test]
    fn parses_cli_names() {
        assert_eq!(
            "extremum".parse::<TurningPointStrategy>().unwrap(),
            TurningPointStrategy::Extremum
        );
        assert!("median".parse::<TurningPointStrategy>().is_err());
    }
}
