//! Strict local extrema of a current sequence.
//!
//! No smoothing and no thresholds: every strict maximum and minimum is reported,
//! noise included. Callers that want denoised peaks filter the result.
use serde::Serialize;
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PeakKind {
    Maximum,
    Minimum,
}
/// Interior indices `i` with `c[i-1] < c[i] > c[i+1]` or `c[i-1] > c[i] < c[i+1]`, ascending.
pub fn detect(currents: &[f64]) -> Vec<usize> {
    currents
        .windows(3)
        .enumerate()
        .filter(|(_, w)| classify_window(w).is_some())
        .map(|(i, _)| i + 1)
        .collect()
}
/// Kind of the extremum at `index`, or `None` if it is not a strict interior extremum.
pub fn classify(currents: &[f64], index: usize) -> Option<PeakKind> {
    if index == 0 || index + 1 >= currents.len() {
        return None;
    }
    classify_window(&currents[index - 1..=index + 1])
}
fn classify_window(w: &[f64]) -> Option<PeakKind> {
    let (prev, cur, next) = (w[0], w[1], w[2]);
    if prev < cur && cur > next {
        Some(PeakKind::Maximum)
    } else if prev > cur && cur < next {
        Some(PeakKind::Minimum)
    } else {
        None
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    #[test]
    fn finds_maxima_and_minima() {
        let c = [0.0, 1.0, 0.5, -1.0, 0.0, 2.0, 3.0];
        assert_eq!(detect(&c), vec![1, 3]);
        assert_eq!(classify(&c, 1), Some(PeakKind::Maximum));
        assert_eq!(classify(&c, 3), Some(PeakKind::Minimum));
        assert_eq!(classify(&c, 5), None);
    }
    #[test]
    fn ties_are_never_peaks() {
        assert!(detect(&[0.0, 1.0, 1.0, 0.0]).is_empty());
        assert!(detect(&[1.0, 0.0, 0.0, 1.0]).is_empty());
        assert!(detect(&[2.0; 8]).is_empty());
    }
    #[test]
    fn short_sequences_have_no_interior() {
        assert!(detect(&[]).is_empty());
        assert!(detect(&[1.0]).is_empty());
        assert!(detect(&[1.0, 2.0]).is_empty());
        assert_eq!(classify(&[1.0, 2.0], 1), None);
    }
    #[test]
    fn reversed_negated_sequence_mirrors_peaks() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let n = rng.gen_range(0..40);
            let c: Vec<f64> = (0..n).map(|_| rng.gen_range(-5..5) as f64).collect();
            let mirrored: Vec<f64> = c.iter().rev().map(|v| -v).collect();
            let mut expected: Vec<usize> = detect(&c).into_iter().map(|i| n - 1 - i).collect();
            expected.reverse();
            assert_eq!(detect(&mirrored), expected);
            for i in detect(&c) {
                let flipped = match classify(&c, i) {
                    Some(PeakKind::Maximum) => Some(PeakKind::Minimum),
                    Some(PeakKind::Minimum) => Some(PeakKind::Maximum),
                    None => None,
                };
                assert_eq!(classify(&mirrored, n - 1 - i), flipped);
            }
        }
    }
}
