use std::io::Write;
use cv_analyzer::voltammetry::{
    peaks, AnalysisConfig, AnalysisResult, AssignStrategy, CsvSource, CvPipeline, CycleAggregator, CycleAnalyzer,
    CycleAssigner, CycleValidator, ManualSource, RejectionReason, Sample, Trace,
    TurningPointStrategy,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
/// 0.0 V -> 0.5 V over samples 0..=19, back towards 0.0 V over 20..=39.
fn scenario_trace() -> Trace {
    let samples = (0..40)
        .map(|i| {
            let potential = if i < 20 {
                0.5 * i as f64 / 19.0
            } else {
                0.5 * (1.0 - (i - 19) as f64 / 20.0)
            };
            Sample::new(i as f64 * 0.05, potential, (i as f64).sin() * 1e-5)
        })
        .collect();
    Trace::new("scenario", samples)
}
fn noisy_multi_cycle(seed: u64, cycles: usize) -> Trace {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::new();
    let mut t = 0.0;
    for _ in 0..cycles {
        for i in 0..100 {
            let ramp = (if i < 50 { i } else { 100 - i }) as f64 * 0.01;
            let current = (i as f64 * 0.3).sin() * 1e-5 + rng.gen_range(-1e-7..1e-7);
            samples.push(Sample::new(t, ramp, current));
            t += 0.02;
        }
    }
    Trace::new("noisy", samples)
}
#[test]
fn triangle_sweep_end_to_end() {
    let trace = scenario_trace();
    let ids = CycleAssigner::new(AssignStrategy::Reversal).assign(trace.samples(), None);
    assert_eq!(ids, vec![1; 40]);
    for strategy in [TurningPointStrategy::SignChange, TurningPointStrategy::Extremum] {
        let analyzer = CycleAnalyzer::new(
            AssignStrategy::Reversal,
            strategy,
            Some(CycleValidator::default()),
        );
        let result = analyzer.analyze(&trace);
        assert!(result.rejected.is_empty());
        assert_eq!(result.accepted.len(), 1);
        let cycle = &result.accepted[0];
        assert_eq!(cycle.len(), 40);
        assert!(matches!(cycle.turning_index(), 19 | 20));
        let currents: Vec<f64> = trace.samples().iter().map(|s| s.current).collect();
        let expected: Vec<usize> = (1..39)
            .filter(|&i| {
                let (a, b, c) = (currents[i - 1], currents[i], currents[i + 1]);
                (a < b && b > c) || (a > b && b < c)
            })
            .collect();
        assert!(!expected.is_empty());
        assert_eq!(cycle.peak_indices(), expected.as_slice());
        assert_eq!(
            cycle.anodic().samples.len() + cycle.cathodic().samples.len(),
            40
        );
    }
}
#[test]
fn constant_potential_is_rejected_for_range() {
    let trace = Trace::new("flat", vec![Sample::new(0.0, 0.2, 1e-6); 5]);
    for strategy in [TurningPointStrategy::SignChange, TurningPointStrategy::Extremum] {
        let analyzer = CycleAnalyzer::new(
            AssignStrategy::Reversal,
            strategy,
            Some(CycleValidator::default()),
        );
        let result = analyzer.analyze(&trace);
        assert!(result.accepted.is_empty());
        assert_eq!(result.rejected.len(), 1);
        assert!(matches!(
            result.rejected[0].reason,
            RejectionReason::PotentialRangeTooSmall { .. }
        ));
        assert!(result.rejected[0]
            .reason
            .to_string()
            .starts_with("potential range too small"));
    }
}
fn features(result: &AnalysisResult<'_>) -> Vec<(i64, usize, usize, Vec<usize>)> {
    result
        .accepted
        .iter()
        .map(|c| (c.cycle_id, c.len(), c.turning_index(), c.peak_indices().to_vec()))
        .collect()
}
#[test]
fn repeated_analysis_is_identical() {
    let trace = noisy_multi_cycle(11, 4);
    let analyzer = CycleAnalyzer::from_config(&AnalysisConfig::default());
    let first = analyzer.analyze(&trace);
    let second = analyzer.analyze(&trace);
    assert_eq!(features(&first), features(&second));
    assert_eq!(first.accepted.len(), 4);
    let ids_a = CycleAssigner::new(AssignStrategy::Reversal).assign(trace.samples(), None);
    let ids_b = CycleAssigner::new(AssignStrategy::Reversal).assign(trace.samples(), None);
    assert_eq!(ids_a, ids_b);
}
#[test]
fn aggregation_across_traces_orders_by_cycle_id() {
    let make = |id: i64| {
        let samples = scenario_trace().samples().to_vec();
        Trace::new(format!("file_CV{id}.csv"), samples)
    };
    let traces = vec![make(3), make(1), make(2)];
    let analyzer = CycleAnalyzer::new(
        AssignStrategy::EvenPartition,
        TurningPointStrategy::SignChange,
        Some(CycleValidator::default()),
    );
    let mut pipeline = CvPipeline::new(ManualSource::new(traces), analyzer);
    let mut aggregator = CycleAggregator::new();
    while let Some(result) = pipeline.pump_once().unwrap() {
        aggregator.extend(result);
    }
    let overlay: Vec<i64> = aggregator.overlay().iter().map(|s| s.cycle_id).collect();
    assert_eq!(overlay, vec![1, 2, 3]);
    let drift = aggregator.drift();
    let drift_ids: Vec<i64> = drift.iter().map(|d| d.cycle_id).collect();
    assert_eq!(drift_ids, vec![1, 2, 3]);
    assert!(drift.iter().all(|d| d.cathodic_start.is_some()));
    assert_eq!(drift[0].start.potential, 0.0);
}
#[test]
fn csv_files_flow_through_the_pipeline() {
    let mut file = tempfile::Builder::new()
        .prefix("copper_")
        .suffix(".csv")
        .tempfile()
        .unwrap();
    writeln!(file, "Time (s),WE(1).Potential (V),WE(1).Current (A)").unwrap();
    for s in scenario_trace().samples() {
        writeln!(file, "{},{},{}", s.time, s.potential, s.current).unwrap();
    }
    file.flush().unwrap();
    let missing = std::env::temp_dir().join("cv-analyzer-does-not-exist.csv");
    let source = CsvSource::new(
        vec![missing, file.path().to_path_buf()],
        AnalysisConfig::default().columns,
    );
    let mut pipeline = CvPipeline::new(source, CycleAnalyzer::default());
    assert!(pipeline.pump_once().is_err());
    let result = pipeline.pump_once().unwrap().unwrap();
    assert_eq!(result.accepted.len(), 1);
    assert_eq!(result.accepted[0].len(), 40);
    assert!(pipeline.pump_once().unwrap().is_none());
}
#[test]
fn peak_detector_is_reachable_standalone() {
    assert_eq!(peaks::detect(&[0.0, 2.0, 1.0, 3.0, 0.0]), vec![1, 2, 3]);
}
