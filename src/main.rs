use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use serde::Serialize;
use cv_analyzer::voltammetry::{
    render_cycle_png, render_drift_png, render_half_cycle_png, render_overlay_png,
    AnalysisConfig, AnalysisResult, AssignStrategy, CsvSource, CvPipeline, CycleAnalyzer,
    DriftAxis, DriftPoint, OverlaySeries, Peak, PlotStyle, Rejection, TurningPointStrategy,
};
/// Split cyclic-voltammetry exports into cycles and report turning points and peaks.
#[derive(Parser)]
#[command(name = "cv-analyzer")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV exports to analyse; a `CV<start>[-<end>]` token in the name gives the cycle range
    #[arg(value_name = "FILES", required = true)]
    files: Vec<PathBuf>,
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Turning point strategy: sign-change or extremum
    #[arg(long)]
    strategy: Option<TurningPointStrategy>,
    /// Cycle assignment: reversal, scan-counter or even-partition
    #[arg(long)]
    assign: Option<AssignStrategy>,
    /// Smallest accepted potential excursion (V)
    #[arg(long)]
    min_range: Option<f64>,
    /// Samples the turning point must keep from either cycle edge
    #[arg(long)]
    edge_margin: Option<usize>,
    /// Accept every segmented cycle
    #[arg(long)]
    no_validate: bool,
    /// Number of cycles in the drift summary
    #[arg(long)]
    drift_limit: Option<usize>,
    /// Write PNG charts into this directory
    #[arg(long, value_name = "DIR")]
    plots: Option<PathBuf>,
    /// Print a JSON report instead of the text summary
    #[arg(long)]
    json: bool,
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}
#[derive(Serialize)]
struct Report {
    traces: Vec<TraceReport>,
    overlay: Vec<OverlaySeries>,
    drift: Vec<DriftPoint>,
}
#[derive(Serialize)]
struct TraceReport {
    source_name: String,
    cycles: Vec<CycleReport>,
    rejected: Vec<Rejection>,
}
#[derive(Serialize)]
struct CycleReport {
    cycle_id: i64,
    samples: usize,
    turning_index: usize,
    turning_potential: Option<f64>,
    peaks: Vec<Peak>,
}
impl TraceReport {
    fn from_result(result: &AnalysisResult<'_>) -> Self {
        Self {
            source_name: result.source_name.clone(),
            cycles: result
                .accepted
                .iter()
                .map(|c| CycleReport {
                    cycle_id: c.cycle_id,
                    samples: c.len(),
                    turning_index: c.turning_index(),
                    turning_potential: c.turning_sample().map(|s| s.potential),
                    peaks: c.peaks(),
                })
                .collect(),
            rejected: result.rejected.clone(),
        }
    }
    fn print(&self) {
        println!("{}", self.source_name);
        for cycle in &self.cycles {
            println!(
                "  scan {:>3}: {:>6} samples, turning index {:>5}{}, {} peak(s)",
                cycle.cycle_id,
                cycle.samples,
                cycle.turning_index,
                cycle
                    .turning_potential
                    .map(|p| format!(" ({p:.4} V)"))
                    .unwrap_or_default(),
                cycle.peaks.len()
            );
        }
        for rejection in &self.rejected {
            println!("  scan {:>3}: skipped, {}", rejection.cycle_id, rejection.reason);
        }
    }
}
fn load_config(cli: &Cli) -> Result<AnalysisConfig> {
    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    if let Some(strategy) = cli.strategy {
        config.turning.strategy = strategy;
    }
    if let Some(strategy) = cli.assign {
        config.assign.strategy = strategy;
    }
    if let Some(min_range) = cli.min_range {
        config.validation.min_range = min_range;
    }
    if let Some(edge_margin) = cli.edge_margin {
        config.validation.edge_margin = edge_margin;
    }
    if cli.no_validate {
        config.validation.enabled = false;
    }
    if let Some(limit) = cli.drift_limit {
        config.aggregate.drift_limit = limit;
    }
    config.check()?;
    Ok(config)
}
fn write_png(dir: &Path, file_name: String, png: Vec<u8>) -> Result<()> {
    let path = dir.join(file_name);
    std::fs::write(&path, png).with_context(|| format!("failed to write {}", path.display()))
}
fn write_cycle_plots(dir: &Path, result: &AnalysisResult<'_>, style: &PlotStyle) -> Result<()> {
    let stem = Path::new(&result.source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| result.source_name.clone());
    for cycle in &result.accepted {
        let id = cycle.cycle_id;
        match render_cycle_png(cycle, style) {
            Ok(png) => write_png(dir, format!("{stem}_scan{id}_full.png"), png)?,
            Err(e) => warn!("{stem} scan {id}: {e}"),
        }
        for half in [cycle.anodic(), cycle.cathodic()] {
            let kind = format!("{:?}", half.kind).to_lowercase();
            match render_half_cycle_png(id, &half, style) {
                Ok(png) => write_png(dir, format!("{stem}_scan{id}_{kind}.png"), png)?,
                Err(e) => warn!("{stem} scan {id}: {e}"),
            }
        }
    }
    Ok(())
}
fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
    let config = load_config(&cli)?;
    let style = PlotStyle::default();
    if let Some(dir) = &cli.plots {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create plot directory {}", dir.display()))?;
    }
    let source = CsvSource::new(cli.files.clone(), config.columns.clone());
    let mut pipeline = CvPipeline::new(source, CycleAnalyzer::from_config(&config));
    let mut aggregator = config.aggregate.aggregator();
    let mut traces = Vec::new();
    let mut failed = 0usize;
    loop {
        match pipeline.pump_once() {
            Ok(Some(result)) => {
                let report = TraceReport::from_result(&result);
                if !cli.json {
                    report.print();
                }
                if let Some(dir) = &cli.plots {
                    write_cycle_plots(dir, &result, &style)?;
                }
                traces.push(report);
                aggregator.extend(result);
            }
            Ok(None) => break,
            Err(e) => {
                warn!("skipping trace: {e}");
                failed += 1;
            }
        }
    }
    if traces.is_empty() && failed > 0 {
        bail!("none of the {failed} input file(s) could be read");
    }
    let overlay = aggregator.overlay();
    let drift = aggregator.drift();
    info!(
        "{} trace(s) analysed, {} cycle(s) accepted, {} file(s) skipped",
        traces.len(),
        aggregator.len(),
        failed
    );
    if let Some(dir) = &cli.plots {
        if !overlay.is_empty() {
            match render_overlay_png(&overlay, &style) {
                Ok(png) => write_png(dir, "overlay.png".into(), png)?,
                Err(e) => warn!("overlay: {e}"),
            }
        }
        if !drift.is_empty() {
            for (axis, file_name) in [
                (DriftAxis::CycleId, "drift_by_cycle.png"),
                (DriftAxis::Ordinal, "drift_first_n.png"),
            ] {
                match render_drift_png(&drift, axis, &style) {
                    Ok(png) => write_png(dir, file_name.into(), png)?,
                    Err(e) => warn!("drift: {e}"),
                }
            }
        }
    }
    if cli.json {
        let report = Report {
            traces,
            overlay,
            drift,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !drift.is_empty() {
        println!("drift (first {} cycles by id)", drift.len());
        for point in &drift {
            println!(
                "  #{:<3} scan {:>3}: t0 = {:.3} s, E0 = {:.4} V, I0 = {:.4e} A",
                point.ordinal,
                point.cycle_id,
                point.start.time,
                point.start.potential,
                point.start.current
            );
        }
    }
    Ok(())
}
