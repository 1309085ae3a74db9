use std::io::Cursor;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use plotters::prelude::LineSeries;
use plotters::prelude::*;
use crate::voltammetry::aggregate::{DriftPoint, OverlaySeries};
use crate::voltammetry::cycle::{Cycle, HalfCycle, HalfCycleKind};
use crate::voltammetry::error::AnalysisError;
use crate::voltammetry::source::Sample;
#[derive(Clone, Debug)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub background: RGBColor,
    pub palette: Vec<RGBColor>,
}
impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
            background: RGBColor(10, 10, 10),
            palette: vec![BLUE, RED, GREEN, CYAN, MAGENTA, YELLOW, WHITE],
        }
    }
}
impl PlotStyle {
    fn color(&self, idx: usize) -> RGBColor {
        if self.palette.is_empty() {
            return WHITE;
        }
        self.palette[idx % self.palette.len()]
    }
}
/// Full cycle, current against potential, with every detected peak marked.
pub fn render_cycle_png(cycle: &Cycle<'_>, style: &PlotStyle) -> Result<Vec<u8>, AnalysisError> {
    if cycle.is_empty() {
        return Err(AnalysisError::Plot(format!(
            "cycle {} has no samples",
            cycle.cycle_id
        )));
    }
    let potentials = cycle.potentials();
    let currents = cycle.currents();
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let (x0, x1) = bounds(potentials.iter().copied());
        let (y0, y1) = bounds(currents.iter().copied());
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(
                format!("Full Cycle - Scan {}", cycle.cycle_id),
                ("sans-serif", 20).into_font().color(&WHITE),
            )
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(x0..x1, y0..y1)?;
        chart
            .configure_mesh()
            .x_desc("Potential (V)")
            .y_desc("Current (A)")
            .light_line_style(&WHITE.mix(0.1))
            .draw()?;
        chart.draw_series(LineSeries::new(
            potentials.iter().copied().zip(currents.iter().copied()),
            &style.color(0),
        ))?;
        chart.draw_series(cycle.peaks().into_iter().map(|peak| {
            EmptyElement::at((peak.potential, peak.current))
                + Circle::new((0, 0), 4, RED.filled())
                + Text::new(
                    "Peak",
                    (-12, -18),
                    ("sans-serif", 12).into_font().color(&WHITE),
                )
        }))?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// One half-cycle, current against time.
pub fn render_half_cycle_png(
    cycle_id: i64,
    half: &HalfCycle<'_>,
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    if half.is_empty() {
        return Err(AnalysisError::Plot(format!(
            "{:?} half of cycle {cycle_id} has no samples",
            half.kind
        )));
    }
    let (title, color) = match half.kind {
        HalfCycleKind::Anodic => ("Anodic Half-Cycle", GREEN),
        HalfCycleKind::Cathodic => ("Cathodic Half-Cycle", BLUE),
    };
    let times = half.times();
    let currents = half.currents();
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let (x0, x1) = bounds(times.iter().copied());
        let (y0, y1) = bounds(currents.iter().copied());
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption(
                format!("{title} - Scan {cycle_id}"),
                ("sans-serif", 20).into_font().color(&WHITE),
            )
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(x0..x1, y0..y1)?;
        chart
            .configure_mesh()
            .x_desc("Time (s)")
            .y_desc("Current (A)")
            .light_line_style(&WHITE.mix(0.1))
            .draw()?;
        chart.draw_series(LineSeries::new(
            times.iter().copied().zip(currents.iter().copied()),
            &color,
        ))?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// All cycles superimposed; the legend follows the order of `overlay`.
pub fn render_overlay_png(
    overlay: &[OverlaySeries],
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    if overlay.iter().all(|s| s.potentials.is_empty()) {
        return Err(AnalysisError::Plot("overlay has no cycles".into()));
    }
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let (x0, x1) = bounds(overlay.iter().flat_map(|s| s.potentials.iter().copied()));
        let (y0, y1) = bounds(overlay.iter().flat_map(|s| s.currents.iter().copied()));
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .caption("Cycle Overlay", ("sans-serif", 20).into_font().color(&WHITE))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 40)
            .build_cartesian_2d(x0..x1, y0..y1)?;
        chart
            .configure_mesh()
            .x_desc("Potential (V)")
            .y_desc("Current (A)")
            .light_line_style(&WHITE.mix(0.1))
            .draw()?;
        for (idx, series) in overlay.iter().enumerate() {
            let color = style.color(idx);
            let points = series
                .potentials
                .iter()
                .copied()
                .zip(series.currents.iter().copied());
            chart
                .draw_series(LineSeries::new(points, &color))?
                .label(format!("Cycle {}", series.cycle_id))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }
        chart
            .configure_series_labels()
            .border_style(&WHITE.mix(0.2))
            .background_style(&style.background)
            .label_font(("sans-serif", 12).into_font().color(&WHITE))
            .draw()?;
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Horizontal axis of the drift chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriftAxis {
    /// Position within the bounded prefix (0, 1, 2, ...).
    Ordinal,
    /// The cycle's own id.
    CycleId,
}
impl DriftAxis {
    fn position(self, point: &DriftPoint) -> f64 {
        match self {
            DriftAxis::Ordinal => point.ordinal as f64,
            DriftAxis::CycleId => point.cycle_id as f64,
        }
    }
    fn label(self) -> &'static str {
        match self {
            DriftAxis::Ordinal => "Cycle (first N)",
            DriftAxis::CycleId => "Cycle id",
        }
    }
}
/// Cycle-start and cathodic-start points of one drift quantity, placed on `axis`.
fn drift_series(
    drift: &[DriftPoint],
    axis: DriftAxis,
    value: fn(&Sample) -> f64,
) -> (Vec<(f64, f64)>, Vec<(f64, f64)>) {
    let starts = drift
        .iter()
        .map(|d| (axis.position(d), value(&d.start)))
        .collect();
    let cathodic = drift
        .iter()
        .filter_map(|d| d.cathodic_start.map(|s| (axis.position(d), value(&s))))
        .collect();
    (starts, cathodic)
}
/// Start time, potential and current of each cycle, stacked in three panels. The
/// cathodic starting point is drawn alongside when the drift series carries it.
pub fn render_drift_png(
    drift: &[DriftPoint],
    axis: DriftAxis,
    style: &PlotStyle,
) -> Result<Vec<u8>, AnalysisError> {
    if drift.is_empty() {
        return Err(AnalysisError::Plot("drift series is empty".into()));
    }
    let panels: [(&str, fn(&Sample) -> f64); 3] = [
        ("Time (s)", |s: &Sample| s.time),
        ("Potential (V)", |s: &Sample| s.potential),
        ("Current (A)", |s: &Sample| s.current),
    ];
    let (x0, x1) = bounds(drift.iter().map(|d| axis.position(d)));
    let mut buffer = vec![0u8; (style.width * style.height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (style.width, style.height))
            .into_drawing_area();
        root.fill(&style.background)?;
        let areas = root.split_evenly((3, 1));
        for (area, (label, value)) in areas.iter().zip(panels) {
            let (starts, cathodic) = drift_series(drift, axis, value);
            let (y0, y1) = bounds(starts.iter().chain(&cathodic).map(|&(_, y)| y));
            let mut chart = ChartBuilder::on(area)
                .margin(8)
                .set_label_area_size(LabelAreaPosition::Left, 60)
                .set_label_area_size(LabelAreaPosition::Bottom, 30)
                .build_cartesian_2d(x0..x1, y0..y1)?;
            chart
                .configure_mesh()
                .x_desc(axis.label())
                .y_desc(label)
                .light_line_style(&WHITE.mix(0.1))
                .draw()?;
            for (idx, (name, points)) in [("Cycle start", starts), ("Cathodic start", cathodic)]
                .into_iter()
                .enumerate()
            {
                if points.is_empty() {
                    continue;
                }
                let color = style.color(idx);
                chart
                    .draw_series(LineSeries::new(points.iter().copied(), &color))?
                    .label(name)
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
                chart.draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, 3, color.filled())),
                )?;
            }
            chart
                .configure_series_labels()
                .border_style(&WHITE.mix(0.2))
                .background_style(&style.background)
                .label_font(("sans-serif", 12).into_font().color(&WHITE))
                .draw()?;
        }
        root.present()?;
    }
    encode_png(&buffer, style.width, style.height)
}
/// Axis range covering `values`, widened when all values coincide.
fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return (-1.0, 1.0);
    }
    let span = hi - lo;
    if span <= f64::EPSILON * hi.abs().max(1.0) {
        let pad = if hi == 0.0 { 1.0 } else { hi.abs() * 0.1 };
        return (lo - pad, hi + pad);
    }
    (lo - span * 0.05, hi + span * 0.05)
}
fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, AnalysisError> {
    let image = ImageBuffer::<Rgb<u8>, _>::from_raw(width, height, buffer.to_vec())
        .ok_or_else(|| AnalysisError::Plot("failed to allocate image buffer".into()))?;
    let mut output = Vec::new();
    let dynamic = DynamicImage::ImageRgb8(image);
    dynamic.write_to(&mut Cursor::new(&mut output), ImageFormat::Png)?;
    Ok(output)
}
