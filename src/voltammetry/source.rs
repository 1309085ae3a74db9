use std::collections::VecDeque;
use std::fs::File;
use std::path::{Path, PathBuf};
use log::debug;
use serde::Serialize;
use crate::voltammetry::config::ColumnNames;
use crate::voltammetry::naming::expected_cycle_range;
use crate::voltammetry::AnalysisError;
/// One potentiostat reading.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Sample {
    /// Seconds since the start of the measurement.
    pub time: f64,
    /// Working electrode potential in volts.
    pub potential: f64,
    /// Working electrode current in amperes.
    pub current: f64,
}
impl Sample {
    pub fn new(time: f64, potential: f64, current: f64) -> Self {
        Self {
            time,
            potential,
            current,
        }
    }
}
/// Samples of one source file in acquisition order, possibly spanning several cycles.
#[derive(Clone, Debug)]
pub struct Trace {
    name: String,
    samples: Vec<Sample>,
}
impl Trace {
    pub fn new(name: impl Into<String>, samples: Vec<Sample>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }
    pub fn name(&self) -> &str {
        &self.name
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
    /// Cycle ids announced by the source name (`CV3`, `CV2-5`), if any.
    pub fn expected_cycle_range(&self) -> Option<Vec<i64>> {
        expected_cycle_range(&self.name)
    }
}
/// Anything that can hand traces to the pipeline one at a time.
pub trait TraceSource {
    fn next_trace(&mut self) -> Result<Option<Trace>, AnalysisError>;
}
/// In-memory source useful for tests and deterministic playback.
pub struct ManualSource {
    queue: VecDeque<Trace>,
}
impl ManualSource {
    pub fn new(traces: impl IntoIterator<Item = Trace>) -> Self {
        Self {
            queue: traces.into_iter().collect(),
        }
    }
}
impl TraceSource for ManualSource {
    fn next_trace(&mut self) -> Result<Option<Trace>, AnalysisError> {
        Ok(self.queue.pop_front())
    }
}
/// Reads one trace per CSV file, picking the three numeric columns by header name.
pub struct CsvSource {
    paths: VecDeque<PathBuf>,
    columns: ColumnNames,
}
impl CsvSource {
    pub fn new(paths: impl IntoIterator<Item = PathBuf>, columns: ColumnNames) -> Self {
        Self {
            paths: paths.into_iter().collect(),
            columns,
        }
    }
}
impl TraceSource for CsvSource {
    fn next_trace(&mut self) -> Result<Option<Trace>, AnalysisError> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };
        read_csv_trace(&path, &self.columns).map(Some)
    }
}
pub fn read_csv_trace(path: &Path, columns: &ColumnNames) -> Result<Trace, AnalysisError> {
    let file = File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_err = |source: csv::Error| AnalysisError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);
    let headers = reader.headers().map_err(csv_err)?.clone();
    let locate = |column: &str| {
        headers
            .iter()
            .position(|h| h == column)
            .ok_or_else(|| AnalysisError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })
    };
    let time_idx = locate(&columns.time)?;
    let potential_idx = locate(&columns.potential)?;
    let current_idx = locate(&columns.current)?;
    let mut samples = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let field = |idx: usize, column: &str| -> Result<f64, AnalysisError> {
            let raw = record.get(idx).unwrap_or_default();
            raw.parse::<f64>().map_err(|_| AnalysisError::InvalidNumber {
                path: path.to_path_buf(),
                column: column.to_string(),
                row: row + 1,
                value: raw.to_string(),
            })
        };
        samples.push(Sample::new(
            field(time_idx, &columns.time)?,
            field(potential_idx, &columns.potential)?,
            field(current_idx, &columns.current)?,
        ));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    debug!("read {} samples from {}", samples.len(), path.display());
    Ok(Trace::new(name, samples))
}
