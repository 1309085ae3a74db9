//! Analysis settings, loadable from a TOML file.
//!
//! ```toml
//! [turning]
//! strategy = "extremum"
//!
//! [validation]
//! min_range = 0.05
//! edge_margin = 5
//! ```
use std::path::Path;
use serde::Deserialize;
use crate::voltammetry::aggregate::CycleAggregator;
use crate::voltammetry::assign::AssignStrategy;
use crate::voltammetry::turning::TurningPointStrategy;
use crate::voltammetry::validate::{CycleValidator, DEFAULT_EDGE_MARGIN, DEFAULT_MIN_RANGE};
use crate::voltammetry::AnalysisError;
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub turning: TurningConfig,
    pub assign: AssignConfig,
    pub validation: ValidationConfig,
    pub aggregate: AggregateConfig,
    pub columns: ColumnNames,
}
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TurningConfig {
    pub strategy: TurningPointStrategy,
}
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssignConfig {
    pub strategy: AssignStrategy,
}
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub enabled: bool,
    /// Smallest accepted potential excursion, in volts.
    pub min_range: f64,
    /// Samples the turning point must keep from either end of the cycle.
    pub edge_margin: usize,
}
impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_range: DEFAULT_MIN_RANGE,
            edge_margin: DEFAULT_EDGE_MARGIN,
        }
    }
}
impl ValidationConfig {
    /// The configured validator, or `None` when validation is switched off.
    pub fn validator(&self) -> Option<CycleValidator> {
        self.enabled
            .then(|| CycleValidator::new(self.min_range, self.edge_margin))
    }
}
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    pub drift_limit: usize,
    pub include_cathodic_start: bool,
}
impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            drift_limit: 30,
            include_cathodic_start: true,
        }
    }
}
impl AggregateConfig {
    pub fn aggregator(&self) -> CycleAggregator {
        CycleAggregator::new()
            .with_drift_limit(self.drift_limit)
            .with_cathodic_start(self.include_cathodic_start)
    }
}
/// Header names of the three required columns in an exported table.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub time: String,
    pub potential: String,
    pub current: String,
}
impl Default for ColumnNames {
    fn default() -> Self {
        // Autolab NOVA export headers.
        Self {
            time: "Time (s)".into(),
            potential: "WE(1).Potential (V)".into(),
            current: "WE(1).Current (A)".into(),
        }
    }
}
impl AnalysisConfig {
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
    pub fn from_toml(content: &str) -> Result<Self, AnalysisError> {
        let config: Self = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }
    /// Reject settings no cycle could satisfy meaningfully.
    pub fn check(&self) -> Result<(), AnalysisError> {
        if !self.validation.min_range.is_finite() || self.validation.min_range < 0.0 {
            return Err(AnalysisError::Config(format!(
                "validation.min_range must be a non-negative number, got {}",
                self.validation.min_range
            )));
        }
        Ok(())
    }
}
