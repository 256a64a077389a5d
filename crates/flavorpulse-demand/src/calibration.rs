//! Injected confidence calibration.
//!
//! A [`CalibrationSource`] maps a demand band and opportunity score to the
//! historical share of similar calls that worked out. The pipeline only reads
//! from it; refreshing is the caller's job, done before scoring starts, so no
//! I/O ever happens mid-computation.

use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::Deserialize;
use thiserror::Error;

use crate::types::DemandBand;

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("failed to read calibration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse calibration file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid calibration bucket: {0}")]
    Invalid(String),
}

/// Read side of a calibration store.
pub trait CalibrationSource: Send + Sync {
    /// Historical success rate in `[0.0, 1.0]`, or `None` when no bucket applies.
    fn success_rate(&self, band: DemandBand, opportunity_score: u8) -> Option<f64>;

    /// Reloads backing data if it has gone stale.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError`] if the backing data cannot be loaded.
    fn refresh_if_stale(&self) -> Result<(), CalibrationError> {
        Ok(())
    }
}

/// One band/score range and its observed success rate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalibrationBucket {
    pub band: DemandBand,
    #[serde(default)]
    pub min_opportunity: u8,
    #[serde(default = "default_max_opportunity")]
    pub max_opportunity: u8,
    pub success_rate: f64,
}

fn default_max_opportunity() -> u8 {
    100
}

/// An in-memory calibration table. The first matching bucket wins.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StaticCalibration {
    pub buckets: Vec<CalibrationBucket>,
}

impl StaticCalibration {
    /// Builds a table after checking every bucket.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Invalid`] for a rate outside `[0, 1]` or an
    /// inverted score range.
    pub fn new(buckets: Vec<CalibrationBucket>) -> Result<Self, CalibrationError> {
        let table = Self { buckets };
        table.validate()?;
        Ok(table)
    }

    /// Parses and validates calibration YAML.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError`] if the YAML is malformed or a bucket is invalid.
    pub fn from_yaml(content: &str) -> Result<Self, CalibrationError> {
        let table: StaticCalibration = serde_yaml::from_str(content)?;
        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), CalibrationError> {
        for bucket in &self.buckets {
            if !(0.0..=1.0).contains(&bucket.success_rate) {
                return Err(CalibrationError::Invalid(format!(
                    "{} bucket success_rate {} is outside 0..=1",
                    bucket.band, bucket.success_rate
                )));
            }
            if bucket.min_opportunity > bucket.max_opportunity {
                return Err(CalibrationError::Invalid(format!(
                    "{} bucket range {}..={} is inverted",
                    bucket.band, bucket.min_opportunity, bucket.max_opportunity
                )));
            }
        }
        Ok(())
    }
}

impl CalibrationSource for StaticCalibration {
    fn success_rate(&self, band: DemandBand, opportunity_score: u8) -> Option<f64> {
        self.buckets
            .iter()
            .find(|b| {
                b.band == band
                    && (b.min_opportunity..=b.max_opportunity).contains(&opportunity_score)
            })
            .map(|b| b.success_rate)
    }
}

struct Loaded {
    at: Instant,
    table: StaticCalibration,
}

/// A YAML-backed calibration table reloaded once it is older than `ttl`.
///
/// A failed reload keeps serving the previous table.
pub struct CalibrationFile {
    path: PathBuf,
    ttl: Duration,
    state: RwLock<Option<Loaded>>,
}

impl CalibrationFile {
    /// Creates an unloaded source; call [`CalibrationSource::refresh_if_stale`]
    /// before the first lookup.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            ttl,
            state: RwLock::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_stale(&self) -> bool {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .is_none_or(|loaded| loaded.at.elapsed() >= self.ttl)
    }

    fn load(&self) -> Result<StaticCalibration, CalibrationError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| CalibrationError::Io {
            path: self.path.display().to_string(),
            source: e,
        })?;
        StaticCalibration::from_yaml(&content)
    }
}

impl std::fmt::Debug for CalibrationFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationFile")
            .field("path", &self.path)
            .field("ttl", &self.ttl)
            .field("stale", &self.is_stale())
            .finish_non_exhaustive()
    }
}

impl CalibrationSource for CalibrationFile {
    fn success_rate(&self, band: DemandBand, opportunity_score: u8) -> Option<f64> {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .and_then(|loaded| loaded.table.success_rate(band, opportunity_score))
    }

    fn refresh_if_stale(&self) -> Result<(), CalibrationError> {
        if !self.is_stale() {
            return Ok(());
        }

        let table = self.load()?;
        tracing::info!(
            path = %self.path.display(),
            buckets = table.buckets.len(),
            "calibration table loaded"
        );
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Loaded {
            at: Instant::now(),
            table,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const YAML: &str = r"
buckets:
  - band: hot
    min_opportunity: 60
    success_rate: 0.8
  - band: hot
    success_rate: 0.5
  - band: niche
    max_opportunity: 40
    success_rate: 0.2
";

    #[test]
    fn first_matching_bucket_wins() {
        let table = StaticCalibration::from_yaml(YAML).unwrap();
        assert_eq!(table.success_rate(DemandBand::Hot, 70), Some(0.8));
        assert_eq!(table.success_rate(DemandBand::Hot, 59), Some(0.5));
        assert_eq!(table.success_rate(DemandBand::Niche, 40), Some(0.2));
        assert_eq!(table.success_rate(DemandBand::Niche, 41), None);
        assert_eq!(table.success_rate(DemandBand::Stable, 50), None);
    }

    #[test]
    fn rejects_rate_above_one() {
        let result = StaticCalibration::new(vec![CalibrationBucket {
            band: DemandBand::Hot,
            min_opportunity: 0,
            max_opportunity: 100,
            success_rate: 1.5,
        }]);
        assert!(matches!(result, Err(CalibrationError::Invalid(_))));
    }

    #[test]
    fn rejects_inverted_range() {
        let yaml = "buckets:\n  - band: stable\n    min_opportunity: 80\n    max_opportunity: 20\n    success_rate: 0.4\n";
        assert!(matches!(
            StaticCalibration::from_yaml(yaml),
            Err(CalibrationError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_unknown_band() {
        let yaml = "buckets:\n  - band: lukewarm\n    success_rate: 0.4\n";
        assert!(matches!(
            StaticCalibration::from_yaml(yaml),
            Err(CalibrationError::Parse(_))
        ));
    }

    #[test]
    fn file_source_is_empty_until_refreshed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{YAML}").unwrap();
        let source = CalibrationFile::new(file.path(), Duration::from_secs(3600));
        assert_eq!(source.success_rate(DemandBand::Hot, 70), None);
        source.refresh_if_stale().unwrap();
        assert_eq!(source.success_rate(DemandBand::Hot, 70), Some(0.8));
    }

    #[test]
    fn fresh_table_is_not_reloaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{YAML}").unwrap();
        let source = CalibrationFile::new(file.path(), Duration::from_secs(3600));
        source.refresh_if_stale().unwrap();

        // Corrupt the file; a fresh table must not be re-read.
        std::fs::write(file.path(), "not: [valid").unwrap();
        source.refresh_if_stale().unwrap();
        assert_eq!(source.success_rate(DemandBand::Hot, 70), Some(0.8));
    }

    #[test]
    fn zero_ttl_reloads_every_time() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{YAML}").unwrap();
        let source = CalibrationFile::new(file.path(), Duration::ZERO);
        source.refresh_if_stale().unwrap();

        std::fs::write(
            file.path(),
            "buckets:\n  - band: hot\n    success_rate: 0.1\n",
        )
        .unwrap();
        source.refresh_if_stale().unwrap();
        assert_eq!(source.success_rate(DemandBand::Hot, 70), Some(0.1));
    }

    #[test]
    fn failed_reload_keeps_previous_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{YAML}").unwrap();
        let source = CalibrationFile::new(file.path(), Duration::ZERO);
        source.refresh_if_stale().unwrap();

        std::fs::write(file.path(), "not: [valid").unwrap();
        assert!(source.refresh_if_stale().is_err());
        assert_eq!(source.success_rate(DemandBand::Hot, 70), Some(0.8));
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = CalibrationFile::new("/no/such/calibration.yaml", Duration::ZERO);
        assert!(matches!(
            source.refresh_if_stale(),
            Err(CalibrationError::Io { .. })
        ));
    }
}
