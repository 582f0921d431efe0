//! Baseline store
//!
//! Persists the last accepted coverage so the next `check-coverage` run can
//! compare against it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::coverage::{CategoryCoverage, Percentage};
use crate::error::{CoverageError, CoverageResult};

/// On-disk layout of the baseline file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineFile {
    #[serde(rename = "lastCoverageReport")]
    pub last_coverage_report: BaselineRecord,
}

/// Last accepted coverage and when it was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BaselineRecord {
    pub classes: Percentage,
    pub methods: Percentage,
    pub lines: Percentage,
    /// Unix seconds. Always written; hand-seeded baselines may omit it.
    #[serde(default, with = "chrono::serde::ts_seconds_option")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl BaselineRecord {
    pub fn new(coverage: &CategoryCoverage, recorded_at: DateTime<Utc>) -> Self {
        Self {
            classes: coverage.classes,
            methods: coverage.methods,
            lines: coverage.lines,
            timestamp: Some(recorded_at),
        }
    }

    pub fn coverage(&self) -> CategoryCoverage {
        CategoryCoverage {
            classes: self.classes,
            methods: self.methods,
            lines: self.lines,
        }
    }
}

/// Reads and replaces the baseline file at a fixed path
#[derive(Debug, Clone)]
pub struct BaselineStore {
    path: PathBuf,
}

impl BaselineStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the last accepted record
    pub fn load(&self) -> CoverageResult<BaselineRecord> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CoverageError::MissingBaseline(self.path.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        let file: BaselineFile =
            serde_json::from_str(&content).map_err(|source| CoverageError::InvalidBaseline {
                path: self.path.clone(),
                source,
            })?;

        Ok(file.last_coverage_report)
    }

    /// Replace the baseline with `record`.
    ///
    /// The JSON is written to a sibling temporary file and renamed over the
    /// baseline, so readers never see a partial file.
    pub fn save(&self, record: &BaselineRecord) -> CoverageResult<()> {
        let file = BaselineFile {
            last_coverage_report: record.clone(),
        };
        let json = serde_json::to_string(&file).map_err(std::io::Error::from)?;

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::info!(
            path = %self.path.display(),
            classes = %record.classes,
            methods = %record.methods,
            lines = %record.lines,
            "baseline updated"
        );

        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
