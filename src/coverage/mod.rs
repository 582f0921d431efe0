//! Coverage module
//!
//! Provides:
//! - Clover XML loading and counter aggregation
//! - Percentage calculation
//! - Baseline threshold validation

mod calculator;
mod clover;
mod threshold;

pub use calculator::*;
pub use clover::*;
pub use threshold::*;

use std::fmt;
use std::fs;
use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use crate::error::{CoverageError, CoverageResult};

/// Raw counters read from one or more Clover `metrics` elements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoverageMetrics {
    pub elements: u64,
    pub covered_elements: u64,
    pub statements: u64,
    pub covered_statements: u64,
    pub methods: u64,
    pub covered_methods: u64,
    pub classes: u64,
    pub covered_classes: u64,
}

impl CoverageMetrics {
    /// Every counter is zero
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Counters saturate at `u64::MAX` instead of overflowing
impl AddAssign for CoverageMetrics {
    fn add_assign(&mut self, other: Self) {
        self.elements = self.elements.saturating_add(other.elements);
        self.covered_elements = self.covered_elements.saturating_add(other.covered_elements);
        self.statements = self.statements.saturating_add(other.statements);
        self.covered_statements = self.covered_statements.saturating_add(other.covered_statements);
        self.methods = self.methods.saturating_add(other.methods);
        self.covered_methods = self.covered_methods.saturating_add(other.covered_methods);
        self.classes = self.classes.saturating_add(other.classes);
        self.covered_classes = self.covered_classes.saturating_add(other.covered_classes);
    }
}

/// Anything that can reduce a coverage document to counters.
///
/// One implementation exists per aggregation scheme, so comparison code never
/// depends on how a report is laid out.
pub trait MetricsSource {
    fn aggregate(&self) -> CoverageResult<CoverageMetrics>;
}

/// Reported coverage categories, in table order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Classes,
    Methods,
    Lines,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Classes, Category::Methods, Category::Lines];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Classes => "Classes",
            Category::Methods => "Methods",
            Category::Lines => "Lines",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category coverage of a single run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryCoverage {
    pub classes: Percentage,
    pub methods: Percentage,
    pub lines: Percentage,
}

impl CategoryCoverage {
    pub fn get(&self, category: Category) -> Percentage {
        match category {
            Category::Classes => self.classes,
            Category::Methods => self.methods,
            Category::Lines => self.lines,
        }
    }
}

/// A Clover report read into memory
#[derive(Debug, Clone)]
pub struct CloverDocument {
    path: PathBuf,
    content: String,
}

impl CloverDocument {
    /// Validate and read a Clover XML file
    pub fn open(path: &Path) -> CoverageResult<Self> {
        validate_input(path)?;
        let content = fs::read_to_string(path)?;
        Ok(Self::from_string(path, content))
    }

    /// Wrap XML content that is already in memory
    pub fn from_string(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Check that a coverage input exists and carries the `.xml` extension
pub fn validate_input(path: &Path) -> CoverageResult<()> {
    if !path.exists() {
        return Err(CoverageError::MissingFile(path.to_path_buf()));
    }

    let is_xml = path.extension().map(|e| e == "xml").unwrap_or(false);
    if !is_xml {
        return Err(CoverageError::InvalidExtension(path.to_path_buf()));
    }

    Ok(())
}
