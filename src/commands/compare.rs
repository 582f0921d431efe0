//! `coverage-compare`: compare the total coverage of two Clover reports

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::coverage::{
    total_coverage, validate_input, AllMetricsSource, CloverDocument, MetricsSource, Percentage,
    TotalComparison,
};
use crate::error::{CoverageError, CoverageResult};
use crate::report::write_total_table;

/// Split the positional arguments into `(current, previous)`
pub fn split_arguments(files: Vec<PathBuf>) -> CoverageResult<(PathBuf, PathBuf)> {
    let count = files.len();
    if count > 2 {
        return Err(CoverageError::Usage(format!(
            "Too many arguments provided. Expected 2, got {}.",
            count
        )));
    }

    let mut files = files.into_iter();
    match (files.next(), files.next()) {
        (Some(current), Some(previous)) => Ok((current, previous)),
        _ => Err(CoverageError::Usage(format!(
            "Expected 2 argument, got {}.",
            count
        ))),
    }
}

/// Compare `current` against `previous` and print the Total table.
///
/// Both files are validated before either is parsed.
pub fn run_compare<W: Write>(
    current: &Path,
    previous: &Path,
    out: &mut W,
) -> CoverageResult<TotalComparison> {
    validate_input(current)?;
    validate_input(previous)?;

    let current_coverage = file_coverage(current)?;
    let previous_coverage = file_coverage(previous)?;

    let comparison = TotalComparison::new(previous_coverage, current_coverage);
    write_total_table(out, &comparison)?;

    if !comparison.passed() {
        return Err(CoverageError::regression(comparison.regression_message()));
    }

    Ok(comparison)
}

fn file_coverage(path: &Path) -> CoverageResult<Percentage> {
    let document = CloverDocument::open(path)?;
    let metrics = AllMetricsSource::new(&document).aggregate()?;
    total_coverage(&metrics)
}
