//! `check-coverage`: gate the latest run against the stored baseline

use chrono::Utc;
use std::io::Write;

use crate::baseline::{BaselineRecord, BaselineStore};
use crate::config::CheckConfig;
use crate::coverage::{
    category_coverage, validate_pr_coverage, CloverDocument, MetricsSource,
    ProjectSummarySource, ThresholdResult,
};
use crate::error::{CoverageError, CoverageResult};
use crate::report::write_category_table;

pub const CHECK_PASSED_MESSAGE: &str =
    "Coverage is equal or more than before, Last coverage report has been updated with the new one";
pub const CHECK_REGRESSION_MESSAGE: &str = "Coverage is less than before, Please write more tests.";

/// Compare the Clover summary against the baseline, print the table and,
/// when every category passes, replace the baseline with the new coverage.
///
/// The baseline is only written on success.
pub fn run_check<W: Write>(config: &CheckConfig, out: &mut W) -> CoverageResult<ThresholdResult> {
    let store = BaselineStore::new(&config.baseline_path);
    let baseline = store.load()?;

    let document = CloverDocument::open(&config.summary_path)?;
    let metrics = ProjectSummarySource::new(&document).aggregate()?;
    let current = category_coverage(&metrics);

    let result = validate_pr_coverage(&baseline.coverage(), &current, config.minimum_percentage);
    write_category_table(out, &result)?;

    if !result.passed {
        for row in result.failing() {
            tracing::debug!(
                category = %row.category,
                pr_coverage = %row.pr_coverage,
                minimum = result.minimum,
                "category below minimum"
            );
        }
        return Err(CoverageError::regression(CHECK_REGRESSION_MESSAGE));
    }

    store.save(&BaselineRecord::new(&current, Utc::now()))?;

    Ok(result)
}
