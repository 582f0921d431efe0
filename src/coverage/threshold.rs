//! Coverage threshold validation against a baseline

use super::{Category, CategoryCoverage, Percentage, CATEGORY_PRECISION};

/// PR coverage of one category: the current value relative to the baseline.
///
/// When coverage held or improved this is `100 * current / previous`, which
/// exceeds 100 on improvement. On regression it is `current * 2 - previous`,
/// which can go negative. A zero baseline cannot regress and scores 100.
pub fn pr_coverage(previous: f64, current: f64) -> Percentage {
    let value = if current >= previous {
        if previous == 0.0 {
            100.0
        } else {
            (100.0 * current) / previous
        }
    } else {
        current * 2.0 - previous
    };

    Percentage::new(value, CATEGORY_PRECISION)
}

/// Baseline, PR coverage and current coverage of one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryComparison {
    pub category: Category,
    pub previous: Percentage,
    pub pr_coverage: Percentage,
    pub current: Percentage,
}

impl CategoryComparison {
    pub fn passes(&self, minimum: f64) -> bool {
        self.pr_coverage.value() >= minimum
    }
}

/// Result of threshold validation
#[derive(Debug, Clone)]
pub struct ThresholdResult {
    pub passed: bool,
    pub minimum: f64,
    pub rows: Vec<CategoryComparison>,
}

impl ThresholdResult {
    /// Categories whose PR coverage fell below the minimum
    pub fn failing(&self) -> impl Iterator<Item = &CategoryComparison> + '_ {
        self.rows.iter().filter(move |row| !row.passes(self.minimum))
    }
}

/// Validate every category's PR coverage against `minimum`
pub fn validate_pr_coverage(
    previous: &CategoryCoverage,
    current: &CategoryCoverage,
    minimum: f64,
) -> ThresholdResult {
    let rows: Vec<CategoryComparison> = Category::ALL
        .iter()
        .map(|&category| {
            let old = previous.get(category);
            let new = current.get(category);
            CategoryComparison {
                category,
                previous: old,
                pr_coverage: pr_coverage(old.value(), new.value()),
                current: new,
            }
        })
        .collect();

    let passed = rows.iter().all(|row| row.passes(minimum));

    ThresholdResult {
        passed,
        minimum,
        rows,
    }
}

/// Previous and current total coverage for `coverage-compare`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalComparison {
    pub previous: Percentage,
    pub current: Percentage,
}

impl TotalComparison {
    pub fn new(previous: Percentage, current: Percentage) -> Self {
        Self { previous, current }
    }

    /// Current coverage did not drop below the previous one
    pub fn passed(&self) -> bool {
        self.current.value() >= self.previous.value()
    }

    pub fn success_message(&self) -> String {
        format!("Total code coverage is {}% – OK!", self.current)
    }

    pub fn regression_message(&self) -> String {
        format!(
            "Total code coverage is {}% which is below the accepted code coverage {}% , Please write more tests.",
            self.current, self.previous
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coverage(classes: f64, methods: f64, lines: f64) -> CategoryCoverage {
        CategoryCoverage {
            classes: Percentage::new(classes, CATEGORY_PRECISION),
            methods: Percentage::new(methods, CATEGORY_PRECISION),
            lines: Percentage::new(lines, CATEGORY_PRECISION),
        }
    }

    #[test]
    fn test_pr_coverage_improvement() {
        assert_eq!(pr_coverage(80.0, 90.0).to_string(), "112.50");
        assert_eq!(pr_coverage(20.0, 90.0).to_string(), "450.00");
    }

    #[test]
    fn test_pr_coverage_unchanged_is_100() {
        assert_eq!(pr_coverage(63.27, 63.27).to_string(), "100.00");
    }

    #[test]
    fn test_pr_coverage_regression() {
        assert_eq!(pr_coverage(90.0, 50.0).to_string(), "10.00");
        assert_eq!(pr_coverage(90.0, 30.0).to_string(), "-30.00");
    }

    #[test]
    fn test_pr_coverage_zero_baseline() {
        assert_eq!(pr_coverage(0.0, 0.0).to_string(), "100.00");
        assert_eq!(pr_coverage(0.0, 42.0).to_string(), "100.00");
    }

    #[test]
    fn test_regression_detected() {
        let previous = coverage(90.0, 90.0, 90.0);
        let current = coverage(50.0, 90.0, 90.0);

        let result = validate_pr_coverage(&previous, &current, 75.0);
        assert!(!result.passed);

        let failing: Vec<_> = result.failing().map(|row| row.category).collect();
        assert_eq!(failing, vec![Category::Classes]);
        assert_eq!(result.rows[0].pr_coverage.to_string(), "10.00");
    }

    #[test]
    fn test_small_regression_within_threshold() {
        // 2 * 85 - 90 = 80
        let previous = coverage(90.0, 90.0, 90.0);
        let current = coverage(90.0, 85.0, 90.0);

        let result = validate_pr_coverage(&previous, &current, 75.0);
        assert!(result.passed);
        assert_eq!(result.rows[1].pr_coverage.to_string(), "80.00");
    }

    #[test]
    fn test_threshold_boundary_passes() {
        // 2 * 82.5 - 90 = 75
        assert!(validate_pr_coverage(
            &coverage(90.0, 90.0, 90.0),
            &coverage(90.0, 90.0, 82.5),
            75.0
        )
        .passed);
    }

    #[test]
    fn test_total_comparison() {
        let previous = Percentage::new(95.0, 3);
        let current = Percentage::new(90.0, 3);

        let comparison = TotalComparison::new(previous, current);
        assert!(!comparison.passed());
        let message = comparison.regression_message();
        assert!(message.contains("90.000%"));
        assert!(message.contains("95.000%"));

        assert!(TotalComparison::new(current, current).passed());
        assert!(TotalComparison::new(current, previous).passed());
    }

    #[test]
    fn test_total_comparison_is_numeric() {
        // "9.000" > "10.000" lexically
        let comparison = TotalComparison::new(Percentage::new(9.0, 3), Percentage::new(10.0, 3));
        assert!(comparison.passed());
    }
}
