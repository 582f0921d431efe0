//! Fixed-width ASCII tables for the coverage reports

use std::io::{self, Write};

use crate::coverage::{ThresholdResult, TotalComparison};

/// Column width of the per-category table
pub const CATEGORY_COLUMN_WIDTH: usize = 10;
/// Column width of the total table
pub const TOTAL_COLUMN_WIDTH: usize = 8;

const CATEGORY_HEADERS: [&str; 4] = ["Index", "Previous", "Current PR", "Current"];
const TOTAL_HEADERS: [&str; 3] = ["Total", "Previous", "Current"];

/// Write the Previous / Current PR / Current table of `check-coverage`.
///
/// Cells are left-aligned; a dashed rule precedes the header and follows
/// every row.
pub fn write_category_table<W: Write>(out: &mut W, result: &ThresholdResult) -> io::Result<()> {
    let columns = CATEGORY_HEADERS.len();
    let rule = "-".repeat(CATEGORY_COLUMN_WIDTH * columns + 2 * columns - 1);

    writeln!(out)?;
    writeln!(out, "{}", rule)?;

    write_category_row(out, &CATEGORY_HEADERS.map(String::from))?;
    writeln!(out, "{}", rule)?;

    for row in &result.rows {
        write_category_row(
            out,
            &[
                row.category.to_string(),
                format!("{}%", row.previous),
                format!("{}%", row.pr_coverage),
                format!("{}%", row.current),
            ],
        )?;
        writeln!(out, "{}", rule)?;
    }

    Ok(())
}

fn write_category_row<W: Write>(out: &mut W, cells: &[String]) -> io::Result<()> {
    for cell in cells {
        write!(out, "| {:<width$}", cell, width = CATEGORY_COLUMN_WIDTH)?;
    }
    writeln!(out)
}

/// Write the Total / Previous / Current table of `coverage-compare`.
///
/// Cells are right-aligned between `+---+` borders.
pub fn write_total_table<W: Write>(out: &mut W, comparison: &TotalComparison) -> io::Result<()> {
    let border = total_border();
    let values = [
        "100%".to_string(),
        format!("{}%", comparison.previous),
        format!("{}%", comparison.current),
    ];

    writeln!(out, "{}", border)?;
    write_total_row(out, &TOTAL_HEADERS.map(String::from))?;
    writeln!(out, "{}", border)?;
    write_total_row(out, &values)?;
    writeln!(out, "{}", border)?;

    Ok(())
}

fn total_border() -> String {
    let segment = "-".repeat(TOTAL_COLUMN_WIDTH + 2);
    let mut border = String::from("+");
    for _ in TOTAL_HEADERS {
        border.push_str(&segment);
        border.push('+');
    }
    border
}

fn write_total_row<W: Write>(out: &mut W, cells: &[String]) -> io::Result<()> {
    write!(out, "|")?;
    for cell in cells {
        write!(out, " {:>width$} |", cell, width = TOTAL_COLUMN_WIDTH)?;
    }
    writeln!(out)
}
