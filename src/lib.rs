//! Covgate - Clover coverage gates
//!
//! A library behind two CI commands:
//! - `check-coverage`: per-category coverage checked against a stored baseline,
//!   which is replaced when the run is accepted
//! - `coverage-compare`: total coverage of one report compared against another
//!
//! Both read Clover XML reports and print a fixed-width table to stdout.

pub mod baseline;
pub mod commands;
pub mod config;
pub mod coverage;
pub mod error;
pub mod logging;
pub mod report;

pub use baseline::{BaselineRecord, BaselineStore};
pub use config::{CheckConfig, Config};
pub use coverage::{CategoryCoverage, CoverageMetrics, MetricsSource, Percentage};
pub use error::{CoverageError, CoverageResult};
