//! Clover XML format parser

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{CloverDocument, CoverageMetrics, MetricsSource};
use crate::error::{CoverageError, CoverageResult};

/// Sums the counters of every `metrics` element in the document,
/// wherever it is nested.
pub struct AllMetricsSource<'a> {
    document: &'a CloverDocument,
}

impl<'a> AllMetricsSource<'a> {
    pub fn new(document: &'a CloverDocument) -> Self {
        Self { document }
    }
}

impl MetricsSource for AllMetricsSource<'_> {
    fn aggregate(&self) -> CoverageResult<CoverageMetrics> {
        let mut totals = CoverageMetrics::default();
        let mut nodes = 0usize;

        let document = self.document;
        visit_elements(document, |_, element| {
            if element.local_name().as_ref() == b"metrics" {
                totals += read_counters(document, element)?;
                nodes += 1;
            }
            Ok(())
        })?;

        tracing::debug!(
            path = %self.document.path().display(),
            nodes,
            ?totals,
            "aggregated all metrics"
        );

        Ok(totals)
    }
}

/// Reads statement and method counters from the project summary and derives
/// the class counters from the per-file class entries.
///
/// A class is covered when its `coveredmethods` equals its `methods`. Only
/// the first class of each file is inspected, and classes without methods
/// never count as covered. The class total is the summary's `classes`.
pub struct ProjectSummarySource<'a> {
    document: &'a CloverDocument,
}

impl<'a> ProjectSummarySource<'a> {
    pub fn new(document: &'a CloverDocument) -> Self {
        Self { document }
    }
}

impl MetricsSource for ProjectSummarySource<'_> {
    fn aggregate(&self) -> CoverageResult<CoverageMetrics> {
        let mut summary: Option<CoverageMetrics> = None;
        let mut covered_classes = 0u64;

        // Per-file state: whether the first class was seen, whether we are
        // inside it, and whether its metrics were already counted.
        let mut class_seen = false;
        let mut in_first_class = false;
        let mut class_counted = false;

        let document = self.document;
        visit_elements(document, |ancestors, element| {
            let name = element.local_name();
            match name.as_ref() {
                b"metrics" if is_under(ancestors, &["project"]) => {
                    if summary.is_none() {
                        summary = Some(read_counters(document, element)?);
                    }
                }
                b"file" if is_under(ancestors, &["project"]) => {
                    class_seen = false;
                    in_first_class = false;
                    class_counted = false;
                }
                b"class" if is_under(ancestors, &["project", "file"]) => {
                    in_first_class = !class_seen;
                    class_seen = true;
                }
                b"metrics" if is_under(ancestors, &["project", "file", "class"]) => {
                    if in_first_class && !class_counted {
                        class_counted = true;
                        let counters = read_counters(document, element)?;
                        if counters.methods > 0 && counters.covered_methods == counters.methods {
                            covered_classes += 1;
                        }
                    }
                }
                _ => {}
            }
            Ok(())
        })?;

        let summary = summary.ok_or_else(|| {
            CoverageError::parse(self.document.path(), "no project summary <metrics> element")
        })?;

        let metrics = CoverageMetrics {
            covered_classes,
            ..summary
        };

        tracing::debug!(
            path = %self.document.path().display(),
            ?metrics,
            "aggregated project summary"
        );

        Ok(metrics)
    }
}

/// Walk every element of the document in order, passing the names of its
/// ancestors (root first) and the element itself. The first error returned
/// by `visit` stops the walk.
fn visit_elements<F>(document: &CloverDocument, mut visit: F) -> CoverageResult<()>
where
    F: FnMut(&[Vec<u8>], &BytesStart<'_>) -> CoverageResult<()>,
{
    let mut reader = Reader::from_str(document.content());
    reader.trim_text(true);

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut saw_root = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                check_single_root(document, &stack, saw_root)?;
                saw_root = true;
                visit(&stack, e)?;
                stack.push(e.local_name().as_ref().to_vec());
            }
            Ok(Event::Empty(ref e)) => {
                check_single_root(document, &stack, saw_root)?;
                saw_root = true;
                visit(&stack, e)?;
            }
            Ok(Event::End(_)) => {
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CoverageError::parse(
                    document.path(),
                    format!("error at position {}: {}", reader.buffer_position(), e),
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(CoverageError::parse(document.path(), "document has no root element"));
    }
    if let Some(open) = stack.last() {
        return Err(CoverageError::parse(
            document.path(),
            format!("unclosed element <{}>", String::from_utf8_lossy(open)),
        ));
    }

    Ok(())
}

fn check_single_root(
    document: &CloverDocument,
    stack: &[Vec<u8>],
    saw_root: bool,
) -> CoverageResult<()> {
    if stack.is_empty() && saw_root {
        return Err(CoverageError::parse(
            document.path(),
            "document has more than one root element",
        ));
    }
    Ok(())
}

/// True when the ancestors below the root element are exactly `path`
fn is_under(ancestors: &[Vec<u8>], path: &[&str]) -> bool {
    ancestors.len() == path.len() + 1
        && ancestors[1..]
            .iter()
            .zip(path)
            .all(|(name, expected)| name.as_slice() == expected.as_bytes())
}

/// Read the counter attributes of a `metrics` element. Missing or
/// non-numeric values count as zero; malformed attribute syntax is a parse
/// error.
fn read_counters(
    document: &CloverDocument,
    element: &BytesStart<'_>,
) -> CoverageResult<CoverageMetrics> {
    let mut counters = CoverageMetrics::default();

    for attr in element.attributes() {
        let attr = attr.map_err(|e| {
            CoverageError::parse(document.path(), format!("malformed attribute: {}", e))
        })?;
        let slot = match attr.key.as_ref() {
            b"elements" => &mut counters.elements,
            b"coveredelements" => &mut counters.covered_elements,
            b"statements" => &mut counters.statements,
            b"coveredstatements" => &mut counters.covered_statements,
            b"methods" => &mut counters.methods,
            b"coveredmethods" => &mut counters.covered_methods,
            b"classes" => &mut counters.classes,
            _ => continue,
        };

        let value = String::from_utf8_lossy(&attr.value);
        match value.trim().parse::<u64>() {
            Ok(count) => *slot = count,
            Err(_) => {
                tracing::warn!(
                    attribute = %String::from_utf8_lossy(attr.key.as_ref()),
                    value = %value,
                    "ignoring non-numeric metrics counter"
                );
            }
        }
    }

    Ok(counters)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOVER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<coverage generated="1700000000">
  <project timestamp="1700000000">
    <file name="/src/Fully.php">
      <class name="Fully" namespace="global">
        <metrics complexity="2" methods="2" coveredmethods="2" conditionals="0" coveredconditionals="0" statements="6" coveredstatements="6" elements="8" coveredelements="8"/>
      </class>
      <line num="3" type="method" name="a" count="1"/>
      <metrics loc="20" ncloc="20" classes="1" methods="2" coveredmethods="2" statements="6" coveredstatements="6" elements="8" coveredelements="8"/>
    </file>
    <file name="/src/Partial.php">
      <class name="Partial" namespace="global">
        <metrics methods="4" coveredmethods="1" statements="10" coveredstatements="3" elements="14" coveredelements="4"/>
      </class>
      <metrics loc="30" ncloc="30" classes="1" methods="4" coveredmethods="1" statements="10" coveredstatements="3" elements="14" coveredelements="4"/>
    </file>
    <file name="/src/helpers.php">
      <metrics loc="5" ncloc="5" classes="0" methods="0" coveredmethods="0" statements="2" coveredstatements="1" elements="2" coveredelements="1"/>
    </file>
    <metrics files="3" loc="55" ncloc="55" classes="2" methods="6" coveredmethods="3" conditionals="0" coveredconditionals="0" statements="18" coveredstatements="10" elements="24" coveredelements="13"/>
  </project>
</coverage>"#;

    fn doc(content: &str) -> CloverDocument {
        CloverDocument::from_string("clover.xml", content)
    }

    #[test]
    fn test_all_metrics_sums_every_node() {
        let document = doc(CLOVER);
        let totals = AllMetricsSource::new(&document).aggregate().unwrap();

        // Two class nodes, three file nodes and the project summary
        assert_eq!(totals.statements, 6 + 6 + 10 + 10 + 2 + 18);
        assert_eq!(totals.covered_statements, 6 + 6 + 3 + 3 + 1 + 10);
        assert_eq!(totals.methods, 2 + 2 + 4 + 4 + 0 + 6);
        assert_eq!(totals.covered_methods, 2 + 2 + 1 + 1 + 0 + 3);
        assert_eq!(totals.elements, 8 + 8 + 14 + 14 + 2 + 24);
        assert_eq!(totals.covered_elements, 8 + 8 + 4 + 4 + 1 + 13);
    }

    #[test]
    fn test_project_summary_uses_root_metrics() {
        let document = doc(CLOVER);
        let metrics = ProjectSummarySource::new(&document).aggregate().unwrap();

        assert_eq!(metrics.statements, 18);
        assert_eq!(metrics.covered_statements, 10);
        assert_eq!(metrics.methods, 6);
        assert_eq!(metrics.covered_methods, 3);
        assert_eq!(metrics.classes, 2);
        assert_eq!(metrics.covered_classes, 1);
    }

    #[test]
    fn test_only_first_class_of_file_counts() {
        let xml = r#"<coverage><project>
  <file name="a.php">
    <class name="A"><metrics methods="1" coveredmethods="0"/></class>
    <class name="B"><metrics methods="1" coveredmethods="1"/></class>
  </file>
  <file name="b.php">
    <class name="C"><metrics methods="3" coveredmethods="3"/></class>
  </file>
  <metrics classes="3" methods="5" coveredmethods="4" statements="0" coveredstatements="0"/>
</project></coverage>"#;

        let document = doc(xml);
        let metrics = ProjectSummarySource::new(&document).aggregate().unwrap();
        assert_eq!(metrics.covered_classes, 1);
        assert_eq!(metrics.classes, 3);
    }

    #[test]
    fn test_class_without_methods_is_not_covered() {
        let xml = r#"<coverage><project>
  <file name="a.php">
    <class name="Empty"><metrics methods="0" coveredmethods="0"/></class>
  </file>
  <metrics classes="1" methods="0" coveredmethods="0"/>
</project></coverage>"#;

        let document = doc(xml);
        let metrics = ProjectSummarySource::new(&document).aggregate().unwrap();
        assert_eq!(metrics.covered_classes, 0);
    }

    #[test]
    fn test_missing_summary_is_parse_error() {
        let xml = r#"<coverage><project><file name="a.php"/></project></coverage>"#;

        let document = doc(xml);
        let err = ProjectSummarySource::new(&document).aggregate().unwrap_err();
        assert!(matches!(err, CoverageError::Parse { .. }));
    }

    #[test]
    fn test_non_numeric_counters_are_zero() {
        let xml = r#"<coverage><project><metrics statements="abc" coveredstatements="4" methods=""/></project></coverage>"#;

        let document = doc(xml);
        let totals = AllMetricsSource::new(&document).aggregate().unwrap();
        assert_eq!(totals.statements, 0);
        assert_eq!(totals.covered_statements, 4);
        assert_eq!(totals.methods, 0);
    }

    #[test]
    fn test_huge_counters_saturate() {
        let xml = r#"<coverage><project>
  <metrics statements="18446744073709551615" coveredstatements="18446744073709551615"/>
  <metrics statements="18446744073709551615" coveredstatements="1"/>
</project></coverage>"#;

        let document = doc(xml);
        let totals = AllMetricsSource::new(&document).aggregate().unwrap();
        assert_eq!(totals.statements, u64::MAX);
        assert_eq!(totals.covered_statements, u64::MAX);
    }

    #[test]
    fn test_malformed_xml_is_parse_error() {
        for xml in [
            "",
            "not xml at all",
            "<coverage><project></coverage>",
            "<coverage><project><metrics statements=\"1\"/></project>",
            "<a/><b/>",
            r#"<coverage><project><metrics statements=5 coveredstatements="3" elements="4" coveredelements="4"/></project></coverage>"#,
            r#"<coverage><project><metrics statements="1" statements="2"/></project></coverage>"#,
        ] {
            let document = doc(xml);
            let err = AllMetricsSource::new(&document).aggregate().unwrap_err();
            assert!(
                matches!(err, CoverageError::Parse { .. }),
                "expected parse error for {:?}",
                xml
            );
        }
    }
}
