//! Test-suite recorder: suites own sections, sections own tests.
//!
//! Scenarios open a section, then wrap each check in
//! [`TestSection::run_test`], which records the test as running, evaluates
//! it and stores the verdict. The finished suite can be printed
//! ([`TestSuite`] implements [`fmt::Display`]) or exported as JSON
//! ([`TestSuite::report`], [`TestSuite::export_to`]).

use core::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

const SUITE_RULE: &str =
    "=========================================================================";
const SECTION_RULE: &str = "=================================================================";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// State of a recorded test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestResult {
    /// Started but not finished.
    #[serde(rename = "RUNNING")]
    Running,
    /// Declared without an implementation behind it.
    #[serde(rename = "NOT IMPLEMENTED")]
    NotImplemented,
    /// Finished and passed.
    #[serde(rename = "OK")]
    Passed,
    /// Finished and failed.
    #[serde(rename = "FAIL")]
    Failed,
}

impl TestResult {
    /// The label used in both the printed and the exported report.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::NotImplemented => "NOT IMPLEMENTED",
            Self::Passed => "OK",
            Self::Failed => "FAIL",
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One recorded check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Test {
    /// Unique code within the section, e.g. `PR2_EX1_4`.
    pub code: String,
    /// What the check exercises.
    pub description: String,
    /// Current state.
    pub result: TestResult,
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\t\t[{}]:\t [{}] {}", self.result, self.code, self.description)
    }
}

/// Counts of tests by outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStats {
    /// Every recorded test.
    pub total: usize,
    /// Tests that passed.
    pub passed: usize,
    /// Tests that failed.
    pub failed: usize,
    /// Tests declared as not implemented.
    pub not_implemented: usize,
}

impl TestStats {
    fn record(&mut self, result: TestResult) {
        self.total = self.total.saturating_add(1);
        let bucket = match result {
            TestResult::Passed => &mut self.passed,
            TestResult::Failed => &mut self.failed,
            TestResult::NotImplemented => &mut self.not_implemented,
            TestResult::Running => return,
        };
        *bucket = bucket.saturating_add(1);
    }

    fn merge(&mut self, other: Self) {
        self.total = self.total.saturating_add(other.total);
        self.passed = self.passed.saturating_add(other.passed);
        self.failed = self.failed.saturating_add(other.failed);
        self.not_implemented = self.not_implemented.saturating_add(other.not_implemented);
    }

    #[allow(clippy::cast_precision_loss)]
    fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            count as f64 / self.total as f64 * 100.0
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// A titled group of tests, typically one assignment.
#[derive(Debug, Clone)]
pub struct TestSection {
    /// Unique code within the suite, e.g. `PR1`.
    pub code: String,
    /// Heading printed above the tests.
    pub title: String,
    tests: Vec<Test>,
    print_progress: bool,
}

impl TestSection {
    /// Create an empty section.
    pub fn new(code: &str, title: &str, print_progress: bool) -> Self {
        Self {
            code: code.to_owned(),
            title: title.to_owned(),
            tests: Vec::new(),
            print_progress,
        }
    }

    /// The recorded tests, in order.
    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    /// Record a test with an explicit initial state.
    pub fn add_test(&mut self, code: &str, description: &str, result: TestResult) {
        self.tests.push(Test {
            code: code.to_owned(),
            description: description.to_owned(),
            result,
        });
    }

    /// Look up a test by code.
    pub fn test(&self, code: &str) -> Option<&Test> {
        self.tests.iter().find(|test| test.code == code)
    }

    /// Overwrite a test's state. Returns `false` if no test has that code.
    pub fn update_test(&mut self, code: &str, result: TestResult) -> bool {
        match self.tests.iter_mut().find(|test| test.code == code) {
            Some(test) => {
                test.result = result;
                true
            }
            None => false,
        }
    }

    /// Counts over this section's tests.
    pub fn stats(&self) -> TestStats {
        let mut stats = TestStats::default();
        for test in &self.tests {
            stats.record(test.result);
        }
        stats
    }

    /// Record `code` as running.
    pub fn start_test(&mut self, code: &str, description: &str) {
        tracing::info!(section = %self.code, code, description, "test started");
        if self.print_progress {
            println!("\n[START] ==> Running test [{code}] - {description}");
        }
        self.add_test(code, description, TestResult::Running);
    }

    /// Store the verdict for a running test.
    pub fn end_test(&mut self, code: &str, passed: bool) {
        let result = if passed {
            TestResult::Passed
        } else {
            TestResult::Failed
        };
        let description = self
            .test(code)
            .map(|test| test.description.clone())
            .unwrap_or_default();
        tracing::info!(section = %self.code, code, result = result.label(), "test finished");
        if self.print_progress {
            println!("\n[{result}] ==> Finished test [{code}] - {description}");
        }
        if !self.update_test(code, result) {
            tracing::warn!(section = %self.code, code, "finished a test that was never started");
        }
    }

    /// Start `code`, evaluate `check`, and record the verdict.
    ///
    /// A check that returns an error counts as failed; the error is logged.
    pub fn run_test<F, E>(&mut self, code: &str, description: &str, check: F) -> bool
    where
        F: FnOnce() -> Result<bool, E>,
        E: fmt::Display,
    {
        self.start_test(code, description);
        let passed = match check() {
            Ok(passed) => passed,
            Err(err) => {
                tracing::warn!(code, error = %err, "test aborted");
                false
            }
        };
        self.end_test(code, passed);
        passed
    }

    fn report(&self) -> SectionReport {
        SectionReport {
            code: self.code.clone(),
            title: self.title.clone(),
            stats: self.stats(),
            tests: self.tests.clone(),
        }
    }
}

impl fmt::Display for TestSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        writeln!(f)?;
        writeln!(f, "\t{SECTION_RULE}")?;
        writeln!(f, "\t{}", self.title)?;
        writeln!(f, "\t{SECTION_RULE}")?;
        if self.tests.is_empty() {
            writeln!(f, "\tNO TEST DEFINED")?;
        }
        for test in &self.tests {
            writeln!(f, "{test}")?;
        }
        writeln!(f, "\t{SECTION_RULE}")?;
        if stats.total > 0 {
            writeln!(f, "\tTotal Tests: {}", stats.total)?;
            writeln!(
                f,
                "\tPassed Tests: {} ( {:.2} % )",
                stats.passed,
                stats.percent(stats.passed)
            )?;
            writeln!(
                f,
                "\tFailed Tests: {} ( {:.2} %)",
                stats.failed,
                stats.percent(stats.failed)
            )?;
            writeln!(f, "\t{SECTION_RULE}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Suite
// ---------------------------------------------------------------------------

/// Every section of a run.
#[derive(Debug, Clone, Default)]
pub struct TestSuite {
    sections: Vec<TestSection>,
    print_progress: bool,
}

impl TestSuite {
    /// Create an empty suite. Sections added later inherit `print_progress`.
    pub const fn new(print_progress: bool) -> Self {
        Self {
            sections: Vec::new(),
            print_progress,
        }
    }

    /// The sections, in order.
    pub fn sections(&self) -> &[TestSection] {
        &self.sections
    }

    /// Create an empty section that inherits this suite's progress setting.
    ///
    /// The section is not part of the suite until passed to
    /// [`TestSuite::add_section`].
    pub fn open_section(&self, code: &str, title: &str) -> TestSection {
        TestSection::new(code, title, self.print_progress)
    }

    /// Append `section`, replacing any section with the same code.
    pub fn add_section(&mut self, section: TestSection) {
        match self.section_mut(&section.code) {
            Some(existing) => *existing = section,
            None => self.sections.push(section),
        }
    }

    /// Look up a section by code.
    pub fn section(&self, code: &str) -> Option<&TestSection> {
        self.sections.iter().find(|section| section.code == code)
    }

    /// Look up a section by code for recording.
    pub fn section_mut(&mut self, code: &str) -> Option<&mut TestSection> {
        self.sections.iter_mut().find(|section| section.code == code)
    }

    /// Record a test in a section. Returns `false` if the section is unknown.
    pub fn add_test(
        &mut self,
        section_code: &str,
        code: &str,
        description: &str,
        result: TestResult,
    ) -> bool {
        self.section_mut(section_code)
            .map(|section| section.add_test(code, description, result))
            .is_some()
    }

    /// Overwrite a test's state. Returns `false` if either code is unknown.
    pub fn update_test(&mut self, section_code: &str, code: &str, result: TestResult) -> bool {
        self.section_mut(section_code)
            .is_some_and(|section| section.update_test(code, result))
    }

    /// Look up a test by section and test code.
    pub fn test(&self, section_code: &str, code: &str) -> Option<&Test> {
        self.section(section_code).and_then(|section| section.test(code))
    }

    /// Counts over every section.
    pub fn stats(&self) -> TestStats {
        let mut stats = TestStats::default();
        for section in &self.sections {
            stats.merge(section.stats());
        }
        stats
    }

    /// Whether at least one test was recorded and every test passed.
    pub fn all_passed(&self) -> bool {
        let stats = self.stats();
        stats.total > 0 && stats.passed == stats.total
    }

    /// The serializable summary.
    pub fn report(&self) -> SuiteReport {
        SuiteReport {
            stats: self.stats(),
            sections: self.sections.iter().map(TestSection::report).collect(),
        }
    }

    /// Write the JSON summary to `writer`.
    pub fn write_report<W: Write>(&self, writer: W) -> Result<(), HarnessError> {
        serde_json::to_writer(writer, &self.report())?;
        Ok(())
    }

    /// Write the JSON summary to the file at `path`, replacing it.
    pub fn export_to(&self, path: &Path) -> Result<(), HarnessError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_report(&mut writer)?;
        writer.flush()?;
        tracing::info!(path = %path.display(), "report exported");
        Ok(())
    }
}

impl fmt::Display for TestSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        writeln!(f)?;
        writeln!(f, "{SUITE_RULE}")?;
        writeln!(f, "\t TEST RESULTS")?;
        writeln!(f, "{SUITE_RULE}")?;
        if self.sections.is_empty() {
            writeln!(f, "NO TEST DEFINED")?;
        }
        for section in &self.sections {
            write!(f, "{section}")?;
        }
        writeln!(f)?;
        writeln!(f, "{SUITE_RULE}")?;
        if stats.total > 0 {
            writeln!(f, "Total Tests: {}", stats.total)?;
            writeln!(
                f,
                "Passed Tests: {} ( {:.2} % )",
                stats.passed,
                stats.percent(stats.passed)
            )?;
            writeln!(
                f,
                "Failed Tests: {} ( {:.2} % )",
                stats.failed,
                stats.percent(stats.failed)
            )?;
            writeln!(f, "{SUITE_RULE}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Export shape
// ---------------------------------------------------------------------------

/// JSON summary of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Totals across all sections.
    #[serde(flatten)]
    pub stats: TestStats,
    /// Per-section summaries.
    pub sections: Vec<SectionReport>,
}

/// JSON summary of one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionReport {
    /// Section code.
    pub code: String,
    /// Section title.
    pub title: String,
    /// Totals for this section.
    #[serde(flatten)]
    pub stats: TestStats,
    /// Every test in the section.
    pub tests: Vec<Test>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn sample_suite() -> TestSuite {
        let mut suite = TestSuite::new(false);
        let mut section = suite.open_section("PR1", "Tests for PR1 exercices");
        section.run_test("PR1_EX1_1", "passes", || Ok::<_, String>(true));
        section.run_test("PR1_EX1_2", "fails", || Ok::<_, String>(false));
        section.run_test("PR1_EX1_3", "errors", || Err("boom".to_owned()));
        section.add_test("PR1_EX1_4", "pending", TestResult::NotImplemented);
        suite.add_section(section);
        suite
    }

    #[test]
    fn stats_count_every_outcome() {
        let stats = sample_suite().stats();
        assert_eq!(
            stats,
            TestStats {
                total: 4,
                passed: 1,
                failed: 2,
                not_implemented: 1,
            }
        );
    }

    #[test]
    fn run_test_records_verdicts() {
        let suite = sample_suite();
        assert_eq!(suite.test("PR1", "PR1_EX1_1").unwrap().result, TestResult::Passed);
        assert_eq!(suite.test("PR1", "PR1_EX1_3").unwrap().result, TestResult::Failed);
        assert!(suite.test("PR2", "PR1_EX1_1").is_none());
        assert!(!suite.all_passed());
    }

    #[test]
    fn update_and_add_by_section_code() {
        let mut suite = sample_suite();
        assert!(suite.update_test("PR1", "PR1_EX1_2", TestResult::Passed));
        assert!(!suite.update_test("PR1", "PR1_EX9_9", TestResult::Passed));
        assert!(!suite.add_test("PR9", "X", "nowhere", TestResult::Running));
        assert!(suite.add_test("PR1", "PR1_EX1_5", "late", TestResult::Running));
        assert_eq!(suite.section("PR1").unwrap().tests().len(), 5);
    }

    #[test]
    fn adding_an_existing_code_replaces_the_section() {
        let mut suite = sample_suite();
        let rerun = suite.open_section("PR1", "Rerun");
        suite.add_section(rerun);
        assert_eq!(suite.sections().len(), 1);
        assert_eq!(suite.sections()[0].title, "Rerun");
        assert_eq!(suite.stats().total, 0);
    }

    #[test]
    fn render_lists_tests_and_percentages() {
        let text = sample_suite().to_string();
        assert!(text.contains("\t TEST RESULTS"));
        assert!(text.contains("\t\t[OK]:\t [PR1_EX1_1] passes"));
        assert!(text.contains("\t\t[NOT IMPLEMENTED]:\t [PR1_EX1_4] pending"));
        assert!(text.contains("Passed Tests: 1 ( 25.00 % )"));
        assert!(text.contains("Failed Tests: 2 ( 50.00 % )"));
    }

    #[test]
    fn empty_suite_renders_placeholder() {
        let text = TestSuite::new(false).to_string();
        assert!(text.contains("NO TEST DEFINED"));
        assert!(!text.contains("Total Tests"));
    }

    #[test]
    fn report_has_flat_counters_and_labels() {
        let mut buffer = Vec::new();
        sample_suite().write_report(&mut buffer).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(json["total"], 4);
        assert_eq!(json["not_implemented"], 1);
        let section = &json["sections"][0];
        assert_eq!(section["code"], "PR1");
        assert_eq!(section["failed"], 2);
        assert_eq!(section["tests"][1]["result"], "FAIL");
        assert_eq!(section["tests"][3]["result"], "NOT IMPLEMENTED");
    }

    #[test]
    fn stats_counters_saturate() {
        let mut stats = TestStats {
            total: usize::MAX,
            passed: usize::MAX,
            failed: 0,
            not_implemented: 0,
        };
        stats.record(TestResult::Passed);
        stats.record(TestResult::Running);
        assert_eq!(stats.total, usize::MAX);
        assert_eq!(stats.passed, usize::MAX);

        stats.merge(TestStats {
            total: 3,
            passed: 1,
            failed: 1,
            not_implemented: 1,
        });
        assert_eq!(stats.total, usize::MAX);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.not_implemented, 1);
    }
}
