//! Fixture harness for the Contagion registry.
//!
//! Runs three fixed scenario sections against `contagion-core` and records
//! every check in a [`TestSuite`]:
//!
//! - [`pr1`] -- reservoir, agent and infection tables
//! - [`pr2`] -- city lists and country totals
//! - [`pr3`] -- research snapshots and the ranked list
//!
//! The `contagion` binary prints the suite or exports it as JSON.

pub mod config;
pub mod error;
pub mod pr1;
pub mod pr2;
pub mod pr3;
pub mod suite;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use suite::{SectionReport, SuiteReport, Test, TestResult, TestSection, TestStats, TestSuite};

/// Outcome of a single scenario check. An error counts as a failure.
pub type Check = Result<bool, contagion_core::RegistryError>;

/// Run every section in order. Returns whether all checks passed.
pub fn run_all(suite: &mut TestSuite) -> bool {
    let pr1 = pr1::run(suite);
    let pr2 = pr2::run(suite);
    let pr3 = pr3::run(suite);
    tracing::info!(pr1, pr2, pr3, "scenarios finished");
    pr1 && pr2 && pr3
}
