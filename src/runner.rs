//! Discovery and invocation collaborator for built suites.
//!
//! The crate does not implement a full test engine; this module is the thin
//! seam an external runner plugs into. Discovery follows the fixed naming
//! convention: only entries whose name starts with [`TEST_PREFIX`] are
//! considered tests. Each discovered entry is invoked standalone and yields
//! one independent outcome.

use crate::suite::{GeneratedTest, Suite};

/// Discovery convention shared with external runners: test entries carry
/// this literal prefix.
pub const TEST_PREFIX: &str = "test_";

/// Outcome of one discovered test invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum TestOutcome {
    Pass {
        suite: String,
        name: String,
    },
    Fail {
        suite: String,
        name: String,
        error: String,
    },
}

impl TestOutcome {
    pub fn name(&self) -> &str {
        match self {
            TestOutcome::Pass { name, .. } => name,
            TestOutcome::Fail { name, .. } => name,
        }
    }

    pub fn passed(&self) -> bool {
        matches!(self, TestOutcome::Pass { .. })
    }
}

/// Yields the suite entries matching the discovery convention, in
/// installation order.
pub fn discover(suite: &Suite) -> impl Iterator<Item = &GeneratedTest> {
    suite
        .tests()
        .iter()
        .filter(|test| test.name().starts_with(TEST_PREFIX))
}

/// Discovers and invokes every test in the suite, collecting one outcome
/// per entry. Failure text includes any parameter context appended by the
/// generated test.
pub fn run_suite(suite: &Suite) -> Vec<TestOutcome> {
    discover(suite)
        .map(|test| match test.invoke() {
            Ok(()) => TestOutcome::Pass {
                suite: suite.name().to_string(),
                name: test.name().to_string(),
            },
            Err(failure) => TestOutcome::Fail {
                suite: suite.name().to_string(),
                name: test.name().to_string(),
                error: failure.to_string(),
            },
        })
        .collect()
}

/// Splits outcomes into (passed, failed) counts.
pub fn partition_outcomes(outcomes: &[TestOutcome]) -> (usize, usize) {
    let passed = outcomes.iter().filter(|o| o.passed()).count();
    (passed, outcomes.len() - passed)
}
