//! Test harness for the dual-text illusion pipeline.
//!
//! # Key Components
//!
//! - [`Scenario`]: Fluent API for running the pipeline in a scratch directory
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`report`]: Structured text description of a run
//! - [`helpers`]: Error type, test font lookup, mock glyph math

pub mod helpers;
pub mod oracle;
pub mod report;
pub mod scenario;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::RunReport;
pub use scenario::{Scenario, ScenarioRun};
