//! Scenario: fluent API for running the illusion pipeline in tests.
//!
//! Each run gets its own scratch directory, so scenarios never share files.

use std::path::PathBuf;

use geom_kernel::{Kernel, MockKernel, TruckKernel};
use illusion_ops::{run_illusion, IllusionParams, RunContext, RunOutcome};
use tempfile::TempDir;

use crate::helpers::HarnessError;
use crate::oracle::{self, OracleVerdict};

/// A pipeline run waiting to happen.
pub struct Scenario {
    kernel: Box<dyn Kernel>,
    params: IllusionParams,
}

impl Scenario {
    /// Scenario on MockKernel (deterministic, fast).
    pub fn mock(text1: &str, text2: &str) -> Self {
        Self::with_kernel(Box::new(MockKernel::new()), text1, text2)
    }

    /// Scenario on a configured MockKernel.
    pub fn mock_with(kernel: MockKernel, text1: &str, text2: &str) -> Self {
        Self::with_kernel(Box::new(kernel), text1, text2)
    }

    /// Scenario on TruckKernel (real geometry) using `font`.
    pub fn truck(text1: &str, text2: &str, font: impl Into<PathBuf>) -> Self {
        let mut s = Self::with_kernel(Box::new(TruckKernel::new()), text1, text2);
        s.params.font_path = font.into();
        s
    }

    pub fn with_kernel(kernel: Box<dyn Kernel>, text1: &str, text2: &str) -> Self {
        Self {
            kernel,
            params: IllusionParams::new(text1, text2, "mock.ttf"),
        }
    }

    /// Adjust any parameter before running.
    pub fn configure(mut self, f: impl FnOnce(&mut IllusionParams)) -> Self {
        f(&mut self.params);
        self
    }

    pub fn params(&self) -> &IllusionParams {
        &self.params
    }

    /// Run the pipeline in a fresh scratch directory.
    pub fn run(mut self) -> Result<ScenarioRun, HarnessError> {
        let dir = tempfile::tempdir()?;
        let ctx = RunContext::new(dir.path().join("run"));
        let outcome = run_illusion(self.kernel.as_mut(), &self.params, &ctx)?;
        let verdicts = oracle::check_all(&outcome, &self.params);
        Ok(ScenarioRun {
            params: self.params,
            outcome,
            verdicts,
            ctx,
            _dir: dir,
        })
    }
}

/// A finished run, its oracle verdicts and its scratch directory.
pub struct ScenarioRun {
    pub params: IllusionParams,
    pub outcome: RunOutcome,
    pub verdicts: Vec<OracleVerdict>,
    pub ctx: RunContext,
    _dir: TempDir,
}

impl ScenarioRun {
    /// Fail with the first failed oracle, if any.
    pub fn assert_oracles(&self) -> Result<(), HarnessError> {
        match self.verdicts.iter().find(|v| !v.passed) {
            Some(v) => Err(HarnessError::OracleFailure {
                oracle: v.oracle_name.clone(),
                detail: v.detail.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn verdict(&self, name: &str) -> Option<&OracleVerdict> {
        self.verdicts.iter().find(|v| v.oracle_name == name)
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.ctx
            .artifact_path(&self.params.export_name, self.params.format)
    }

    /// Number of solids in the final model: letter pairs plus the plate.
    pub fn part_count(&self) -> usize {
        self.outcome.solid_count() + usize::from(self.outcome.plate.is_some())
    }
}
