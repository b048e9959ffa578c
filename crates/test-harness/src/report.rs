//! Structured text reports of a pipeline run.
//!
//! Reports are plain text, meant to be read in test output or on a terminal.

use std::fmt;

use geom_kernel::{Aabb, Axis};
use illusion_ops::{Placement, RunOutcome, TargetReport};

use crate::oracle::OracleVerdict;
use crate::scenario::ScenarioRun;

/// A complete run report with all sections.
pub struct RunReport {
    pub text1: String,
    pub text2: String,
    pub pair_entries: Vec<PairEntry>,
    pub plate: Option<Aabb>,
    pub model_bounds: Aabb,
    pub triangles: Option<usize>,
    pub exports: Vec<(String, String)>,
    pub oracle_results: Vec<OracleVerdict>,
    pub elapsed_s: f64,
}

/// One letter pair's report entry.
pub struct PairEntry {
    pub index: usize,
    pub first: Option<char>,
    pub second: Option<char>,
    pub detail: String,
}

fn describe_target(t: &TargetReport) -> (String, String) {
    let status = match &t.result {
        Ok(bytes) => format!("{} bytes", bytes),
        Err(e) => format!("FAILED: {}", e),
    };
    (t.path.display().to_string(), status)
}

impl RunReport {
    /// Build a report from a finished run and any oracle verdicts.
    pub fn from_outcome(
        text1: &str,
        text2: &str,
        outcome: &RunOutcome,
        verdicts: &[OracleVerdict],
    ) -> Self {
        let pair_entries = outcome
            .placements
            .iter()
            .map(|p| {
                let index = p.index();
                let detail = match p {
                    Placement::Solid { bounds, .. } => format!(
                        "solid Y {:.2}..{:.2}, height {:.2}",
                        bounds.min_on(Axis::Y),
                        bounds.max_on(Axis::Y),
                        bounds.len(Axis::Z)
                    ),
                    Placement::Gap { reason, .. } => format!("gap: {}", reason),
                };
                PairEntry {
                    index,
                    first: text1.chars().nth(index),
                    second: text2.chars().nth(index),
                    detail,
                }
            })
            .collect();

        Self {
            text1: text1.to_string(),
            text2: text2.to_string(),
            pair_entries,
            plate: outcome.plate.map(|p| p.bounds()),
            model_bounds: outcome.model_bounds,
            triangles: outcome.mesh_stats.map(|m| m.triangles),
            exports: vec![
                describe_target(&outcome.export.preview),
                describe_target(&outcome.export.artifact),
            ],
            oracle_results: verdicts.to_vec(),
            elapsed_s: outcome.elapsed.as_secs_f64(),
        }
    }

    /// Format the report as text.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== Dual-Text Illusion Report ===\n\n");

        let gaps = self
            .pair_entries
            .iter()
            .filter(|e| e.detail.starts_with("gap"))
            .count();
        out.push_str(&format!(
            "\"{}\" / \"{}\" ({} pairs, {} gaps):\n",
            self.text1,
            self.text2,
            self.pair_entries.len(),
            gaps,
        ));
        for entry in &self.pair_entries {
            let show = |c: Option<char>| c.map(String::from).unwrap_or_else(|| "?".to_string());
            out.push_str(&format!(
                "  [{}] {} + {}: {}\n",
                entry.index,
                show(entry.first),
                show(entry.second),
                entry.detail,
            ));
        }

        match &self.plate {
            Some(p) => out.push_str(&format!(
                "\nPlate: {:.2} x {:.2} x {:.2}\n",
                p.len(Axis::X),
                p.len(Axis::Y),
                p.len(Axis::Z),
            )),
            None => out.push_str("\nPlate: none\n"),
        }

        let (min, max) = (self.model_bounds.min, self.model_bounds.max);
        out.push_str(&format!(
            "Bounding Box: ({:.1}, {:.1}, {:.1}) -> ({:.1}, {:.1}, {:.1})\n",
            min[0], min[1], min[2], max[0], max[1], max[2],
        ));
        match self.triangles {
            Some(n) => out.push_str(&format!("Mesh: {} triangles\n", n)),
            None => out.push_str("Mesh: unavailable\n"),
        }

        out.push_str("\nExports:\n");
        for (path, status) in &self.exports {
            out.push_str(&format!("  {}: {}\n", path, status));
        }

        if !self.oracle_results.is_empty() {
            out.push_str(&format!(
                "\nOracle Results ({} checks):\n",
                self.oracle_results.len()
            ));
            for v in &self.oracle_results {
                let status = if v.passed { "PASS" } else { "FAIL" };
                out.push_str(&format!("  [{}] {}: {}\n", status, v.oracle_name, v.detail));
            }
        }

        out.push_str(&format!("\nRendered in {:.2} s\n", self.elapsed_s));
        out
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl ScenarioRun {
    /// Report of this run including its oracle verdicts.
    pub fn report(&self) -> RunReport {
        RunReport::from_outcome(
            &self.params.text1,
            &self.params.text2,
            &self.outcome,
            &self.verdicts,
        )
    }
}
