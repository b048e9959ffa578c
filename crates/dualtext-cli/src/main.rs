//! dualtext: render a dual-text illusion from a job file.
//!
//! ```text
//! dualtext job.json --out-dir out/       # writes out/file_display.stl, out/file.stl
//! RUST_LOG=illusion_ops=debug dualtext job.json
//! ```

mod args;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use geom_kernel::TruckKernel;
use illusion_ops::{run_illusion, RunContext};
use job_file::{load_job_file, FontLibrary};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::args::Command;

/// Filter used when RUST_LOG is unset: WARN for everything, INFO for the pipeline.
const DEFAULT_LOG: &str = "warn,illusion_ops=info";

/// RUST_LOG replaces the default filter entirely (e.g. RUST_LOG=geom_kernel=debug).
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG))
}

fn init_tracing() {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

/// A directory no other run uses: `runs/<millis>-<pid>`.
fn fresh_run_dir() -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    PathBuf::from("runs").join(format!("{}-{}", millis, std::process::id()))
}

fn run() -> Result<ExitCode> {
    let args = match args::parse(std::env::args().skip(1))? {
        Command::Help => {
            print!("{}", args::USAGE);
            return Ok(ExitCode::SUCCESS);
        }
        Command::Run(a) => a,
    };

    let job = load_job_file(&args.job)
        .with_context(|| format!("loading job file {}", args.job.display()))?;
    for advisory in job.advisories() {
        warn!(%advisory, "check your texts");
    }

    let library = FontLibrary::new(&args.fonts);
    let font = job
        .resolve_font(Some(&library))
        .with_context(|| format!("resolving font under {}", library.root().display()))?;
    let params = job.to_illusion_params(&font);

    let ctx = RunContext::new(args.out_dir.unwrap_or_else(fresh_run_dir));
    let mut kernel = TruckKernel::new();
    let outcome = run_illusion(&mut kernel, &params, &ctx).context("rendering failed")?;

    if let Err(e) = &outcome.export.preview.result {
        eprintln!("preview not written: {}", e);
    }
    match &outcome.export.artifact.result {
        Ok(_) => {
            println!("Rendered in {:.1} s", outcome.elapsed.as_secs_f64());
            println!(
                "{} ({} of {} letter pairs, download as {})",
                outcome.export.artifact.path.display(),
                outcome.solid_count(),
                outcome.attempted_pairs,
                job.download_name(&font)
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!(
                "Rendering failed: {} was not written: {}",
                outcome.export.artifact.path.display(),
                e
            );
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
