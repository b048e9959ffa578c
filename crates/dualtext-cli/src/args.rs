use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};

pub const USAGE: &str = "\
usage: dualtext <job.json> [--out-dir DIR] [--fonts DIR]

  <job.json>       job file with the texts, font and plate settings
  --out-dir DIR    directory for file_display.stl and the artifact
                   (default: a fresh directory under ./runs)
  --fonts DIR      font library root (default: ./fonts)
";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub job: PathBuf,
    pub out_dir: Option<PathBuf>,
    pub fonts: PathBuf,
}

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Run(Args),
    Help,
}

pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Command> {
    let mut job = None;
    let mut out_dir = None;
    let mut fonts = PathBuf::from("fonts");

    let mut it = args.into_iter();
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--out-dir" => out_dir = Some(value(&mut it, "--out-dir")?),
            "--fonts" => fonts = value(&mut it, "--fonts")?,
            flag if flag.starts_with('-') => bail!("unknown option {}", flag),
            _ if job.is_some() => bail!("unexpected argument {}", arg),
            other => job = Some(PathBuf::from(other)),
        }
    }

    let job = job.ok_or_else(|| anyhow!("missing job file"))?;
    Ok(Command::Run(Args {
        job,
        out_dir,
        fonts,
    }))
}

fn value(it: &mut impl Iterator<Item = String>, flag: &str) -> Result<PathBuf> {
    it.next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("{} needs a value", flag))
}
