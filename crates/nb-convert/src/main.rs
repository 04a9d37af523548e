//! Convert every Jupyter notebook in a directory to PDF.
//!
//! Each notebook goes through `jupyter-nbconvert`, `latexmk --xelatex`
//! and `latexmk -c`. A failing notebook is reported after the batch;
//! the others are still converted.

mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use crate::pipeline::{convert_all, ConversionReport, SystemRunner};

#[derive(Parser, Debug)]
#[command(name = "nb-convert", version)]
#[command(about = "Batch-convert Jupyter notebooks to PDF")]
struct Args {
    /// Directory holding the notebooks
    #[arg(default_value = ".")]
    dir: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(report) if report.is_success() => ExitCode::SUCCESS,
        Ok(report) => {
            let total = report.failures.len() + report.converted.len();
            eprintln!("{} of {} notebooks failed:", report.failures.len(), total);
            for failure in &report.failures {
                eprintln!("  {}", failure);
            }
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<ConversionReport> {
    convert_all(&mut SystemRunner, &args.dir)
        .with_context(|| format!("could not read {}", args.dir.display()))
}
