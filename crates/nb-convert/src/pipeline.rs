//! Notebook to PDF pipeline: nbconvert, latexmk, cleanup

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

/// One external command in a notebook's conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `jupyter-nbconvert --to latex <stem>.ipynb`
    Export,
    /// `latexmk --xelatex <stem>.tex`
    Typeset,
    /// `latexmk -c`
    Clean,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Export, Step::Typeset, Step::Clean];

    /// Program and arguments for the notebook with file stem `stem`
    pub fn command(self, stem: &str) -> (&'static str, Vec<String>) {
        match self {
            Step::Export => (
                "jupyter-nbconvert",
                vec!["--to".into(), "latex".into(), format!("{}.ipynb", stem)],
            ),
            Step::Typeset => ("latexmk", vec!["--xelatex".into(), format!("{}.tex", stem)]),
            Step::Clean => ("latexmk", vec!["-c".into()]),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Export => f.write_str("export to LaTeX"),
            Step::Typeset => f.write_str("typeset PDF"),
            Step::Clean => f.write_str("clean byproducts"),
        }
    }
}

/// How an external command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// Non-zero exit; `None` when killed by a signal
    Failed(Option<i32>),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("success"),
            Status::Failed(Some(code)) => write!(f, "exit code {}", code),
            Status::Failed(None) => f.write_str("a signal"),
        }
    }
}

/// Runs external programs
pub trait CommandRunner {
    fn run(&mut self, program: &str, args: &[String], dir: &Path) -> io::Result<Status>;
}

/// Spawns real processes and waits for them
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, program: &str, args: &[String], dir: &Path) -> io::Result<Status> {
        let status = Command::new(program).args(args).current_dir(dir).status()?;
        Ok(if status.success() {
            Status::Success
        } else {
            Status::Failed(status.code())
        })
    }
}

#[derive(Debug, Error)]
pub enum StepError {
    #[error("`{command}` finished with {status}")]
    Failed { command: String, status: Status },

    #[error("could not run `{command}`: {source}")]
    Spawn { command: String, source: io::Error },
}

/// A notebook whose pipeline stopped early
#[derive(Debug, Error)]
#[error("{}: {step} failed: {error}", .notebook.display())]
pub struct Failure {
    pub notebook: PathBuf,
    pub step: Step,
    #[source]
    pub error: StepError,
}

/// Outcome of a whole batch
#[derive(Debug, Default)]
pub struct ConversionReport {
    pub converted: Vec<PathBuf>,
    pub failures: Vec<Failure>,
}

impl ConversionReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Notebooks directly inside `dir`, sorted by file name
pub fn discover(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut notebooks = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "ipynb") {
            notebooks.push(path);
        }
    }
    notebooks.sort();
    Ok(notebooks)
}

/// Run every step for one notebook, stopping at the first failure
pub fn convert_one<C: CommandRunner>(
    runner: &mut C,
    notebook: &Path,
    dir: &Path,
) -> Result<(), Failure> {
    let stem = notebook
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    for step in Step::ALL {
        let (program, args) = step.command(&stem);
        let command = format!("{} {}", program, args.join(" "));
        log::debug!("{}: running {}", notebook.display(), command);

        let error = match runner.run(program, &args, dir) {
            Ok(Status::Success) => continue,
            Ok(status) => StepError::Failed { command, status },
            Err(source) => StepError::Spawn { command, source },
        };
        return Err(Failure { notebook: notebook.to_path_buf(), step, error });
    }
    Ok(())
}

/// Convert every notebook in `dir`; failures are collected, not fatal
pub fn convert_all<C: CommandRunner>(runner: &mut C, dir: &Path) -> io::Result<ConversionReport> {
    let notebooks = discover(dir)?;
    log::info!("found {} notebooks in {}", notebooks.len(), dir.display());

    let mut report = ConversionReport::default();
    for notebook in notebooks {
        match convert_one(runner, &notebook, dir) {
            Ok(()) => {
                log::info!("converted {}", notebook.display());
                report.converted.push(notebook);
            }
            Err(failure) => {
                log::warn!("{}", failure);
                report.failures.push(failure);
            }
        }
    }
    Ok(report)
}
