use std::path::PathBuf;

use thiserror::Error;

/// Failure kinds the pipeline distinguishes at its boundaries.
///
/// Stage traits return boxed errors; this type is used where the caller
/// needs to know which kind of failure happened (startup checks, model
/// loading, the external merge step).
#[derive(Error, Debug)]
pub enum TrifaceError {
    #[error("invalid input: {0}")]
    Input(String),

    #[error("failed to load cascade classifier {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    #[error("required dependency missing: {0}")]
    DependencyMissing(String),

    #[error("{program} failed ({status}): {stderr}")]
    ExternalToolFailure {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TrifaceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Human-readable exit status: `exit code N`, or `terminated by signal`
/// when the process has no code.
pub fn describe_status(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}
