use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use crate::shared::error::{describe_status, TrifaceError};

/// Result of a finished external process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an external program to completion and reports how it exited.
pub trait CommandRunner {
    /// Fails only when the program cannot be started at all.
    fn run(&self, program: &str, args: &[OsString]) -> io::Result<CommandOutcome>;

    /// Full path `program` resolves to on `PATH`, or `None`.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}

/// Checks that `program` is installed and answers `-version`.
///
/// The version run catches same-named binaries that are not the tool,
/// such as Windows' `convert.exe`.
pub fn check_program(runner: &dyn CommandRunner, program: &str) -> Result<(), TrifaceError> {
    let path = runner
        .locate(program)
        .ok_or_else(|| TrifaceError::DependencyMissing(format!("{program} (not found on PATH)")))?;
    log::debug!("Found {program} at {}", path.display());
    run_checked(runner, program, &["-version".into()])
}

/// Runs `program` and turns anything but a zero exit into an error.
///
/// A program that cannot be found is a missing dependency; one that runs
/// and fails is an external tool failure.
pub fn run_checked(
    runner: &dyn CommandRunner,
    program: &str,
    args: &[OsString],
) -> Result<(), TrifaceError> {
    let outcome = runner.run(program, args).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            TrifaceError::DependencyMissing(format!("{program} (not found on PATH)"))
        } else {
            TrifaceError::ExternalToolFailure {
                program: program.to_string(),
                status: "failed to start".into(),
                stderr: e.to_string(),
            }
        }
    })?;

    if outcome.success() {
        return Ok(());
    }
    Err(TrifaceError::ExternalToolFailure {
        program: program.to_string(),
        status: describe_status(outcome.code),
        stderr: outcome.stderr.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRunner(io::Result<CommandOutcome>);

    impl CommandRunner for FixedRunner {
        fn run(&self, _program: &str, _args: &[OsString]) -> io::Result<CommandOutcome> {
            match &self.0 {
                Ok(outcome) => Ok(outcome.clone()),
                Err(e) => Err(io::Error::new(e.kind(), e.to_string())),
            }
        }

        fn locate(&self, program: &str) -> Option<PathBuf> {
            Some(PathBuf::from("/usr/bin").join(program))
        }
    }

    /// Knows no programs; any run would be a test failure.
    struct EmptyPathRunner;

    impl CommandRunner for EmptyPathRunner {
        fn run(&self, program: &str, _args: &[OsString]) -> io::Result<CommandOutcome> {
            panic!("{program} must not be run when it is not on PATH");
        }

        fn locate(&self, _program: &str) -> Option<PathBuf> {
            None
        }
    }

    fn ok_outcome() -> CommandOutcome {
        CommandOutcome {
            code: Some(0),
            stderr: String::new(),
        }
    }

    #[test]
    fn test_zero_exit_is_ok() {
        let runner = FixedRunner(Ok(CommandOutcome {
            code: Some(0),
            stderr: String::new(),
        }));
        assert!(run_checked(&runner, "convert", &[]).is_ok());
    }

    #[test]
    fn test_nonzero_exit_is_external_tool_failure() {
        let runner = FixedRunner(Ok(CommandOutcome {
            code: Some(1),
            stderr: "convert: no images defined\n".into(),
        }));
        match run_checked(&runner, "convert", &[]).unwrap_err() {
            TrifaceError::ExternalToolFailure {
                program,
                status,
                stderr,
            } => {
                assert_eq!(program, "convert");
                assert_eq!(status, "exit code 1");
                assert_eq!(stderr, "convert: no images defined");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_signal_is_external_tool_failure() {
        let runner = FixedRunner(Ok(CommandOutcome {
            code: None,
            stderr: String::new(),
        }));
        assert!(matches!(
            run_checked(&runner, "ffmpeg", &[]),
            Err(TrifaceError::ExternalToolFailure { .. })
        ));
    }

    #[test]
    fn test_missing_program_is_dependency_missing() {
        let runner = FixedRunner(Err(io::Error::new(io::ErrorKind::NotFound, "nope")));
        assert!(matches!(
            run_checked(&runner, "convert", &[]),
            Err(TrifaceError::DependencyMissing(_))
        ));
    }

    #[test]
    fn test_check_program_not_on_path_is_dependency_missing() {
        match check_program(&EmptyPathRunner, "convert").unwrap_err() {
            TrifaceError::DependencyMissing(what) => assert!(what.starts_with("convert")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_check_program_located_and_answering() {
        assert!(check_program(&FixedRunner(Ok(ok_outcome())), "ffmpeg").is_ok());
    }

    #[test]
    fn test_check_program_impostor_fails_version_run() {
        let runner = FixedRunner(Ok(CommandOutcome {
            code: Some(4),
            stderr: "Invalid Parameter - -version".into(),
        }));
        assert!(matches!(
            check_program(&runner, "convert"),
            Err(TrifaceError::ExternalToolFailure { .. })
        ));
    }
}
