//! Running generated programs and inspecting their binaries.

use crate::error::{HarnessError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Outcome of one successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    /// Wall-clock time from spawn to exit.
    pub elapsed: Duration,
    pub stdout: String,
}

/// The external process execution collaborator.
pub trait ProgramRunner {
    /// Run `program` to completion. A non-zero exit is an error.
    fn run(&self, program: &Path, args: &[String]) -> Result<RunOutput>;
}

impl<R: ProgramRunner + ?Sized> ProgramRunner for &R {
    fn run(&self, program: &Path, args: &[String]) -> Result<RunOutput> {
        (**self).run(program, args)
    }
}

/// Spawns the program and blocks on it with no timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProgramRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[String]) -> Result<RunOutput> {
        let start = Instant::now();
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| HarnessError::Spawn {
                program: program.display().to_string(),
                source,
            })?;
        let elapsed = start.elapsed();

        if !output.status.success() {
            return Err(HarnessError::ExecutionFailed {
                program: program.display().to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        Ok(RunOutput {
            elapsed,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

/// On-disk size of an executable before and after `strip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinarySizes {
    pub unstripped: u64,
    pub stripped: u64,
}

/// Measure `executable`, then strip a copy of it and measure again.
///
/// The original binary is left untouched.
pub fn inspect_sizes(executable: &Path, strip: &str) -> Result<BinarySizes> {
    let unstripped = file_size(executable)?;

    let mut copy = executable.as_os_str().to_owned();
    copy.push(".stripped");
    let copy = PathBuf::from(copy);
    std::fs::copy(executable, &copy).map_err(|e| HarnessError::io(&copy, e))?;

    let output = Command::new(strip)
        .arg(&copy)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| HarnessError::Spawn {
            program: strip.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(HarnessError::ExecutionFailed {
            program: strip.to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let stripped = file_size(&copy)?;
    std::fs::remove_file(&copy).map_err(|e| HarnessError::io(&copy, e))?;
    Ok(BinarySizes {
        unstripped,
        stripped,
    })
}

fn file_size(path: &Path) -> Result<u64> {
    std::fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| HarnessError::io(path, e))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Result<RunOutput> {
        SystemRunner.run(Path::new("sh"), &["-c".to_string(), script.to_string()])
    }

    #[test]
    fn test_captures_stdout() {
        let output = sh("printf 'OK: 3\\nFail: 1\\n'").unwrap();
        assert_eq!(output.stdout, "OK: 3\nFail: 1\n");
        assert_eq!(
            exspeed::Tally::parse(&output.stdout).unwrap(),
            exspeed::Tally { ok: 3, fail: 1 }
        );
    }

    #[test]
    fn test_non_zero_exit_is_failure() {
        let err = sh("echo boom >&2; exit 3").unwrap_err();
        match err {
            HarnessError::ExecutionFailed { stderr, .. } => assert_eq!(stderr.trim(), "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let err = SystemRunner
            .run(Path::new("/nonexistent/exspeed-program"), &[])
            .unwrap_err();
        assert!(matches!(err, HarnessError::Spawn { .. }));
    }

    #[test]
    fn test_elapsed_covers_the_run() {
        let output = sh("sleep 0.05").unwrap();
        assert!(output.elapsed >= Duration::from_millis(40));
    }
}
