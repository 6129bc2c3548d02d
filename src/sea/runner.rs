//! External tool execution.
//!
//! Every process the pipeline starts goes through a [`ToolRunner`], so each
//! stage can be exercised against a scripted runner instead of real tools.

use crate::sea::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// A fully described external tool invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program name (resolved on PATH) or path
    pub program: PathBuf,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Bounded wait
    pub timeout: Duration,
}

impl ToolCommand {
    /// Creates a command with no arguments.
    pub fn new(program: impl Into<PathBuf>, cwd: &Path, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            timeout,
        }
    }

    /// Appends one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// File name of the program without extension (`npm` for `npm.cmd`).
    pub fn program_name(&self) -> String {
        self.program
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Shell-like rendering for logs and error messages.
    pub fn display(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            if arg.contains(' ') {
                line.push('"');
                line.push_str(arg);
                line.push('"');
            } else {
                line.push_str(arg);
            }
        }
        line
    }
}

/// Captured result of a finished tool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl ToolOutput {
    /// Whether the tool exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Level for logging stderr. A failing tool's stderr is reported by the
    /// calling stage through [`ToolOutput::diagnostic`].
    pub fn stderr_level(&self) -> log::Level {
        if self.success() {
            log::Level::Warn
        } else {
            log::Level::Debug
        }
    }

    /// Exit status plus the tool's own diagnostics, for fatal error messages.
    pub fn diagnostic(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        let detail = if stderr.is_empty() {
            self.stdout.trim()
        } else {
            stderr
        };
        if detail.is_empty() {
            status
        } else {
            format!("{status}\n{detail}")
        }
    }
}

/// Runs external tools.
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    /// Runs `command` to completion and captures its output.
    ///
    /// A non-zero exit is not an error at this level; the calling stage
    /// decides whether it is fatal. Errors are reserved for a program that
    /// cannot be found or started, and for [`Error::Timeout`].
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput>;
}

/// [`ToolRunner`] backed by real child processes.
#[derive(Clone, Debug, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    /// Creates a process runner.
    pub fn new() -> Self {
        Self
    }

    /// Resolves bare program names through PATH (handles `.cmd`/`.exe` on Windows).
    fn resolve_program(program: &Path) -> Result<PathBuf> {
        if program.components().count() > 1 || program.is_absolute() {
            return Ok(program.to_path_buf());
        }
        which::which(program).map_err(|e| {
            log::debug!("{} not found on PATH: {}", program.display(), e);
            Error::ToolNotFound {
                tool: program.display().to_string(),
            }
        })
    }
}

impl ToolRunner for ProcessRunner {
    async fn run(&self, command: &ToolCommand) -> Result<ToolOutput> {
        let program = Self::resolve_program(&command.program)?;
        log::debug!("Running: {} (cwd: {})", command.display(), command.cwd.display());

        let child = Command::new(&program)
            .args(&command.args)
            .current_dir(&command.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|error| match error.kind() {
                std::io::ErrorKind::NotFound => Error::ToolNotFound {
                    tool: program.display().to_string(),
                },
                _ => Error::CommandFailed {
                    command: command.display(),
                    error,
                },
            })?;

        // On timeout the future owning the child is dropped, which kills it.
        let output = match tokio::time::timeout(command.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(error)) => {
                return Err(Error::CommandFailed {
                    command: command.display(),
                    error,
                });
            }
            Err(_elapsed) => {
                return Err(Error::Timeout {
                    command: command.display(),
                    seconds: command.timeout.as_secs(),
                });
            }
        };

        let result = ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        for line in result.stdout.lines() {
            log::debug!("  {}", line);
        }
        let level = result.stderr_level();
        for line in result.stderr.lines().filter(|l| !l.trim().is_empty()) {
            log::log!(level, "{}: {}", command.program_name(), line);
        }
        log::debug!("{} exited with {:?}", command.program_name(), result.code);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_arguments_with_spaces() {
        let cmd = ToolCommand::new("codesign", Path::new("/p"), Duration::from_secs(1))
            .args(["--sign", "Developer ID", "app"]);
        assert_eq!(cmd.display(), "codesign --sign \"Developer ID\" app");
    }

    #[test]
    fn program_name_strips_directory_and_extension() {
        let cmd = ToolCommand::new(
            "/p/.node2exe/tools/node_modules/.bin/postject.cmd",
            Path::new("/p"),
            Duration::from_secs(1),
        );
        assert_eq!(cmd.program_name(), "postject");
    }

    #[test]
    fn diagnostic_prefers_stderr() {
        let output = ToolOutput {
            code: Some(2),
            stdout: "noise".into(),
            stderr: "  boom \n".into(),
        };
        assert!(!output.success());
        assert_eq!(output.diagnostic(), "exit code 2\nboom");

        let quiet = ToolOutput {
            code: None,
            ..Default::default()
        };
        assert_eq!(quiet.diagnostic(), "terminated by signal");
    }

    #[tokio::test]
    async fn unknown_program_is_tool_not_found() {
        let cmd = ToolCommand::new(
            "node2exe-definitely-not-installed",
            Path::new("."),
            Duration::from_secs(5),
        );
        let err = ProcessRunner::new().run(&cmd).await.unwrap_err();
        assert!(matches!(err, Error::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_exit_code_and_output() {
        let cmd = ToolCommand::new("sh", Path::new("."), Duration::from_secs(10))
            .args(["-c", "echo out; echo err >&2; exit 3"]);
        let output = ProcessRunner::new().run(&cmd).await.unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_tool_keeps_its_warnings() {
        let cmd = ToolCommand::new("sh", Path::new("."), Duration::from_secs(10))
            .args(["-c", "echo '▲ [WARNING] Top-level await is unsupported' >&2"]);
        let output = ProcessRunner::new().run(&cmd).await.unwrap();
        assert!(output.success());
        assert!(output.stderr.contains("Top-level await"));
        assert_eq!(output.stderr_level(), log::Level::Warn);
    }

    #[test]
    fn failing_tool_stderr_is_left_to_the_caller() {
        let output = ToolOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: "boom".into(),
        };
        assert_eq!(output.stderr_level(), log::Level::Debug);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn slow_tool_times_out() {
        let cmd = ToolCommand::new("sleep", Path::new("."), Duration::from_millis(200)).arg("5");
        let err = ProcessRunner::new().run(&cmd).await.unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }
}
