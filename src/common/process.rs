//! External process execution.
//!
//! Every package manager, git, compiler and installer invocation goes through
//! [`ProcessRunner`] so installation logic can be driven by a scripted runner
//! in tests.

use crate::error::Result;
use log::debug;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Capture stdout/stderr instead of streaming them to the terminal.
    pub capture: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            capture: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn capture_output(mut self) -> Self {
        self.capture = true;
        self
    }

    /// Prefix the command with `sudo` when `elevate` is set.
    pub fn elevated(self, elevate: bool) -> Self {
        if !elevate {
            return self;
        }
        let mut args = Vec::with_capacity(self.args.len() + 1);
        args.push(self.program);
        args.extend(self.args);
        Self {
            program: "sudo".to_string(),
            args,
            cwd: self.cwd,
            capture: self.capture,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutcome {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn with_code(code: i32) -> Self {
        Self {
            code: Some(code),
            ..Self::default()
        }
    }
}

/// Capability to run external commands.
///
/// `Err` means the program could not be started at all; a started program
/// that exits non-zero is an `Ok` outcome with a failing code.
pub trait ProcessRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutcome>;
}

/// Runs commands on the host, blocking until they exit.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandOutcome> {
        debug!("Executing command: {}", spec);

        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(ref dir) = spec.cwd {
            command.current_dir(dir);
        }

        if spec.capture {
            let output = command.stdin(Stdio::null()).output()?;
            Ok(CommandOutcome {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            })
        } else {
            let status = command.status()?;
            Ok(CommandOutcome {
                code: status.code(),
                ..CommandOutcome::default()
            })
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevated_prefixes_sudo() {
        let spec = CommandSpec::new("apt-get")
            .args(["install", "-y", "nmap"])
            .elevated(true);
        assert_eq!(spec.program, "sudo");
        assert_eq!(spec.to_string(), "sudo apt-get install -y nmap");

        let plain = CommandSpec::new("brew").arg("install").elevated(false);
        assert_eq!(plain.to_string(), "brew install");
    }

    #[test]
    fn test_system_runner_reports_exit_codes() {
        let ok = SystemRunner
            .run(&CommandSpec::new("sh").args(["-c", "echo hi"]).capture_output())
            .unwrap();
        assert!(ok.success());
        assert_eq!(ok.stdout.trim(), "hi");

        let failed = SystemRunner
            .run(&CommandSpec::new("sh").args(["-c", "exit 3"]).capture_output())
            .unwrap();
        assert_eq!(failed.code, Some(3));
        assert!(!failed.success());
    }

    #[test]
    fn test_system_runner_missing_program_is_error() {
        let result = SystemRunner.run(&CommandSpec::new("definitely-not-a-real-program-zz"));
        assert!(result.is_err());
    }
}
