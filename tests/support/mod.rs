//! Shared helpers for integration tests.

#![allow(dead_code)]

use sectool::common::{CommandOutcome, CommandSpec, ProcessRunner};
use sectool::config::types::{InstallConfig, InstallPaths, PathsConfig};
use sectool::tool_management::{Environment, ToolDetectionConfig, ToolDetector, ToolRegistry};
use sectool::{Result, Session};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Records every command line and fails those containing a configured pattern.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<String>>,
    failures: Vec<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(mut self, pattern: &str) -> Self {
        self.failures.push(pattern.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutcome> {
        let line = command.to_string();
        self.calls.borrow_mut().push(line.clone());
        let code = if self.failures.iter().any(|p| line.contains(p.as_str())) {
            1
        } else {
            0
        };
        Ok(CommandOutcome::with_code(code))
    }
}

/// A home directory plus a private search path for the detector.
pub struct Sandbox {
    pub home: TempDir,
    pub path_dir: PathBuf,
}

impl Sandbox {
    pub fn new() -> Self {
        let home = TempDir::new().unwrap();
        let path_dir = home.path().join("path-bin");
        fs::create_dir_all(&path_dir).unwrap();
        Self { home, path_dir }
    }

    /// Drop an executable stub named `name` onto the private search path.
    pub fn provide(&self, name: &str) {
        write_executable(&self.path_dir.join(name));
    }

    pub fn paths(&self) -> InstallPaths {
        InstallPaths::resolve(&PathsConfig::default(), self.home.path(), Some("/bin/bash"))
    }

    pub fn detector(&self) -> ToolDetector {
        ToolDetector::with_config(ToolDetectionConfig {
            search_path: Some(self.path_dir.clone().into_os_string()),
            extra_dirs: Vec::new(),
        })
    }

    pub fn session<'r>(&self, registry: ToolRegistry, runner: &'r RecordingRunner) -> Session<'r> {
        let mut env = Environment::detect_from("linux", Some("ID=debian\nPRETTY_NAME=\"Debian 12\""))
            .unwrap();
        env.is_root = true;
        let install = InstallConfig {
            refresh_package_index: false,
            ..InstallConfig::default()
        };
        Session::with_parts(env, self.paths(), registry, self.detector(), install, runner)
    }
}

#[cfg(unix)]
pub fn write_executable(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, "#!/bin/sh\nexit 0\n").unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}
