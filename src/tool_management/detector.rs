use crate::tool_management::registry::ToolRegistry;
use crate::tool_management::status::RunState;
use log::{debug, info};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    pub available: bool,
    pub path: Option<PathBuf>,
    pub installation_source: InstallationSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InstallationSource {
    /// Resolved through the search path.
    SystemPath,
    /// Found in a user directory that is not on the search path.
    UserLocal,
    NotFound,
}

#[derive(Debug, Clone, Default)]
pub struct ToolDetectionConfig {
    /// Overrides `PATH` for lookups. `None` uses the process environment.
    pub search_path: Option<OsString>,
    /// Directories checked after the search path, e.g. `~/.local/bin`.
    pub extra_dirs: Vec<PathBuf>,
}

impl ToolDetectionConfig {
    /// Search `PATH` plus the usual user install locations.
    pub fn with_user_dirs(bin_dir: &Path) -> Self {
        let mut extra_dirs = vec![bin_dir.to_path_buf()];
        if let Some(home) = dirs::home_dir() {
            extra_dirs.push(home.join("go").join("bin"));
            extra_dirs.push(home.join(".local").join("bin"));
        }
        extra_dirs.dedup();
        Self {
            search_path: None,
            extra_dirs,
        }
    }
}

/// Resolves tool executables.
#[derive(Debug, Clone, Default)]
pub struct ToolDetector {
    config: ToolDetectionConfig,
}

impl ToolDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ToolDetectionConfig) -> Self {
        Self { config }
    }

    /// Look a tool up without touching any run state.
    pub fn detect_tool(&self, tool_name: &str) -> ToolStatus {
        if let Some(path) = self.resolve_on_search_path(tool_name) {
            debug!("Found {} in PATH at {:?}", tool_name, path);
            return ToolStatus {
                available: true,
                path: Some(path),
                installation_source: InstallationSource::SystemPath,
            };
        }

        if !self.config.extra_dirs.is_empty() {
            let dirs = std::env::join_paths(&self.config.extra_dirs).ok();
            if let Some(path) = dirs.and_then(|d| which::which_in(tool_name, Some(d), cwd()).ok()) {
                info!("Found {} outside PATH at {:?}", tool_name, path);
                return ToolStatus {
                    available: true,
                    path: Some(path),
                    installation_source: InstallationSource::UserLocal,
                };
            }
        }

        debug!("Tool {} not found in any location", tool_name);
        ToolStatus {
            available: false,
            path: None,
            installation_source: InstallationSource::NotFound,
        }
    }

    pub fn is_available(&self, tool_name: &str) -> bool {
        self.detect_tool(tool_name).available
    }

    /// Check one tool and record it as installed or missing.
    pub fn check_tool(&self, tool_name: &str, state: &mut RunState) -> ToolStatus {
        let status = self.detect_tool(tool_name);
        if status.available {
            state.mark_installed(tool_name);
        } else {
            state.mark_missing(tool_name);
        }
        status
    }

    /// Check every registry tool. Returns the number of tools checked.
    pub fn check_all(&self, registry: &ToolRegistry, state: &mut RunState) -> usize {
        let mut checked = 0;
        for tool in registry.iter() {
            self.check_tool(&tool.name, state);
            checked += 1;
        }
        info!(
            "Checked {} tools: {} installed, {} missing",
            checked,
            state.installed().len(),
            state.missing().len()
        );
        checked
    }

    fn resolve_on_search_path(&self, tool_name: &str) -> Option<PathBuf> {
        match &self.config.search_path {
            Some(path) => which::which_in(tool_name, Some(path), cwd()).ok(),
            None => which::which(tool_name).ok(),
        }
    }
}

fn cwd() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool_management::registry::{ToolCategory, ToolEntry};
    use std::fs;
    use tempfile::TempDir;

    fn make_executable(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    fn detector_for(dir: &Path) -> ToolDetector {
        ToolDetector::with_config(ToolDetectionConfig {
            search_path: Some(dir.as_os_str().to_owned()),
            extra_dirs: Vec::new(),
        })
    }

    #[test]
    fn test_detects_tool_on_search_path() {
        let temp = TempDir::new().unwrap();
        make_executable(temp.path(), "nmap");
        let detector = detector_for(temp.path());

        let status = detector.detect_tool("nmap");
        assert!(status.available);
        assert_eq!(status.installation_source, InstallationSource::SystemPath);
        assert!(!detector.is_available("masscan"));
    }

    #[test]
    fn test_extra_dirs_are_user_local() {
        let path_dir = TempDir::new().unwrap();
        let user_dir = TempDir::new().unwrap();
        make_executable(user_dir.path(), "ffuf");

        let detector = ToolDetector::with_config(ToolDetectionConfig {
            search_path: Some(path_dir.path().as_os_str().to_owned()),
            extra_dirs: vec![user_dir.path().to_path_buf()],
        });
        let status = detector.detect_tool("ffuf");
        assert!(status.available);
        assert_eq!(status.installation_source, InstallationSource::UserLocal);
    }

    #[test]
    fn test_check_is_idempotent() {
        let temp = TempDir::new().unwrap();
        make_executable(temp.path(), "nmap");
        let detector = detector_for(temp.path());
        let mut state = RunState::default();

        let first = (
            detector.check_tool("nmap", &mut state).available,
            detector.check_tool("hydra", &mut state).available,
        );
        let snapshot = state.clone();
        let second = (
            detector.check_tool("nmap", &mut state).available,
            detector.check_tool("hydra", &mut state).available,
        );

        assert_eq!(first, second);
        assert_eq!(snapshot, state);
    }

    #[test]
    fn test_check_all_partitions_registry() {
        let temp = TempDir::new().unwrap();
        make_executable(temp.path(), "nmap");
        make_executable(temp.path(), "john");
        let detector = detector_for(temp.path());

        let mut registry = ToolRegistry::empty();
        for name in ["nmap", "john", "hydra", "nikto"] {
            registry.register(ToolEntry::package(name, ToolCategory::Network, ""));
        }

        let mut state = RunState::default();
        let checked = detector.check_all(&registry, &mut state);

        assert_eq!(checked, 4);
        assert_eq!(state.installed().len() + state.missing().len(), checked);
        assert!(state.installed().is_disjoint(state.missing()));
        assert!(state.is_installed("nmap"));
        assert!(state.is_missing("hydra"));
    }
}
