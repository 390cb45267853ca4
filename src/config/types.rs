use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub install: InstallConfig,
}

/// Filesystem locations. Unset entries resolve relative to the home directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bin_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wordlist_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shell_rc: Option<PathBuf>,
}

/// Installation behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallConfig {
    /// Tools removed from the registry for this host
    pub disabled_tools: Vec<String>,
    /// Refresh the package index once before installing missing tools
    pub refresh_package_index: bool,
    pub seclists_url: String,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            disabled_tools: Vec::new(),
            refresh_package_index: true,
            seclists_url: "https://github.com/danielmiessler/SecLists.git".to_string(),
        }
    }
}

/// Fully resolved locations used by installers, setup and the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    /// Source clones live here, one directory per repository
    pub install_dir: PathBuf,
    /// Built binaries and script links
    pub bin_dir: PathBuf,
    pub wordlist_dir: PathBuf,
    pub report_path: PathBuf,
    pub shell_rc: PathBuf,
}

impl InstallPaths {
    /// Resolve configured paths against `home`, picking the shell startup
    /// file from the `$SHELL` value when not configured.
    pub fn resolve(config: &PathsConfig, home: &Path, shell: Option<&str>) -> Self {
        Self {
            install_dir: config
                .install_dir
                .clone()
                .unwrap_or_else(|| home.join("tools")),
            bin_dir: config
                .bin_dir
                .clone()
                .unwrap_or_else(|| home.join(".local").join("bin")),
            wordlist_dir: config
                .wordlist_dir
                .clone()
                .unwrap_or_else(|| home.join("wordlists")),
            report_path: config
                .report_path
                .clone()
                .unwrap_or_else(|| home.join("security-tools-report.txt")),
            shell_rc: config
                .shell_rc
                .clone()
                .unwrap_or_else(|| default_shell_rc(home, shell)),
        }
    }
}

fn default_shell_rc(home: &Path, shell: Option<&str>) -> PathBuf {
    match shell.and_then(|s| Path::new(s).file_name()).and_then(|n| n.to_str()) {
        Some("zsh") => home.join(".zshrc"),
        _ => home.join(".bashrc"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve_under_home() {
        let home = Path::new("/home/tester");
        let paths = InstallPaths::resolve(&PathsConfig::default(), home, Some("/bin/bash"));
        assert_eq!(paths.install_dir, home.join("tools"));
        assert_eq!(paths.bin_dir, home.join(".local/bin"));
        assert_eq!(paths.wordlist_dir, home.join("wordlists"));
        assert_eq!(paths.report_path, home.join("security-tools-report.txt"));
        assert_eq!(paths.shell_rc, home.join(".bashrc"));
    }

    #[test]
    fn test_shell_rc_follows_shell() {
        let home = Path::new("/home/tester");
        let zsh = InstallPaths::resolve(&PathsConfig::default(), home, Some("/usr/bin/zsh"));
        assert_eq!(zsh.shell_rc, home.join(".zshrc"));

        let unknown = InstallPaths::resolve(&PathsConfig::default(), home, None);
        assert_eq!(unknown.shell_rc, home.join(".bashrc"));
    }

    #[test]
    fn test_configured_paths_win() {
        let config = PathsConfig {
            install_dir: Some(PathBuf::from("/opt/tools")),
            report_path: Some(PathBuf::from("/tmp/report.txt")),
            ..PathsConfig::default()
        };
        let paths = InstallPaths::resolve(&config, Path::new("/root"), None);
        assert_eq!(paths.install_dir, PathBuf::from("/opt/tools"));
        assert_eq!(paths.report_path, PathBuf::from("/tmp/report.txt"));
        assert_eq!(paths.bin_dir, PathBuf::from("/root/.local/bin"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [install]
            disabled_tools = ["hashcat"]
            "#,
        )
        .unwrap();
        assert_eq!(config.install.disabled_tools, vec!["hashcat".to_string()]);
        assert!(config.install.refresh_package_index);
        assert!(config.paths.install_dir.is_none());
    }
}
