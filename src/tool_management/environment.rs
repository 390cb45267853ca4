use crate::common::{CommandSpec, ProcessRunner};
use crate::error::{Result, SectoolError};
use log::{debug, info, warn};
use serde::Serialize;
use std::fmt;
use std::fs;

const OS_RELEASE_PATH: &str = "/etc/os-release";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OsKind {
    MacOs,
    Linux,
}

impl fmt::Display for OsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OsKind::MacOs => write!(f, "macOS"),
            OsKind::Linux => write!(f, "Linux"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum PackageManager {
    Apt,
    Dnf,
    Pacman,
    Zypper,
    Apk,
    Brew,
}

impl PackageManager {
    pub const ALL: [PackageManager; 6] = [
        PackageManager::Apt,
        PackageManager::Dnf,
        PackageManager::Pacman,
        PackageManager::Zypper,
        PackageManager::Apk,
        PackageManager::Brew,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PackageManager::Apt => "apt",
            PackageManager::Dnf => "dnf",
            PackageManager::Pacman => "pacman",
            PackageManager::Zypper => "zypper",
            PackageManager::Apk => "apk",
            PackageManager::Brew => "brew",
        }
    }

    /// Non-interactive install command for a single package, without `sudo`.
    pub fn install_command(&self, package: &str) -> CommandSpec {
        match self {
            PackageManager::Apt => CommandSpec::new("apt-get").args(["install", "-y", package]),
            PackageManager::Dnf => CommandSpec::new("dnf").args(["install", "-y", package]),
            PackageManager::Pacman => {
                CommandSpec::new("pacman").args(["-S", "--noconfirm", "--needed", package])
            }
            PackageManager::Zypper => {
                CommandSpec::new("zypper").args(["--non-interactive", "install", package])
            }
            PackageManager::Apk => CommandSpec::new("apk").args(["add", package]),
            PackageManager::Brew => CommandSpec::new("brew").args(["install", package]),
        }
    }

    /// Package index refresh, run once before a batch install.
    pub fn refresh_command(&self) -> CommandSpec {
        match self {
            PackageManager::Apt => CommandSpec::new("apt-get").arg("update"),
            PackageManager::Dnf => CommandSpec::new("dnf").arg("makecache"),
            PackageManager::Pacman => CommandSpec::new("pacman").arg("-Sy"),
            PackageManager::Zypper => CommandSpec::new("zypper").arg("refresh"),
            PackageManager::Apk => CommandSpec::new("apk").arg("update"),
            PackageManager::Brew => CommandSpec::new("brew").arg("update"),
        }
    }

    /// Homebrew refuses to run as root; every other manager needs it.
    pub fn needs_root(&self) -> bool {
        !matches!(self, PackageManager::Brew)
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fields of interest from an os-release file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: Option<String>,
    pub id_like: Vec<String>,
    pub pretty_name: Option<String>,
}

/// Parse os-release content. Handles both `KEY=value` and `KEY="value"`.
pub fn parse_os_release(content: &str) -> OsRelease {
    let field = |name: &str| -> Option<String> {
        content
            .lines()
            .map(str::trim)
            .find(|line| line.starts_with(&format!("{}=", name)))
            .and_then(|line| line.split_once('='))
            .map(|(_, value)| value.trim().trim_matches('"').trim_matches('\'').to_string())
            .filter(|value| !value.is_empty())
    };

    OsRelease {
        id: field("ID").map(|id| id.to_lowercase()),
        id_like: field("ID_LIKE")
            .map(|like| like.split_whitespace().map(str::to_lowercase).collect())
            .unwrap_or_default(),
        pretty_name: field("PRETTY_NAME"),
    }
}

fn package_manager_for_distro(id: &str) -> Option<PackageManager> {
    match id {
        "kali" | "parrot" | "debian" | "ubuntu" | "linuxmint" | "pop" => Some(PackageManager::Apt),
        "fedora" | "rhel" | "centos" | "rocky" | "almalinux" => Some(PackageManager::Dnf),
        "arch" | "manjaro" | "endeavouros" => Some(PackageManager::Pacman),
        "sles" | "suse" => Some(PackageManager::Zypper),
        id if id.starts_with("opensuse") => Some(PackageManager::Zypper),
        "alpine" => Some(PackageManager::Apk),
        _ => None,
    }
}

/// Facts about the host, detected once at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Environment {
    pub os: OsKind,
    pub distro_id: String,
    pub distro_name: String,
    pub package_manager: PackageManager,
    /// Set when the distribution was not recognised and apt was assumed.
    pub fallback: bool,
    pub is_root: bool,
}

impl Environment {
    /// Detect the running platform, reading `/etc/os-release` on Linux.
    pub fn detect() -> Result<Self> {
        let (platform, release) = Self::host_facts();
        Self::detect_from(platform, release.as_deref())
    }

    /// Platform identifier of this build and the host's os-release content.
    pub fn host_facts() -> (&'static str, Option<String>) {
        let platform = std::env::consts::OS;
        if platform != "linux" {
            return (platform, None);
        }
        match fs::read_to_string(OS_RELEASE_PATH) {
            Ok(content) => (platform, Some(content)),
            Err(e) => {
                debug!("Could not read {}: {}", OS_RELEASE_PATH, e);
                (platform, None)
            }
        }
    }

    /// Classify a platform identifier and optional os-release content.
    pub fn detect_from(platform: &str, os_release: Option<&str>) -> Result<Self> {
        match platform {
            "macos" => Ok(Self {
                os: OsKind::MacOs,
                distro_id: "macos".to_string(),
                distro_name: "macOS".to_string(),
                package_manager: PackageManager::Brew,
                fallback: false,
                is_root: false,
            }),
            "linux" => {
                let release = os_release.map(parse_os_release).unwrap_or_default();
                let distro_id = release.id.clone().unwrap_or_else(|| "unknown".to_string());

                let detected = std::iter::once(distro_id.as_str())
                    .chain(release.id_like.iter().map(String::as_str))
                    .find_map(package_manager_for_distro);

                let (package_manager, fallback) = match detected {
                    Some(pm) => (pm, false),
                    None => {
                        warn!(
                            "⚠️  Unknown Linux distribution '{}', falling back to apt",
                            distro_id
                        );
                        (PackageManager::Apt, true)
                    }
                };

                let distro_name = release
                    .pretty_name
                    .unwrap_or_else(|| format!("Linux ({})", distro_id));
                info!("Detected {} using {}", distro_name, package_manager);

                Ok(Self {
                    os: OsKind::Linux,
                    distro_id,
                    distro_name,
                    package_manager,
                    fallback,
                    is_root: false,
                })
            }
            other => Err(SectoolError::UnsupportedPlatform(other.to_string())),
        }
    }

    /// Record whether the process runs as root, asking `id -u`.
    pub fn with_privileges(mut self, runner: &dyn ProcessRunner) -> Self {
        self.is_root = match runner.run(&CommandSpec::new("id").arg("-u").capture_output()) {
            Ok(outcome) if outcome.success() => outcome.stdout.trim() == "0",
            Ok(_) | Err(_) => {
                debug!("Could not determine effective uid, assuming unprivileged");
                false
            }
        };
        self
    }

    /// Whether package installs on this host must go through `sudo`.
    pub fn use_sudo(&self) -> bool {
        self.os == OsKind::Linux && !self.is_root && self.package_manager.needs_root()
    }

    /// Distributions that ship security tooling and wordlists preinstalled.
    pub fn is_security_distro(&self) -> bool {
        matches!(self.distro_id.as_str(), "kali" | "parrot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::fake::ScriptedRunner;

    fn linux(release: &str) -> Environment {
        Environment::detect_from("linux", Some(release)).unwrap()
    }

    #[test]
    fn test_parse_os_release_quoted_and_unquoted() {
        let release = parse_os_release(
            "NAME=\"Kali GNU/Linux\"\nID=kali\nID_LIKE=debian\nPRETTY_NAME=\"Kali GNU/Linux Rolling\"\n",
        );
        assert_eq!(release.id.as_deref(), Some("kali"));
        assert_eq!(release.id_like, vec!["debian".to_string()]);
        assert_eq!(release.pretty_name.as_deref(), Some("Kali GNU/Linux Rolling"));
    }

    #[test]
    fn test_known_distributions_map_to_one_manager() {
        let cases = [
            ("kali", PackageManager::Apt),
            ("ubuntu", PackageManager::Apt),
            ("debian", PackageManager::Apt),
            ("fedora", PackageManager::Dnf),
            ("rocky", PackageManager::Dnf),
            ("arch", PackageManager::Pacman),
            ("manjaro", PackageManager::Pacman),
            ("opensuse-tumbleweed", PackageManager::Zypper),
            ("alpine", PackageManager::Apk),
        ];
        for (id, expected) in cases {
            let env = linux(&format!("ID={}\n", id));
            assert_eq!(env.package_manager, expected, "distro {}", id);
            assert!(!env.fallback);
        }
    }

    #[test]
    fn test_id_like_is_used_when_id_is_unknown() {
        let env = linux("ID=elementary\nID_LIKE=\"ubuntu debian\"\n");
        assert_eq!(env.package_manager, PackageManager::Apt);
        assert!(!env.fallback);

        let env = linux("ID=nobara\nID_LIKE=\"rhel fedora\"\n");
        assert_eq!(env.package_manager, PackageManager::Dnf);
    }

    #[test]
    fn test_unknown_distribution_falls_back_to_apt() {
        let env = linux("ID=gentoo\n");
        assert_eq!(env.package_manager, PackageManager::Apt);
        assert!(env.fallback);

        let env = Environment::detect_from("linux", None).unwrap();
        assert_eq!(env.distro_id, "unknown");
        assert!(env.fallback);
    }

    #[test]
    fn test_macos_uses_brew() {
        let env = Environment::detect_from("macos", None).unwrap();
        assert_eq!(env.os, OsKind::MacOs);
        assert_eq!(env.package_manager, PackageManager::Brew);
    }

    #[test]
    fn test_unsupported_platforms_are_errors() {
        for platform in ["windows", "freebsd", "openbsd", "android", ""] {
            let err = Environment::detect_from(platform, None).unwrap_err();
            assert!(matches!(err, SectoolError::UnsupportedPlatform(_)));
            assert_eq!(err.exit_code(), 1);
        }
    }

    #[test]
    fn test_privilege_detection_uses_id() {
        let root = ScriptedRunner::new().stdout_for("id -u", "0\n");
        let env = linux("ID=debian\n").with_privileges(&root);
        assert!(env.is_root);
        assert!(!env.use_sudo());

        let user = ScriptedRunner::new().stdout_for("id -u", "1000\n");
        let env = linux("ID=debian\n").with_privileges(&user);
        assert!(!env.is_root);
        assert!(env.use_sudo());
    }

    #[test]
    fn test_brew_never_uses_sudo() {
        let env = Environment::detect_from("macos", None).unwrap();
        assert!(!env.use_sudo());
    }

    #[test]
    fn test_security_distro() {
        assert!(linux("ID=kali\n").is_security_distro());
        assert!(linux("ID=parrot\n").is_security_distro());
        assert!(!linux("ID=ubuntu\n").is_security_distro());
    }
}
