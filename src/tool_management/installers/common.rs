use crate::common::{CommandSpec, ProcessRunner};
use crate::config::types::InstallPaths;
use crate::tool_management::detector::ToolDetector;
use crate::tool_management::environment::Environment;
use log::{debug, info, warn};
use std::fs;
use std::path::Path;

/// Everything an installation strategy needs from the running session.
#[derive(Clone, Copy)]
pub struct InstallContext<'a> {
    pub env: &'a Environment,
    pub runner: &'a dyn ProcessRunner,
    pub detector: &'a ToolDetector,
    pub paths: &'a InstallPaths,
}

/// Common utilities for tool installation
pub struct InstallationUtils;

impl InstallationUtils {
    /// Execute a command and return whether it exited successfully.
    ///
    /// A program that cannot be started counts as a failure.
    pub fn execute_command(runner: &dyn ProcessRunner, command: &CommandSpec) -> bool {
        debug!("Executing command: {}", command);

        match runner.run(command) {
            Ok(outcome) if outcome.success() => {
                info!("✅ Command executed successfully: {}", command);
                true
            }
            Ok(outcome) => {
                let stderr = outcome.stderr.trim();
                if stderr.is_empty() {
                    warn!("❌ Command failed ({:?}): {}", outcome.code, command);
                } else {
                    warn!("❌ Command failed: {} - {}", command, stderr);
                }
                false
            }
            Err(e) => {
                warn!("❌ Could not run {}: {}", command, e);
                false
            }
        }
    }

    /// Create directory if it doesn't exist
    pub fn ensure_dir_exists(path: &Path) -> bool {
        if path.exists() {
            return true;
        }
        match fs::create_dir_all(path) {
            Ok(()) => {
                info!("Created directory: {}", path.display());
                true
            }
            Err(e) => {
                warn!("❌ Failed to create {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Symlink `target` into `bin_dir` as `name`, replacing an existing link.
    pub fn link_into_bin(target: &Path, bin_dir: &Path, name: &str) -> bool {
        if !Self::ensure_dir_exists(bin_dir) {
            return false;
        }
        let link = bin_dir.join(name);
        if (link.exists() || link.is_symlink())
            && let Err(e) = fs::remove_file(&link)
        {
            warn!("❌ Failed to replace {}: {}", link.display(), e);
            return false;
        }

        match symlink(target, &link) {
            Ok(()) => {
                info!("🔗 Linked {} -> {}", link.display(), target.display());
                true
            }
            Err(e) => {
                warn!("❌ Failed to link {}: {}", link.display(), e);
                false
            }
        }
    }

    /// Copy a built binary into `bin_dir` as `name`, keeping it executable.
    pub fn copy_into_bin(binary: &Path, bin_dir: &Path, name: &str) -> bool {
        if !Self::ensure_dir_exists(bin_dir) {
            return false;
        }
        let destination = bin_dir.join(name);
        match fs::copy(binary, &destination) {
            Ok(_) => {
                Self::make_executable(&destination);
                info!("📦 Copied {} to {}", binary.display(), destination.display());
                true
            }
            Err(e) => {
                warn!("❌ Failed to copy {}: {}", binary.display(), e);
                false
            }
        }
    }

    pub fn make_executable(path: &Path) -> bool {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let result = fs::metadata(path).and_then(|meta| {
                let mut permissions = meta.permissions();
                permissions.set_mode(permissions.mode() | 0o755);
                fs::set_permissions(path, permissions)
            });
            if let Err(e) = result {
                warn!("❌ Failed to mark {} executable: {}", path.display(), e);
                return false;
            }
        }
        true
    }
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn symlink(target: &Path, link: &Path) -> std::io::Result<()> {
    fs::copy(target, link).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::fake::ScriptedRunner;
    use tempfile::TempDir;

    #[test]
    fn test_execute_command_maps_outcomes() {
        let runner = ScriptedRunner::new()
            .fail_on("apt-get install -y broken")
            .unavailable("pipx");

        let ok = CommandSpec::new("apt-get").args(["install", "-y", "nmap"]);
        let failed = CommandSpec::new("apt-get").args(["install", "-y", "broken"]);
        let missing = CommandSpec::new("pipx").args(["install", "sslyze"]);

        assert!(InstallationUtils::execute_command(&runner, &ok));
        assert!(!InstallationUtils::execute_command(&runner, &failed));
        assert!(!InstallationUtils::execute_command(&runner, &missing));
        assert_eq!(runner.calls().len(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_link_into_bin_replaces_existing_link() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        let first = temp.path().join("first.sh");
        let second = temp.path().join("second.sh");
        fs::write(&first, "one").unwrap();
        fs::write(&second, "two").unwrap();

        assert!(InstallationUtils::link_into_bin(&first, &bin, "tool"));
        assert!(InstallationUtils::link_into_bin(&second, &bin, "tool"));
        assert_eq!(fs::read_link(bin.join("tool")).unwrap(), second);
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_into_bin_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let binary = temp.path().join("massdns");
        fs::write(&binary, "bin").unwrap();
        let bin = temp.path().join("bin");

        assert!(InstallationUtils::copy_into_bin(&binary, &bin, "massdns"));
        let mode = fs::metadata(bin.join("massdns")).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}
