use super::common::{InstallContext, InstallationUtils};
use crate::common::CommandSpec;
use crate::tool_management::environment::Environment;
use crate::tool_management::registry::PackageSpec;
use log::{info, warn};

/// Install command for `package` on this host, `sudo` included when needed.
pub fn package_install_command(env: &Environment, package: &str) -> CommandSpec {
    env.package_manager
        .install_command(package)
        .elevated(env.use_sudo())
}

/// Install a single package through the platform package manager.
pub fn install_package(ctx: &InstallContext<'_>, tool_name: &str, spec: &PackageSpec) -> bool {
    let package = spec.name_for(ctx.env.package_manager);
    info!(
        "🔧 Installing {} via {} (package {})...",
        tool_name, ctx.env.package_manager, package
    );

    let command = package_install_command(ctx.env, package);
    if InstallationUtils::execute_command(ctx.runner, &command) {
        info!("✅ {} installed successfully", tool_name);
        true
    } else {
        warn!(
            "❌ {} could not install {}; try manually: {}",
            ctx.env.package_manager, package, command
        );
        false
    }
}

/// Refresh the package index once before a batch of installs.
pub fn refresh_package_index(ctx: &InstallContext<'_>) -> bool {
    let command = ctx
        .env
        .package_manager
        .refresh_command()
        .elevated(ctx.env.use_sudo());
    info!("🔄 Refreshing {} package index...", ctx.env.package_manager);
    InstallationUtils::execute_command(ctx.runner, &command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::fake::ScriptedRunner;
    use crate::config::types::{InstallPaths, PathsConfig};
    use crate::tool_management::detector::ToolDetector;
    use crate::tool_management::environment::PackageManager;
    use std::path::Path;

    fn env(release: &str, root: bool) -> Environment {
        let mut env = Environment::detect_from("linux", Some(release)).unwrap();
        env.is_root = root;
        env
    }

    #[test]
    fn test_install_command_per_manager() {
        let cases = [
            ("ID=debian", "sudo apt-get install -y nmap"),
            ("ID=fedora", "sudo dnf install -y nmap"),
            ("ID=arch", "sudo pacman -S --noconfirm --needed nmap"),
            ("ID=opensuse-leap", "sudo zypper --non-interactive install nmap"),
            ("ID=alpine", "sudo apk add nmap"),
        ];
        for (release, expected) in cases {
            assert_eq!(package_install_command(&env(release, false), "nmap").to_string(), expected);
        }

        assert_eq!(
            package_install_command(&env("ID=debian", true), "nmap").to_string(),
            "apt-get install -y nmap"
        );
        let mac = Environment::detect_from("macos", None).unwrap();
        assert_eq!(package_install_command(&mac, "nmap").to_string(), "brew install nmap");
    }

    #[test]
    fn test_install_package_uses_override_and_exit_status() {
        let env = env("ID=fedora", true);
        let paths = InstallPaths::resolve(&PathsConfig::default(), Path::new("/root"), None);
        let detector = ToolDetector::new();
        let runner = ScriptedRunner::new().fail_on("dnf install -y zzzfake");
        let ctx = InstallContext {
            env: &env,
            runner: &runner,
            detector: &detector,
            paths: &paths,
        };

        let dig = PackageSpec::new("dnsutils").with_override(PackageManager::Dnf, "bind-utils");
        assert!(install_package(&ctx, "dig", &dig));
        assert!(!install_package(&ctx, "zzzfake", &PackageSpec::new("zzzfake")));
        assert_eq!(
            runner.calls(),
            vec![
                "dnf install -y bind-utils".to_string(),
                "dnf install -y zzzfake".to_string()
            ]
        );
    }
}
