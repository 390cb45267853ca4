use super::common::{InstallContext, InstallationUtils};
use crate::common::CommandSpec;
use crate::tool_management::registry::{Ecosystem, LanguagePackage};
use log::{debug, info, warn};

/// Install a tool through its language ecosystem's package installer.
pub fn install_language_package(
    ctx: &InstallContext<'_>,
    tool_name: &str,
    package: &LanguagePackage,
) -> bool {
    match package.ecosystem {
        Ecosystem::Python => install_python_package(ctx, tool_name, &package.package),
        Ecosystem::Go => install_go_module(ctx, tool_name, &package.package),
        Ecosystem::Ruby => install_gem(ctx, tool_name, &package.package),
    }
}

fn install_python_package(ctx: &InstallContext<'_>, tool_name: &str, package: &str) -> bool {
    info!("🔧 Installing {} with a Python package installer...", tool_name);

    // Try different installation methods
    let install_commands = [
        ("pipx", vec!["install", package]),
        ("pip3", vec!["install", "--user", package]),
        ("pip", vec!["install", "--user", package]),
    ];

    for (cmd, args) in install_commands {
        if !ctx.detector.is_available(cmd) {
            debug!("{} not available, skipping", cmd);
            continue;
        }
        debug!("Trying installation command: {} {}", cmd, args.join(" "));

        if InstallationUtils::execute_command(ctx.runner, &CommandSpec::new(cmd).args(args)) {
            info!("✅ {} installed successfully using {}", tool_name, cmd);
            return true;
        }
    }

    warn!("📦 Failed to auto-install {}. Please install manually:", tool_name);
    warn!("   Option 1: pipx install {}", package);
    warn!("   Option 2: pip3 install --user {}", package);
    false
}

fn install_go_module(ctx: &InstallContext<'_>, tool_name: &str, module: &str) -> bool {
    info!("🔧 Installing {} with go install...", tool_name);

    let target = format!("{}@latest", module);
    let command = CommandSpec::new("go").args(["install", target.as_str()]);

    if InstallationUtils::execute_command(ctx.runner, &command) {
        info!("✅ {} installed successfully", tool_name);
        info!("💡 Note: Make sure ~/go/bin is in your PATH to use {}", tool_name);
        true
    } else {
        warn!("❌ Failed to install {}", tool_name);
        warn!("📦 Please install Go from https://go.dev/ first");
        false
    }
}

fn install_gem(ctx: &InstallContext<'_>, tool_name: &str, gem: &str) -> bool {
    info!("🔧 Installing {} with gem...", tool_name);

    let command = CommandSpec::new("gem")
        .args(["install", gem])
        .elevated(ctx.env.use_sudo());

    if InstallationUtils::execute_command(ctx.runner, &command) {
        info!("✅ {} installed successfully", tool_name);
        true
    } else {
        warn!("❌ Failed to install {}; Ruby and its headers are required", tool_name);
        false
    }
}
