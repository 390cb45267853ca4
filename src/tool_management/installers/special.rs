use super::common::{InstallContext, InstallationUtils};
use super::package::package_install_command;
use crate::common::CommandSpec;
use crate::tool_management::environment::OsKind;
use crate::tool_management::registry::SpecialCase;
use log::{info, warn};

const MSF_INSTALLER_URL: &str = "https://raw.githubusercontent.com/rapid7/metasploit-omnibus/master/config/templates/metasploit-framework-wrappers/msfupdate.erb";

pub fn install_special(ctx: &InstallContext<'_>, tool_name: &str, case: SpecialCase) -> bool {
    match case {
        SpecialCase::Metasploit => install_metasploit(ctx, tool_name),
    }
}

/// Metasploit ships as a cask on macOS and a distribution package on
/// security distributions; everywhere else the omnibus installer is used.
fn install_metasploit(ctx: &InstallContext<'_>, tool_name: &str) -> bool {
    info!("🔧 Installing Metasploit Framework ({})...", tool_name);

    let installed = if ctx.env.os == OsKind::MacOs {
        let command = CommandSpec::new("brew").args(["install", "--cask", "metasploit"]);
        InstallationUtils::execute_command(ctx.runner, &command)
    } else if ctx.env.is_security_distro() {
        let command = package_install_command(ctx.env, "metasploit-framework");
        InstallationUtils::execute_command(ctx.runner, &command)
    } else {
        install_metasploit_omnibus(ctx)
    };

    if installed {
        info!("✅ Metasploit Framework installed successfully");
        info!("💡 Run 'msfdb init' to set up the database");
    } else {
        warn!("❌ Metasploit installation failed");
        warn!("   See https://docs.metasploit.com/docs/using-metasploit/getting-started/nightly-installers.html");
    }
    installed
}

fn install_metasploit_omnibus(ctx: &InstallContext<'_>) -> bool {
    let script = std::env::temp_dir().join("msfinstall");
    let script_arg = script.to_string_lossy().into_owned();

    info!("🐧 Downloading the Metasploit omnibus installer...");
    let steps = [
        CommandSpec::new("curl").args(["-fsSL", MSF_INSTALLER_URL, "-o", script_arg.as_str()]),
        CommandSpec::new("chmod").args(["755", script_arg.as_str()]),
        CommandSpec::new(script_arg.as_str()).elevated(ctx.env.use_sudo()),
    ];

    steps
        .iter()
        .all(|step| InstallationUtils::execute_command(ctx.runner, step))
}
