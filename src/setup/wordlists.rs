use crate::common::CommandSpec;
use crate::tool_management::environment::PackageManager;
use crate::tool_management::installers::{
    InstallContext, InstallationUtils, package_install_command,
};
use log::{info, warn};
use std::path::PathBuf;

const BUNDLED_WORDLIST_PACKAGE: &str = "wordlists";
const SECLISTS_DIR: &str = "SecLists";

/// What happened to the distribution wordlist package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundledWordlists {
    Installed,
    /// Ships with the distribution.
    Preinstalled,
    /// No such package for this package manager.
    Unavailable,
    Failed,
}

/// What happened to the SecLists clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExternalWordlists {
    Downloaded(PathBuf),
    AlreadyPresent(PathBuf),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordlistOutcome {
    pub bundled: BundledWordlists,
    pub seclists: ExternalWordlists,
}

impl WordlistOutcome {
    pub fn is_success(&self) -> bool {
        self.bundled != BundledWordlists::Failed && self.seclists != ExternalWordlists::Failed
    }
}

/// Install the distribution wordlists and fetch SecLists when absent.
pub fn install_wordlists(ctx: &InstallContext<'_>, seclists_url: &str) -> WordlistOutcome {
    println!("📚 Installing wordlists...");
    WordlistOutcome {
        bundled: install_bundled(ctx),
        seclists: fetch_seclists(ctx, seclists_url),
    }
}

fn install_bundled(ctx: &InstallContext<'_>) -> BundledWordlists {
    if ctx.env.is_security_distro() {
        info!("Bundled wordlists ship with {}, skipping", ctx.env.distro_name);
        return BundledWordlists::Preinstalled;
    }
    if ctx.env.package_manager != PackageManager::Apt {
        info!(
            "No '{}' package for {}, skipping bundled wordlists",
            BUNDLED_WORDLIST_PACKAGE, ctx.env.package_manager
        );
        return BundledWordlists::Unavailable;
    }

    let command = package_install_command(ctx.env, BUNDLED_WORDLIST_PACKAGE);
    if InstallationUtils::execute_command(ctx.runner, &command) {
        BundledWordlists::Installed
    } else {
        warn!("❌ Failed to install the '{}' package", BUNDLED_WORDLIST_PACKAGE);
        BundledWordlists::Failed
    }
}

fn fetch_seclists(ctx: &InstallContext<'_>, url: &str) -> ExternalWordlists {
    let target = ctx.paths.wordlist_dir.join(SECLISTS_DIR);
    if target.exists() {
        info!("SecLists already present at {}", target.display());
        return ExternalWordlists::AlreadyPresent(target);
    }
    if !InstallationUtils::ensure_dir_exists(&ctx.paths.wordlist_dir) {
        return ExternalWordlists::Failed;
    }

    info!("⬇️  Cloning SecLists into {} (large download)", target.display());
    let command = CommandSpec::new("git")
        .args(["clone", "--depth", "1", url])
        .arg(target.to_string_lossy());
    if InstallationUtils::execute_command(ctx.runner, &command) {
        ExternalWordlists::Downloaded(target)
    } else {
        ExternalWordlists::Failed
    }
}
