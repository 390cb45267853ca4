use crate::cli::{Commands, OutputFormat};
use crate::common::ProcessRunner;
use crate::config::types::{Config, InstallConfig, InstallPaths};
use crate::error::{Result, SectoolError};
use crate::report;
use crate::setup::{self, WordlistOutcome};
use crate::tool_management::installers::InstallContext;
use crate::tool_management::{
    BatchOutcome, Environment, RunState, ToolCategory, ToolDetectionConfig, ToolDetector,
    ToolInstaller, ToolRegistry, ToolStatusReporter,
};
use colored::Colorize;
use log::{info, warn};

/// Detect the platform and privileges. Fails before any command runs when
/// the platform is unsupported.
pub fn bootstrap_environment(
    platform: &str,
    os_release: Option<&str>,
    runner: &dyn ProcessRunner,
) -> Result<Environment> {
    let env = Environment::detect_from(platform, os_release)?;
    Ok(env.with_privileges(runner))
}

/// Detect the host this binary runs on.
pub fn bootstrap_host(runner: &dyn ProcessRunner) -> Result<Environment> {
    let (platform, release) = Environment::host_facts();
    bootstrap_environment(platform, release.as_deref(), runner)
}

/// Ask whether to continue without root. `prompt` is only called when needed.
pub fn confirm_privileges(
    env: &Environment,
    assume_yes: bool,
    prompt: impl FnOnce() -> Result<bool>,
) -> Result<()> {
    if env.is_root || !env.use_sudo() || assume_yes {
        return Ok(());
    }

    println!(
        "{} {}",
        "⚠".yellow(),
        "Not running as root: package installs will use sudo and may prompt for a password."
            .yellow()
    );
    if prompt()? {
        Ok(())
    } else {
        Err(SectoolError::PrivilegesDeclined)
    }
}

/// State for one program run: environment facts, registry and accumulators.
pub struct Session<'r> {
    pub env: Environment,
    pub paths: InstallPaths,
    pub registry: ToolRegistry,
    pub detector: ToolDetector,
    pub state: RunState,
    /// Set once a full check pass has run.
    checked: bool,
    install: InstallConfig,
    runner: &'r dyn ProcessRunner,
}

impl<'r> Session<'r> {
    /// Build a session from the loaded configuration and the user's home.
    pub fn new(env: Environment, config: &Config, runner: &'r dyn ProcessRunner) -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            SectoolError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "could not determine home directory",
            ))
        })?;
        let shell = std::env::var("SHELL").ok();
        let paths = InstallPaths::resolve(&config.paths, &home, shell.as_deref());
        let detector = ToolDetector::with_config(ToolDetectionConfig::with_user_dirs(&paths.bin_dir));
        let registry = ToolRegistry::builtin().without(&config.install.disabled_tools);

        Ok(Self::with_parts(
            env,
            paths,
            registry,
            detector,
            config.install.clone(),
            runner,
        ))
    }

    pub fn with_parts(
        env: Environment,
        paths: InstallPaths,
        registry: ToolRegistry,
        detector: ToolDetector,
        install: InstallConfig,
        runner: &'r dyn ProcessRunner,
    ) -> Self {
        Self {
            env,
            paths,
            registry,
            detector,
            state: RunState::default(),
            checked: false,
            install,
            runner,
        }
    }

    fn context(&self) -> InstallContext<'_> {
        InstallContext {
            env: &self.env,
            runner: self.runner,
            detector: &self.detector,
            paths: &self.paths,
        }
    }

    /// Split borrows so the installer can update the accumulators.
    fn installer_parts(&mut self) -> (ToolInstaller<'_>, &ToolRegistry, &mut RunState) {
        let ctx = InstallContext {
            env: &self.env,
            runner: self.runner,
            detector: &self.detector,
            paths: &self.paths,
        };
        let mut installer = ToolInstaller::new(ctx);
        if !self.install.refresh_package_index {
            installer = installer.without_index_refresh();
        }
        (installer, &self.registry, &mut self.state)
    }

    /// Check every registry tool. Returns the number checked.
    pub fn check_tools(&mut self) -> usize {
        self.checked = true;
        self.detector.check_all(&self.registry, &mut self.state)
    }

    pub fn print_status(&self, format: OutputFormat) {
        let reporter = ToolStatusReporter::new(&self.registry, &self.state);
        match format {
            OutputFormat::Table => reporter.print_console_report(),
            OutputFormat::Json => match serde_json::to_string_pretty(&reporter.to_json()) {
                Ok(json) => println!("{}", json),
                Err(e) => warn!("Failed to render JSON status: {}", e),
            },
        }
    }

    /// Install every missing tool, running a check first if none has run.
    pub fn install_missing(&mut self) -> BatchOutcome {
        if !self.checked {
            self.check_tools();
        }
        let (installer, registry, state) = self.installer_parts();
        let outcome = installer.install_missing(registry, state);

        if outcome.attempted == 0 {
            println!("{} All tools are already installed", "✅".green());
        } else {
            println!(
                "{} {} installed, {} failed",
                "🛠️ ".bold(),
                outcome.succeeded.len().to_string().green(),
                outcome.failed.len().to_string().red()
            );
        }
        outcome
    }

    /// Install one tool by name, whether or not it is currently missing.
    pub fn install_tool(&mut self, name: &str) -> bool {
        let (installer, registry, state) = self.installer_parts();
        let installed = installer.install_by_name(registry, name, state);
        if installed {
            println!("{} {} installed", "✅".green(), name);
        } else {
            println!("{} {} could not be installed", "❌".red(), name);
        }
        installed
    }

    pub fn install_wordlists(&self) -> WordlistOutcome {
        let outcome = setup::install_wordlists(&self.context(), &self.install.seclists_url);
        if outcome.is_success() {
            println!("{} Wordlists ready in {}", "✅".green(), self.paths.wordlist_dir.display());
        } else {
            println!("{} Some wordlists could not be installed", "❌".red());
        }
        outcome
    }

    /// Append the environment block to the shell startup file.
    pub fn setup_environment(&self) -> Result<bool> {
        let written = setup::setup_shell_environment(&self.paths)?;
        if written {
            println!(
                "{} Environment added to {}; run 'source {}' to load it",
                "✅".green(),
                self.paths.shell_rc.display(),
                self.paths.shell_rc.display()
            );
        } else {
            println!(
                "{} Environment already configured in {}",
                "ℹ".blue(),
                self.paths.shell_rc.display()
            );
        }
        Ok(written)
    }

    pub fn write_report(&self) -> Result<String> {
        report::generate_report(&self.env, &self.state, &self.paths)
    }

    /// Check, install missing tools, wordlists and environment, then report.
    pub fn run_everything(&mut self) -> Result<()> {
        info!("Running full setup");
        self.check_tools();
        self.print_status(OutputFormat::Table);
        self.install_missing();
        self.install_wordlists();
        self.setup_environment()?;
        self.write_report()?;
        Ok(())
    }

    pub fn print_registry(&self) {
        println!("📋 Registered tools ({})", self.registry.len());
        for category in ToolCategory::ALL {
            let tools: Vec<_> = self.registry.in_category(category).collect();
            if tools.is_empty() {
                continue;
            }
            println!("\n{}", category.label().bold());
            for tool in tools {
                println!(
                    "  {:<14} {:<40} {}",
                    tool.name,
                    tool.description,
                    tool.directive.to_string().dimmed()
                );
            }
        }
    }
}

/// Run a non-interactive subcommand.
pub fn handle_command(session: &mut Session<'_>, command: Commands) -> Result<()> {
    match command {
        Commands::Check { format } => {
            session.check_tools();
            session.print_status(format);
        }
        Commands::InstallMissing => {
            session.install_missing();
            session.print_status(OutputFormat::Table);
        }
        Commands::Install { tool } => {
            session.install_tool(&tool);
        }
        Commands::Wordlists => {
            session.install_wordlists();
        }
        Commands::SetupEnv => {
            session.setup_environment()?;
        }
        Commands::All => session.run_everything()?,
        Commands::List => session.print_registry(),
        Commands::Report => {
            session.check_tools();
            session.write_report()?;
        }
    }
    Ok(())
}
