use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sectool")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check, install and report on security assessment tools")]
#[command(long_about = "Detects the host platform and package manager, checks which security assessment tools are available, and installs missing ones through the package manager, source repositories or language package installers. Without a subcommand an interactive menu is shown.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Continue without root privileges instead of asking
    #[arg(short, long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check which registry tools are installed
    Check {
        /// Output format
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Install every missing tool
    InstallMissing,

    /// Install a single tool by name
    Install {
        /// Tool name as listed by `sectool list`
        #[arg(value_name = "TOOL")]
        tool: String,
    },

    /// Install bundled wordlists and download SecLists
    Wordlists,

    /// Add tool paths to the shell startup file
    SetupEnv,

    /// Check, install missing tools, wordlists and environment, then report
    All,

    /// Show the tool registry
    List,

    /// Check tools and write the text report
    Report,
}

impl Commands {
    /// Commands that never install anything and need no privilege prompt.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Commands::Check { .. } | Commands::List | Commands::Report)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
