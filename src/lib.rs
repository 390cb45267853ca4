//! # sectool
//!
//! A command-line application that prepares a host for security assessment
//! work: it detects the platform and package manager, checks which tools
//! from a fixed registry are available, installs the missing ones, fetches
//! wordlists, configures the shell environment and writes a text report.
//!
//! ## Features
//!
//! - **Environment Detection**: macOS (Homebrew) and the major Linux families
//! - **Tool Checks**: resolves each registry tool on the search path
//! - **Installation Strategies**: distribution packages, source repositories,
//!   language package installers and special cases such as Metasploit
//! - **Reporting**: installed, missing and failed tools in one summary
//!
//! ## Example
//!
//! ```rust,no_run
//! use sectool::common::SystemRunner;
//! use sectool::tool_management::{Environment, RunState, ToolDetector, ToolRegistry};
//!
//! # fn main() -> sectool::Result<()> {
//! let env = Environment::detect()?.with_privileges(&SystemRunner);
//! let registry = ToolRegistry::builtin();
//! let mut state = RunState::default();
//! ToolDetector::new().check_all(&registry, &mut state);
//! println!("{} on {}: {} missing", env.distro_name, env.package_manager, state.missing().len());
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod common;
pub mod config;
pub mod error;
pub mod handlers;
pub mod report;
pub mod setup;
pub mod tool_management;

// Re-export commonly used types and functions
pub use error::{Result, SectoolError};
pub use handlers::{Session, handle_command, run_menu};

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
