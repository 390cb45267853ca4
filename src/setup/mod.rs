//! Wordlist downloads and shell environment configuration.

pub mod shell_env;
pub mod wordlists;

pub use shell_env::{append_environment_block, environment_block, setup_shell_environment};
pub use wordlists::{BundledWordlists, ExternalWordlists, WordlistOutcome, install_wordlists};
