//! # Tool Installation Strategies
//!
//! One module per installation method: distribution packages, source
//! repositories, language package installers and hardcoded special cases.

pub mod common;
pub mod language;
pub mod package;
pub mod source;
pub mod special;

pub use common::{InstallContext, InstallationUtils};
pub use language::install_language_package;
pub use package::{install_package, package_install_command, refresh_package_index};
pub use source::{install_from_source, sync_repository};
pub use special::install_special;
