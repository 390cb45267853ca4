//! # Tool Management Module
//!
//! Handles environment detection, the tool registry, and detection and
//! installation of the security tools it lists.

pub mod detector;
pub mod environment;
pub mod installer;
pub mod installers;
pub mod registry;
pub mod status;

pub use detector::{InstallationSource, ToolDetectionConfig, ToolDetector, ToolStatus};
pub use environment::{Environment, OsKind, PackageManager};
pub use installer::{BatchOutcome, ToolInstaller};
pub use registry::{InstallDirective, ToolCategory, ToolEntry, ToolRegistry};
pub use status::{RunState, ToolStatusReporter};
