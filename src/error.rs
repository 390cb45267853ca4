use thiserror::Error;

#[derive(Debug, Error)]
pub enum SectoolError {
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("Not running with root privileges and the user chose not to continue")]
    PrivilegesDeclined,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Prompt failed: {0}")]
    Prompt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    ReadFailed { path: String, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    ParsingFailed { path: String, reason: String },
}

impl SectoolError {
    /// Process exit code for an error that reaches `main`.
    ///
    /// Per-tool install failures never surface as errors, so everything that
    /// does reach `main` is fatal for the run.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<inquire::InquireError> for SectoolError {
    fn from(err: inquire::InquireError) -> Self {
        SectoolError::Prompt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SectoolError>;
