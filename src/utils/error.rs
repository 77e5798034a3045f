use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolDataError {
    #[error("Missing input: {message}")]
    MissingInput { message: String },

    #[error("Invalid option `{key}`: {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("Failed to read HLO proto {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode HLO proto {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: prost::DecodeError,
    },

    #[error("Can not find tool: {name}. Please update to the latest version of the profiler tools.")]
    UnknownTool { name: String },

    #[error("Failed to convert HLO proto to memory viewer result: {message}")]
    Preprocess { message: String },

    #[error("Failed to convert memory viewer result to JSON format: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Coarse failure class, as seen by callers that only care about the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Load,
    UnknownTool,
    Analysis,
    Serialization,
    Config,
}

impl ToolDataError {
    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::MissingInput {
            message: message.into(),
        }
    }

    pub fn preprocess(message: impl Into<String>) -> Self {
        Self::Preprocess {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingInput { .. } | Self::InvalidOption { .. } => ErrorKind::InvalidInput,
            Self::Io { .. } | Self::Decode { .. } => ErrorKind::Load,
            Self::UnknownTool { .. } => ErrorKind::UnknownTool,
            Self::Preprocess { .. } => ErrorKind::Analysis,
            Self::Serialization(_) => ErrorKind::Serialization,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Short hint printed by the CLI next to the error.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self.kind() {
            ErrorKind::InvalidInput => "Pass at least one xspace path and a non-empty --hlo-module-name",
            ErrorKind::Load => "Check that the .hlo_proto.pb file was dumped next to the xplane file",
            ErrorKind::UnknownTool => "Supported tools: memory_viewer",
            ErrorKind::Analysis => "The module's buffer assignment is incomplete or inconsistent",
            ErrorKind::Serialization => "Report this as a bug",
            ErrorKind::Config => "Fix the TOML configuration file",
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolDataError>;
