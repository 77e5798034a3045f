pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{MemoryViewerConfig, ToolsConfig};
pub use core::tool_data::{
    convert_hlo_proto_to_tool_data, convert_hlo_proto_to_tool_data_pair,
    convert_hlo_proto_to_tool_data_with_config, ToolKind,
};
pub use domain::memory_viewer::PreprocessResult;
pub use domain::options::{ToolOption, ToolOptions};
pub use utils::error::{ErrorKind, Result, ToolDataError};
