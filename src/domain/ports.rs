use crate::config::ToolsConfig;
use crate::domain::hlo::HloProto;
use crate::utils::error::Result;

/// A tool that renders a loaded HLO module into the JSON its front end reads.
/// Each converter reads its own table from `config`.
pub trait ToolConverter: Send + Sync {
    fn tool_name(&self) -> &'static str;
    fn convert(&self, hlo_proto: &HloProto, config: &ToolsConfig) -> Result<String>;
}
