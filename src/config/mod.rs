pub mod toml_config;

pub use toml_config::{MemoryViewerConfig, ToolsConfig, HBM_MEMORY_COLOR, SMALL_BUFFER_SIZE};

#[cfg(feature = "cli")]
use crate::domain::options::{ToolOptions, HLO_MODULE_NAME_KEY};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "hlo-tools")]
#[command(about = "Convert a profiled HLO module into tool data JSON")]
pub struct CliConfig {
    /// XSpace files of the profile; the module dump is looked up next to the first one.
    #[arg(long, value_delimiter = ',', required = true)]
    pub xspace_paths: Vec<String>,

    #[arg(long, default_value = "memory_viewer")]
    pub tool: String,

    #[arg(long)]
    pub hlo_module_name: String,

    /// TOML file with a `[memory_viewer]` table.
    #[arg(long)]
    pub config: Option<String>,

    /// Write JSON here instead of stdout.
    #[arg(long)]
    pub output: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn tool_options(&self) -> ToolOptions {
        let mut options = ToolOptions::new();
        options.insert(
            HLO_MODULE_NAME_KEY.to_string(),
            self.hlo_module_name.clone().into(),
        );
        options
    }

    pub fn tools_config(&self) -> Result<ToolsConfig> {
        match &self.config {
            Some(path) => ToolsConfig::from_file(path),
            None => Ok(ToolsConfig::default()),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        for path in &self.xspace_paths {
            validate_path("xspace_paths", path)?;
        }
        validate_non_empty_string(HLO_MODULE_NAME_KEY, &self.hlo_module_name)?;
        if let Some(output) = &self.output {
            validate_path("output", output)?;
        }
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cli() {
        let config = CliConfig::parse_from([
            "hlo-tools",
            "--xspace-paths",
            "/tmp/run/a.xplane.pb,/tmp/run/b.xplane.pb",
            "--hlo-module-name",
            "main_module",
        ]);

        assert_eq!(config.xspace_paths.len(), 2);
        assert_eq!(config.tool, "memory_viewer");
        assert!(config.validate().is_ok());
        assert_eq!(
            config.tool_options()[HLO_MODULE_NAME_KEY].as_str(),
            Some("main_module")
        );
    }

    #[test]
    fn test_empty_module_name_invalid() {
        let config = CliConfig::parse_from([
            "hlo-tools",
            "--xspace-paths",
            "/tmp/run/a.xplane.pb",
            "--hlo-module-name",
            "",
        ]);
        assert!(config.validate().is_err());
    }
}
