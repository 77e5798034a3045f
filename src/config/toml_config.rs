use crate::utils::error::{Result, ToolDataError};
use crate::utils::validation::{validate_non_negative, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Buffers smaller than this (16 KiB) are not tracked individually.
pub const SMALL_BUFFER_SIZE: i64 = 16 * 1024;

/// Memory space color of HBM.
pub const HBM_MEMORY_COLOR: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryViewerConfig {
    pub small_buffer_size: i64,
    pub memory_color: i64,
}

impl Default for MemoryViewerConfig {
    fn default() -> Self {
        Self {
            small_buffer_size: SMALL_BUFFER_SIZE,
            memory_color: HBM_MEMORY_COLOR,
        }
    }
}

impl Validate for MemoryViewerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_negative("memory_viewer.small_buffer_size", self.small_buffer_size)?;
        validate_non_negative("memory_viewer.memory_color", self.memory_color)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub memory_viewer: MemoryViewerConfig,
}

impl ToolsConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ToolDataError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ToolDataError::config(format!("TOML parsing error: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl Validate for ToolsConfig {
    fn validate(&self) -> Result<()> {
        self.memory_viewer.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_table() {
        let config = ToolsConfig::from_toml_str("").unwrap();
        assert_eq!(config.memory_viewer.small_buffer_size, 16384);
        assert_eq!(config.memory_viewer.memory_color, 0);
    }

    #[test]
    fn test_partial_override() {
        let toml_content = r#"
[memory_viewer]
small_buffer_size = 1024
"#;

        let config = ToolsConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.memory_viewer.small_buffer_size, 1024);
        assert_eq!(config.memory_viewer.memory_color, HBM_MEMORY_COLOR);
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let toml_content = r#"
[memory_viewer]
small_buffer_size = -5
"#;

        assert!(ToolsConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[memory_viewer]\nmemory_color = 1\n")
            .unwrap();

        let config = ToolsConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.memory_viewer.memory_color, 1);
    }
}
