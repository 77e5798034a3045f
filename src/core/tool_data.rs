use crate::config::ToolsConfig;
use crate::core::hlo_loader::{hlo_proto_file_name, read_hlo_proto, xspace_base_dir};
use crate::core::memory_viewer::{MemoryViewerConverter, MEMORY_VIEWER_TOOL};
use crate::domain::options::{hlo_module_name, ToolOptions};
use crate::domain::ports::ToolConverter;
use crate::utils::error::{Result, ToolDataError};
use crate::utils::validation::Validate;
use std::str::FromStr;

/// Tools that render from an HLO module. Names match exactly, no case folding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    MemoryViewer,
}

impl ToolKind {
    pub const ALL: [ToolKind; 1] = [ToolKind::MemoryViewer];

    pub fn converter(self) -> &'static dyn ToolConverter {
        match self {
            ToolKind::MemoryViewer => &MemoryViewerConverter,
        }
    }
}

impl FromStr for ToolKind {
    type Err = ToolDataError;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.converter().tool_name() == name)
            .ok_or_else(|| ToolDataError::UnknownTool {
                name: name.to_string(),
            })
    }
}

/// Converts the HLO module named in `options` into `tool_name`'s JSON.
///
/// The module is read from `<dir of xspace_paths[0]>/<name>.hlo_proto.pb`.
/// Every failure is logged here once and returned to the caller.
pub fn convert_hlo_proto_to_tool_data(
    xspace_paths: &[String],
    tool_name: &str,
    options: &ToolOptions,
) -> Result<String> {
    convert_hlo_proto_to_tool_data_with_config(
        xspace_paths,
        tool_name,
        options,
        &ToolsConfig::default(),
    )
}

/// Like [`convert_hlo_proto_to_tool_data`] with explicit tool settings,
/// which are validated before anything is read.
pub fn convert_hlo_proto_to_tool_data_with_config(
    xspace_paths: &[String],
    tool_name: &str,
    options: &ToolOptions,
    config: &ToolsConfig,
) -> Result<String> {
    let result = convert(xspace_paths, tool_name, options, config);
    if let Err(e) = &result {
        tracing::error!(kind = ?e.kind(), "{}", e);
    }
    result
}

/// Legacy form: the JSON and `true`, or an empty string and `false`.
pub fn convert_hlo_proto_to_tool_data_pair(
    xspace_paths: &[String],
    tool_name: &str,
    options: &ToolOptions,
) -> (String, bool) {
    match convert_hlo_proto_to_tool_data(xspace_paths, tool_name, options) {
        Ok(json) => (json, true),
        Err(_) => (String::new(), false),
    }
}

fn convert(
    xspace_paths: &[String],
    tool_name: &str,
    options: &ToolOptions,
    config: &ToolsConfig,
) -> Result<String> {
    config.validate()?;

    let first_path = xspace_paths
        .first()
        .ok_or_else(|| ToolDataError::missing_input("No xspace paths given."))?;
    let module_name = hlo_module_name(options)?;

    // 從檔案載入 HLO module
    let file_name = hlo_proto_file_name(xspace_base_dir(first_path), module_name);
    let hlo_proto = read_hlo_proto(&file_name)?;
    tracing::info!("Loaded HLO module {} from {}", module_name, file_name.display());

    let tool = ToolKind::from_str(tool_name)?;
    tool.converter().convert(&hlo_proto, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryViewerConfig;
    use crate::utils::error::ErrorKind;

    #[test]
    fn test_tool_kind_exact_match() {
        assert_eq!(
            ToolKind::from_str(MEMORY_VIEWER_TOOL).unwrap(),
            ToolKind::MemoryViewer
        );
        for name in ["Memory_Viewer", "memory_viewer ", "memory", ""] {
            assert_eq!(
                ToolKind::from_str(name).unwrap_err().kind(),
                ErrorKind::UnknownTool
            );
        }
    }

    #[test]
    fn test_empty_paths_fail_first() {
        let err = convert_hlo_proto_to_tool_data(&[], "not_a_tool", &ToolOptions::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            convert_hlo_proto_to_tool_data_pair(&[], MEMORY_VIEWER_TOOL, &ToolOptions::new()),
            (String::new(), false)
        );
    }

    #[test]
    fn test_negative_settings_rejected() {
        let paths = vec!["/tmp/run/host.xplane.pb".to_string()];
        let mut options = ToolOptions::new();
        options.insert("hlo_module_name".to_string(), "main_module".into());

        for memory_viewer in [
            MemoryViewerConfig {
                small_buffer_size: -1,
                ..Default::default()
            },
            MemoryViewerConfig {
                memory_color: -2,
                ..Default::default()
            },
        ] {
            let config = ToolsConfig { memory_viewer };
            let err = convert_hlo_proto_to_tool_data_with_config(
                &paths,
                MEMORY_VIEWER_TOOL,
                &options,
                &config,
            )
            .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Config);
        }
    }
}
