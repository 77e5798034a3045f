use crate::config::ToolsConfig;
use crate::core::preprocess::{convert_hlo_proto_to_preprocess_result, heap_simulator_trace_id};
use crate::domain::hlo::HloProto;
use crate::domain::ports::ToolConverter;
use crate::utils::error::Result;

pub const MEMORY_VIEWER_TOOL: &str = "memory_viewer";

#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryViewerConverter;

impl ToolConverter for MemoryViewerConverter {
    fn tool_name(&self) -> &'static str {
        MEMORY_VIEWER_TOOL
    }

    fn convert(&self, hlo_proto: &HloProto, config: &ToolsConfig) -> Result<String> {
        let config = &config.memory_viewer;
        let trace_id = heap_simulator_trace_id(hlo_proto, config.memory_color);
        tracing::debug!(
            "Using heap simulator trace {} for memory color {}",
            trace_id,
            config.memory_color
        );

        let result = convert_hlo_proto_to_preprocess_result(
            hlo_proto,
            config.small_buffer_size,
            trace_id,
            config.memory_color,
        )?;

        Ok(serde_json::to_string(&result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hlo::{BufferAssignmentProto, HloModuleProto};
    use crate::utils::error::ErrorKind;

    #[test]
    fn test_empty_assignment_still_reports() {
        let proto = HloProto {
            hlo_module: Some(HloModuleProto {
                name: "empty".to_string(),
                ..Default::default()
            }),
            buffer_assignment: Some(BufferAssignmentProto::default()),
        };

        let json = MemoryViewerConverter
            .convert(&proto, &ToolsConfig::default())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["moduleName"], "empty");
        assert_eq!(value["peakHeapMib"], serde_json::json!(0.0));
        assert_eq!(value["maxHeap"], serde_json::json!([]));
    }

    #[test]
    fn test_missing_module_is_analysis_error() {
        let err = MemoryViewerConverter
            .convert(&HloProto::default(), &ToolsConfig::default())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Analysis);
    }
}
