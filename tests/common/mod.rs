use hlo_tools_data::domain::hlo::{
    AssignedBuffer, BufferAllocationProto, BufferAssignmentProto, HeapEventKind,
    HeapSimulatorEvent, HeapSimulatorTrace, HloComputationProto, HloInstructionProto,
    HloModuleProto, HloProto, LayoutProto, LogicalBufferLocation, LogicalBufferProto, OpMetadata,
    PrimitiveType, ShapeProto,
};
use hlo_tools_data::{ToolOption, ToolOptions};
use prost::Message;
use std::path::{Path, PathBuf};

pub const MODULE_NAME: &str = "main_module";

fn f32_instruction(name: &str, elements: i64) -> HloInstructionProto {
    HloInstructionProto {
        name: name.to_string(),
        opcode: "fusion".to_string(),
        shape: Some(ShapeProto {
            element_type: PrimitiveType::F32 as i32,
            dimensions: vec![elements],
            tuple_shapes: vec![],
            layout: Some(LayoutProto {
                minor_to_major: vec![0],
            }),
        }),
        metadata: Some(OpMetadata {
            op_name: format!("jit(main)/{}", name),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn logical_buffer(id: i64, size: i64, instruction_name: &str) -> LogicalBufferProto {
    LogicalBufferProto {
        id,
        size,
        defined_at: Some(LogicalBufferLocation {
            instruction_name: instruction_name.to_string(),
            ..Default::default()
        }),
        color: 0,
    }
}

/// A module with one 1 MiB parameter and two 2 MiB temps, one freed before the other.
pub fn sample_hlo_proto() -> HloProto {
    const MIB: i64 = 1 << 20;
    let instructions = vec![
        f32_instruction("param.0", MIB / 4),
        f32_instruction("fusion.1", MIB / 2),
        f32_instruction("fusion.2", MIB / 2),
    ];

    let event = |kind: HeapEventKind, buffer_id: i64| HeapSimulatorEvent {
        kind: kind as i32,
        buffer_id,
        ..Default::default()
    };

    HloProto {
        hlo_module: Some(HloModuleProto {
            name: MODULE_NAME.to_string(),
            entry_computation_name: "main.3".to_string(),
            computations: vec![HloComputationProto {
                name: "main.3".to_string(),
                instructions,
                ..Default::default()
            }],
            ..Default::default()
        }),
        buffer_assignment: Some(BufferAssignmentProto {
            logical_buffers: vec![
                logical_buffer(0, MIB, "param.0"),
                logical_buffer(1, 2 * MIB, "fusion.1"),
                logical_buffer(2, 2 * MIB, "fusion.2"),
            ],
            buffer_aliases: vec![],
            buffer_allocations: vec![
                BufferAllocationProto {
                    index: 0,
                    size: MIB,
                    is_entry_computation_parameter: true,
                    assigned: vec![AssignedBuffer {
                        logical_buffer_id: 0,
                        offset: 0,
                        size: MIB,
                    }],
                    ..Default::default()
                },
                BufferAllocationProto {
                    index: 1,
                    size: 4 * MIB,
                    assigned: vec![
                        AssignedBuffer {
                            logical_buffer_id: 1,
                            offset: 0,
                            size: 2 * MIB,
                        },
                        AssignedBuffer {
                            logical_buffer_id: 2,
                            offset: 2 * MIB,
                            size: 2 * MIB,
                        },
                    ],
                    ..Default::default()
                },
            ],
            heap_simulator_traces: vec![HeapSimulatorTrace {
                events: vec![
                    event(HeapEventKind::Alloc, 1),
                    event(HeapEventKind::Alloc, 2),
                    event(HeapEventKind::Free, 1),
                    event(HeapEventKind::Free, 2),
                ],
                whole_module_simulation: false,
                buffer_allocation_index: 1,
            }],
        }),
    }
}

/// Writes `proto` where the loader expects it for an xspace file in `dir`,
/// and returns that xspace path.
pub fn write_module(dir: &Path, proto: &HloProto) -> String {
    let file_name = dir.join(format!("{}.hlo_proto.pb", MODULE_NAME));
    std::fs::write(&file_name, proto.encode_to_vec()).unwrap();
    xspace_path(dir)
}

pub fn xspace_path(dir: &Path) -> String {
    let path: PathBuf = dir.join("host.xplane.pb");
    path.to_str().unwrap().to_string()
}

pub fn module_options() -> ToolOptions {
    let mut options = ToolOptions::new();
    options.insert("hlo_module_name".to_string(), ToolOption::from(MODULE_NAME));
    options
}
