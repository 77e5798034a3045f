//! Wire-compatible subset of the XLA `HloProto` schema.
//!
//! Only the messages and fields read by the memory viewer are declared.
//! Tags match the upstream `hlo.proto` / `xla_data.proto`, so module dumps
//! written by the compiler decode directly; unknown fields are skipped.

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HloProto {
    #[prost(message, optional, tag = "1")]
    pub hlo_module: ::core::option::Option<HloModuleProto>,
    #[prost(message, optional, tag = "3")]
    pub buffer_assignment: ::core::option::Option<BufferAssignmentProto>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HloModuleProto {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub entry_computation_name: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "3")]
    pub computations: ::prost::alloc::vec::Vec<HloComputationProto>,
    #[prost(int64, tag = "5")]
    pub id: i64,
    #[prost(int64, tag = "6")]
    pub entry_computation_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HloComputationProto {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(message, repeated, tag = "2")]
    pub instructions: ::prost::alloc::vec::Vec<HloInstructionProto>,
    #[prost(int64, tag = "5")]
    pub id: i64,
    #[prost(int64, tag = "6")]
    pub root_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HloInstructionProto {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub opcode: ::prost::alloc::string::String,
    #[prost(message, optional, tag = "3")]
    pub shape: ::core::option::Option<ShapeProto>,
    #[prost(message, optional, tag = "7")]
    pub metadata: ::core::option::Option<OpMetadata>,
    #[prost(int64, tag = "35")]
    pub id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OpMetadata {
    #[prost(string, tag = "1")]
    pub op_type: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub op_name: ::prost::alloc::string::String,
    #[prost(string, tag = "3")]
    pub source_file: ::prost::alloc::string::String,
    #[prost(int32, tag = "4")]
    pub source_line: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ShapeProto {
    #[prost(enumeration = "PrimitiveType", tag = "2")]
    pub element_type: i32,
    #[prost(int64, repeated, tag = "3")]
    pub dimensions: ::prost::alloc::vec::Vec<i64>,
    #[prost(message, repeated, tag = "4")]
    pub tuple_shapes: ::prost::alloc::vec::Vec<ShapeProto>,
    #[prost(message, optional, tag = "5")]
    pub layout: ::core::option::Option<LayoutProto>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LayoutProto {
    #[prost(int64, repeated, tag = "1")]
    pub minor_to_major: ::prost::alloc::vec::Vec<i64>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum PrimitiveType {
    Invalid = 0,
    Pred = 1,
    S8 = 2,
    S16 = 3,
    S32 = 4,
    S64 = 5,
    U8 = 6,
    U16 = 7,
    U32 = 8,
    U64 = 9,
    F16 = 10,
    F32 = 11,
    F64 = 12,
    Tuple = 13,
    OpaqueType = 14,
    C64 = 15,
    Bf16 = 16,
    Token = 17,
    C128 = 18,
    F8e5m2 = 19,
    F8e4m3fn = 20,
    S4 = 21,
    U4 = 22,
}

impl PrimitiveType {
    /// Lowercase name used in XLA shape strings.
    pub fn short_name(self) -> &'static str {
        match self {
            PrimitiveType::Invalid => "invalid",
            PrimitiveType::Pred => "pred",
            PrimitiveType::S8 => "s8",
            PrimitiveType::S16 => "s16",
            PrimitiveType::S32 => "s32",
            PrimitiveType::S64 => "s64",
            PrimitiveType::U8 => "u8",
            PrimitiveType::U16 => "u16",
            PrimitiveType::U32 => "u32",
            PrimitiveType::U64 => "u64",
            PrimitiveType::F16 => "f16",
            PrimitiveType::F32 => "f32",
            PrimitiveType::F64 => "f64",
            PrimitiveType::Tuple => "tuple",
            PrimitiveType::OpaqueType => "opaque",
            PrimitiveType::C64 => "c64",
            PrimitiveType::Bf16 => "bf16",
            PrimitiveType::Token => "token",
            PrimitiveType::C128 => "c128",
            PrimitiveType::F8e5m2 => "f8e5m2",
            PrimitiveType::F8e4m3fn => "f8e4m3fn",
            PrimitiveType::S4 => "s4",
            PrimitiveType::U4 => "u4",
        }
    }

    /// Size of one element in bits; zero for non-array types.
    pub fn bit_width(self) -> i64 {
        match self {
            PrimitiveType::S4 | PrimitiveType::U4 => 4,
            PrimitiveType::Pred
            | PrimitiveType::S8
            | PrimitiveType::U8
            | PrimitiveType::F8e5m2
            | PrimitiveType::F8e4m3fn => 8,
            PrimitiveType::S16 | PrimitiveType::U16 | PrimitiveType::F16 | PrimitiveType::Bf16 => 16,
            PrimitiveType::S32 | PrimitiveType::U32 | PrimitiveType::F32 => 32,
            PrimitiveType::S64 | PrimitiveType::U64 | PrimitiveType::F64 | PrimitiveType::C64 => 64,
            PrimitiveType::C128 => 128,
            PrimitiveType::Invalid
            | PrimitiveType::Tuple
            | PrimitiveType::OpaqueType
            | PrimitiveType::Token => 0,
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogicalBufferLocation {
    #[prost(string, tag = "1")]
    pub computation_name: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub instruction_name: ::prost::alloc::string::String,
    #[prost(int64, repeated, tag = "3")]
    pub shape_index: ::prost::alloc::vec::Vec<i64>,
    #[prost(int64, tag = "4")]
    pub instruction_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct LogicalBufferProto {
    #[prost(int64, tag = "1")]
    pub id: i64,
    #[prost(int64, tag = "2")]
    pub size: i64,
    #[prost(message, optional, tag = "3")]
    pub defined_at: ::core::option::Option<LogicalBufferLocation>,
    #[prost(int64, tag = "4")]
    pub color: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AssignedBuffer {
    #[prost(int64, tag = "1")]
    pub logical_buffer_id: i64,
    #[prost(int64, tag = "2")]
    pub offset: i64,
    #[prost(int64, tag = "3")]
    pub size: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BufferAllocationProto {
    #[prost(int64, tag = "1")]
    pub index: i64,
    #[prost(int64, tag = "2")]
    pub size: i64,
    #[prost(bool, tag = "3")]
    pub is_thread_local: bool,
    #[prost(bool, tag = "5")]
    pub is_entry_computation_parameter: bool,
    #[prost(int64, tag = "6")]
    pub parameter_number: i64,
    #[prost(bool, tag = "7")]
    pub maybe_live_out: bool,
    #[prost(int64, tag = "8")]
    pub color: i64,
    #[prost(message, repeated, tag = "9")]
    pub assigned: ::prost::alloc::vec::Vec<AssignedBuffer>,
    #[prost(bool, tag = "11")]
    pub is_tuple: bool,
    #[prost(bool, tag = "12")]
    pub is_constant: bool,
}

impl BufferAllocationProto {
    /// Temp allocations are the ones the heap simulator schedules.
    pub fn is_temp(&self) -> bool {
        !self.is_thread_local
            && !self.is_entry_computation_parameter
            && !self.is_constant
            && !self.maybe_live_out
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum HeapEventKind {
    Alloc = 0,
    Free = 1,
    ShareWith = 2,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeapSimulatorEvent {
    #[prost(enumeration = "HeapEventKind", tag = "1")]
    pub kind: i32,
    #[prost(int64, tag = "2")]
    pub buffer_id: i64,
    #[prost(string, tag = "3")]
    pub computation_name: ::prost::alloc::string::String,
    #[prost(string, tag = "4")]
    pub instruction_name: ::prost::alloc::string::String,
    #[prost(int64, tag = "5")]
    pub share_with_canonical_id: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HeapSimulatorTrace {
    #[prost(message, repeated, tag = "1")]
    pub events: ::prost::alloc::vec::Vec<HeapSimulatorEvent>,
    #[prost(bool, tag = "2")]
    pub whole_module_simulation: bool,
    #[prost(int64, tag = "3")]
    pub buffer_allocation_index: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BufferAlias {
    #[prost(int64, tag = "1")]
    pub source_buffer_id: i64,
    #[prost(message, optional, tag = "2")]
    pub location: ::core::option::Option<LogicalBufferLocation>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BufferAssignmentProto {
    #[prost(message, repeated, tag = "1")]
    pub logical_buffers: ::prost::alloc::vec::Vec<LogicalBufferProto>,
    #[prost(message, repeated, tag = "2")]
    pub buffer_aliases: ::prost::alloc::vec::Vec<BufferAlias>,
    #[prost(message, repeated, tag = "3")]
    pub buffer_allocations: ::prost::alloc::vec::Vec<BufferAllocationProto>,
    #[prost(message, repeated, tag = "4")]
    pub heap_simulator_traces: ::prost::alloc::vec::Vec<HeapSimulatorTrace>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_decode_skips_unknown_fields() {
        let module = HloModuleProto {
            name: "main_module".to_string(),
            ..Default::default()
        };
        let mut bytes = HloProto {
            hlo_module: Some(module),
            buffer_assignment: None,
        }
        .encode_to_vec();
        // Field 2 is reserved upstream; a varint under an unknown tag must be ignored.
        bytes.extend_from_slice(&[0x10, 0x01]);

        let decoded = HloProto::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.hlo_module.unwrap().name, "main_module");
    }

    #[test]
    fn test_primitive_type_widths() {
        assert_eq!(PrimitiveType::F32.bit_width(), 32);
        assert_eq!(PrimitiveType::Bf16.bit_width(), 16);
        assert_eq!(PrimitiveType::Tuple.bit_width(), 0);
        assert_eq!(PrimitiveType::try_from(11).unwrap(), PrimitiveType::F32);
    }

    #[test]
    fn test_temp_allocation() {
        let mut allocation = BufferAllocationProto::default();
        assert!(allocation.is_temp());
        allocation.maybe_live_out = true;
        assert!(!allocation.is_temp());
    }
}
