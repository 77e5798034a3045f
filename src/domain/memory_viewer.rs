//! Memory viewer report, serialized with the proto3 JSON mapping the
//! visualization front end reads: camelCase keys, 64-bit integers as
//! strings, and every field present even when it holds its default value.

use crate::utils::proto_json;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeapObject {
    /// Color slot in the chart; the object's position in `max_heap`.
    pub numbered: i32,
    /// Label for objects that aggregate several buffers.
    pub label: String,
    #[serde(with = "proto_json::int64")]
    pub logical_buffer_id: i64,
    pub logical_buffer_size_mib: f64,
    pub unpadded_shape_mib: f64,
    pub instruction_name: String,
    pub shape_string: String,
    pub tf_op_name: String,
    pub group_name: String,
    pub op_code: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BufferSpan {
    pub start: i32,
    pub limit: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogicalBuffer {
    #[serde(with = "proto_json::int64")]
    pub id: i64,
    pub shape: String,
    pub size_mib: f64,
    pub hlo_name: String,
    #[serde(with = "proto_json::int64_vec")]
    pub shape_index: Vec<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BufferAllocation {
    #[serde(with = "proto_json::int64")]
    pub id: i64,
    pub size_mib: f64,
    pub attributes: Vec<String>,
    pub logical_buffers: Vec<LogicalBuffer>,
    pub common_shape: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreprocessResult {
    pub heap_sizes: Vec<f64>,
    pub unpadded_heap_sizes: Vec<f64>,
    pub max_heap: Vec<HeapObject>,
    pub max_heap_by_size: Vec<HeapObject>,
    /// Keyed by logical buffer id; ordered so output is reproducible.
    pub logical_buffer_spans: BTreeMap<i32, BufferSpan>,
    pub max_heap_to_by_size: Vec<i32>,
    pub by_size_to_max_heap: Vec<i32>,
    pub module_name: String,
    pub entry_computation_name: String,
    pub peak_heap_mib: f64,
    pub peak_unpadded_heap_mib: f64,
    pub peak_heap_size_position: i32,
    pub entry_computation_parameters_mib: f64,
    pub non_reusable_mib: f64,
    pub maybe_live_out_mib: f64,
    pub indefinite_lifetimes: Vec<BufferAllocation>,
}
