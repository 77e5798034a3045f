//! Memory viewer preprocessing.
//!
//! Replays the heap simulator trace of one memory space over the module's
//! buffer assignment and produces the heap timeline, the set of buffers live
//! at peak, and the allocations whose lifetime spans the whole program.

use crate::core::shape;
use crate::domain::hlo::{
    BufferAllocationProto, HeapEventKind, HeapSimulatorTrace, HloInstructionProto, HloProto,
    LogicalBufferProto, ShapeProto,
};
use crate::domain::memory_viewer::{
    BufferAllocation, BufferSpan, HeapObject, LogicalBuffer, PreprocessResult,
};
use crate::utils::error::{Result, ToolDataError};
use std::collections::{BTreeMap, HashMap};

const BYTES_PER_MIB: f64 = (1 << 20) as f64;

pub fn bytes_to_mib(bytes: i64) -> f64 {
    bytes as f64 / BYTES_PER_MIB
}

/// Picks the heap simulator trace describing the temp buffers of `memory_color`.
///
/// Returns -1 when the module carries no usable trace.
pub fn heap_simulator_trace_id(hlo_proto: &HloProto, memory_color: i64) -> i64 {
    let Some(assignment) = hlo_proto.buffer_assignment.as_ref() else {
        return -1;
    };

    let mut buffer_to_allocation: HashMap<i64, &BufferAllocationProto> = HashMap::new();
    for allocation in &assignment.buffer_allocations {
        if allocation.color != memory_color {
            continue;
        }
        for assigned in &allocation.assigned {
            buffer_to_allocation.insert(assigned.logical_buffer_id, allocation);
        }
    }

    for (index, trace) in assignment.heap_simulator_traces.iter().enumerate() {
        let Some(first) = trace.events.first() else {
            continue;
        };
        if buffer_to_allocation
            .get(&first.buffer_id)
            .is_some_and(|allocation| allocation.is_temp())
        {
            return index as i64;
        }
    }

    assignment
        .heap_simulator_traces
        .iter()
        .position(|trace| trace.whole_module_simulation)
        .map_or(-1, |index| index as i64)
}

/// A logical buffer joined with the instruction that defines it.
struct BufferInfo<'a> {
    proto: &'a LogicalBufferProto,
    instruction: Option<&'a HloInstructionProto>,
}

impl<'a> BufferInfo<'a> {
    fn instruction_name(&self) -> &'a str {
        self.proto
            .defined_at
            .as_ref()
            .map(|location| location.instruction_name.as_str())
            .filter(|name| !name.is_empty())
            .or_else(|| self.instruction.map(|instruction| instruction.name.as_str()))
            .unwrap_or_default()
    }

    fn shape_index(&self) -> &'a [i64] {
        self.proto
            .defined_at
            .as_ref()
            .map(|location| location.shape_index.as_slice())
            .unwrap_or_default()
    }

    fn shape(&self) -> Option<&'a ShapeProto> {
        let shape = self.instruction?.shape.as_ref()?;
        shape::subshape(shape, self.shape_index())
    }

    fn shape_string(&self) -> String {
        self.shape().map(shape::shape_to_string).unwrap_or_default()
    }

    fn unpadded_size(&self) -> Result<i64> {
        match self.shape() {
            Some(shape) => shape::unpadded_byte_size(shape).ok_or_else(|| {
                ToolDataError::preprocess(format!(
                    "size of shape defined by {} overflows",
                    self.instruction_name()
                ))
            }),
            None => Ok(self.proto.size),
        }
    }

    fn group_name(&self) -> String {
        let index = self.shape_index();
        if index.is_empty() {
            return self.instruction_name().to_string();
        }
        let index: Vec<String> = index.iter().map(|i| i.to_string()).collect();
        format!("{}{{{}}}", self.instruction_name(), index.join(","))
    }

    fn heap_object(&self, numbered: i32) -> Result<HeapObject> {
        let instruction = self.instruction;
        Ok(HeapObject {
            numbered,
            label: String::new(),
            logical_buffer_id: self.proto.id,
            logical_buffer_size_mib: bytes_to_mib(self.proto.size),
            unpadded_shape_mib: bytes_to_mib(self.unpadded_size()?),
            instruction_name: self.instruction_name().to_string(),
            shape_string: self.shape_string(),
            tf_op_name: instruction
                .and_then(|i| i.metadata.as_ref())
                .map(|m| m.op_name.clone())
                .unwrap_or_default(),
            group_name: self.group_name(),
            op_code: instruction.map(|i| i.opcode.clone()).unwrap_or_default(),
        })
    }

    fn logical_buffer(&self) -> LogicalBuffer {
        LogicalBuffer {
            id: self.proto.id,
            shape: self.shape_string(),
            size_mib: bytes_to_mib(self.proto.size),
            hlo_name: self.instruction_name().to_string(),
            shape_index: self.shape_index().to_vec(),
        }
    }
}

fn to_i32(value: i64, what: &str) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| ToolDataError::preprocess(format!("{} {} does not fit in 32 bits", what, value)))
}

fn add_bytes(total: i64, bytes: i64) -> Result<i64> {
    total.checked_add(bytes).ok_or_else(|| {
        ToolDataError::preprocess(format!("byte count overflows: {} + {}", total, bytes))
    })
}

fn sub_bytes(total: i64, bytes: i64) -> Result<i64> {
    total.checked_sub(bytes).ok_or_else(|| {
        ToolDataError::preprocess(format!("byte count overflows: {} - {}", total, bytes))
    })
}

/// Heap state sampled after every trace event.
#[derive(Debug, Default)]
struct HeapTimeline {
    heap_sizes: Vec<i64>,
    unpadded_heap_sizes: Vec<i64>,
    spans: BTreeMap<i64, (usize, Option<usize>)>,
    peak_position: usize,
    /// Canonical buffers live at the peak, in allocation order.
    peak_live: Vec<i64>,
}

fn simulate_heap(
    trace: Option<&HeapSimulatorTrace>,
    buffers: &HashMap<i64, BufferInfo<'_>>,
    base_bytes: i64,
) -> Result<HeapTimeline> {
    let mut timeline = HeapTimeline::default();
    let mut heap = base_bytes;
    let mut unpadded = base_bytes;
    let mut live: Vec<i64> = Vec::new();
    let mut canonical_of: HashMap<i64, i64> = HashMap::new();
    let mut references: HashMap<i64, usize> = HashMap::new();

    let events = trace.map(|t| t.events.as_slice()).unwrap_or_default();
    if events.is_empty() {
        timeline.heap_sizes.push(heap);
        timeline.unpadded_heap_sizes.push(unpadded);
        return Ok(timeline);
    }

    for (position, event) in events.iter().enumerate() {
        let kind = HeapEventKind::try_from(event.kind).map_err(|_| {
            ToolDataError::preprocess(format!("unknown heap event kind {}", event.kind))
        })?;
        let buffer = buffers.get(&event.buffer_id).ok_or_else(|| {
            ToolDataError::preprocess(format!("heap event references unknown buffer {}", event.buffer_id))
        })?;

        match kind {
            HeapEventKind::Alloc => {
                if canonical_of.contains_key(&event.buffer_id) {
                    return Err(ToolDataError::preprocess(format!(
                        "buffer {} allocated while already live",
                        event.buffer_id
                    )));
                }
                canonical_of.insert(event.buffer_id, event.buffer_id);
                references.insert(event.buffer_id, 1);
                live.push(event.buffer_id);
                heap = add_bytes(heap, buffer.proto.size)?;
                unpadded = add_bytes(unpadded, buffer.unpadded_size()?)?;
                timeline.spans.insert(event.buffer_id, (position, None));
            }
            HeapEventKind::ShareWith => {
                if canonical_of.contains_key(&event.buffer_id) {
                    return Err(ToolDataError::preprocess(format!(
                        "buffer {} shared while already live",
                        event.buffer_id
                    )));
                }
                let canonical = *canonical_of
                    .get(&event.share_with_canonical_id)
                    .ok_or_else(|| {
                        ToolDataError::preprocess(format!(
                            "buffer {} shares with non-live buffer {}",
                            event.buffer_id, event.share_with_canonical_id
                        ))
                    })?;
                canonical_of.insert(event.buffer_id, canonical);
                *references.entry(canonical).or_default() += 1;
                timeline.spans.insert(event.buffer_id, (position, None));
            }
            HeapEventKind::Free => {
                let canonical = canonical_of.remove(&event.buffer_id).ok_or_else(|| {
                    ToolDataError::preprocess(format!("free of non-live buffer {}", event.buffer_id))
                })?;
                if let Some(span) = timeline.spans.get_mut(&event.buffer_id) {
                    span.1 = Some(position);
                }
                let remaining = references.get_mut(&canonical).map(|count| {
                    *count -= 1;
                    *count
                });
                if remaining == Some(0) {
                    references.remove(&canonical);
                    live.retain(|id| *id != canonical);
                    if let Some(owner) = buffers.get(&canonical) {
                        heap = sub_bytes(heap, owner.proto.size)?;
                        unpadded = sub_bytes(unpadded, owner.unpadded_size()?)?;
                    }
                }
            }
        }

        timeline.heap_sizes.push(heap);
        timeline.unpadded_heap_sizes.push(unpadded);
        if position == 0 || heap > timeline.heap_sizes[timeline.peak_position] {
            timeline.peak_position = position;
            timeline.peak_live = live.clone();
        }
    }

    Ok(timeline)
}

fn indefinite_allocation(
    allocation: &BufferAllocationProto,
    buffers: &HashMap<i64, BufferInfo<'_>>,
) -> BufferAllocation {
    let mut attributes = Vec::new();
    if allocation.is_entry_computation_parameter {
        attributes.push(format!("entry computation parameter {}", allocation.parameter_number));
    }
    if allocation.maybe_live_out {
        attributes.push("maybe-live-out".to_string());
    }
    if allocation.is_constant {
        attributes.push("constant".to_string());
    }
    if allocation.is_tuple {
        attributes.push("tuple".to_string());
    }

    let logical_buffers: Vec<LogicalBuffer> = allocation
        .assigned
        .iter()
        .filter_map(|assigned| buffers.get(&assigned.logical_buffer_id))
        .map(BufferInfo::logical_buffer)
        .collect();

    let common_shape = match logical_buffers.split_first() {
        Some((first, rest)) if rest.iter().all(|b| b.shape == first.shape) => first.shape.clone(),
        _ => String::new(),
    };

    BufferAllocation {
        id: allocation.index,
        size_mib: bytes_to_mib(allocation.size),
        attributes,
        logical_buffers,
        common_shape,
    }
}

/// Builds the memory viewer report for one memory space of the module.
pub fn convert_hlo_proto_to_preprocess_result(
    hlo_proto: &HloProto,
    small_buffer_size: i64,
    heap_simulator_trace_id: i64,
    memory_color: i64,
) -> Result<PreprocessResult> {
    let module = hlo_proto
        .hlo_module
        .as_ref()
        .ok_or_else(|| ToolDataError::preprocess("HLO proto has no module"))?;
    let assignment = hlo_proto
        .buffer_assignment
        .as_ref()
        .ok_or_else(|| ToolDataError::preprocess("HLO proto has no buffer assignment"))?;

    let trace = match heap_simulator_trace_id {
        -1 => None,
        id => Some(
            usize::try_from(id)
                .ok()
                .and_then(|index| assignment.heap_simulator_traces.get(index))
                .ok_or_else(|| {
                    ToolDataError::preprocess(format!(
                        "heap simulator trace {} out of range ({} traces)",
                        id,
                        assignment.heap_simulator_traces.len()
                    ))
                })?,
        ),
    };

    let mut instructions_by_name: HashMap<&str, &HloInstructionProto> = HashMap::new();
    let mut instructions_by_id: HashMap<i64, &HloInstructionProto> = HashMap::new();
    for computation in &module.computations {
        for instruction in &computation.instructions {
            instructions_by_name.insert(instruction.name.as_str(), instruction);
            instructions_by_id.insert(instruction.id, instruction);
        }
    }

    let buffers: HashMap<i64, BufferInfo<'_>> = assignment
        .logical_buffers
        .iter()
        .map(|proto| {
            let instruction = proto.defined_at.as_ref().and_then(|location| {
                instructions_by_name
                    .get(location.instruction_name.as_str())
                    .or_else(|| instructions_by_id.get(&location.instruction_id))
                    .copied()
            });
            (proto.id, BufferInfo { proto, instruction })
        })
        .collect();

    let mut result = PreprocessResult {
        module_name: module.name.clone(),
        entry_computation_name: module.entry_computation_name.clone(),
        ..Default::default()
    };

    let mut indefinite: Vec<&BufferAllocationProto> = assignment
        .buffer_allocations
        .iter()
        .filter(|a| a.color == memory_color && !a.is_thread_local && !a.is_temp())
        .collect();
    indefinite.sort_by(|a, b| b.size.cmp(&a.size));

    let mut non_reusable_bytes = 0i64;
    let mut parameter_bytes = 0i64;
    let mut live_out_bytes = 0i64;
    for allocation in &indefinite {
        non_reusable_bytes = add_bytes(non_reusable_bytes, allocation.size)?;
        if allocation.is_entry_computation_parameter {
            parameter_bytes = add_bytes(parameter_bytes, allocation.size)?;
        }
        if allocation.maybe_live_out {
            live_out_bytes = add_bytes(live_out_bytes, allocation.size)?;
        }
        result
            .indefinite_lifetimes
            .push(indefinite_allocation(allocation, &buffers));
    }
    result.non_reusable_mib = bytes_to_mib(non_reusable_bytes);
    result.entry_computation_parameters_mib = bytes_to_mib(parameter_bytes);
    result.maybe_live_out_mib = bytes_to_mib(live_out_bytes);

    let timeline = simulate_heap(trace, &buffers, non_reusable_bytes)?;
    let last_position = timeline.heap_sizes.len() - 1;

    result.heap_sizes = timeline.heap_sizes.iter().copied().map(bytes_to_mib).collect();
    result.unpadded_heap_sizes = timeline
        .unpadded_heap_sizes
        .iter()
        .copied()
        .map(bytes_to_mib)
        .collect();
    result.peak_heap_mib = result.heap_sizes[timeline.peak_position];
    result.peak_unpadded_heap_mib = result.unpadded_heap_sizes[timeline.peak_position];
    result.peak_heap_size_position = to_i32(timeline.peak_position as i64, "peak position")?;

    for (id, (start, limit)) in &timeline.spans {
        let span = BufferSpan {
            start: to_i32(*start as i64, "span start")?,
            limit: to_i32(limit.unwrap_or(last_position) as i64, "span limit")?,
        };
        result
            .logical_buffer_spans
            .insert(to_i32(*id, "logical buffer id")?, span);
    }

    let mut small_bytes = 0i64;
    for id in &timeline.peak_live {
        let Some(buffer) = buffers.get(id) else {
            continue;
        };
        if buffer.proto.size < small_buffer_size {
            small_bytes = add_bytes(small_bytes, buffer.proto.size)?;
            continue;
        }
        let numbered = to_i32(result.max_heap.len() as i64, "heap object count")?;
        result.max_heap.push(buffer.heap_object(numbered)?);
    }
    if small_bytes > 0 {
        let small_mib = bytes_to_mib(small_bytes);
        result.max_heap.push(HeapObject {
            numbered: to_i32(result.max_heap.len() as i64, "heap object count")?,
            label: format!("small ({:.1} MiB)", small_mib),
            logical_buffer_id: -1,
            logical_buffer_size_mib: small_mib,
            unpadded_shape_mib: small_mib,
            ..Default::default()
        });
    }

    let mut by_size: Vec<usize> = (0..result.max_heap.len()).collect();
    by_size.sort_by(|a, b| {
        result.max_heap[*b]
            .logical_buffer_size_mib
            .total_cmp(&result.max_heap[*a].logical_buffer_size_mib)
    });
    result.max_heap_to_by_size = vec![0; by_size.len()];
    for (rank, index) in by_size.iter().enumerate() {
        result.max_heap_to_by_size[*index] = rank as i32;
        result.by_size_to_max_heap.push(*index as i32);
        result.max_heap_by_size.push(result.max_heap[*index].clone());
    }

    tracing::debug!(
        module = %result.module_name,
        events = result.heap_sizes.len(),
        peak_mib = result.peak_heap_mib,
        "Preprocessed memory viewer data"
    );

    Ok(result)
}
