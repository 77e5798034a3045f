// Domain layer: wire schema, report model, option values and ports.

pub mod hlo;
pub mod memory_viewer;
pub mod options;
pub mod ports;
