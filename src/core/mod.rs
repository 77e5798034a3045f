pub mod hlo_loader;
pub mod memory_viewer;
pub mod preprocess;
pub mod shape;
pub mod tool_data;

pub use crate::domain::ports::ToolConverter;
pub use crate::utils::error::Result;
