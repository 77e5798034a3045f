use crate::utils::error::{Result, ToolDataError};
use std::collections::HashMap;

pub const HLO_MODULE_NAME_KEY: &str = "hlo_module_name";

/// Value of a tool option. The set of representable types is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOption {
    Int(i32),
    Str(String),
}

impl ToolOption {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            ToolOption::Int(value) => Some(*value),
            ToolOption::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ToolOption::Str(value) => Some(value),
            ToolOption::Int(_) => None,
        }
    }
}

impl From<i32> for ToolOption {
    fn from(value: i32) -> Self {
        ToolOption::Int(value)
    }
}

impl From<String> for ToolOption {
    fn from(value: String) -> Self {
        ToolOption::Str(value)
    }
}

impl From<&str> for ToolOption {
    fn from(value: &str) -> Self {
        ToolOption::Str(value.to_string())
    }
}

pub type ToolOptions = HashMap<String, ToolOption>;

/// Returns the module name the caller asked for; it must be a non-empty string.
pub fn hlo_module_name(options: &ToolOptions) -> Result<&str> {
    let value = options
        .get(HLO_MODULE_NAME_KEY)
        .ok_or_else(|| ToolDataError::missing_input("Can not find HLO module name from options."))?;

    match value.as_str() {
        Some(name) if !name.is_empty() => Ok(name),
        Some(_) => Err(ToolDataError::InvalidOption {
            key: HLO_MODULE_NAME_KEY.to_string(),
            reason: "module name is empty".to_string(),
        }),
        None => Err(ToolDataError::InvalidOption {
            key: HLO_MODULE_NAME_KEY.to_string(),
            reason: "expected a string value".to_string(),
        }),
    }
}
