use crate::domain::hlo::HloProto;
use crate::utils::error::{Result, ToolDataError};
use prost::Message;
use std::path::{Path, PathBuf};

/// Suffix the profiler uses when it dumps a module next to the xplane files.
pub const HLO_PROTO_SUFFIX: &str = ".hlo_proto.pb";

/// Directory holding the xspace file; empty for a bare file name.
pub fn xspace_base_dir(xspace_path: &str) -> &Path {
    let path = Path::new(xspace_path);
    path.parent().unwrap_or(path)
}

pub fn hlo_proto_file_name(base_dir: &Path, module_name: &str) -> PathBuf {
    base_dir.join(format!("{}{}", module_name, HLO_PROTO_SUFFIX))
}

pub fn read_hlo_proto(path: &Path) -> Result<HloProto> {
    let bytes = std::fs::read(path).map_err(|source| ToolDataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

    HloProto::decode(bytes.as_slice()).map_err(|source| ToolDataError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
