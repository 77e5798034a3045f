pub mod error;
pub mod logger;
pub mod proto_json;
pub mod validation;
