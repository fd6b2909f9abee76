//! Readers and writers for node metadata.
//!
//! - [`binary`] - Compact little-endian encoding with load/save helpers
//! - [`json`] - JSON export

pub mod binary;
pub mod json;

pub use binary::{from_bytes, load, read_metadata, save, to_bytes, write_metadata};
pub use json::{to_json, to_json_string};
