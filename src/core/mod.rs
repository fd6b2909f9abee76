//! Core layer - value kinds, typed values and the metadata store.
//!
//! This module provides:
//! - [`ValueKind`] - Runtime tag for the closed set of value types
//! - [`MetadataValue`] / [`MetadataType`] - Owning typed value and the Rust types it accepts
//! - [`ValueVisitor`] - Per-kind dispatch for generic consumers
//! - [`NodeMetadata`] - Ordered, fixed-size key/value store

mod kind;
mod value;
mod metadata;

pub use kind::{kind_of, ValueKind};
pub use value::{MetadataType, MetadataValue, ValueVisitor};
pub use metadata::{MetadataEntry, NodeMetadata};
