//! # Node Metadata
//!
//! Ordered, type-tagged key/value properties for scene graph nodes.
//!
//! Each node owns a [`NodeMetadata`] with a fixed number of slots. A slot
//! holds a key and one value from a closed set of kinds: `bool`, `i32`,
//! `u64`, `f32`, `String` and a three-component vector.
//!
//! ## Modules
//!
//! - [`util`] - Errors and vector types
//! - [`core`] - Value kinds, typed values and the store
//! - [`io`] - Binary and JSON encoding
//!
//! ## Example
//!
//! ```
//! use node_metadata::prelude::*;
//!
//! let mut meta = NodeMetadata::new(3);
//! meta.set(0, "scale", 2.5f32);
//! meta.set(1, "name", "root");
//! meta.set(2, "scale", 7i32);
//!
//! // First matching key wins.
//! assert_eq!(meta.get_by_key::<f32>("scale").unwrap(), 2.5);
//! assert_eq!(meta.get::<i32>(2).unwrap(), 7);
//! assert!(meta.get::<i32>(0).unwrap_err().is_mismatch());
//! ```

pub mod util;
pub mod core;
pub mod io;

// Re-export commonly used types
pub use util::{Error, Result, Vector3};
pub use crate::core::{MetadataEntry, MetadataType, MetadataValue, NodeMetadata, ValueKind, ValueVisitor};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Vector3};
    pub use crate::core::{
        kind_of, MetadataEntry, MetadataType, MetadataValue, NodeMetadata, ValueKind,
        ValueVisitor,
    };
}
