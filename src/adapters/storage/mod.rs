//! Storage Adapters
//!
//! Implementations of the SpecificationStore port.
//!
//! ## Available Adapters
//!
//! - **FileSpecificationStore** - Sessions as YAML, specifications as JSON on disk
//! - **InMemorySpecificationStore** - Everything in memory (testing/development)
//!
//! ## Usage
//!
//! ```ignore
//! use adapters::storage::{FileSpecificationStore, InMemorySpecificationStore};
//!
//! // Production: file-based storage
//! let store = FileSpecificationStore::new("./data");
//!
//! // Testing: in-memory storage
//! let store = InMemorySpecificationStore::new();
//! ```

mod file_specification_store;
mod in_memory_specification_store;

pub use file_specification_store::FileSpecificationStore;
pub use in_memory_specification_store::InMemorySpecificationStore;
