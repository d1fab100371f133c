//! Validation Adapters - Specification checking implementations.
//!
//! Contains the structural validator used for candidate specifications.

mod schema_validator;

pub use schema_validator::SchemaValidator;
