//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, status, errors)
//! - `specification` - Specification model, draft merging and validation results
//! - `conversation` - Response extraction, gap analysis and prompt construction
//! - `session` - Elicitation session aggregate and its turn history

pub mod conversation;
pub mod foundation;
pub mod session;
pub mod specification;
