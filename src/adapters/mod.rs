//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Chat-completion clients, retry wrapper and a scripted mock
//! - `http` - REST endpoints over the elicitation context
//! - `storage` - In-memory and file-backed session stores
//! - `validation` - Schema checks for candidate specifications

pub mod ai;
pub mod http;
pub mod storage;
pub mod validation;
