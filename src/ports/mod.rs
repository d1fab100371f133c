//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Stateless language-model backend
//! - `SpecificationValidator` - Checks candidate specifications
//! - `SpecificationStore` - Persists sessions and finalized specifications

mod ai_provider;
mod schema_validator;
mod specification_store;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FailureKind, FinishReason,
    Message, MessageRole, ModelParameters, ProviderInfo, RequestMetadata, TokenUsage,
};
pub use schema_validator::SpecificationValidator;
pub use specification_store::{SpecificationStore, StoreError};
