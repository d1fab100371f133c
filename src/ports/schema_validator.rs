//! Schema Validator Port - checks a candidate specification.
//!
//! The controller depends on this trait; `SchemaValidator` in the
//! validation adapters is the standard implementation.

use serde_json::Value;

use crate::domain::foundation::SessionStatus;
use crate::domain::specification::ValidationResult;

/// Validates a candidate specification object.
///
/// # Contract
///
/// Implementations must:
/// - report every violation in one pass, never stop at the first
/// - require `title` and `description` at every status, and `features`,
///   `technologies` and `architecture` from `clarifying` on
/// - check cross references only once `architecture.components` is non-empty
/// - treat `null` as absent and ignore unknown keys
pub trait SpecificationValidator: Send + Sync {
    fn validate(&self, candidate: &Value, status: SessionStatus) -> ValidationResult;
}
