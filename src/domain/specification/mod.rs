//! Specification module - the document the conversation produces.

mod draft;
mod model;
mod validation;

pub use draft::{IncompleteSpecification, MergeReport, SpecificationDraft, SPECIFICATION_KEYS};
pub use model::{
    Architecture, ArchitectureStyle, Component, DataModel, Feature, ImplementationPhase,
    PhaseTask, Priority, Specification, Technology, UnknownVariant,
};
pub use validation::{ValidationResult, Violation, ViolationKind};
