//! The in-progress specification owned by a session.
//!
//! Every top-level key is optional. Candidates coming out of the extractor
//! are merged key by key: a key present in the candidate replaces the draft's
//! value, a key absent from it leaves the draft untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::model::{
    Architecture, DataModel, Feature, ImplementationPhase, Specification, Technology,
};
use super::validation::{ValidationResult, Violation, ViolationKind};

/// Top-level keys of the specification JSON shape, in document order.
pub const SPECIFICATION_KEYS: [&str; 8] = [
    "title",
    "description",
    "features",
    "technologies",
    "architecture",
    "dataModels",
    "implementationNotes",
    "implementationPlan",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificationDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<Feature>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<Technology>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architecture: Option<Architecture>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_models: Option<Vec<DataModel>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_notes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implementation_plan: Option<Vec<ImplementationPhase>>,
}

/// Which candidate keys made it into the draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeReport {
    pub applied: Vec<String>,
    pub rejected: Vec<String>,
    /// Keys the validator passed but that still did not fit their typed shape.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<Violation>,
}

/// Returned when a draft is turned into a specification too early.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("specification is incomplete, missing: {}", .missing.join(", "))]
pub struct IncompleteSpecification {
    pub missing: Vec<&'static str>,
}

impl SpecificationDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Title, if one has been given and is not blank.
    pub fn title(&self) -> Option<&str> {
        non_blank(self.title.as_deref())
    }

    /// True once both a title and a description are known.
    pub fn has_identity(&self) -> bool {
        self.title().is_some() && non_blank(self.description.as_deref()).is_some()
    }

    /// Names of the top-level keys that currently hold a value.
    pub fn present_keys(&self) -> Vec<&'static str> {
        let present = [
            self.title.is_some(),
            self.description.is_some(),
            self.features.is_some(),
            self.technologies.is_some(),
            self.architecture.is_some(),
            self.data_models.is_some(),
            self.implementation_notes.is_some(),
            self.implementation_plan.is_some(),
        ];
        SPECIFICATION_KEYS
            .iter()
            .zip(present)
            .filter_map(|(key, set)| set.then_some(*key))
            .collect()
    }

    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// The draft with the candidate's known, non-null keys laid over it.
    ///
    /// This is what the validator sees for a turn: the previous draft plus
    /// whatever the model just proposed, before anything is committed.
    pub fn overlay(&self, candidate: &Map<String, Value>) -> serde_json::Result<Value> {
        let mut working = match self.to_value()? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for key in SPECIFICATION_KEYS {
            match candidate.get(key) {
                Some(Value::Null) | None => {}
                Some(value) => {
                    working.insert(key.to_string(), value.clone());
                }
            }
        }
        Ok(Value::Object(working))
    }

    /// Replaces every key that `other` has a value for.
    ///
    /// Returns the keys that were replaced.
    pub fn merge(&mut self, other: SpecificationDraft) -> Vec<&'static str> {
        let mut replaced = Vec::new();
        macro_rules! take {
            ($field:ident, $key:literal) => {
                if other.$field.is_some() {
                    self.$field = other.$field;
                    replaced.push($key);
                }
            };
        }
        take!(title, "title");
        take!(description, "description");
        take!(features, "features");
        take!(technologies, "technologies");
        take!(architecture, "architecture");
        take!(data_models, "dataModels");
        take!(implementation_notes, "implementationNotes");
        take!(implementation_plan, "implementationPlan");
        replaced
    }

    /// Merges the keys of a candidate object that validated cleanly.
    ///
    /// A key is rejected when `result` has a blocking violation under it or
    /// when it does not deserialize into its typed shape. Rejected keys keep
    /// their previous value. The second kind of rejection is reported as a
    /// `WrongType` violation so it can still be asked about.
    pub fn merge_candidate(
        &mut self,
        candidate: &Map<String, Value>,
        result: &ValidationResult,
    ) -> MergeReport {
        let mut accepted = SpecificationDraft::default();
        let mut report = MergeReport::default();

        for key in SPECIFICATION_KEYS {
            let Some(value) = candidate.get(key).filter(|v| !v.is_null()) else {
                continue;
            };
            if result.blocks_key(key) {
                report.rejected.push(key.to_string());
                continue;
            }
            match accepted.set_key(key, value.clone()) {
                Ok(()) => report.applied.push(key.to_string()),
                Err(err) => {
                    tracing::debug!(key, error = %err, "candidate key did not fit the schema");
                    report.rejected.push(key.to_string());
                    report.violations.push(
                        Violation::new(key, ViolationKind::WrongType, err.to_string())
                            .with_expected(expected_shape(key)),
                    );
                }
            }
        }

        self.merge(accepted);
        report
    }

    fn set_key(&mut self, key: &str, value: Value) -> serde_json::Result<()> {
        match key {
            "title" => self.title = Some(serde_json::from_value(value)?),
            "description" => self.description = Some(serde_json::from_value(value)?),
            "features" => self.features = Some(serde_json::from_value(value)?),
            "technologies" => self.technologies = Some(serde_json::from_value(value)?),
            "architecture" => self.architecture = Some(serde_json::from_value(value)?),
            "dataModels" => self.data_models = Some(serde_json::from_value(value)?),
            "implementationNotes" => {
                self.implementation_notes = Some(serde_json::from_value(value)?)
            }
            "implementationPlan" => self.implementation_plan = Some(serde_json::from_value(value)?),
            _ => {}
        }
        Ok(())
    }
}

impl TryFrom<&SpecificationDraft> for Specification {
    type Error = IncompleteSpecification;

    fn try_from(draft: &SpecificationDraft) -> Result<Self, Self::Error> {
        let mut missing = Vec::new();
        if draft.title().is_none() {
            missing.push("title");
        }
        if non_blank(draft.description.as_deref()).is_none() {
            missing.push("description");
        }
        if draft.features.as_ref().map_or(true, Vec::is_empty) {
            missing.push("features");
        }
        if draft.technologies.as_ref().map_or(true, Vec::is_empty) {
            missing.push("technologies");
        }
        if draft.architecture.is_none() {
            missing.push("architecture");
        }

        match (
            &draft.title,
            &draft.description,
            &draft.features,
            &draft.technologies,
            &draft.architecture,
        ) {
            (Some(title), Some(description), Some(features), Some(technologies), Some(architecture))
                if missing.is_empty() =>
            {
                Ok(Specification {
                    title: title.clone(),
                    description: description.clone(),
                    features: features.clone(),
                    technologies: technologies.clone(),
                    architecture: architecture.clone(),
                    data_models: draft.data_models.clone().unwrap_or_default(),
                    implementation_notes: draft.implementation_notes.clone().unwrap_or_default(),
                    implementation_plan: draft.implementation_plan.clone().unwrap_or_default(),
                })
            }
            _ => Err(IncompleteSpecification { missing }),
        }
    }
}

fn expected_shape(key: &str) -> &'static str {
    match key {
        "title" | "description" => "a string",
        "features" => "a list of features, each with a name, description and priority",
        "technologies" => "a list of technologies, each with a name and purpose",
        "architecture" => "an object with a style and a list of named components",
        "dataModels" => "a list of data models, each with a name",
        "implementationNotes" => "a list of strings",
        "implementationPlan" => "a list of phases, each with a name and tasks",
        _ => "a value of the expected shape",
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}
