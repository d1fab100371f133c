//! The finalized specification and the value types shared with the draft.
//!
//! Field names serialize in camelCase; this is the fixed JSON shape read by
//! the code-generation integration.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A complete, validated project specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specification {
    pub title: String,
    pub description: String,
    pub features: Vec<Feature>,
    pub technologies: Vec<Technology>,
    pub architecture: Architecture,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data_models: Vec<DataModel>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implementation_notes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub implementation_plan: Vec<ImplementationPhase>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub name: String,
    pub description: String,
    pub priority: Priority,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    pub name: String,
    pub purpose: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub alternatives: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Architecture {
    pub style: ArchitectureStyle,
    pub components: Vec<Component>,
}

impl Architecture {
    /// Looks up a component by its exact name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub purpose: String,
    /// Names of other components in the same architecture.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub interactions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataModel {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub relationships: Vec<String>,
}

/// One phase of the optional implementation plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationPhase {
    pub phase: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tasks: Vec<PhaseTask>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseTask {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Reads an optional list where `null` stands for an empty one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Error returned when an enum value is outside its fixed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not one of: {}", .allowed.join(", "))]
pub struct UnknownVariant {
    pub value: String,
    pub allowed: &'static [&'static str],
}

/// Feature priority. Parsing ignores case so `"High"` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALLOWED: &'static [&'static str] = &["high", "medium", "low"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(UnknownVariant {
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall architecture style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchitectureStyle {
    Monolith,
    Microservices,
    Serverless,
}

impl ArchitectureStyle {
    pub const ALLOWED: &'static [&'static str] = &["monolith", "microservices", "serverless"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArchitectureStyle::Monolith => "monolith",
            ArchitectureStyle::Microservices => "microservices",
            ArchitectureStyle::Serverless => "serverless",
        }
    }
}

impl FromStr for ArchitectureStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monolith" => Ok(ArchitectureStyle::Monolith),
            "microservices" => Ok(ArchitectureStyle::Microservices),
            "serverless" => Ok(ArchitectureStyle::Serverless),
            _ => Err(UnknownVariant {
                value: s.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl<'de> Deserialize<'de> for ArchitectureStyle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for ArchitectureStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Specification {
        Specification {
            title: "Todo app".to_string(),
            description: "Tracks things to do".to_string(),
            features: vec![Feature {
                name: "Lists".to_string(),
                description: "Group todos".to_string(),
                priority: Priority::High,
                requirements: vec!["create".to_string()],
            }],
            technologies: vec![Technology {
                name: "Rust".to_string(),
                purpose: "Backend".to_string(),
                alternatives: vec![],
            }],
            architecture: Architecture {
                style: ArchitectureStyle::Monolith,
                components: vec![Component {
                    name: "API".to_string(),
                    purpose: "Serve requests".to_string(),
                    interactions: vec![],
                }],
            },
            data_models: vec![],
            implementation_notes: vec![],
            implementation_plan: vec![],
        }
    }

    mod enums {
        use super::*;

        #[test]
        fn priority_parses_any_case() {
            assert_eq!("High".parse::<Priority>().unwrap(), Priority::High);
            assert_eq!(" low ".parse::<Priority>().unwrap(), Priority::Low);
        }

        #[test]
        fn priority_rejects_unknown_values() {
            let err = "urgent".parse::<Priority>().unwrap_err();
            assert_eq!(err.to_string(), "'urgent' is not one of: high, medium, low");
        }

        #[test]
        fn style_deserializes_case_insensitively() {
            let style: ArchitectureStyle = serde_json::from_value(json!("Serverless")).unwrap();
            assert_eq!(style, ArchitectureStyle::Serverless);
        }

        #[test]
        fn enums_serialize_lowercase() {
            assert_eq!(serde_json::to_value(Priority::Medium).unwrap(), json!("medium"));
            assert_eq!(
                serde_json::to_value(ArchitectureStyle::Microservices).unwrap(),
                json!("microservices")
            );
        }
    }

    mod json_shape {
        use super::*;

        #[test]
        fn optional_lists_are_omitted_when_empty() {
            let value = serde_json::to_value(sample()).unwrap();
            let obj = value.as_object().unwrap();
            assert!(!obj.contains_key("dataModels"));
            assert!(!obj.contains_key("implementationNotes"));
            assert!(!obj.contains_key("implementationPlan"));
        }

        #[test]
        fn optional_lists_use_camel_case_names() {
            let mut spec = sample();
            spec.implementation_notes.push("Use migrations".to_string());
            let value = serde_json::to_value(spec).unwrap();
            assert_eq!(value["implementationNotes"], json!(["Use migrations"]));
        }

        #[test]
        fn unknown_fields_are_ignored_on_read() {
            let mut value = serde_json::to_value(sample()).unwrap();
            value["projectLinks"] = json!({"repository": "generated_projects/todo_app"});
            let spec: Specification = serde_json::from_value(value).unwrap();
            assert_eq!(spec, sample());
        }

        #[test]
        fn null_lists_read_as_empty() {
            let feature: Feature = serde_json::from_value(json!({
                "name": "Lists",
                "description": "Group todos",
                "priority": "high",
                "requirements": null
            }))
            .unwrap();
            assert!(feature.requirements.is_empty());

            let phase: ImplementationPhase =
                serde_json::from_value(json!({"phase": "MVP", "tasks": null})).unwrap();
            assert!(phase.tasks.is_empty());

            let model: DataModel = serde_json::from_value(
                json!({"name": "Todo", "fields": null, "relationships": null}),
            )
            .unwrap();
            assert!(model.fields.is_empty() && model.relationships.is_empty());
        }

        #[test]
        fn component_lookup_is_exact() {
            let spec = sample();
            assert!(spec.architecture.component("API").is_some());
            assert!(spec.architecture.component("api").is_none());
        }
    }
}
