//! Schema Validator - implementation of SpecificationValidator.
//!
//! Walks the candidate JSON by hand so that every defect becomes a
//! `Violation` with a precise path instead of a deserialization error.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::domain::foundation::SessionStatus;
use crate::domain::specification::{
    ArchitectureStyle, Priority, ValidationResult, Violation, ViolationKind,
};
use crate::ports::SpecificationValidator;

/// Validator for the project specification schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl SchemaValidator {
    pub fn new() -> Self {
        Self
    }
}

impl SpecificationValidator for SchemaValidator {
    fn validate(&self, candidate: &Value, status: SessionStatus) -> ValidationResult {
        let mut pass = Pass::default();

        let Some(root) = candidate.as_object() else {
            pass.wrong_type("$", "an object", candidate, None);
            return pass.result;
        };

        let full = status.requires_full_specification();

        pass.string(root, "title", "title", true, None);
        pass.string(root, "description", "description", true, None);

        pass.object_list(root, "features", "features", full, |pass, path, item| {
            let subject = name_of(item, "name");
            pass.string(item, "name", &format!("{path}.name"), true, subject);
            pass.string(item, "description", &format!("{path}.description"), true, subject);
            pass.enumeration(item, "priority", &format!("{path}.priority"), Priority::ALLOWED, subject);
            pass.string_list(item, "requirements", &format!("{path}.requirements"), subject);
        });

        pass.object_list(root, "technologies", "technologies", full, |pass, path, item| {
            let subject = name_of(item, "name");
            pass.string(item, "name", &format!("{path}.name"), true, subject);
            pass.string(item, "purpose", &format!("{path}.purpose"), true, subject);
            pass.string_list(item, "alternatives", &format!("{path}.alternatives"), subject);
        });

        match field(root, "architecture") {
            None if full => pass.missing("architecture", None),
            None => {}
            Some(Value::Object(architecture)) => pass.architecture(architecture),
            Some(other) => pass.wrong_type("architecture", "an object", other, None),
        }

        pass.object_list(root, "dataModels", "dataModels", false, |pass, path, item| {
            let subject = name_of(item, "name");
            pass.string(item, "name", &format!("{path}.name"), true, subject);
            pass.string_list(item, "fields", &format!("{path}.fields"), subject);
            pass.string_list(item, "relationships", &format!("{path}.relationships"), subject);
        });

        pass.string_list(root, "implementationNotes", "implementationNotes", None);

        pass.object_list(root, "implementationPlan", "implementationPlan", false, |pass, path, item| {
            let subject = name_of(item, "phase");
            pass.string(item, "phase", &format!("{path}.phase"), true, subject);
            pass.string(item, "duration", &format!("{path}.duration"), false, subject);
            pass.object_list(item, "tasks", &format!("{path}.tasks"), false, |pass, path, task| {
                let subject = name_of(task, "name");
                pass.string(task, "name", &format!("{path}.name"), true, subject);
                pass.string(task, "duration", &format!("{path}.duration"), false, subject);
            });
        });

        pass.result
    }
}

/// Accumulates violations for one validation run.
#[derive(Default)]
struct Pass {
    result: ValidationResult,
}

impl Pass {
    fn missing(&mut self, path: &str, subject: Option<&str>) {
        self.result.push(
            Violation::new(path, ViolationKind::Missing, format!("{path} is required"))
                .with_subject(subject),
        );
    }

    fn wrong_type(&mut self, path: &str, expected: &str, found: &Value, subject: Option<&str>) {
        self.result.push(
            Violation::new(
                path,
                ViolationKind::WrongType,
                format!("{path} should be {expected}, found {}", type_name(found)),
            )
            .with_subject(subject)
            .with_expected(expected),
        );
    }

    /// A string field. Blank strings count as missing.
    fn string(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        path: &str,
        required: bool,
        subject: Option<&str>,
    ) {
        match field(obj, key) {
            None if required => self.missing(path, subject),
            None => {}
            Some(Value::String(s)) if required && s.trim().is_empty() => self.missing(path, subject),
            Some(Value::String(_)) => {}
            Some(other) => self.wrong_type(path, "a string", other, subject),
        }
    }

    /// A required string restricted to a fixed set, compared without case.
    fn enumeration(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        path: &str,
        allowed: &[&str],
        subject: Option<&str>,
    ) {
        match field(obj, key) {
            None => self.missing(path, subject),
            Some(Value::String(s)) if s.trim().is_empty() => self.missing(path, subject),
            Some(Value::String(s)) => {
                let normalized = s.trim().to_lowercase();
                if !allowed.contains(&normalized.as_str()) {
                    let expected = format!("one of: {}", allowed.join(", "));
                    self.result.push(
                        Violation::new(
                            path,
                            ViolationKind::InvalidEnum,
                            format!("{path} must be {expected}, found '{s}'"),
                        )
                        .with_subject(subject)
                        .with_expected(expected),
                    );
                }
            }
            Some(other) => self.wrong_type(path, "a string", other, subject),
        }
    }

    /// An optional list of strings.
    fn string_list(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        path: &str,
        subject: Option<&str>,
    ) {
        match field(obj, key) {
            None => {}
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    if !item.is_string() {
                        self.wrong_type(&format!("{path}[{i}]"), "a string", item, subject);
                    }
                }
            }
            Some(other) => self.wrong_type(path, "a list of strings", other, subject),
        }
    }

    /// A list of objects, each checked by `check`.
    ///
    /// When `required` is set an absent or empty list is reported as missing.
    fn object_list<F>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        path: &str,
        required: bool,
        check: F,
    ) where
        F: Fn(&mut Pass, &str, &Map<String, Value>),
    {
        match field(obj, key) {
            None if required => self.missing(path, None),
            None => {}
            Some(Value::Array(items)) if items.is_empty() && required => self.missing(path, None),
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    let item_path = format!("{path}[{i}]");
                    match item {
                        Value::Object(item_obj) => check(self, &item_path, item_obj),
                        other => self.wrong_type(&item_path, "an object", other, None),
                    }
                }
            }
            Some(other) => self.wrong_type(path, "a list of objects", other, None),
        }
    }

    fn architecture(&mut self, architecture: &Map<String, Value>) {
        self.enumeration(
            architecture,
            "style",
            "architecture.style",
            ArchitectureStyle::ALLOWED,
            None,
        );

        self.object_list(
            architecture,
            "components",
            "architecture.components",
            true,
            |pass, path, item| {
                let subject = name_of(item, "name");
                pass.string(item, "name", &format!("{path}.name"), true, subject);
                pass.string(item, "purpose", &format!("{path}.purpose"), true, subject);
                pass.string_list(item, "interactions", &format!("{path}.interactions"), subject);
            },
        );

        if let Some(Value::Array(components)) = field(architecture, "components") {
            if !components.is_empty() {
                self.cross_references(components);
            }
        }
    }

    /// Every interaction must name a component of the same architecture.
    fn cross_references(&mut self, components: &[Value]) {
        let names: HashSet<&str> = components
            .iter()
            .filter_map(|c| c.as_object().and_then(|c| name_of(c, "name")))
            .collect();

        for (i, component) in components.iter().enumerate() {
            let Some(component) = component.as_object() else {
                continue;
            };
            let Some(Value::Array(interactions)) = field(component, "interactions") else {
                continue;
            };
            let subject = name_of(component, "name");
            for (j, target) in interactions.iter().enumerate() {
                let Some(target) = target.as_str() else {
                    continue;
                };
                if !names.contains(target.trim()) {
                    let path = format!("architecture.components[{i}].interactions[{j}]");
                    let who = subject.unwrap_or("this component");
                    self.result.push(
                        Violation::new(
                            path,
                            ViolationKind::DanglingReference,
                            format!(
                                "{who} interacts with '{target}', which is not a component of this architecture"
                            ),
                        )
                        .with_subject(subject)
                        .with_expected(target.to_string()),
                    );
                }
            }
        }
    }
}

/// A present, non-null member.
fn field<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// The trimmed, non-blank string under `key`, used to name violations.
fn name_of<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
