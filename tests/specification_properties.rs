//! Property tests over generated specifications.

use proptest::prelude::*;
use serde_json::{json, Value};

use idea_intake::adapters::validation::SchemaValidator;
use idea_intake::domain::conversation::ResponseExtractor;
use idea_intake::domain::foundation::SessionStatus;
use idea_intake::domain::specification::{
    Specification, SpecificationDraft, ViolationKind,
};
use idea_intake::ports::SpecificationValidator;

fn word() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10}"
}

/// A complete specification whose component interactions only name
/// components that exist.
fn valid_specification() -> impl Strategy<Value = Value> {
    (
        word(),
        "[A-Za-z ]{1,40}",
        prop::collection::vec((word(), word(), prop::sample::select(vec!["high", "medium", "low"])), 1..4),
        prop::collection::vec((word(), word()), 1..4),
        prop::sample::select(vec!["monolith", "microservices", "serverless"]),
        prop::collection::btree_set(word(), 1..4),
    )
        .prop_filter("description must not be blank", |(_, d, ..)| !d.trim().is_empty())
        .prop_map(|(title, description, features, technologies, style, components)| {
            let names: Vec<String> = components.into_iter().collect();
            json!({
                "title": title,
                "description": description.trim(),
                "features": features
                    .into_iter()
                    .map(|(name, desc, priority)| json!({"name": name, "description": desc, "priority": priority}))
                    .collect::<Vec<_>>(),
                "technologies": technologies
                    .into_iter()
                    .map(|(name, purpose)| json!({"name": name, "purpose": purpose}))
                    .collect::<Vec<_>>(),
                "architecture": {
                    "style": style,
                    "components": names
                        .iter()
                        .map(|name| json!({
                            "name": name,
                            "purpose": "Does work",
                            "interactions": names.iter().filter(|n| *n != name).collect::<Vec<_>>(),
                        }))
                        .collect::<Vec<_>>(),
                },
            })
        })
}

const REQUIRED: &[&str] = &["title", "description", "features", "technologies", "architecture"];

proptest! {
    #[test]
    fn valid_specification_round_trips_through_extraction(value in valid_specification()) {
        let spec: Specification = serde_json::from_value(value).unwrap();
        let serialized = serde_json::to_string_pretty(&spec).unwrap();

        let attempt = ResponseExtractor::new().extract(&serialized);
        let candidate = attempt.candidate.unwrap();

        prop_assert!(SchemaValidator::new()
            .validate(&candidate, SessionStatus::Clarifying)
            .is_valid());
        let reparsed: Specification = serde_json::from_value(candidate).unwrap();
        prop_assert_eq!(reparsed, spec);
    }

    #[test]
    fn dropping_a_required_field_reports_it_once(
        value in valid_specification(),
        index in 0..REQUIRED.len(),
    ) {
        let field = REQUIRED[index];
        let mut candidate = value;
        candidate.as_object_mut().unwrap().remove(field);

        let result = SchemaValidator::new().validate(&candidate, SessionStatus::Clarifying);
        let missing: Vec<_> = result
            .of_kind(ViolationKind::Missing)
            .filter(|v| v.path == field)
            .collect();

        prop_assert_eq!(missing.len(), 1);
        prop_assert_eq!(result.len(), 1);
    }

    #[test]
    fn merging_disjoint_drafts_keeps_every_field(
        value in valid_specification(),
        mask in prop::collection::vec(any::<bool>(), REQUIRED.len()),
    ) {
        let object = value.as_object().unwrap();
        let (mut left, mut right) = (serde_json::Map::new(), serde_json::Map::new());
        for (key, goes_left) in REQUIRED.iter().zip(mask) {
            let side = if goes_left { &mut left } else { &mut right };
            side.insert(key.to_string(), object[*key].clone());
        }

        let mut merged: SpecificationDraft = serde_json::from_value(Value::Object(left)).unwrap();
        merged.merge(serde_json::from_value(Value::Object(right)).unwrap());

        let expected: SpecificationDraft = serde_json::from_value(value).unwrap();
        prop_assert_eq!(&merged, &expected);
        prop_assert!(REQUIRED.iter().all(|k| merged.present_keys().contains(k)));
    }
}
