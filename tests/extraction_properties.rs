//! Property tests for reply extraction and identifier derivation.

use proptest::prelude::*;
use serde_json::{Map, Value};

use idea_intake::domain::conversation::{ExtractionStrategy, ResponseExtractor, ResponseSanitizer};
use idea_intake::domain::foundation::ProjectId;

fn flat_object() -> impl Strategy<Value = Map<String, Value>> {
    prop::collection::btree_map("[a-z]{1,8}", "[A-Za-z0-9 ,.]{0,20}", 1..5).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect()
    })
}

/// Prose that cannot itself be mistaken for structure.
fn prose() -> impl Strategy<Value = String> {
    "[A-Za-z ,.!?]{0,60}"
}

proptest! {
    #[test]
    fn bare_object_is_extracted_directly(object in flat_object()) {
        let raw = Value::Object(object.clone()).to_string();
        let attempt = ResponseExtractor::new().extract(&raw);

        prop_assert_eq!(attempt.strategy, ExtractionStrategy::Direct);
        prop_assert_eq!(attempt.candidate, Some(Value::Object(object)));
    }

    #[test]
    fn fenced_object_survives_surrounding_prose(
        object in flat_object(),
        before in prose(),
        after in prose(),
    ) {
        let raw = format!(
            "{}\n```json\n{}\n```\n{}",
            before,
            serde_json::to_string_pretty(&Value::Object(object.clone())).unwrap(),
            after
        );
        let attempt = ResponseExtractor::new().extract(&raw);

        prop_assert_eq!(attempt.strategy, ExtractionStrategy::Fenced);
        prop_assert_eq!(attempt.candidate, Some(Value::Object(object)));
        prop_assert!(!attempt.prose.contains("```"));
    }

    #[test]
    fn inline_object_is_found_by_pattern(
        object in flat_object(),
        before in prose(),
        after in prose(),
    ) {
        let raw = format!("{} {} {}", before, Value::Object(object.clone()), after);
        let attempt = ResponseExtractor::new().extract(&raw);

        prop_assert!(attempt.succeeded());
        prop_assert_eq!(attempt.candidate, Some(Value::Object(object)));
    }

    #[test]
    fn prose_alone_never_extracts(text in prose()) {
        let attempt = ResponseExtractor::new().extract(&text);
        prop_assert!(!attempt.succeeded());
        prop_assert_eq!(attempt.strategy, ExtractionStrategy::None);
    }

    #[test]
    fn cleaned_text_keeps_only_layout_control_characters(text in any::<String>()) {
        let cleaned = ResponseSanitizer::new().clean(&text).unwrap();
        prop_assert!(cleaned
            .chars()
            .all(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r')));
        prop_assert!(cleaned.len() <= text.len());
    }

    #[test]
    fn project_ids_are_path_safe(title in "[A-Za-z0-9 /\\\\-]{1,40}") {
        if let Ok(id) = ProjectId::from_title(&title) {
            prop_assert!(!id.as_str().contains('/'));
            prop_assert!(!id.as_str().contains('\\'));
            prop_assert!(!id.as_str().chars().any(char::is_whitespace));
            prop_assert_eq!(ProjectId::from_title(id.as_str()).unwrap(), id);
        }
    }
}
