//! Cleanup of raw model output before extraction and display.

use thiserror::Error;

/// Maximum accepted model response length (100KB).
pub const MAX_RESPONSE_LENGTH: usize = 100_000;

/// Role and template markers a model may echo back; never shown to users.
const INJECTION_MARKERS: [&str; 11] = [
    "```system",
    "```assistant",
    "[INST]",
    "[/INST]",
    "<|system|>",
    "<|assistant|>",
    "<|user|>",
    "<|im_start|>",
    "<|im_end|>",
    "<<SYS>>",
    "<</SYS>>",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SanitizationError {
    #[error("Response too long: {actual} bytes exceeds maximum of {max} bytes")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Default)]
pub struct ResponseSanitizer {
    additional_markers: Vec<String>,
}

impl ResponseSanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds markers to strip from displayed prose.
    pub fn with_additional_markers(mut self, markers: Vec<String>) -> Self {
        self.additional_markers = markers;
        self
    }

    /// Checks the size limit and drops control characters other than
    /// newlines, tabs and carriage returns.
    ///
    /// Raw control characters are illegal inside JSON strings, so removing
    /// them never breaks a structured payload.
    pub fn clean(&self, response: &str) -> Result<String, SanitizationError> {
        if response.len() > MAX_RESPONSE_LENGTH {
            return Err(SanitizationError::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: response.len(),
            });
        }
        Ok(response
            .chars()
            .filter(|c| !c.is_control() || matches!(c, '\n' | '\t' | '\r'))
            .collect())
    }

    /// Makes model prose safe to echo to the user and to replay to the model.
    pub fn sanitize_prose(&self, prose: &str) -> String {
        let mut result = prose.to_string();
        for marker in INJECTION_MARKERS {
            result = result.replace(marker, "");
        }
        for marker in &self.additional_markers {
            result = result.replace(marker.as_str(), "");
        }
        result.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_rejects_oversized_responses() {
        let big = "a".repeat(MAX_RESPONSE_LENGTH + 1);
        assert_eq!(
            ResponseSanitizer::new().clean(&big),
            Err(SanitizationError::TooLong {
                max: MAX_RESPONSE_LENGTH,
                actual: MAX_RESPONSE_LENGTH + 1
            })
        );
    }

    #[test]
    fn clean_keeps_whitespace_and_drops_other_controls() {
        let cleaned = ResponseSanitizer::new().clean("a\u{0000}b\n\tc\r\u{0007}").unwrap();
        assert_eq!(cleaned, "ab\n\tc\r");
    }

    #[test]
    fn prose_loses_role_markers() {
        let prose = ResponseSanitizer::new().sanitize_prose("<|im_start|>Sounds great! [INST]");
        assert_eq!(prose, "Sounds great!");
    }

    #[test]
    fn additional_markers_are_stripped() {
        let sanitizer = ResponseSanitizer::new().with_additional_markers(vec!["###".to_string()]);
        assert_eq!(sanitizer.sanitize_prose("### Hello"), "Hello");
    }
}
