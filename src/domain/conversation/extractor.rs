//! Recovery of a structured specification candidate from model output.
//!
//! Models wrap JSON in prose and markdown fences, so the extractor runs an
//! ordered list of strategies over the text and keeps the first hit:
//!
//! 1. `direct`: the whole reply is a JSON object
//! 2. `fenced`: a ```json fenced block
//! 3. `pattern`: a balanced `{...}` span found by depth matching
//!
//! Each strategy is a plain function so it can be tested on its own.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use super::sanitizer::ResponseSanitizer;

/// Which strategy produced the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    Direct,
    Fenced,
    Pattern,
    None,
}

impl fmt::Display for ExtractionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExtractionStrategy::Direct => "direct",
            ExtractionStrategy::Fenced => "fenced",
            ExtractionStrategy::Pattern => "pattern",
            ExtractionStrategy::None => "none",
        };
        f.write_str(s)
    }
}

/// A parsed object and the byte range of the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub object: Map<String, Value>,
    pub span: Range<usize>,
}

/// A strategy: text in, candidate out, no side effects.
pub type StrategyFn = fn(&str) -> Option<Candidate>;

/// Record of one extraction, kept on the turn for debugging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionAttempt {
    pub strategy: ExtractionStrategy,
    /// The model reply exactly as received.
    pub raw: String,
    /// `None` marks a failed extraction.
    pub candidate: Option<Value>,
    /// Reply text outside the structured region, cleaned for display.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionAttempt {
    fn failed(raw: &str, prose: String, error: Option<String>) -> Self {
        Self {
            strategy: ExtractionStrategy::None,
            raw: raw.to_string(),
            candidate: None,
            prose,
            error,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.candidate.is_some()
    }

    pub fn candidate_object(&self) -> Option<&Map<String, Value>> {
        self.candidate.as_ref().and_then(Value::as_object)
    }
}

/// Runs the strategy chain over model replies.
#[derive(Debug, Clone)]
pub struct ResponseExtractor {
    sanitizer: ResponseSanitizer,
    strategies: Vec<(ExtractionStrategy, StrategyFn)>,
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseExtractor {
    /// Creates an extractor with the standard direct → fenced → pattern chain.
    pub fn new() -> Self {
        Self::with_sanitizer(ResponseSanitizer::new())
    }

    pub fn with_sanitizer(sanitizer: ResponseSanitizer) -> Self {
        Self {
            sanitizer,
            strategies: vec![
                (ExtractionStrategy::Direct, direct as StrategyFn),
                (ExtractionStrategy::Fenced, fenced as StrategyFn),
                (ExtractionStrategy::Pattern, balanced as StrategyFn),
            ],
        }
    }

    pub fn extract(&self, raw: &str) -> ExtractionAttempt {
        let text = match self.sanitizer.clean(raw) {
            Ok(text) => text,
            Err(err) => return ExtractionAttempt::failed(raw, String::new(), Some(err.to_string())),
        };

        for (strategy, run) in &self.strategies {
            if let Some(candidate) = run(&text) {
                let before = &text[..candidate.span.start];
                let after = &text[candidate.span.end..];
                let prose = self
                    .sanitizer
                    .sanitize_prose(&format!("{}\n\n{}", before.trim(), after.trim()));
                return ExtractionAttempt {
                    strategy: *strategy,
                    raw: raw.to_string(),
                    candidate: Some(Value::Object(candidate.object)),
                    prose,
                    error: None,
                };
            }
        }

        ExtractionAttempt::failed(
            raw,
            self.sanitizer.sanitize_prose(&text),
            Some("no JSON object found in response".to_string()),
        )
    }
}

/// Strategy 1: the trimmed text is itself an object.
pub fn direct(text: &str) -> Option<Candidate> {
    let object = parse_object(text.trim())?;
    Some(Candidate {
        object,
        span: 0..text.len(),
    })
}

/// Strategy 2: the first ```json (or jsonc/json5) block whose body parses.
///
/// An unterminated fence runs to the end of the text, which is what a
/// reply cut off by the token limit looks like.
pub fn fenced(text: &str) -> Option<Candidate> {
    let mut cursor = 0;
    while let Some(found) = text[cursor..].find("```") {
        let open = cursor + found;
        let info_start = open + 3;
        let line_end = info_start + text[info_start..].find('\n')?;
        let body_start = line_end + 1;
        let close = text[body_start..].find("```").map(|i| body_start + i);
        let body_end = close.unwrap_or(text.len());

        if is_structured_tag(&text[info_start..line_end]) {
            if let Some(object) = parse_object(&text[body_start..body_end]) {
                return Some(Candidate {
                    object,
                    span: open..close.map_or(text.len(), |c| c + 3),
                });
            }
        }

        match close {
            Some(c) => cursor = c + 3,
            None => break,
        }
    }
    None
}

/// Strategy 3: balanced `{...}` spans, outermost first, in order of
/// appearance. The first one that parses wins.
pub fn balanced(text: &str) -> Option<Candidate> {
    // Braces already paired by an earlier scan that ran off the end of the
    // text. A scan that starts at one of them would see the same state.
    let mut known: HashMap<usize, Option<usize>> = HashMap::new();
    let mut cursor = 0;
    while let Some(found) = text[cursor..].find('{') {
        let start = cursor + found;
        let end = match known.get(&start) {
            Some(end) => *end,
            None => {
                let pairs = brace_pairs(text, start);
                let end = pairs.first().and_then(|(_, close)| *close);
                if end.is_none() {
                    known.extend(pairs.into_iter().skip(1));
                }
                end
            }
        };
        match end {
            Some(end) => {
                if let Some(object) = parse_object(&text[start..end]) {
                    return Some(Candidate {
                        object,
                        span: start..end,
                    });
                }
                cursor = end;
            }
            None => cursor = start + 1,
        }
    }
    None
}

fn is_structured_tag(info: &str) -> bool {
    info.split_whitespace()
        .next()
        .map(|tag| matches!(tag.to_ascii_lowercase().as_str(), "json" | "jsonc" | "json5"))
        .unwrap_or(false)
}

/// Byte offset just past the brace closing the one at `start`.
///
/// Braces inside string literals, including escaped quotes, are ignored.
/// Pairs every brace outside string literals, scanning from the `{` at
/// `start` until it closes. Returns `(open, end)` per opening brace in order
/// of appearance; `end` is one past the closing brace, or `None` when the
/// text runs out first.
fn brace_pairs(text: &str, start: usize) -> Vec<(usize, Option<usize>)> {
    let mut pairs = Vec::new();
    let mut open = Vec::new();
    let mut in_string = false;
    let mut escape_next = false;

    for (i, c) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            _ if in_string => {}
            '{' => {
                open.push(pairs.len());
                pairs.push((start + i, None));
            }
            '}' => {
                if let Some(index) = open.pop() {
                    pairs[index].1 = Some(start + i + 1);
                }
                if open.is_empty() {
                    break;
                }
            }
            _ => {}
        }
    }
    pairs
}

/// Parses `s` as a JSON object, retrying once without trailing commas.
fn parse_object(s: &str) -> Option<Map<String, Value>> {
    let parsed = serde_json::from_str::<Value>(s)
        .or_else(|_| serde_json::from_str::<Value>(&strip_trailing_commas(s)));
    match parsed {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Removes commas that directly precede `}` or `]` outside string literals.
fn strip_trailing_commas(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_string = false;
    let mut escape_next = false;
    for (i, c) in s.char_indices() {
        if in_string {
            if escape_next {
                escape_next = false;
            } else if c == '\\' {
                escape_next = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            ',' => {
                let next = s[i + 1..].trim_start().chars().next();
                if !matches!(next, Some('}') | Some(']')) {
                    out.push(c);
                }
            }
            _ => out.push(c),
        }
    }
    out
}
