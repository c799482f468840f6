//! JSON Extraction
//!
//! Recovers structured data from LLM responses that are not contractually
//! pure JSON:
//! - Markdown code fence wrapping (```json ... ```)
//! - Stray inline backticks
//! - Conversational text before/after the payload
//!
//! Span recovery is deliberately naive (first opening delimiter to last
//! closing delimiter). Braces or brackets inside string values can shift the
//! span; no balancing or repair is attempted.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::types::ParseError;

/// Opening fence with optional language tag, e.g. "```json\n"
static FENCE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```\w*\n?").expect("valid fence regex"));

/// Any leftover run of one to three backticks
static BACKTICKS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"`{1,3}").expect("valid backtick regex"));

/// Parse a raw model response into a JSON value
///
/// This is the primary entry point for decoding model JSON output.
pub fn extract_json_from_response(raw: &str) -> Result<Value, ParseError> {
    ResponseExtractor::new().parse(raw)
}

/// Layered JSON recovery for model output
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseExtractor;

impl ResponseExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Parse, falling back to object then array spans of the cleaned text
    pub fn parse(&self, raw: &str) -> Result<Value, ParseError> {
        if raw.trim().is_empty() {
            return Err(ParseError::empty());
        }

        let cleaned = self.clean(raw);

        let direct_err = match serde_json::from_str::<Value>(&cleaned) {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        debug!("Direct JSON parse failed, searching for embedded payload");

        let mut last_err = direct_err;

        for (open, close) in [('{', '}'), ('[', ']')] {
            if let Some(span) = Self::span(&cleaned, open, close) {
                match serde_json::from_str::<Value>(span) {
                    Ok(value) => {
                        debug!("JSON recovered from {}...{} span", open, close);
                        return Ok(value);
                    }
                    Err(e) => last_err = e,
                }
            }
        }

        Err(ParseError::unparseable(cleaned, last_err))
    }

    /// Strip fence markers and stray backticks, then trim
    pub fn clean(&self, raw: &str) -> String {
        let without_fences = FENCE_OPEN.replace_all(raw, "");
        BACKTICKS.replace_all(&without_fences, "").trim().to_string()
    }

    /// Text from the first `open` to the last `close`, inclusive
    fn span(text: &str, open: char, close: char) -> Option<&str> {
        let start = text.find(open)?;
        let end = text.rfind(close)?;
        (end > start).then(|| &text[start..=end])
    }
}
