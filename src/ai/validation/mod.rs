//! AI Response Validation
//!
//! Decoding layer for model output. Upstream models are not contractually
//! pure JSON, so responses pass through layered recovery before use.

mod json_extract;

pub use json_extract::{ResponseExtractor, extract_json_from_response};
