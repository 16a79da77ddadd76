//! Pulling `<marker> = JSON.parse('...')` payloads out of understat pages.
//!
//! Two strategies share the same decoder:
//! - [`ExtractionStrategy::Scan`] runs the marker pattern over the raw document.
//! - [`ExtractionStrategy::Scripts`] parses the HTML first and only searches
//!   inline `<script>` bodies.
//!
//! Both report a missing assignment as [`AppError::ScriptNotFound`] and a
//! malformed literal as [`AppError::Decode`].

pub mod decoder;
pub mod locator;

use crate::error::AppError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub use decoder::{decode_fragment, decode_literal, extract_literal, unescape_literal};
pub use locator::{collect_scripts, locate_script};

/// How a page is searched for an embedded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionStrategy {
    /// Search the raw document text, no HTML parsing
    #[default]
    Scan,
    /// Parse the HTML and search inline script elements in document order
    Scripts,
}

/// Builds the pattern matching `marker = JSON.parse('<literal>')`.
/// Capture group 1 is the escaped literal. The marker must start at a word
/// boundary, and an escape such as `\'` is consumed as one unit so it never
/// ends the literal.
pub fn marker_pattern(marker: &str) -> Result<Regex, AppError> {
    Regex::new(&format!(
        r"(?s)\b{}\s*=\s*JSON\.parse\('((?:[^'\\]|\\.)*)'\)",
        regex::escape(marker)
    ))
    .map_err(|e| AppError::decode(marker, format!("invalid marker pattern: {e}")))
}

/// Extracts and decodes the payload assigned to `marker` in `document`.
pub fn extract(
    document: &str,
    marker: &str,
    strategy: ExtractionStrategy,
) -> Result<Value, AppError> {
    debug!(
        "Extracting {marker} with {strategy:?} strategy from {} bytes",
        document.len()
    );
    match strategy {
        ExtractionStrategy::Scan => scan_document(document, marker),
        ExtractionStrategy::Scripts => {
            let fragment = locate_script(document, marker)?;
            decode_fragment(&fragment, marker)
        }
    }
}

/// Direct strategy: find the assignment anywhere in the document text.
pub fn scan_document(document: &str, marker: &str) -> Result<Value, AppError> {
    let pattern = marker_pattern(marker)?;
    let captures = pattern
        .captures(document)
        .ok_or_else(|| AppError::script_not_found(marker))?;
    let literal = captures
        .get(1)
        .ok_or_else(|| AppError::decode(marker, "assignment has no string literal"))?;
    decode_literal(literal.as_str(), marker)
}
