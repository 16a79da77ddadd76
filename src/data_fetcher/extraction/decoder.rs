//! Decoding the escaped JSON literal inside `JSON.parse('...')`.
//!
//! understat embeds its payloads as single-quoted JavaScript string literals
//! in which every quote and most punctuation is written as `\xHH`. Decoding
//! is two stages: backslash escapes are resolved to raw bytes, then the bytes
//! are read as UTF-8 and parsed as JSON. `\uXXXX` sequences are left for the
//! JSON parser, which understands them.

use super::marker_pattern;
use crate::error::AppError;
use serde_json::Value;

/// Returns the literal between `JSON.parse('` and `')` for `marker`.
pub fn extract_literal<'a>(fragment: &'a str, marker: &str) -> Result<&'a str, AppError> {
    let pattern = marker_pattern(marker)?;
    pattern
        .captures(fragment)
        .and_then(|captures| captures.get(1))
        .map(|literal| literal.as_str())
        .ok_or_else(|| {
            AppError::decode(
                marker,
                "fragment has no JSON.parse('...') literal for this marker",
            )
        })
}

/// Resolves backslash escapes to raw bytes.
///
/// Recognized: `\\ \' \" \a \b \f \n \r \t \v`, `\xHH`, one to three octal
/// digits, and backslash-newline (dropped). Any other escaped character is
/// kept together with its backslash.
pub fn unescape_literal(literal: &str, marker: &str) -> Result<Vec<u8>, AppError> {
    let bytes = literal.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        if byte != b'\\' {
            out.push(byte);
            i += 1;
            continue;
        }

        let escape_at = i;
        let Some(&kind) = bytes.get(i + 1) else {
            return Err(AppError::decode(
                marker,
                format!("trailing backslash at byte {escape_at}"),
            ));
        };
        i += 2;

        match kind {
            b'\n' => {}
            b'\\' => out.push(b'\\'),
            b'\'' => out.push(b'\''),
            b'"' => out.push(b'"'),
            b'a' => out.push(0x07),
            b'b' => out.push(0x08),
            b'f' => out.push(0x0c),
            b'n' => out.push(b'\n'),
            b'r' => out.push(b'\r'),
            b't' => out.push(b'\t'),
            b'v' => out.push(0x0b),
            b'0'..=b'7' => {
                let mut value = u32::from(kind - b'0');
                let mut digits = 1;
                while digits < 3 {
                    match bytes.get(i) {
                        Some(&digit) if (b'0'..=b'7').contains(&digit) => {
                            value = value * 8 + u32::from(digit - b'0');
                            i += 1;
                            digits += 1;
                        }
                        _ => break,
                    }
                }
                // \400..\777 wrap to a single byte
                out.push((value & 0xff) as u8);
            }
            b'x' => {
                let high = bytes.get(i).copied().and_then(hex_value);
                let low = bytes.get(i + 1).copied().and_then(hex_value);
                match (high, low) {
                    (Some(high), Some(low)) => {
                        out.push(high << 4 | low);
                        i += 2;
                    }
                    _ => {
                        return Err(AppError::decode(
                            marker,
                            format!("invalid \\x escape at byte {escape_at}"),
                        ));
                    }
                }
            }
            other => {
                out.push(b'\\');
                out.push(other);
            }
        }
    }

    Ok(out)
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// Unescapes `literal`, reads it as UTF-8 and parses the JSON.
pub fn decode_literal(literal: &str, marker: &str) -> Result<Value, AppError> {
    let bytes = unescape_literal(literal, marker)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| AppError::decode(marker, format!("payload is not valid UTF-8: {e}")))?;
    serde_json::from_str(&text).map_err(|e| {
        AppError::decode(
            marker,
            format!("payload is not valid JSON ({e}); the page escaping may have changed"),
        )
    })
}

/// Extracts the literal for `marker` from a script fragment and decodes it.
pub fn decode_fragment(fragment: &str, marker: &str) -> Result<Value, AppError> {
    let literal = extract_literal(fragment, marker)?;
    decode_literal(literal, marker)
}
