//! Builders for understat-like pages used by unit and integration tests.

use serde_json::{Value, json};
use std::fmt::Write;

/// Escapes `text` the way understat embeds payloads: ASCII letters, digits
/// and spaces stay as they are, every other byte becomes `\xHH`.
pub fn escape_payload(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() * 2);
    for byte in text.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b' ' {
            escaped.push(char::from(byte));
        } else {
            let _ = write!(escaped, "\\x{byte:02X}");
        }
    }
    escaped
}

/// Builds an HTML page with one inline script per payload.
#[derive(Debug, Default, Clone)]
pub struct PageBuilder {
    scripts: Vec<String>,
}

impl PageBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `var <marker> = JSON.parse('<escaped json>');` in its own script.
    pub fn payload(mut self, marker: &str, value: &Value) -> Self {
        let script = format!(
            "\n    var {marker} = JSON.parse('{}');\n",
            escape_payload(&value.to_string())
        );
        self.scripts.push(script);
        self
    }

    /// Adds a script with verbatim content.
    pub fn raw_script(mut self, content: &str) -> Self {
        self.scripts.push(content.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut page = String::from(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n  <meta charset=\"utf-8\">\n  \
             <title>understat.com</title>\n  <script src=\"/js/main.min.js\"></script>\n\
             </head>\n<body>\n  <div class=\"page-wrapper\"></div>\n",
        );
        for script in &self.scripts {
            let _ = writeln!(page, "  <script>{script}</script>");
        }
        page.push_str("</body>\n</html>\n");
        page
    }
}

/// One match of a team's season history as found in `teamsData`.
/// Outcome fields follow from the score.
pub fn history_entry(date: &str, h_a: &str, scored: u32, missed: u32) -> Value {
    let (wins, draws, loses, pts) = match scored.cmp(&missed) {
        std::cmp::Ordering::Greater => (1, 0, 0, 3),
        std::cmp::Ordering::Equal => (0, 1, 0, 1),
        std::cmp::Ordering::Less => (0, 0, 1, 0),
    };
    let result = ["l", "d", "w"][wins * 2 + draws];
    json!({
        "h_a": h_a,
        "xG": f64::from(scored) * 0.9,
        "xGA": f64::from(missed) * 1.1,
        "npxG": f64::from(scored) * 0.8,
        "npxGA": f64::from(missed),
        "ppda": {"att": 240, "def": 24},
        "ppda_allowed": {"att": 300, "def": 20},
        "deep": 6,
        "deep_allowed": 3,
        "scored": scored,
        "missed": missed,
        "xpts": 1.5,
        "result": result,
        "date": date,
        "wins": wins,
        "draws": draws,
        "loses": loses,
        "pts": pts,
        "npxGD": f64::from(scored) * 0.8 - f64::from(missed),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_payload() {
        assert_eq!(escape_payload("{\"a\":1}"), "\\x7B\\x22a\\x22\\x3A1\\x7D");
        assert_eq!(escape_payload("ü"), "\\xC3\\xBC");
        assert_eq!(escape_payload("Man Utd"), "Man Utd");
    }

    #[test]
    fn test_page_builder_scripts() {
        let page = PageBuilder::new()
            .payload("teamsData", &json!({}))
            .raw_script("var x = 1;")
            .build();
        assert!(page.contains("var teamsData = JSON.parse('\\x7B\\x7D');"));
        assert!(page.contains("<script>var x = 1;</script>"));
    }

    #[test]
    fn test_history_entry_outcomes() {
        assert_eq!(history_entry("2022-08-06", "h", 2, 1)["pts"], 3);
        assert_eq!(history_entry("2022-08-06", "h", 1, 1)["result"], "d");
        assert_eq!(history_entry("2022-08-06", "a", 0, 1)["loses"], 1);
    }
}
