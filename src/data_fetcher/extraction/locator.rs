//! Finding the inline script that carries a payload.

use super::marker_pattern;
use crate::error::AppError;
use scraper::{Html, Selector};
use tracing::debug;

/// Returns the text of every inline `<script>` element in document order.
/// Scripts loaded through `src` have no body and are skipped.
pub fn collect_scripts(document: &str) -> Result<Vec<String>, AppError> {
    let html = Html::parse_document(document);
    let selector = Selector::parse("script")
        .map_err(|e| AppError::decode("script", format!("invalid selector: {e:?}")))?;

    Ok(html
        .select(&selector)
        .filter(|element| element.value().attr("src").is_none())
        .map(|element| element.text().collect::<String>())
        .collect())
}

/// Returns the first inline script whose text assigns `marker` from a
/// `JSON.parse('...')` call.
pub fn locate_script(document: &str, marker: &str) -> Result<String, AppError> {
    let pattern = marker_pattern(marker)?;
    let scripts = collect_scripts(document)?;
    debug!("Scanning {} inline scripts for {marker}", scripts.len());

    scripts
        .into_iter()
        .find(|script| pattern.is_match(script))
        .ok_or_else(|| AppError::script_not_found(marker))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <script src="/js/app.min.js"></script>
  <script>window.dataLayer = [];</script>
</head>
<body>
  <div class="chemp">teamsData = JSON.parse('not in a script')</div>
  <script>
    var datesData = JSON.parse('\x5B\x5D');
  </script>
  <script>
    var teamsData = JSON.parse('\x7B\x7D');
    var playersData = JSON.parse('\x5B\x5D');
  </script>
</body>
</html>"#;

    #[test]
    fn test_collect_scripts_in_document_order() {
        let scripts = collect_scripts(PAGE).unwrap();
        assert_eq!(scripts.len(), 3);
        assert!(scripts[0].contains("dataLayer"));
        assert!(scripts[1].contains("datesData"));
        assert!(scripts[2].contains("teamsData"));
    }

    #[test]
    fn test_locate_script_skips_non_script_text() {
        let script = locate_script(PAGE, "teamsData").unwrap();
        assert!(script.contains("var teamsData"));
        assert!(script.contains("playersData"));
    }

    #[test]
    fn test_locate_script_returns_first_match() {
        let page = "<script>var a = 1;</script>\
                    <script>shotsData = JSON.parse('\\x5B1\\x5D')</script>\
                    <script>shotsData = JSON.parse('\\x5B2\\x5D')</script>";
        let script = locate_script(page, "shotsData").unwrap();
        assert!(script.contains("\\x5B1\\x5D"));
    }

    #[test]
    fn test_locate_script_not_found() {
        let err = locate_script(PAGE, "rostersData").unwrap_err();
        assert!(matches!(err, AppError::ScriptNotFound { ref marker } if marker == "rostersData"));
    }

    #[test]
    fn test_empty_document() {
        assert!(collect_scripts("").unwrap().is_empty());
        assert!(matches!(
            locate_script("", "teamsData"),
            Err(AppError::ScriptNotFound { .. })
        ));
    }
}
