//! Content extraction helper utilities.
//!
//! Small text utilities shared by the extractor and question parser:
//!
//! - [`labeled_value`]: read `**Label:** value` / `Label: value` lines
//! - [`parse_comma_list`]: split `a, b; c` style lists
//! - [`bullet_items`]: collect `- item` lines
//! - [`strip_quotes`]: remove one layer of straight or smart quotes
//!
//! # Example
//!
//! ```rust
//! use mastery_content::markdown::helpers::{labeled_value, parse_comma_list};
//!
//! let body = "**Type:** guided\n**Instructions:** \"Work in pairs\"";
//! assert_eq!(labeled_value(body, "Type").as_deref(), Some("guided"));
//! assert_eq!(parse_comma_list("cat, dog; bird"), vec!["cat", "dog", "bird"]);
//! ```

use regex::Regex;
use std::sync::LazyLock;

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*+]\s+(.+?)\s*$").expect("valid bullet regex"));

/// Find the value of the first `Label: value` line in `content`.
///
/// The label is matched case-insensitively at the start of a line, with or
/// without bold markers (`**Label:**`, `**Label**:`) and an optional leading
/// bullet. Returns `None` when the label is absent; an empty value is
/// returned as `Some("")`.
pub fn labeled_value(content: &str, label: &str) -> Option<String> {
    let pattern = format!(
        r"(?mi)^[ \t]*(?:[-*][ \t]+)?(?:\*\*)?{}[ \t]*(?:\*\*[ \t]*:|:\*\*|:)[ \t]*(.*?)[ \t]*$",
        regex::escape(label)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches('\r').trim().to_string())
}

/// Like [`labeled_value`] but tries several labels in order.
pub fn labeled_value_any(content: &str, labels: &[&str]) -> Option<String> {
    labels.iter().find_map(|label| labeled_value(content, label))
}

/// Parse a separated list into trimmed, non-empty strings.
///
/// Splits on commas, semicolons, and vertical bars.
///
/// ```rust
/// use mastery_content::markdown::helpers::parse_comma_list;
///
/// assert_eq!(parse_comma_list("a | b"), vec!["a", "b"]);
/// assert!(parse_comma_list("  ").is_empty());
/// ```
pub fn parse_comma_list(text: &str) -> Vec<String> {
    text.split([',', ';', '|'])
        .map(|item| strip_quotes(item.trim()).trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Collect the text of every bullet line (`-`, `*`, `+`) in `content`.
pub fn bullet_items(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| BULLET_RE.captures(line))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// Remove one layer of surrounding straight or smart quotes.
pub fn strip_quotes(text: &str) -> &str {
    const PAIRS: [(char, char); 3] = [('"', '"'), ('\'', '\''), ('\u{201c}', '\u{201d}')];
    for (open, close) in PAIRS {
        if let Some(inner) = text.strip_prefix(open).and_then(|r| r.strip_suffix(close)) {
            return inner;
        }
    }
    text
}

/// Parse a percentage or fraction label into a fraction.
///
/// `"80%"` and `"80"` become `0.8`; `"0.8"` stays `0.8`. Bare whole
/// numbers are read as percentages only up to 100, so `"1.5"` and `"150"`
/// come back unscaled and fail a later range check.
pub fn parse_fraction(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    let percent = trimmed.ends_with('%');
    let cleaned = trimmed.trim_end_matches('%').trim();
    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    let whole_percent = !cleaned.contains('.') && value > 1.0 && value <= 100.0;
    if percent || whole_percent {
        Some(value / 100.0)
    } else {
        Some(value)
    }
}

/// Parse the first integer in a label value (`"45 minutes"` -> `45`).
pub fn leading_integer(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // labeled_value
    // ------------------------------------------------------------------------

    #[test]
    fn test_labeled_value_bold_forms() {
        assert_eq!(labeled_value("**Type:** guided", "type").as_deref(), Some("guided"));
        assert_eq!(labeled_value("**Type**: guided", "Type").as_deref(), Some("guided"));
        assert_eq!(labeled_value("Type: guided", "Type").as_deref(), Some("guided"));
        assert_eq!(
            labeled_value("- **Type:** guided", "Type").as_deref(),
            Some("guided")
        );
    }

    #[test]
    fn test_labeled_value_missing() {
        assert_eq!(labeled_value("nothing here", "Type"), None);
    }

    #[test]
    fn test_labeled_value_requires_line_start() {
        let body = "**Feedback if correct:** Nice work";
        assert_eq!(labeled_value(body, "Correct"), None);
        assert_eq!(
            labeled_value(body, "Feedback if correct").as_deref(),
            Some("Nice work")
        );
    }

    #[test]
    fn test_labeled_value_correct_vs_incorrect() {
        let body = "**Feedback if incorrect:** Try again\n**Feedback if correct:** Yes";
        assert_eq!(
            labeled_value(body, "Feedback if correct").as_deref(),
            Some("Yes")
        );
        assert_eq!(
            labeled_value(body, "Feedback if incorrect").as_deref(),
            Some("Try again")
        );
    }

    #[test]
    fn test_labeled_value_any_order() {
        let body = "Correct Answer: b";
        assert_eq!(
            labeled_value_any(body, &["Answer", "Correct Answer"]).as_deref(),
            Some("b")
        );
    }

    // ------------------------------------------------------------------------
    // Lists and numbers
    // ------------------------------------------------------------------------

    #[test]
    fn test_parse_comma_list_quotes() {
        assert_eq!(parse_comma_list("\"is\", 'are'"), vec!["is", "are"]);
    }

    #[test]
    fn test_bullet_items() {
        let content = "intro\n- one\n  * two\n+ three\nnot a bullet";
        assert_eq!(bullet_items(content), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_strip_quotes_smart() {
        assert_eq!(strip_quotes("\u{201c}hello\u{201d}"), "hello");
        assert_eq!(strip_quotes("\"unbalanced"), "\"unbalanced");
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_fraction("80%"), Some(0.8));
        assert_eq!(parse_fraction("75"), Some(0.75));
        assert_eq!(parse_fraction("0.9"), Some(0.9));
        assert_eq!(parse_fraction("lots"), None);
    }

    #[test]
    fn test_parse_fraction_keeps_out_of_range_values() {
        assert_eq!(parse_fraction("1.5"), Some(1.5));
        assert_eq!(parse_fraction("150"), Some(150.0));
        assert_eq!(parse_fraction("80"), Some(0.8));
        assert_eq!(parse_fraction("80%"), Some(0.8));
    }

    #[test]
    fn test_leading_integer() {
        assert_eq!(leading_integer("45 minutes"), Some(45));
        assert_eq!(leading_integer("about 20 min"), Some(20));
        assert_eq!(leading_integer("soon"), None);
    }
}
