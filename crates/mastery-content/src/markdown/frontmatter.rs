//! Frontmatter extraction from lesson markdown.
//!
//! Frontmatter is a `key: value` block at the very start of a lesson file,
//! delimited by `---` lines:
//!
//! ```markdown
//! ---
//! title: "Adding Fractions"
//! difficulty: intermediate
//! estimatedMinutes: 45
//! tags: ["fractions", "arithmetic"]
//! ---
//!
//! # Adding Fractions
//! ```
//!
//! Values are typed in a fixed priority order: boolean, bracketed list,
//! number, then string (with one layer of surrounding quotes removed).
//! Bracketed lists are read as JSON first and fall back to a comma split.
//! Block-style lists (`key:` followed by `- item` lines) are also accepted.
//!
//! Extraction never fails. An unterminated block degrades to "no
//! frontmatter" and the whole input is treated as body; unparseable lines
//! inside a block are skipped.
//!
//! # Usage
//!
//! ```rust
//! use mastery_content::markdown::extract_frontmatter;
//!
//! let content = "---\ntitle: Test\nestimatedMinutes: 20\n---\n\nBody";
//! let result = extract_frontmatter(content);
//!
//! assert!(result.has_frontmatter());
//! assert_eq!(result.body().trim(), "Body");
//!
//! let fm = result.frontmatter().unwrap();
//! assert_eq!(fm.get_str("title"), Some("Test"));
//! assert_eq!(fm.get_number("estimatedMinutes"), Some(20.0));
//! ```

use serde_json::Value;

/// A typed frontmatter value.
#[derive(Clone, Debug, PartialEq)]
pub enum FrontmatterValue {
    /// `true` or `false`.
    Bool(bool),
    /// Any finite decimal number.
    Number(f64),
    /// A string with surrounding quotes removed.
    Text(String),
    /// A bracketed or block-style list.
    List(Vec<String>),
}

impl FrontmatterValue {
    /// Returns the string value, if this is text.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the numeric value, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Ordered `key -> value` frontmatter entries.
///
/// Later duplicates of a key replace earlier ones.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frontmatter {
    entries: Vec<(String, FrontmatterValue)>,
}

impl Frontmatter {
    /// Creates an empty frontmatter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value, keeping first-seen key order.
    pub fn insert(&mut self, key: impl Into<String>, value: FrontmatterValue) {
        let key = key.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Look up a value by exact key.
    pub fn get(&self, key: &str) -> Option<&FrontmatterValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Look up the first present key among aliases (e.g. camelCase and
    /// snake_case spellings).
    pub fn get_any(&self, keys: &[&str]) -> Option<&FrontmatterValue> {
        keys.iter().find_map(|k| self.get(k))
    }

    /// Get a string field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_str()
    }

    /// Get a numeric field.
    pub fn get_number(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_f64()
    }

    /// Get a boolean field.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    /// Get a list field. A non-empty string becomes a one-element list.
    ///
    /// Returns an empty vec if the field is missing.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(FrontmatterValue::List(items)) => items.clone(),
            Some(FrontmatterValue::Text(s)) if !s.trim().is_empty() => vec![s.clone()],
            _ => Vec::new(),
        }
    }

    /// Iterate over entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontmatterValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of frontmatter extraction.
#[derive(Debug, Clone)]
pub struct FrontmatterResult<'a> {
    frontmatter: Option<Frontmatter>,
    body: &'a str,
}

impl<'a> FrontmatterResult<'a> {
    fn without_frontmatter(body: &'a str) -> Self {
        Self {
            frontmatter: None,
            body,
        }
    }

    /// Check if a frontmatter block was found.
    pub fn has_frontmatter(&self) -> bool {
        self.frontmatter.is_some()
    }

    /// The parsed frontmatter, if present.
    pub fn frontmatter(&self) -> Option<&Frontmatter> {
        self.frontmatter.as_ref()
    }

    /// Take ownership of the parsed frontmatter.
    pub fn into_frontmatter(self) -> Option<Frontmatter> {
        self.frontmatter
    }

    /// Body content after the frontmatter block.
    pub fn body(&self) -> &'a str {
        self.body
    }
}

/// Extract frontmatter from lesson markdown.
///
/// # Behavior
///
/// - No opening `---`: body is the whole input, no frontmatter
/// - Opening `---` without a closing one: same as above
/// - Otherwise: entries are parsed and the body starts after the closing `---`
///
/// ```rust
/// use mastery_content::markdown::extract_frontmatter;
///
/// let result = extract_frontmatter("# Just Markdown");
/// assert!(!result.has_frontmatter());
/// assert_eq!(result.body(), "# Just Markdown");
/// ```
pub fn extract_frontmatter(content: &str) -> FrontmatterResult<'_> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(first_line_end) = content.find('\n') else {
        return FrontmatterResult::without_frontmatter(content);
    };
    if content[..first_line_end].trim_end() != "---" {
        return FrontmatterResult::without_frontmatter(content);
    }

    let after_open = &content[first_line_end + 1..];
    let (block, after_close) = if is_delimiter_line(after_open) {
        ("", &after_open[3..])
    } else if let Some(pos) = find_closing_delimiter(after_open) {
        (&after_open[..pos], &after_open[pos + 4..])
    } else {
        log::warn!("Frontmatter opening delimiter found but no closing delimiter");
        return FrontmatterResult::without_frontmatter(content);
    };

    // Drop the rest of the closing delimiter line.
    let body = match after_close.find('\n') {
        Some(pos) if after_close[..pos].trim().is_empty() => &after_close[pos + 1..],
        None if after_close.trim().is_empty() => "",
        _ => after_close,
    };

    FrontmatterResult {
        frontmatter: Some(parse_block(block)),
        body,
    }
}

/// Strip frontmatter from content, returning only the body.
///
/// ```rust
/// use mastery_content::markdown::strip_frontmatter;
///
/// let body = strip_frontmatter("---\ntitle: Test\n---\n\n# Heading");
/// assert_eq!(body.trim(), "# Heading");
/// ```
pub fn strip_frontmatter(content: &str) -> &str {
    extract_frontmatter(content).body()
}

/// Parse a raw frontmatter value using the boolean > list > number > string
/// priority.
///
/// ```rust
/// use mastery_content::markdown::frontmatter::{parse_value, FrontmatterValue};
///
/// assert_eq!(parse_value("true"), FrontmatterValue::Bool(true));
/// assert_eq!(parse_value("0.75"), FrontmatterValue::Number(0.75));
/// assert_eq!(parse_value("'quoted'"), FrontmatterValue::Text("quoted".into()));
/// assert_eq!(
///     parse_value("[a, b]"),
///     FrontmatterValue::List(vec!["a".into(), "b".into()])
/// );
/// ```
pub fn parse_value(raw: &str) -> FrontmatterValue {
    let raw = raw.trim();

    match raw {
        "true" => return FrontmatterValue::Bool(true),
        "false" => return FrontmatterValue::Bool(false),
        _ => {}
    }

    if raw.starts_with('[') && raw.ends_with(']') {
        return FrontmatterValue::List(parse_list(raw));
    }

    if let Some(n) = parse_number(raw) {
        return FrontmatterValue::Number(n);
    }

    FrontmatterValue::Text(strip_quotes(raw).to_string())
}

fn is_delimiter_line(text: &str) -> bool {
    let line = text.lines().next().unwrap_or("");
    line.trim_end() == "---"
}

/// Byte offset of the `\n` preceding the closing `---` line.
fn find_closing_delimiter(text: &str) -> Option<usize> {
    let mut search_from = 0;
    while let Some(rel) = text[search_from..].find("\n---") {
        let pos = search_from + rel;
        if is_delimiter_line(&text[pos + 1..]) {
            return Some(pos);
        }
        search_from = pos + 1;
    }
    None
}

fn parse_block(block: &str) -> Frontmatter {
    let mut fm = Frontmatter::new();
    let mut pending_list: Option<(String, Vec<String>)> = None;

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some((_, items)) = pending_list.as_mut()
            && let Some(item) = trimmed.strip_prefix("- ")
        {
            items.push(strip_quotes(item.trim()).to_string());
            continue;
        }

        if let Some((key, items)) = pending_list.take() {
            fm.insert(key, list_or_empty_text(items));
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            log::debug!("Skipping malformed frontmatter line: {trimmed}");
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            log::debug!("Skipping frontmatter line with empty key: {trimmed}");
            continue;
        }

        if value.trim().is_empty() {
            pending_list = Some((key.to_string(), Vec::new()));
        } else {
            fm.insert(key, parse_value(value));
        }
    }

    if let Some((key, items)) = pending_list {
        fm.insert(key, list_or_empty_text(items));
    }

    fm
}

fn list_or_empty_text(items: Vec<String>) -> FrontmatterValue {
    if items.is_empty() {
        FrontmatterValue::Text(String::new())
    } else {
        FrontmatterValue::List(items)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    if let Ok(values) = serde_json::from_str::<Vec<Value>>(raw) {
        return values
            .into_iter()
            .map(|v| match v {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect();
    }

    raw[1..raw.len() - 1]
        .split(',')
        .map(|item| strip_quotes(item.trim()).to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_number(raw: &str) -> Option<f64> {
    let looks_numeric = !raw.is_empty()
        && raw.chars().any(|c| c.is_ascii_digit())
        && raw
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'));
    if !looks_numeric {
        return None;
    }
    raw.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn strip_quotes(raw: &str) -> &str {
    for quote in ['"', '\''] {
        if raw.len() >= 2
            && let Some(inner) = raw.strip_prefix(quote).and_then(|r| r.strip_suffix(quote))
        {
            return inner;
        }
    }
    raw
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Delimiter handling
    // ------------------------------------------------------------------------

    #[test]
    fn test_extract_basic() {
        let content = "---\ntitle: Hello\n---\n\n# Heading\n";
        let result = extract_frontmatter(content);
        assert!(result.has_frontmatter());
        assert_eq!(result.frontmatter().unwrap().get_str("title"), Some("Hello"));
        assert_eq!(result.body(), "\n# Heading\n");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Heading\n\nText";
        let result = extract_frontmatter(content);
        assert!(!result.has_frontmatter());
        assert_eq!(result.body(), content);
    }

    #[test]
    fn test_unterminated_block_is_body() {
        let content = "---\ntitle: Oops\n\n# Heading";
        let result = extract_frontmatter(content);
        assert!(!result.has_frontmatter());
        assert_eq!(result.body(), content);
    }

    #[test]
    fn test_empty_block() {
        let result = extract_frontmatter("---\n---\nBody");
        assert!(result.has_frontmatter());
        assert!(result.frontmatter().unwrap().is_empty());
        assert_eq!(result.body(), "Body");
    }

    #[test]
    fn test_horizontal_rule_later_is_not_frontmatter() {
        let content = "# Title\n\n---\n\nMore";
        assert!(!extract_frontmatter(content).has_frontmatter());
    }

    #[test]
    fn test_crlf_line_endings() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody";
        let result = extract_frontmatter(content);
        assert_eq!(result.frontmatter().unwrap().get_str("title"), Some("Windows"));
        assert_eq!(result.body(), "Body");
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let content = "\u{feff}---\ntitle: Bom\n---\nBody";
        let result = extract_frontmatter(content);
        assert!(result.has_frontmatter());
        assert_eq!(result.body(), "Body");
    }

    #[test]
    fn test_strip_frontmatter() {
        assert_eq!(strip_frontmatter("---\na: 1\n---\nrest"), "rest");
        assert_eq!(strip_frontmatter("no fm"), "no fm");
    }

    // ------------------------------------------------------------------------
    // Value typing
    // ------------------------------------------------------------------------

    #[test]
    fn test_value_priority() {
        assert_eq!(parse_value("false"), FrontmatterValue::Bool(false));
        assert_eq!(parse_value("45"), FrontmatterValue::Number(45.0));
        assert_eq!(parse_value("-1.5"), FrontmatterValue::Number(-1.5));
        assert_eq!(parse_value("\"45\""), FrontmatterValue::Text("45".into()));
        assert_eq!(parse_value("plain text"), FrontmatterValue::Text("plain text".into()));
    }

    #[test]
    fn test_non_finite_words_are_text() {
        assert_eq!(parse_value("inf"), FrontmatterValue::Text("inf".into()));
        assert_eq!(parse_value("NaN"), FrontmatterValue::Text("NaN".into()));
    }

    #[test]
    fn test_json_list() {
        assert_eq!(
            parse_value(r#"["a, with comma", "b"]"#),
            FrontmatterValue::List(vec!["a, with comma".into(), "b".into()])
        );
        assert_eq!(
            parse_value("[1, 2]"),
            FrontmatterValue::List(vec!["1".into(), "2".into()])
        );
    }

    #[test]
    fn test_loose_list_falls_back_to_split() {
        assert_eq!(
            parse_value("[fractions, 'decimals', ]"),
            FrontmatterValue::List(vec!["fractions".into(), "decimals".into()])
        );
        assert_eq!(parse_value("[]"), FrontmatterValue::List(vec![]));
    }

    #[test]
    fn test_block_style_list() {
        let content = "---\ntags:\n  - nouns\n  - \"grammar\"\nlevel: 2\n---\n";
        let fm = extract_frontmatter(content).into_frontmatter().unwrap();
        assert_eq!(fm.get_list("tags"), vec!["nouns", "grammar"]);
        assert_eq!(fm.get_number("level"), Some(2.0));
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let content = "---\nnot a pair\n: no key\ntitle: Kept\n# comment\n---\n";
        let fm = extract_frontmatter(content).into_frontmatter().unwrap();
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.get_str("title"), Some("Kept"));
    }

    #[test]
    fn test_value_containing_colon() {
        let content = "---\ntitle: Ratios: Part 2\n---\n";
        let fm = extract_frontmatter(content).into_frontmatter().unwrap();
        assert_eq!(fm.get_str("title"), Some("Ratios: Part 2"));
    }

    #[test]
    fn test_get_any_aliases() {
        let content = "---\nestimated_minutes: 25\n---\n";
        let fm = extract_frontmatter(content).into_frontmatter().unwrap();
        let value = fm.get_any(&["estimatedMinutes", "estimated_minutes"]);
        assert_eq!(value, Some(&FrontmatterValue::Number(25.0)));
    }

    #[test]
    fn test_duplicate_key_replaces() {
        let content = "---\ntitle: One\ntitle: Two\n---\n";
        let fm = extract_frontmatter(content).into_frontmatter().unwrap();
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.get_str("title"), Some("Two"));
    }

    #[test]
    fn test_get_list_from_text() {
        let mut fm = Frontmatter::new();
        fm.insert("prerequisites", FrontmatterValue::Text("unit-1".into()));
        assert_eq!(fm.get_list("prerequisites"), vec!["unit-1"]);
        assert!(fm.get_list("missing").is_empty());
    }
}
