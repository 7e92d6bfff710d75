//! ID normalization utilities.
//!
//! Provides functions for normalizing string identifiers to consistent
//! kebab-case format. Used to derive lesson slugs from titles.

/// Normalize an identifier to lowercase kebab-case.
///
/// Performs the following transformations:
/// 1. Trims leading/trailing whitespace
/// 2. Converts to lowercase
/// 3. Drops punctuation other than `-` and `_`
/// 4. Replaces underscores with hyphens
/// 5. Collapses runs of whitespace into single hyphens
///
/// # Examples
///
/// ```
/// use mastery_core::util::ids::normalize_id;
///
/// assert_eq!(normalize_id("Adding Fractions"), "adding-fractions");
/// assert_eq!(normalize_id("place_value"), "place-value");
/// assert_eq!(normalize_id("  Mixed   Case  "), "mixed-case");
/// assert_eq!(normalize_id("What's a Noun?"), "whats-a-noun");
/// ```
pub fn normalize_id(id: &str) -> String {
    id.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-' || *c == '_')
        .collect::<String>()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // normalize_id tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_normalize_id_simple() {
        assert_eq!(normalize_id("fractions"), "fractions");
    }

    #[test]
    fn test_normalize_id_with_spaces() {
        assert_eq!(normalize_id("Equivalent Fractions"), "equivalent-fractions");
    }

    #[test]
    fn test_normalize_id_with_underscores() {
        assert_eq!(normalize_id("long_division"), "long-division");
    }

    #[test]
    fn test_normalize_id_drops_punctuation() {
        assert_eq!(
            normalize_id("Unit 1, Lesson 2: Nouns!"),
            "unit-1-lesson-2-nouns"
        );
    }

    #[test]
    fn test_normalize_id_already_normalized() {
        assert_eq!(normalize_id("place-value"), "place-value");
    }

    #[test]
    fn test_normalize_id_empty() {
        assert_eq!(normalize_id(""), "");
        assert_eq!(normalize_id("   "), "");
    }
}
