use crate::Todo;

/// Case-insensitive substring matcher for todo texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Whether the todo text contains the query.
    #[must_use]
    pub fn matches(&self, todo: &Todo) -> bool {
        self.matches_str(todo.text.as_str())
    }

    /// Whether `value` contains the query, ignoring case.
    #[must_use]
    pub fn matches_str(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Priority, TodoText};
    use time::OffsetDateTime;

    fn todo(text: &str) -> Todo {
        let text = TodoText::parse(text).unwrap_or_else(|err| panic!("valid text: {err}"));
        Todo::new(text, Priority::Low, None, OffsetDateTime::UNIX_EPOCH)
    }

    fn matcher(query: &str) -> TextMatcher {
        TextMatcher::new(query).unwrap_or_else(|| panic!("matcher must exist for queries with content"))
    }

    #[test]
    fn matcher_skips_blank_queries() {
        assert!(TextMatcher::new("").is_none());
        assert!(TextMatcher::new("   ").is_none());
        assert!(TextMatcher::new("\n").is_none());
    }

    #[test]
    fn matcher_respects_case_insensitive_search() {
        let item = todo("Buy milk");

        assert!(matcher("MILK").matches(&item));
        assert!(matcher("milk").matches(&item));
        assert!(matcher(" buy ").matches(&item));
        assert!(!matcher("bread").matches(&item));
    }

    #[test]
    fn matcher_folds_non_ascii_case() {
        let item = todo("Árbol de Navidad");
        assert!(matcher("árbol").matches(&item));
    }
}
