// src/checker/keywords.rs
// Case-insensitive keyword matching for the optional page filter.

#[derive(Debug, Clone, Default)]
pub struct KeywordFilter {
    // Stored lowercased; blank keywords are dropped
    keywords: Vec<String>,
}

impl KeywordFilter {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self { keywords }
    }

    /// A filter without keywords accepts everything.
    pub fn is_active(&self) -> bool {
        !self.keywords.is_empty()
    }

    /// True when `text` contains at least one keyword.
    pub fn matches(&self, text: &str) -> bool {
        let text = text.to_lowercase();
        self.keywords.iter().any(|k| text.contains(k.as_str()))
    }

    pub fn matches_any<'a, I>(&self, texts: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().any(|t| self.matches(t))
    }
}
