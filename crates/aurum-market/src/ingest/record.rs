//! The common text record every source adapter produces

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One unit of ingested text in the shared schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRecord {
    pub timestamp: DateTime<Utc>,
    pub title: String,
    pub body: String,
    /// Title and body joined by a single space; derived at construction
    pub combined_text: String,
    pub source_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl TextRecord {
    pub fn new(
        timestamp: DateTime<Utc>,
        title: impl Into<String>,
        body: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Self {
        let title = title.into();
        let body = body.into();
        let combined_text = combine_text(&title, &body);

        Self {
            timestamp,
            title,
            body,
            combined_text,
            source_name: source_name.into(),
            url: None,
            country: None,
            language: None,
        }
    }

    /// Attach a URL; blank URLs are stored as absent
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = non_blank(url);
        self
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = non_blank(country);
        self
    }

    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = non_blank(language);
        self
    }

    /// Case-insensitive substring match on the combined text
    pub fn mentions(&self, keyword_lowercase: &str) -> bool {
        !keyword_lowercase.is_empty()
            && self.combined_text.to_lowercase().contains(keyword_lowercase)
    }
}

/// Join title and body with one space, skipping empty parts
pub fn combine_text(title: &str, body: &str) -> String {
    [title.trim(), body.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine_text() {
        assert_eq!(combine_text("Gold rallies", "Fed holds rates"), "Gold rallies Fed holds rates");
        assert_eq!(combine_text("Gold rallies", ""), "Gold rallies");
        assert_eq!(combine_text("", "Only body"), "Only body");
        assert_eq!(combine_text("  Padded ", "  "), "Padded");
        assert_eq!(combine_text("", ""), "");
    }

    #[test]
    fn test_record_builders() {
        let record = TextRecord::new(Utc::now(), "Gold hits record high", "", "Kitco")
            .with_url(Some(String::new()))
            .with_country(Some("Peru".to_string()))
            .with_language(None);

        assert_eq!(record.combined_text, "Gold hits record high");
        assert!(record.url.is_none());
        assert_eq!(record.country.as_deref(), Some("Peru"));
        assert!(record.language.is_none());
    }

    #[test]
    fn test_mentions() {
        let record = TextRecord::new(Utc::now(), "GOLD climbs", "silver lags", "Reuters");
        assert!(record.mentions("gold"));
        assert!(record.mentions("silver"));
        assert!(!record.mentions("bitcoin"));
        assert!(!record.mentions(""));
    }
}
