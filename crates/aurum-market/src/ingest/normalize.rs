//! Merge adapter outputs into one deduplicated, time-ordered collection

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::AdapterOutput;
use super::record::TextRecord;

/// Normalize adapter outputs using the current time as ingestion time
pub fn normalize(outputs: Vec<AdapterOutput>) -> Vec<TextRecord> {
    normalize_at(outputs, Utc::now())
}

/// Normalize adapter outputs with an explicit ingestion time
///
/// Records are deduplicated by exact title in arrival order (adapter order, then
/// item order) so the first adapter to report a headline keeps it. Records with no
/// text at all are dropped; an empty title never counts as a duplicate. The result
/// is then stable-sorted newest first.
pub fn normalize_at(outputs: Vec<AdapterOutput>, ingested_at: DateTime<Utc>) -> Vec<TextRecord> {
    let mut seen_titles: HashSet<String> = HashSet::new();
    let mut records = Vec::new();
    let mut dropped = 0usize;
    let mut duplicates = 0usize;

    for output in outputs {
        for raw in &output.records {
            let record = raw.to_text_record(ingested_at);

            if record.combined_text.is_empty() {
                dropped += 1;
                continue;
            }

            if !record.title.is_empty() && !seen_titles.insert(record.title.clone()) {
                duplicates += 1;
                continue;
            }

            records.push(record);
        }
    }

    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    debug!(
        kept = records.len(),
        duplicates,
        dropped,
        "Normalized adapter outputs"
    );

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::raw::{AlphaVantageFeedItem, NewsApiArticle, NewsApiSource, RawRecord};
    use chrono::TimeZone;

    fn article(title: &str, published_at: &str, source: &str) -> RawRecord {
        RawRecord::NewsApi(NewsApiArticle {
            source: NewsApiSource {
                id: None,
                name: Some(source.to_string()),
            },
            title: Some(title.to_string()),
            description: Some("body".to_string()),
            published_at: Some(published_at.to_string()),
            ..Default::default()
        })
    }

    fn feed_item(title: &str, time_published: &str) -> RawRecord {
        RawRecord::AlphaVantage(AlphaVantageFeedItem {
            title: Some(title.to_string()),
            time_published: Some(time_published.to_string()),
            source: Some("Benzinga".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_empty_input() {
        assert!(normalize(Vec::new()).is_empty());
    }

    #[test]
    fn test_duplicate_title_keeps_first_adapter() {
        let outputs = vec![
            AdapterOutput::new("newsapi", vec![article("Gold hits record", "2025-02-27T10:00:00Z", "Reuters")]),
            AdapterOutput::new("alpha_vantage", vec![feed_item("Gold hits record", "20250228T100000")]),
        ];

        let records = normalize(outputs);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_name, "Reuters");
    }

    #[test]
    fn test_sorted_newest_first() {
        let outputs = vec![AdapterOutput::new(
            "newsapi",
            vec![
                article("Old", "2025-02-25T10:00:00Z", "A"),
                article("Newest", "2025-02-27T10:00:00Z", "B"),
                article("Middle", "2025-02-26T10:00:00Z", "C"),
            ],
        )];

        let titles: Vec<String> = normalize(outputs).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["Newest", "Middle", "Old"]);
    }

    #[test]
    fn test_equal_timestamps_keep_arrival_order() {
        let outputs = vec![
            AdapterOutput::new("a", vec![article("First", "2025-02-27T10:00:00Z", "A")]),
            AdapterOutput::new("b", vec![article("Second", "2025-02-27T10:00:00Z", "B")]),
        ];

        let titles: Vec<String> = normalize(outputs).into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_bad_timestamp_uses_ingestion_time_and_empty_rows_drop() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let outputs = vec![AdapterOutput::new(
            "mixed",
            vec![
                article("Undated", "garbage", "A"),
                RawRecord::NewsApi(NewsApiArticle::default()),
                article("Dated", "2025-02-27T10:00:00Z", "B"),
            ],
        )];

        let records = normalize_at(outputs, now);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Undated");
        assert_eq!(records[0].timestamp, now);
        assert_eq!(records[1].title, "Dated");
    }

    #[test]
    fn test_untitled_records_are_not_deduplicated() {
        let untitled = |body: &str| {
            RawRecord::NewsApi(NewsApiArticle {
                description: Some(body.to_string()),
                published_at: Some("2025-02-27T10:00:00Z".to_string()),
                ..Default::default()
            })
        };
        let outputs = vec![AdapterOutput::new("a", vec![untitled("one"), untitled("two")])];

        assert_eq!(normalize(outputs).len(), 2);
    }
}
