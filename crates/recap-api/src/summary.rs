//! Yearly summary narrative over analyzed media records.

use recap_core::models::{AnalysisResult, MediaRecord};

const NO_MEDIA_MESSAGE: &str = "No media has been analyzed yet.";
const NO_EVENTS_MESSAGE: &str =
    "Your media has been processed, but no significant events were detected.";
const LEAD_IN: &str = "Here's what your year looked like: ";
const MAX_EVENTS: usize = 5;

/// Build the narrative from records ordered newest upload first.
///
/// Stored blobs are parsed as inert JSON with the [`AnalysisResult`] schema;
/// records whose blob is absent or unparseable are skipped.
pub fn generate_yearly_summary(records: &[MediaRecord]) -> String {
    if records.is_empty() {
        return NO_MEDIA_MESSAGE.to_string();
    }

    let events: Vec<String> = records
        .iter()
        .filter_map(|record| record.analysis_result.as_deref())
        .filter_map(|blob| serde_json::from_str::<AnalysisResult>(blob).ok())
        .map(|analysis| analysis.description)
        .collect();

    if events.is_empty() {
        return NO_EVENTS_MESSAGE.to_string();
    }

    let mut summary = String::from(LEAD_IN);
    summary.push_str(&events[..events.len().min(MAX_EVENTS)].join(" "));
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use recap_core::models::MediaKind;

    fn record(id: i64, analysis_result: Option<&str>) -> MediaRecord {
        MediaRecord {
            id,
            filename: format!("item{}.jpg", id),
            upload_date: Utc::now(),
            analysis_result: analysis_result.map(|s| s.to_string()),
            media_type: MediaKind::Image,
            processed: true,
        }
    }

    fn blob(description: &str) -> String {
        serde_json::to_string(&AnalysisResult {
            description: description.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_no_records() {
        assert_eq!(generate_yearly_summary(&[]), NO_MEDIA_MESSAGE);
    }

    #[test]
    fn test_limits_to_first_five_descriptions() {
        let blobs: Vec<String> = (1..=7).map(|i| blob(&format!("event {}", i))).collect();
        let records: Vec<MediaRecord> = blobs
            .iter()
            .enumerate()
            .map(|(i, b)| record(i as i64 + 1, Some(b)))
            .collect();

        let summary = generate_yearly_summary(&records);
        assert_eq!(
            summary,
            "Here's what your year looked like: event 1 event 2 event 3 event 4 event 5"
        );
    }

    #[test]
    fn test_skips_unparseable_blobs() {
        let good = blob("the good one");
        let records = vec![
            record(1, Some("not json at all")),
            record(2, Some(&good)),
            record(3, None),
        ];

        let summary = generate_yearly_summary(&records);
        assert_eq!(summary, "Here's what your year looked like: the good one");
    }

    #[test]
    fn test_all_blobs_unusable() {
        let records = vec![record(1, Some("{broken")), record(2, None)];
        assert_eq!(generate_yearly_summary(&records), NO_EVENTS_MESSAGE);
    }

    #[test]
    fn test_empty_descriptions_still_count_as_events() {
        let empty = blob("");
        let records = vec![record(1, Some(&empty))];
        let summary = generate_yearly_summary(&records);
        assert_eq!(summary, LEAD_IN.to_string());
    }
}
