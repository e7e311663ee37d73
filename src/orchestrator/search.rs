use crate::models::SummaryRecord;

/// Case-insensitive substring match against the url or the summary.
pub fn matches(record: &SummaryRecord, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    record.url.to_lowercase().contains(&query) || record.summary.to_lowercase().contains(&query)
}

/// Records matching `query`, in their original order.
pub fn filter_summaries<'a>(records: &'a [SummaryRecord], query: &str) -> Vec<&'a SummaryRecord> {
    records.iter().filter(|r| matches(r, query)).collect()
}
