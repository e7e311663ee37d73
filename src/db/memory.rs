use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::models::{NewSummaryRecord, SummaryRecord};

use super::RecordStore;

/// Process-local record store used when no remote record store is configured.
#[derive(Default)]
pub struct MemoryRecordStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    records: Vec<SummaryRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_summary(&self, summary: NewSummaryRecord) -> Result<SummaryRecord> {
        let mut state = self.inner.lock().await;
        state.next_id += 1;
        let record = summary.into_record(state.next_id);
        state.records.push(record.clone());
        Ok(record)
    }

    async fn list_summaries(&self, user_id: Option<&str>) -> Result<Vec<SummaryRecord>> {
        let state = self.inner.lock().await;
        let mut records: Vec<SummaryRecord> = state
            .records
            .iter()
            .filter(|r| owned_by(r, user_id))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(records)
    }

    async fn delete_summary(&self, id: i64, user_id: Option<&str>) -> Result<u64> {
        let mut state = self.inner.lock().await;
        let before = state.records.len();
        state.records.retain(|r| !(r.id == id && owned_by(r, user_id)));
        Ok((before - state.records.len()) as u64)
    }

    async fn delete_summaries_by_url(&self, url: &str, user_id: Option<&str>) -> Result<u64> {
        let mut state = self.inner.lock().await;
        let before = state.records.len();
        state.records.retain(|r| !(r.url == url && owned_by(r, user_id)));
        Ok((before - state.records.len()) as u64)
    }
}

fn owned_by(record: &SummaryRecord, user_id: Option<&str>) -> bool {
    match user_id {
        Some(user_id) => record.user_id.as_deref() == Some(user_id),
        None => true,
    }
}
