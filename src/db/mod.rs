//! Storage seams for the two stores written on every submission.

mod memory;
mod repository;
mod schema;

pub use memory::MemoryRecordStore;
pub use repository::ContentRepository;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ContentRecord, NewContent, NewSummaryRecord, SummaryRecord};

/// Document store holding the raw content of every submitted blog.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts a new document and returns its generated id. Never deduplicates.
    async fn insert_content(&self, content: NewContent) -> Result<i64>;

    /// Deletes at most one document whose url matches exactly; returns the count.
    async fn delete_content_by_url(&self, url: &str) -> Result<u64>;

    async fn find_content_by_url(&self, url: &str) -> Result<Vec<ContentRecord>>;
}

/// Record store holding summaries, optionally owned by a user.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_summary(&self, summary: NewSummaryRecord) -> Result<SummaryRecord>;

    /// All summaries ordered by id descending, restricted to `user_id` when given.
    async fn list_summaries(&self, user_id: Option<&str>) -> Result<Vec<SummaryRecord>>;

    /// Deletes the summary with `id`, only if owned by `user_id` when given.
    /// Returns how many rows were removed.
    async fn delete_summary(&self, id: i64, user_id: Option<&str>) -> Result<u64>;

    /// Deletes every summary for `url`, restricted to `user_id` when given.
    async fn delete_summaries_by_url(&self, url: &str, user_id: Option<&str>) -> Result<u64>;

    /// Sends later requests on behalf of a signed-in user. `None` reverts to the store key.
    fn set_access_token(&self, _access_token: Option<String>) {}
}
