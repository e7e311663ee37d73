//! Dual-write submission flow plus list, search and delete.
//!
//! A submission writes the content document first and the summary record
//! second. The second write is only attempted after the first succeeds, so a
//! summary never exists without its content document. The reverse is allowed:
//! a failed second write, or a later summary delete, leaves the content
//! document in place.

mod error;
mod outcome;
mod search;

pub use error::ServiceError;
pub use outcome::DualWriteOutcome;
pub use search::{filter_summaries, matches};

use std::sync::Arc;

use crate::db::{DocumentStore, RecordStore};
use crate::models::{NewContent, NewSummaryRecord, SummaryRecord, User};
use crate::transform::{self, FALLBACK_CONTENT};

#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub url: String,
    /// Blog text to summarize; the built-in sample is used when absent or blank.
    pub content: Option<String>,
}

impl SubmitRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

pub struct SummaryService {
    documents: Arc<dyn DocumentStore>,
    records: Arc<dyn RecordStore>,
    require_auth: bool,
}

impl SummaryService {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        records: Arc<dyn RecordStore>,
        require_auth: bool,
    ) -> Self {
        Self {
            documents,
            records,
            require_auth,
        }
    }

    pub fn require_auth(&self) -> bool {
        self.require_auth
    }

    fn check_user(&self, user: Option<&User>) -> Result<(), ServiceError> {
        if self.require_auth && user.is_none() {
            return Err(ServiceError::AuthRequired);
        }
        Ok(())
    }

    /// Summarizes `request.url` and stores the result in both stores.
    pub async fn submit(&self, request: SubmitRequest, user: Option<&User>) -> DualWriteOutcome {
        let url = request.url.trim();
        if url.is_empty() {
            return DualWriteOutcome::Failed(ServiceError::Validation(
                "Please enter a blog URL".to_string(),
            ));
        }
        if let Err(e) = self.check_user(user) {
            return DualWriteOutcome::Failed(e);
        }

        let content = request
            .content
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| FALLBACK_CONTENT.to_string());

        let content_id = match self
            .documents
            .insert_content(NewContent::new(url, content.as_str()))
            .await
        {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(url, "Document store insert failed: {}", e);
                return DualWriteOutcome::Failed(ServiceError::PrimaryWrite(e));
            }
        };

        let transformed = transform::transform(url, &content);

        let new_record = NewSummaryRecord {
            url: url.to_string(),
            summary: transformed.summary.clone(),
            user_id: user.map(|u| u.id.clone()),
        };

        match self.records.insert_summary(new_record).await {
            Ok(record) => {
                tracing::info!(url, id = record.id, content_id, "Saved summary to both stores");
                DualWriteOutcome::Complete {
                    record,
                    transformed,
                }
            }
            Err(e) => {
                tracing::error!(
                    url,
                    content_id,
                    "Record store insert failed after content was saved: {}",
                    e
                );
                DualWriteOutcome::Partial {
                    content_id,
                    transformed,
                    error: ServiceError::SecondaryWrite(e),
                }
            }
        }
    }

    /// Saved summaries, scoped to `user` when signed in, filtered by `query`.
    pub async fn list(
        &self,
        user: Option<&User>,
        query: &str,
    ) -> Result<Vec<SummaryRecord>, ServiceError> {
        let records = self
            .records
            .list_summaries(user.map(|u| u.id.as_str()))
            .await
            .map_err(|e| {
                tracing::error!("Failed to list summaries: {}", e);
                ServiceError::Read(e)
            })?;

        Ok(records.into_iter().filter(|r| matches(r, query)).collect())
    }

    /// Forwards the signed-in user's access token to the record store.
    ///
    /// Only for single-user front ends; the HTTP server shares one store across callers.
    pub fn use_access_token(&self, access_token: Option<String>) {
        self.records.set_access_token(access_token);
    }

    /// Deletes one summary record. The matching content document is left alone.
    ///
    /// A signed-in user can only delete their own records.
    pub async fn delete_summary(&self, id: i64, user: Option<&User>) -> Result<u64, ServiceError> {
        self.check_user(user)?;

        let deleted = self
            .records
            .delete_summary(id, user.map(|u| u.id.as_str()))
            .await
            .map_err(|e| {
                tracing::error!(id, "Failed to delete summary: {}", e);
                ServiceError::Delete(e)
            })?;

        if deleted == 0 {
            return Err(ServiceError::NotFound("No summary found to delete".to_string()));
        }
        Ok(deleted)
    }

    /// Deletes every summary record saved for `url`. Content documents are left alone.
    pub async fn delete_summaries_by_url(
        &self,
        url: &str,
        user: Option<&User>,
    ) -> Result<u64, ServiceError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ServiceError::Validation("Missing URL".to_string()));
        }
        self.check_user(user)?;

        let deleted = self
            .records
            .delete_summaries_by_url(url, user.map(|u| u.id.as_str()))
            .await
            .map_err(|e| {
                tracing::error!(url, "Failed to delete summaries: {}", e);
                ServiceError::Delete(e)
            })?;

        if deleted == 0 {
            return Err(ServiceError::NotFound("No summary found to delete".to_string()));
        }
        Ok(deleted)
    }

    /// Stores a content document on its own. Returns the document id.
    pub async fn save_content(
        &self,
        url: &str,
        content: &str,
        user: Option<&User>,
    ) -> Result<i64, ServiceError> {
        let url = url.trim();
        if url.is_empty() || content.trim().is_empty() {
            return Err(ServiceError::Validation("Missing url or content".to_string()));
        }
        self.check_user(user)?;

        self.documents
            .insert_content(NewContent::new(url, content))
            .await
            .map_err(|e| {
                tracing::error!(url, "Failed to save content: {}", e);
                ServiceError::PrimaryWrite(e)
            })
    }

    /// Removes one content document by exact url.
    pub async fn delete_content(&self, url: &str, user: Option<&User>) -> Result<u64, ServiceError> {
        if url.trim().is_empty() {
            return Err(ServiceError::Validation("Missing URL".to_string()));
        }
        self.check_user(user)?;

        let deleted = self.documents.delete_content_by_url(url).await.map_err(|e| {
            tracing::error!(url, "Failed to delete content: {}", e);
            ServiceError::Delete(e)
        })?;

        if deleted == 0 {
            return Err(ServiceError::NotFound("No document found to delete".to_string()));
        }
        Ok(deleted)
    }
}
