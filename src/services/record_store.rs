use std::sync::{PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use url::Url;

use crate::db::RecordStore;
use crate::error::{AppError, Result};
use crate::models::{NewSummaryRecord, SummaryRecord};

use super::base_url;

const SUMMARIES_PATH: &str = "rest/v1/summaries";

/// PostgREST client for the `summaries` table of the hosted record store.
///
/// Requests carry the store key as `apikey`. The bearer is the signed-in
/// user's access token when one is set, so row-level security sees that user.
pub struct RestRecordStore {
    client: Client,
    base_url: Url,
    api_key: String,
    access_token: RwLock<Option<String>>,
}

impl RestRecordStore {
    pub fn new(base: &str, api_key: String) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: base_url(base)?,
            api_key,
            access_token: RwLock::new(None),
        })
    }

    fn summaries_url(&self) -> Result<Url> {
        Ok(self.base_url.join(SUMMARIES_PATH)?)
    }

    fn request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let bearer = self
            .access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .unwrap_or_else(|| self.api_key.clone());

        self.client
            .request(method, url)
            .header("apikey", &self.api_key)
            .bearer_auth(bearer)
    }

    /// Sends a filtered DELETE and returns the number of rows removed.
    async fn delete_where(&self, filters: &[(&str, String)]) -> Result<u64> {
        let response = self
            .request(reqwest::Method::DELETE, self.summaries_url()?)
            .header("Prefer", "return=representation")
            .query(filters)
            .send()
            .await?;

        let deleted: Vec<SummaryRecord> = check_status(response).await?.json().await?;
        Ok(deleted.len() as u64)
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await?;
    Err(AppError::RecordStore(format!("API error ({status}): {error_text}")))
}

#[async_trait]
impl RecordStore for RestRecordStore {
    async fn insert_summary(&self, summary: NewSummaryRecord) -> Result<SummaryRecord> {
        let response = self
            .request(reqwest::Method::POST, self.summaries_url()?)
            .header("Prefer", "return=representation")
            .json(&[summary])
            .send()
            .await?;

        let inserted: Vec<SummaryRecord> = check_status(response).await?.json().await?;

        inserted
            .into_iter()
            .next()
            .ok_or_else(|| AppError::RecordStore("No record returned from insert".to_string()))
    }

    async fn list_summaries(&self, user_id: Option<&str>) -> Result<Vec<SummaryRecord>> {
        let mut query = vec![
            ("select", "*".to_string()),
            ("order", "id.desc".to_string()),
        ];
        if let Some(user_id) = user_id {
            query.push(("user_id", format!("eq.{user_id}")));
        }

        let response = self
            .request(reqwest::Method::GET, self.summaries_url()?)
            .query(&query)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    async fn delete_summary(&self, id: i64, user_id: Option<&str>) -> Result<u64> {
        let mut filters = vec![("id", format!("eq.{id}"))];
        if let Some(user_id) = user_id {
            filters.push(("user_id", format!("eq.{user_id}")));
        }

        let deleted = self.delete_where(&filters).await?;
        tracing::debug!(id, deleted, "Deleted summary from record store");
        Ok(deleted)
    }

    async fn delete_summaries_by_url(&self, url: &str, user_id: Option<&str>) -> Result<u64> {
        let mut filters = vec![("url", format!("eq.{url}"))];
        if let Some(user_id) = user_id {
            filters.push(("user_id", format!("eq.{user_id}")));
        }

        let deleted = self.delete_where(&filters).await?;
        tracing::debug!(url, deleted, "Deleted summaries from record store");
        Ok(deleted)
    }

    fn set_access_token(&self, access_token: Option<String>) {
        *self
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = access_token;
    }
}
