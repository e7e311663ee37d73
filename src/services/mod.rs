mod auth;
mod content_fetcher;
mod record_store;

pub use auth::AuthClient;
pub use content_fetcher::ContentFetcher;
pub use record_store::RestRecordStore;

use std::sync::Arc;

use url::Url;

use crate::config::Config;
use crate::db::{ContentRepository, MemoryRecordStore, RecordStore};
use crate::error::{AppError, Result};
use crate::orchestrator::SummaryService;

/// Which record store key a process may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    /// Interactive client: public key only.
    Client,
    /// HTTP server: privileged key when configured.
    Server,
}

/// Everything the front ends need, built once from config.
pub struct Services {
    pub summaries: Arc<SummaryService>,
    pub auth: Option<Arc<AuthClient>>,
    pub fetcher: Option<Arc<ContentFetcher>>,
}

impl Services {
    pub async fn from_config(config: &Config, scope: KeyScope) -> Result<Self> {
        let documents = Arc::new(ContentRepository::new(&config.document_db_path).await?);

        let (records, auth): (Arc<dyn RecordStore>, Option<Arc<AuthClient>>) =
            match &config.record_store_url {
                Some(url) => {
                    let anon_key = config.record_store_anon_key.clone().ok_or_else(|| {
                        AppError::Config(
                            "record_store_anon_key is required with record_store_url".to_string(),
                        )
                    })?;
                    let data_key = match scope {
                        KeyScope::Server => config
                            .record_store_service_key
                            .clone()
                            .unwrap_or_else(|| anon_key.clone()),
                        KeyScope::Client => anon_key.clone(),
                    };
                    let records: Arc<dyn RecordStore> =
                        Arc::new(RestRecordStore::new(url, data_key)?);
                    let auth = Arc::new(AuthClient::new(url, anon_key)?);
                    (records, Some(auth))
                }
                None => {
                    if config.require_auth {
                        return Err(AppError::Config(
                            "require_auth needs record_store_url for sign-in".to_string(),
                        ));
                    }
                    tracing::warn!(
                        "No record store configured; summaries are kept in memory for this session"
                    );
                    let records: Arc<dyn RecordStore> = Arc::new(MemoryRecordStore::new());
                    (records, None)
                }
            };

        let fetcher = if config.fetch_content {
            Some(Arc::new(ContentFetcher::new()?))
        } else {
            None
        };

        Ok(Self {
            summaries: Arc::new(SummaryService::new(documents, records, config.require_auth)),
            auth,
            fetcher,
        })
    }
}

/// Parses a service base URL, making sure relative joins keep its path.
pub(crate) fn base_url(base: &str) -> Result<Url> {
    let mut url = Url::parse(base.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_existing_path() {
        let url = base_url("http://127.0.0.1:8000/proxy").unwrap();
        assert_eq!(
            url.join("rest/v1/summaries").unwrap().as_str(),
            "http://127.0.0.1:8000/proxy/rest/v1/summaries"
        );
    }

    #[test]
    fn base_url_rejects_garbage() {
        assert!(matches!(base_url("not a url"), Err(AppError::Url(_))));
    }

    #[tokio::test]
    async fn missing_record_store_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            document_db_path: dir.path().join("docs.db").to_string_lossy().to_string(),
            fetch_content: false,
            ..Config::default()
        };

        let services = Services::from_config(&config, KeyScope::Client).await.unwrap();
        assert!(services.auth.is_none());
        assert!(services.fetcher.is_none());
        assert!(!services.summaries.require_auth());
    }

    #[tokio::test]
    async fn record_store_url_needs_anon_key() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            document_db_path: dir.path().join("docs.db").to_string_lossy().to_string(),
            record_store_url: Some("https://project.supabase.co".to_string()),
            ..Config::default()
        };

        let err = Services::from_config(&config, KeyScope::Server).await.err().unwrap();
        assert!(matches!(err, AppError::Config(_)));
    }
}
