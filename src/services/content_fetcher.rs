use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::transform::FALLBACK_CONTENT;

const USER_AGENT_STRING: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";
const MIN_CONTENT_CHARS: usize = 200;

pub struct ContentFetcher {
    client: Client,
}

impl ContentFetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client })
    }

    /// Fetch a blog page and extract its readable text
    pub async fn fetch_content(&self, blog_url: &str) -> Result<Option<String>> {
        let url = match Url::parse(blog_url) {
            Ok(u) if matches!(u.scheme(), "http" | "https") => u,
            _ => return Ok(None),
        };

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));

        let response = self.client.get(url).headers(headers).send().await?;

        if !response.status().is_success() {
            tracing::debug!("Failed to fetch {}: {}", blog_url, response.status());
            return Ok(None);
        }

        let html = response.text().await?;
        Ok(extract_content(&html))
    }

    /// Content to summarize for `blog_url`, falling back to the built-in sample.
    pub async fn content_or_fallback(&self, blog_url: &str) -> String {
        match self.fetch_content(blog_url).await {
            Ok(Some(content)) => content,
            Ok(None) => FALLBACK_CONTENT.to_string(),
            Err(e) => {
                tracing::warn!("Could not fetch {}: {}", blog_url, e);
                FALLBACK_CONTENT.to_string()
            }
        }
    }
}

/// Extract readable content from HTML using html2text
fn extract_content(html: &str) -> Option<String> {
    let text = match html2text::from_read(html.as_bytes(), 80) {
        Ok(t) => t,
        Err(e) => {
            tracing::debug!("Failed to convert HTML to text: {}", e);
            return None;
        }
    };

    // Paragraph breaks become spaces so the first sentence stays on one line
    let cleaned: String = text
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.chars().count() > MIN_CONTENT_CHARS {
        Some(cleaned)
    } else {
        tracing::debug!("Extracted content too short ({} chars)", cleaned.len());
        None
    }
}
