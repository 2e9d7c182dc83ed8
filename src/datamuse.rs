use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::consts::WORDS_ENDPOINT;
use crate::words::{LookupMode, WordEntry};

/// Source of related words for a query word
#[async_trait]
pub trait WordLookup: Send + Sync {
    async fn lookup(&self, word: &str, mode: LookupMode) -> Result<Vec<WordEntry>>;
}

pub struct DatamuseClient {
    base_url: String,
    client: reqwest::Client,
}

impl DatamuseClient {
    /// Client whose requests give up after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Full URL of the word query endpoint
    fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), WORDS_ENDPOINT)
    }
}

#[async_trait]
impl WordLookup for DatamuseClient {
    /// Single GET against the word API. No retries.
    async fn lookup(&self, word: &str, mode: LookupMode) -> Result<Vec<WordEntry>> {
        let url = self.endpoint();
        tracing::debug!(%url, %word, %mode, "querying word API");

        let response = self
            .client
            .get(&url)
            .query(&[(mode.query_param(), word)])
            .send()
            .await
            .with_context(|| format!("request to {} failed", url))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("word API error ({}): {}", status, error_text);
        }

        let entries: Vec<WordEntry> = response
            .json()
            .await
            .context("word API returned malformed JSON")?;

        tracing::debug!(count = entries.len(), "word API responded");
        Ok(entries)
    }
}
