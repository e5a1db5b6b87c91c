//! HTTP client for the bibliographic catalog search API.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Every request is restricted to digitized periodicals.
const FORMAT_FILTER: &str = "periodicals";

/// Catalog client settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub total_timeout: Duration,
}

/// One item returned by the catalog, keyed by a globally unique identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub read_url: Option<String>,
}

/// Paged-free search response: the catalog returns one ranked window.
#[derive(Debug, Deserialize)]
pub struct SearchOutcome {
    pub items: Vec<CatalogItem>,
    pub total_count: u64,
}

/// Compiled request parameters for one search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: String,
    pub second_keyword: Option<String>,
    pub third_keyword: Option<String>,
    pub collections: Vec<String>,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
}

/// Thin search wrapper over the catalog HTTP API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: Url,
}

impl CatalogClient {
    /// Build a client with connect and total timeouts applied.
    ///
    /// # Errors
    /// Fails when the base URL does not parse or the HTTP client cannot be
    /// constructed.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.total_timeout)
            .build()
            .context("failed to build catalog HTTP client")?;

        let base_url = Url::parse(&config.base_url).context("invalid catalog base URL")?;

        Ok(Self { client, base_url })
    }

    /// Execute one search call.
    ///
    /// # Errors
    /// Fails on transport errors, non-2xx statuses (with the response body
    /// in the error context), and malformed payloads. Callers treat any of
    /// these as zero results for the strategy.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
        let mut url = self
            .base_url
            .join("v1/search")
            .context("failed to build catalog search URL")?;

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("keyword", &request.keyword);
            if let Some(second) = &request.second_keyword {
                query.append_pair("second_keyword", second);
            }
            if let Some(third) = &request.third_keyword {
                query.append_pair("third_keyword", third);
            }
            query.append_pair("format", FORMAT_FILTER);
            for collection in &request.collections {
                query.append_pair("collection", collection);
            }
            if let Some(year_start) = request.year_start {
                query.append_pair("year_start", &year_start.to_string());
            }
            if let Some(year_end) = request.year_end {
                query.append_pair("year_end", &year_end.to_string());
            }
        }

        debug!(url = %url, "catalog search request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("catalog search request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("catalog returned error status {status}: {body}");
        }

        response
            .json::<SearchOutcome>()
            .await
            .context("malformed catalog search payload")
    }

    /// Health probe against the catalog root.
    ///
    /// # Errors
    /// Fails when the request cannot be sent or the catalog answers with an
    /// error status.
    pub async fn ping(&self) -> Result<()> {
        let url = self
            .base_url
            .join("v1/health")
            .context("failed to build catalog health URL")?;

        self.client
            .get(url)
            .send()
            .await
            .context("catalog health request failed")?
            .error_for_status()
            .context("catalog health endpoint returned error status")?;

        Ok(())
    }
}
