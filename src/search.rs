use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::data_models::{SearchDepth, SearchResult};
use crate::error::SearchError;

/// Results requested from the provider per question.
pub const MAX_RESULTS: usize = 5;

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Ranked results for `query`, best first. No retries are attempted.
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<Vec<SearchResult>, SearchError>;
}

#[derive(Debug, Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: SearchDepth,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyErrorBody {
    detail: TavilyErrorDetail,
}

#[derive(Debug, Deserialize)]
struct TavilyErrorDetail {
    error: String,
}

/// Search client for the Tavily REST API.
pub struct TavilyClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TavilyClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<TavilyClient, SearchError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(TavilyClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<Vec<SearchResult>, SearchError> {
        let url = format!("{}/search", self.base_url);
        let request = TavilyRequest {
            api_key: &self.api_key,
            query,
            search_depth: depth,
            max_results: MAX_RESULTS,
        };

        log::debug!("tavily search depth={} query={query:?}", depth.as_str());
        let res = self.http.post(&url).json(&request).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            log::error!("tavily search failed with status {status}");
            if let Ok(err) = serde_json::from_str::<TavilyErrorBody>(&body) {
                return Err(SearchError::Provider(err.detail.error));
            }
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TavilyResponse = res.json().await?;
        let mut results = parsed.results;
        results.truncate(MAX_RESULTS);
        log::info!("tavily returned {} results", results.len());
        Ok(results)
    }
}
