// scraper.rs
use crate::scraper::ScraperError;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{error, info, warn};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

/// Search scope sent with every page request.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Locality scope, e.g. `c969-c213-c569-c577`.
    pub scope: String,
    pub max_price: Option<u64>,
}

pub struct ListingScraper {
    client: Client,
    base_url: String,
    search: SearchParams,
}

/// Why the page loop stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// Page `n` came back with no documents.
    EmptyPage(u32),
    /// Every page up to the cap had documents.
    PageCap(u32),
    /// Page `page` failed; earlier pages are kept.
    Failed { page: u32, reason: String },
}

#[derive(Debug)]
pub struct FetchOutcome {
    pub docs: Vec<Value>,
    pub pages_fetched: u32,
    pub stop: StopReason,
}

impl FetchOutcome {
    pub fn failure(&self) -> Option<String> {
        match &self.stop {
            StopReason::Failed { page, reason } => {
                Some(format!("Fetch stopped at page {page}: {reason}"))
            }
            _ => None,
        }
    }
}

impl ListingScraper {
    pub fn new(
        base_url: impl Into<String>,
        search: SearchParams,
        timeout: Duration,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            search,
        })
    }

    /// Query parameters for one page. Sort order and content filters are fixed.
    pub fn page_query(&self, page: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("sort", "created_at".to_string()),
            ("ct", "1".to_string()),
            ("tp", "1".to_string()),
            ("lc", self.search.scope.clone()),
            ("direction", "desc".to_string()),
        ];
        if let Some(max) = self.search.max_price {
            params.push(("mapr", max.to_string()));
        }
        params.push(("pg", page.to_string()));
        params
    }

    pub fn fetch_page(&self, page: u32) -> Result<Vec<Value>, ScraperError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&self.page_query(page))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_else(|_| "(no body)".to_string());
            return Err(ScraperError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = resp.text()?;
        let data: Value =
            serde_json::from_str(&text).map_err(|e| ScraperError::JsonParse(e.to_string()))?;

        Ok(extract_docs(data))
    }
}

/// Pulls `data.docs` out of a page body. A missing or null list means the
/// listing ran out, same as an empty one.
fn extract_docs(mut data: Value) -> Vec<Value> {
    match data
        .get_mut("data")
        .and_then(|d| d.get_mut("docs"))
        .map(Value::take)
    {
        Some(Value::Array(docs)) => docs,
        _ => Vec::new(),
    }
}

/// Requests pages `1..=page_cap` in order until one is empty or fails.
/// Documents from every page before that point are returned in order; a
/// failure never discards them.
pub fn fetch_all_listings_paginated<F>(page_cap: u32, mut fetch_page: F) -> FetchOutcome
where
    F: FnMut(u32) -> Result<Vec<Value>, ScraperError>,
{
    let mut docs = Vec::new();
    let mut pages_fetched = 0;

    for page in 1..=page_cap {
        match fetch_page(page) {
            Ok(page_docs) if page_docs.is_empty() => {
                warn!(page, "page is empty, fetching process is interrupted");
                return FetchOutcome {
                    docs,
                    pages_fetched,
                    stop: StopReason::EmptyPage(page),
                };
            }
            Ok(page_docs) => {
                info!(page, count = page_docs.len(), "page is not empty");
                docs.extend(page_docs);
                pages_fetched += 1;
            }
            Err(e) => {
                error!(page, error = %e, "failed to fetch page");
                return FetchOutcome {
                    docs,
                    pages_fetched,
                    stop: StopReason::Failed {
                        page,
                        reason: e.to_string(),
                    },
                };
            }
        }
    }

    info!(page_cap, "reached page cap");
    FetchOutcome {
        docs,
        pages_fetched,
        stop: StopReason::PageCap(page_cap),
    }
}
