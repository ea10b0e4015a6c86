use crate::domain::{FilterCriteria, NormalizePolicy};
use crate::mailer::MailConfig;
use crate::scraper::SearchParams;
use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://www.realestate.com.lb/laravel/api/member/properties";

#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory for the rolling log file; stderr only when unset.
    pub dir: Option<PathBuf>,
    pub file_name: String,
    /// Default filter when `RUST_LOG` is not set.
    pub level: String,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub listings_base_url: String,
    pub search: SearchParams,
    pub page_cap: u32,
    pub http_timeout: Duration,
    pub store_path: PathBuf,
    pub criteria: FilterCriteria,
    pub normalize_policy: NormalizePolicy,
    pub log: LogConfig,
    /// `None` when `BREVO_API_KEY` is unset; reports are then only logged.
    pub mail: Option<MailConfig>,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("{key} is invalid ({raw:?}): {e}")),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let listings_base_url =
            lookup("LISTINGS_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&listings_base_url)
            .with_context(|| format!("LISTINGS_BASE_URL is not a valid URL: {listings_base_url}"))?;

        let max_price = match lookup("SEARCH_MAX_PRICE") {
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("SEARCH_MAX_PRICE is invalid ({raw:?})"))?,
            ),
            None => Some(500000),
        };

        let page_cap: u32 = parse_or(&lookup, "PAGE_CAP", 50)?;
        if page_cap == 0 {
            return Err(anyhow!("PAGE_CAP must be at least 1"));
        }

        let timeout_secs: u64 = parse_or(&lookup, "HTTP_TIMEOUT_SECS", 30)?;
        if timeout_secs == 0 {
            return Err(anyhow!("HTTP_TIMEOUT_SECS must be at least 1"));
        }

        let mail = match lookup("BREVO_API_KEY").filter(|k| !k.trim().is_empty()) {
            Some(api_key) => Some(MailConfig {
                api_key,
                sender_email: lookup("ALERT_SENDER_EMAIL")
                    .context("ALERT_SENDER_EMAIL must be set when BREVO_API_KEY is")?,
                sender_name: lookup("ALERT_SENDER_NAME")
                    .unwrap_or_else(|| "Property Alert".to_string()),
                recipient_email: lookup("ALERT_RECIPIENT_EMAIL")
                    .context("ALERT_RECIPIENT_EMAIL must be set when BREVO_API_KEY is")?,
            }),
            None => None,
        };

        Ok(Self {
            listings_base_url,
            search: SearchParams {
                scope: lookup("SEARCH_SCOPE").unwrap_or_else(|| "c969-c213-c569-c577".to_string()),
                max_price,
            },
            page_cap,
            http_timeout: Duration::from_secs(timeout_secs),
            store_path: lookup("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("realestate_results.csv")),
            criteria: FilterCriteria {
                max_price: parse_or(&lookup, "ALERT_MAX_PRICE", 150000.0)?,
                max_bedrooms: parse_or(&lookup, "ALERT_MAX_BEDROOMS", 1)?,
                max_price_per_m2: parse_or(&lookup, "ALERT_MAX_PRICE_PER_M2", 2600)?,
            },
            normalize_policy: parse_or(&lookup, "NORMALIZE_POLICY", NormalizePolicy::FailBatch)?,
            log: LogConfig {
                dir: lookup("LOG_DIR").map(PathBuf::from),
                file_name: lookup("LOG_FILE").unwrap_or_else(|| "property_alert.log".to_string()),
                level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            },
            mail,
        })
    }
}
