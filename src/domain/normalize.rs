// src/domain/normalize.rs

use crate::domain::listing::NormalizedListing;
use crate::scraper::RawListing;
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// What to do with a document that lacks a usable id, price or area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalizePolicy {
    /// Fail the whole batch; nothing from this run reaches the store.
    #[default]
    FailBatch,
    /// Drop the document, log it and keep going.
    SkipInvalid,
}

impl FromStr for NormalizePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail" | "fail_batch" => Ok(NormalizePolicy::FailBatch),
            "skip" | "skip_invalid" => Ok(NormalizePolicy::SkipInvalid),
            other => Err(format!("unknown normalize policy '{other}' (expected 'fail' or 'skip')")),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("listing #{index} could not be read: {reason}")]
    Malformed { index: usize, reason: String },
    #[error("listing #{index} has a missing or invalid '{field}'")]
    InvalidField { index: usize, field: &'static str },
}

fn normalize_one(index: usize, doc: Value) -> Result<NormalizedListing, NormalizeError> {
    let raw: RawListing = serde_json::from_value(doc).map_err(|e| NormalizeError::Malformed {
        index,
        reason: e.to_string(),
    })?;

    NormalizedListing::from_raw(&raw).map_err(|field| NormalizeError::InvalidField { index, field })
}

/// Normalizes every fetched document, keeping fetch order.
pub fn normalize_listings(
    docs: Vec<Value>,
    policy: NormalizePolicy,
) -> Result<Vec<NormalizedListing>, NormalizeError> {
    let total = docs.len();
    let mut listings = Vec::with_capacity(total);

    for (index, doc) in docs.into_iter().enumerate() {
        match normalize_one(index, doc) {
            Ok(listing) => listings.push(listing),
            Err(e) if policy == NormalizePolicy::SkipInvalid => {
                warn!(error = %e, "skipping invalid listing");
            }
            Err(e) => return Err(e),
        }
    }

    info!(total, kept = listings.len(), "data cleaning successful");
    Ok(listings)
}
