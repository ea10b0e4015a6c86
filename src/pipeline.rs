use crate::config::Config;
use crate::db::{merge_listings, ListingStore, MergeOutcome};
use crate::domain::{average_price_per_area, filter_matches, normalize_listings};
use crate::errors::PipelineError;
use crate::mailer::Notifier;
use crate::scraper::{fetch_all_listings_paginated, ScraperError, StopReason};
use crate::templates::render_report;
use serde_json::Value;
use tracing::{error, info, warn};

/// What one run did, stage by stage.
#[derive(Debug)]
pub struct RunSummary {
    pub pages_fetched: u32,
    pub listings_fetched: usize,
    pub listings_normalized: usize,
    pub fetch_stop: StopReason,
    pub merge: MergeOutcome,
    pub matches: usize,
    pub notified: bool,
}

/// fetch -> normalize -> merge -> filter/aggregate -> render -> notify.
///
/// Only a normalization failure ends the run early, and it does so before
/// the store is opened. A failed first page is not treated as an outage: the
/// run carries on with no listings and the report says where fetching stopped.
pub fn run_alert<F>(
    config: &Config,
    fetch_page: F,
    notifier: &dyn Notifier,
) -> Result<RunSummary, PipelineError>
where
    F: FnMut(u32) -> Result<Vec<Value>, ScraperError>,
{
    info!(page_cap = config.page_cap, scope = %config.search.scope, "start the fetch data activity");
    let fetched = fetch_all_listings_paginated(config.page_cap, fetch_page);
    let fetch_failure = fetched.failure();
    if let Some(reason) = &fetch_failure {
        if fetched.pages_fetched == 0 {
            error!(%reason, "no listings retrieved; continuing with an empty set");
        } else {
            warn!(%reason, pages = fetched.pages_fetched, "fetch truncated");
        }
    }

    let listings_fetched = fetched.docs.len();
    let listings = normalize_listings(fetched.docs, config.normalize_policy)?;

    let store = ListingStore::new(&config.store_path);
    let merge = merge_listings(&store, &listings);

    let aggregates = average_price_per_area(&listings);
    let matches = filter_matches(&listings, &config.criteria);
    info!(matches = matches.len(), "filtered listings");

    let report = render_report(&aggregates, &merge, fetch_failure.as_deref(), &matches);

    let notified = match notifier.send(&report) {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "failed to send email");
            false
        }
    };

    Ok(RunSummary {
        pages_fetched: fetched.pages_fetched,
        listings_fetched,
        listings_normalized: listings.len(),
        fetch_stop: fetched.stop,
        merge,
        matches: matches.len(),
        notified,
    })
}
