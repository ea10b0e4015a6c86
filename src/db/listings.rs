use crate::db::connection::{ListingStore, StoreError};
use crate::domain::listing::NormalizedListing;
use std::collections::HashSet;
use std::fmt;
use tracing::{error, info};

/// What a merge did to the store. The `Display` form goes into the report.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    Created { rows: usize },
    Appended { rows: usize },
    NoNewRows,
    Failed(String),
}

impl fmt::Display for MergeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeOutcome::Created { rows } => {
                write!(f, "File created and {rows} rows added to the CSV file.")
            }
            MergeOutcome::Appended { rows } => write!(f, "Added {rows} new rows to the CSV file."),
            MergeOutcome::NoNewRows => write!(f, "No new rows to add."),
            MergeOutcome::Failed(msg) => write!(f, "Failed to update CSV file: {msg}"),
        }
    }
}

/// Rows whose id is not in `seen`, first occurrence wins. Pages can overlap
/// when new listings shift the sort order mid-fetch.
fn unseen<'a>(
    listings: &'a [NormalizedListing],
    mut seen: HashSet<String>,
) -> Vec<&'a NormalizedListing> {
    listings
        .iter()
        .filter(|l| seen.insert(l.id.clone()))
        .collect()
}

fn try_merge(store: &ListingStore, listings: &[NormalizedListing]) -> Result<MergeOutcome, StoreError> {
    if !store.exists() {
        let rows = unseen(listings, HashSet::new());
        store.create(&rows)?;
        return Ok(MergeOutcome::Created { rows: rows.len() });
    }

    let existing = store.load_id_set()?;
    let new_rows = unseen(listings, existing);

    if new_rows.is_empty() {
        return Ok(MergeOutcome::NoNewRows);
    }

    store.append(&new_rows)?;
    Ok(MergeOutcome::Appended {
        rows: new_rows.len(),
    })
}

/// Appends listings whose id the store has not seen yet. Never fails: I/O
/// problems come back as [`MergeOutcome::Failed`] so the run can still report.
pub fn merge_listings(store: &ListingStore, listings: &[NormalizedListing]) -> MergeOutcome {
    info!(path = %store.path().display(), incoming = listings.len(), "starting store update");

    let outcome = match try_merge(store, listings) {
        Ok(outcome) => outcome,
        Err(e) => MergeOutcome::Failed(e.to_string()),
    };

    match &outcome {
        MergeOutcome::Failed(msg) => error!(error = %msg, "failed to update store"),
        other => info!("{other}"),
    }

    outcome
}
