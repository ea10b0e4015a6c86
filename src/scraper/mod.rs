pub mod models;
mod scraper;
mod scraper_error;

pub use models::RawListing;
pub use scraper::{fetch_all_listings_paginated, ListingScraper, SearchParams, StopReason};
pub use scraper_error::ScraperError;
