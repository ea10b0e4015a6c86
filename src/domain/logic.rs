// src/domain/logic.rs

use crate::domain::listing::NormalizedListing;
use std::collections::BTreeMap;

/// Affordability thresholds for one run. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterCriteria {
    pub max_price: f64,
    pub max_bedrooms: i64,
    pub max_price_per_m2: i64,
}

/// Mean price-per-area for one community, over the current run only.
#[derive(Debug, Clone, PartialEq)]
pub struct CityAggregate {
    pub city: String,
    pub average_price_per_m2: f64,
}

impl FilterCriteria {
    /// A listing with no bedroom count never matches.
    pub fn matches(&self, listing: &NormalizedListing) -> bool {
        listing.price <= self.max_price
            && listing
                .bedrooms
                .is_some_and(|beds| beds <= self.max_bedrooms)
            && listing.price_per_m2 <= self.max_price_per_m2
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Groups by community label, ordered by label.
pub fn average_price_per_area(listings: &[NormalizedListing]) -> Vec<CityAggregate> {
    // Summed as f64: price_per_m2 saturates at i64::MAX for tiny areas.
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();

    for listing in listings {
        let entry = groups.entry(listing.community.as_str()).or_insert((0.0, 0));
        entry.0 += listing.price_per_m2 as f64;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(city, (sum, count))| CityAggregate {
            city: city.to_string(),
            average_price_per_m2: round2(sum / count as f64),
        })
        .collect()
}

/// Listings meeting every threshold, in their original order.
pub fn filter_matches<'a>(
    listings: &'a [NormalizedListing],
    criteria: &FilterCriteria,
) -> Vec<&'a NormalizedListing> {
    listings.iter().filter(|l| criteria.matches(l)).collect()
}
