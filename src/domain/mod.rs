pub mod listing;
pub mod localities;
pub mod logic;
pub mod normalize;

pub use listing::NormalizedListing;
pub use logic::{average_price_per_area, filter_matches, CityAggregate, FilterCriteria};
pub use normalize::{normalize_listings, NormalizeError, NormalizePolicy};
