pub mod connection;
pub mod listings;

pub use connection::ListingStore;
pub use listings::{merge_listings, MergeOutcome};
