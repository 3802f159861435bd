//! Listing data: the records themselves, where they come from, where they
//! are, and how the search page narrows them down.

pub mod geocode;
pub mod listing;
pub mod search;
pub mod source;

pub use geocode::{geocode_location, known_locations};
pub use listing::{sample_listings, AvailabilityStatus, Listing};
pub use search::{filter_and_sort, SearchFilters, SortOption};
pub use source::{load_listings, ListingSource, ListingsLoad, RestListingSource, StoreConfig};
