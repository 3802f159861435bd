use crate::{
    data::{geocode::geocode_location, listing::Listing},
    geolocation::UserLocation,
};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, ops::RangeInclusive};

/// Filters applied on the search page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    /// Case-insensitive substring of the listing's location. Empty matches all.
    pub location: String,
    /// Inclusive hourly rate range
    pub price_range: RangeInclusive<f64>,
    /// Keep listings holding at least one of these certifications
    pub skills: Vec<String>,
    /// Only verified sitters
    pub verified: bool,
    /// Only background-checked sitters
    pub background_check: bool,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            location: String::new(),
            price_range: 10.0..=50.0,
            skills: Vec::new(),
            verified: false,
            background_check: false,
        }
    }
}

impl SearchFilters {
    pub fn matches(&self, listing: &Listing) -> bool {
        if !self.location.is_empty()
            && !listing
                .location
                .to_lowercase()
                .contains(&self.location.to_lowercase())
        {
            return false;
        }

        if !self.price_range.contains(&listing.hourly_rate) {
            return false;
        }

        if !self.skills.is_empty()
            && !self
                .skills
                .iter()
                .any(|skill| listing.certifications.contains(skill))
        {
            return false;
        }

        if self.verified && !listing.is_verified {
            return false;
        }

        !(self.background_check && !listing.is_background_checked)
    }
}

/// Result ordering on the search page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    Rating,
    PriceLow,
    PriceHigh,
    Distance,
}

fn by_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Applies `filters` then orders by `sort`. All sorts are stable.
///
/// `Distance` measures from `user_location`; without one the filtered
/// order is kept.
pub fn filter_and_sort(
    listings: &[Listing],
    filters: &SearchFilters,
    sort: SortOption,
    user_location: Option<&UserLocation>,
) -> Vec<Listing> {
    let mut results: Vec<Listing> = listings
        .iter()
        .filter(|listing| filters.matches(listing))
        .cloned()
        .collect();

    match sort {
        SortOption::Rating => results.sort_by(|a, b| by_f64(b.rating, a.rating)),
        SortOption::PriceLow => results.sort_by(|a, b| by_f64(a.hourly_rate, b.hourly_rate)),
        SortOption::PriceHigh => results.sort_by(|a, b| by_f64(b.hourly_rate, a.hourly_rate)),
        SortOption::Distance => {
            if let Some(user) = user_location {
                let origin = user.lat_lng();
                results.sort_by_cached_key(|listing| {
                    // Miles to 1e-6 precision keeps the key totally ordered
                    let miles = origin.distance_miles_to(&geocode_location(&listing.location));
                    (miles * 1e6).round() as i64
                });
            }
        }
    }

    log::debug!(
        "search kept {} of {} listings, sorted by {:?}",
        results.len(),
        listings.len(),
        sort
    );
    results
}
