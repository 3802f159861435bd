use serde::{Deserialize, Serialize};

/// Whether a sitter is currently taking bookings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    #[default]
    Available,
    Busy,
    Offline,
}

/// A sitter listing as stored in the `babysitters` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    pub hourly_rate: f64,
    #[serde(default)]
    pub profile_image_url: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    /// Neighbourhood name, resolved through the geocode table
    pub location: String,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub is_background_checked: bool,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub availability_status: AvailabilityStatus,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Listing {
    /// Minimal listing, mostly for tests and demos
    pub fn new(id: impl Into<String>, location: impl Into<String>, hourly_rate: f64) -> Self {
        let id = id.into();
        Self {
            user_id: format!("user{}", id),
            id,
            first_name: String::new(),
            last_name: String::new(),
            bio: String::new(),
            hourly_rate,
            profile_image_url: String::new(),
            rating: 0.0,
            review_count: 0,
            location: location.into(),
            is_verified: false,
            is_background_checked: false,
            certifications: Vec::new(),
            availability_status: AvailabilityStatus::Available,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    /// "Sarah M."
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// First letter of each name, for avatar fallbacks
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .next()
            .into_iter()
            .chain(self.last_name.chars().next())
            .collect()
    }
}

#[allow(clippy::too_many_arguments)]
fn sample(
    id: &str,
    first_name: &str,
    last_name: &str,
    bio: &str,
    hourly_rate: f64,
    rating: f64,
    review_count: u32,
    location: &str,
    is_background_checked: bool,
    certifications: &[&str],
) -> Listing {
    Listing {
        id: id.to_string(),
        user_id: format!("user{}", id),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        bio: bio.to_string(),
        hourly_rate,
        profile_image_url: format!(
            "/placeholder.svg?height=200&width=300&text={} {}",
            first_name, last_name
        ),
        rating,
        review_count,
        location: location.to_string(),
        is_verified: true,
        is_background_checked,
        certifications: certifications.iter().map(|c| c.to_string()).collect(),
        availability_status: AvailabilityStatus::Available,
        created_at: "2024-01-01T00:00:00Z".to_string(),
        updated_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

/// Built-in dataset shown when the listing store is unreachable or not
/// configured.
pub fn sample_listings() -> Vec<Listing> {
    vec![
        sample(
            "1",
            "Sarah",
            "M.",
            "Experienced nanny with 5+ years caring for children ages 2-12",
            18.0,
            4.9,
            127,
            "Downtown Seattle",
            true,
            &["First Aid", "CPR", "Bilingual"],
        ),
        sample(
            "2",
            "Jessica",
            "L.",
            "Certified early childhood educator with a passion for child development",
            22.0,
            4.8,
            89,
            "Capitol Hill",
            true,
            &["First Aid", "CPR", "Early Education"],
        ),
        sample(
            "3",
            "Emily",
            "R.",
            "Fun-loving babysitter who creates engaging activities for kids",
            16.0,
            4.7,
            64,
            "Fremont",
            false,
            &["CPR"],
        ),
        sample(
            "4",
            "Michael",
            "J.",
            "Male babysitter with experience in sports and outdoor activities",
            20.0,
            4.6,
            45,
            "Ballard",
            true,
            &["First Aid", "CPR", "Sports Coach"],
        ),
    ]
}
