//! The three-step booking flow and its price arithmetic
//!
//! Nothing is persisted or charged: submitting logs the booking and hands
//! back a summary.

use crate::{data::listing::Listing, MapError, Result};
use serde::{Deserialize, Serialize};

/// Flat per-service surcharge, per hour, applied regardless of service
pub const SERVICE_FEE_PER_HOUR: f64 = 5.0;
/// Platform commission on the pre-fee subtotal
pub const PLATFORM_FEE_RATE: f64 = 0.10;
/// Durations offered in the picker, in hours
pub const DURATION_CHOICES: [u32; 4] = [3, 4, 6, 8];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingType {
    /// Confirmed immediately
    #[default]
    Instant,
    /// Waits for the sitter to accept
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum BookingStep {
    #[default]
    Schedule,
    Details,
    Payment,
}

impl BookingStep {
    pub fn number(self) -> u8 {
        match self {
            BookingStep::Schedule => 1,
            BookingStep::Details => 2,
            BookingStep::Payment => 3,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            BookingStep::Schedule => "Book",
            BookingStep::Details => "Details",
            BookingStep::Payment => "Payment",
        }
    }

    fn next(self) -> Option<Self> {
        match self {
            BookingStep::Schedule => Some(BookingStep::Details),
            BookingStep::Details => Some(BookingStep::Payment),
            BookingStep::Payment => None,
        }
    }

    fn previous(self) -> Option<Self> {
        match self {
            BookingStep::Schedule => None,
            BookingStep::Details => Some(BookingStep::Schedule),
            BookingStep::Payment => Some(BookingStep::Details),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdditionalService {
    Homework,
    Meals,
    Transport,
    Housework,
}

impl AdditionalService {
    pub const ALL: [AdditionalService; 4] = [
        AdditionalService::Homework,
        AdditionalService::Meals,
        AdditionalService::Transport,
        AdditionalService::Housework,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AdditionalService::Homework => "Homework Help",
            AdditionalService::Meals => "Meal Preparation",
            AdditionalService::Transport => "Transportation",
            AdditionalService::Housework => "Light Housework",
        }
    }

    /// Hourly price shown next to the checkbox. The quote charges
    /// [`SERVICE_FEE_PER_HOUR`] for every service instead.
    pub fn listed_price(self) -> f64 {
        match self {
            AdditionalService::Homework => 5.0,
            AdditionalService::Meals => 3.0,
            AdditionalService::Transport => 8.0,
            AdditionalService::Housework => 2.0,
        }
    }
}

/// Everything the parent fills in across the three steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_hours: u32,
    pub children: u32,
    pub children_ages: String,
    pub special_requirements: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub emergency_contact: String,
    pub emergency_phone: String,
    pub additional_services: Vec<AdditionalService>,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            date: String::new(),
            start_time: String::new(),
            end_time: String::new(),
            duration_hours: 4,
            children: 1,
            children_ages: String::new(),
            special_requirements: String::new(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            emergency_contact: String::new(),
            emergency_phone: String::new(),
            additional_services: Vec::new(),
        }
    }
}

/// Price breakdown in dollars
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub base: f64,
    pub services: f64,
    pub platform_fee: f64,
    pub total: f64,
}

impl PriceQuote {
    pub fn calculate(hourly_rate: f64, hours: u32, service_count: usize) -> Self {
        let hours = hours as f64;
        let base = hourly_rate * hours;
        let services = service_count as f64 * SERVICE_FEE_PER_HOUR * hours;
        let platform_fee = (base + services) * PLATFORM_FEE_RATE;
        Self {
            base,
            services,
            platform_fee,
            total: base + services + platform_fee,
        }
    }
}

/// What a submitted booking looked like
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub listing_id: String,
    pub sitter_name: String,
    pub booking_type: BookingType,
    pub form: BookingForm,
    pub quote: PriceQuote,
}

/// Result of pressing one of the two footer buttons
#[derive(Debug, Clone, PartialEq)]
pub enum FlowOutcome {
    /// Now showing this step
    Step(BookingStep),
    /// The dialog was dismissed
    Closed,
    /// The booking went through
    Submitted(BookingSummary),
}

/// State of an open booking dialog for one sitter
#[derive(Debug, Clone)]
pub struct BookingFlow {
    listing: Listing,
    pub booking_type: BookingType,
    pub form: BookingForm,
    step: BookingStep,
}

impl BookingFlow {
    pub fn new(listing: &Listing) -> Self {
        Self::with_form(listing, BookingForm::default())
    }

    /// Starts with fields carried over from a search, e.g. date and children
    pub fn with_form(listing: &Listing, form: BookingForm) -> Self {
        Self {
            listing: listing.clone(),
            booking_type: BookingType::default(),
            form,
            step: BookingStep::default(),
        }
    }

    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn step(&self) -> BookingStep {
        self.step
    }

    /// "Details - Sarah M."
    pub fn title(&self) -> String {
        format!("{} - {}", self.step.title(), self.listing.display_name())
    }

    /// "Step 2 of 3"
    pub fn progress_label(&self) -> String {
        format!("Step {} of 3", self.step.number())
    }

    /// Adds or removes `service`; returns whether it is now selected
    pub fn toggle_service(&mut self, service: AdditionalService) -> bool {
        let services = &mut self.form.additional_services;
        if let Some(pos) = services.iter().position(|s| *s == service) {
            services.remove(pos);
            false
        } else {
            services.push(service);
            true
        }
    }

    pub fn quote(&self) -> PriceQuote {
        PriceQuote::calculate(
            self.listing.hourly_rate,
            self.form.duration_hours,
            self.form.additional_services.len(),
        )
    }

    pub fn back_label(&self) -> &'static str {
        match self.step {
            BookingStep::Schedule => "Cancel",
            _ => "Back",
        }
    }

    pub fn forward_label(&self) -> &'static str {
        match (self.step, self.booking_type) {
            (BookingStep::Payment, BookingType::Instant) => "Book Now",
            (BookingStep::Payment, BookingType::Request) => "Send Request",
            _ => "Continue",
        }
    }

    pub fn back(&mut self) -> FlowOutcome {
        match self.step.previous() {
            Some(step) => {
                self.step = step;
                FlowOutcome::Step(step)
            }
            None => FlowOutcome::Closed,
        }
    }

    /// Moves to the next step, or submits from the payment step
    pub fn advance(&mut self) -> Result<FlowOutcome> {
        match self.step.next() {
            Some(step) => {
                self.step = step;
                Ok(FlowOutcome::Step(step))
            }
            None => self.submit().map(FlowOutcome::Submitted),
        }
    }

    /// Logs the booking. Only valid on the payment step.
    pub fn submit(&self) -> Result<BookingSummary> {
        if self.step != BookingStep::Payment {
            return Err(MapError::Booking(format!(
                "cannot submit from the {} step",
                self.step.title()
            )));
        }
        if self.form.duration_hours == 0 {
            return Err(MapError::Booking("duration must be at least one hour".to_string()));
        }

        let summary = BookingSummary {
            listing_id: self.listing.id.clone(),
            sitter_name: self.listing.display_name(),
            booking_type: self.booking_type,
            form: self.form.clone(),
            quote: self.quote(),
        };
        log::info!(
            "booking submitted: {:?} with {} for {}h, total ${:.2}",
            summary.booking_type,
            summary.sitter_name,
            summary.form.duration_hours,
            summary.quote.total
        );
        Ok(summary)
    }
}
