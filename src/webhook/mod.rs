//! Identity-provider webhook
//!
//! Account events arrive as signed JSON envelopes. After the signature
//! checks out, `user.created`, `user.updated` and `user.deleted` are mirrored
//! into the `users` table. Responses follow the provider's retry contract:
//! 400 for anything malformed or unsigned, 500 when the store fails, 200
//! otherwise.

pub mod signature;
pub mod store;

pub use signature::WebhookVerifier;
pub use store::{InMemoryUserStore, RestUserStore, UserRecord, UserStore, UserType, UserUpdate};

use crate::prelude::HashMap;
use serde::Deserialize;

pub const HEADER_ID: &str = "svix-id";
pub const HEADER_TIMESTAMP: &str = "svix-timestamp";
pub const HEADER_SIGNATURE: &str = "svix-signature";
/// Environment variable holding the signing secret
pub const SECRET_ENV: &str = "CLERK_WEBHOOK_SECRET";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WebhookError {
    #[error("missing signature headers")]
    MissingHeaders,

    #[error("webhook secret is not valid base64")]
    InvalidSecret,

    #[error("timestamp header is not a unix time")]
    InvalidTimestamp,

    #[error("timestamp is outside the allowed tolerance")]
    TimestampOutOfTolerance,

    #[error("no matching signature found")]
    NoMatchingSignature,

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// An incoming POST: headers (matched case-insensitively) and raw body
#[derive(Debug, Clone, Default)]
pub struct WebhookRequest {
    headers: HashMap<String, String>,
    pub body: String,
}

impl WebhookRequest {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            headers: HashMap::default(),
            body: body.into(),
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    pub body: String,
}

impl WebhookResponse {
    fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Deserialize)]
struct EmailAddress {
    email_address: String,
}

#[derive(Debug, Deserialize)]
struct UserData {
    id: String,
    #[serde(default)]
    email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

impl UserData {
    fn email(&self) -> Option<String> {
        self.email_addresses.first().map(|e| e.email_address.clone())
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    event_type: String,
    data: UserData,
}

/// Verifies and applies identity events
pub struct WebhookHandler<S> {
    verifier: WebhookVerifier,
    store: S,
}

impl<S: UserStore> WebhookHandler<S> {
    pub fn new(verifier: WebhookVerifier, store: S) -> Self {
        Self { verifier, store }
    }

    /// Builds a handler with the secret from `$CLERK_WEBHOOK_SECRET`
    pub fn from_env(store: S) -> crate::Result<Self> {
        let secret = std::env::var(SECRET_ENV)
            .map_err(|_| crate::MapError::Config(format!("{} is not set", SECRET_ENV)))?;
        Ok(Self::new(WebhookVerifier::new(&secret)?, store))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn handle(&self, request: &WebhookRequest) -> WebhookResponse {
        self.handle_at(request, None).await
    }

    /// `now` overrides the clock for the timestamp check
    pub async fn handle_at(&self, request: &WebhookRequest, now: Option<i64>) -> WebhookResponse {
        let (Some(id), Some(timestamp), Some(signature)) = (
            request.header(HEADER_ID),
            request.header(HEADER_TIMESTAMP),
            request.header(HEADER_SIGNATURE),
        ) else {
            log::warn!("webhook rejected: {}", WebhookError::MissingHeaders);
            return WebhookResponse::new(400, "Error occurred -- no svix headers");
        };

        let verified = match now {
            Some(now) => self
                .verifier
                .verify_at(id, timestamp, signature, &request.body, now),
            None => self.verifier.verify(id, timestamp, signature, &request.body),
        };
        if let Err(e) = verified {
            log::error!("Error verifying webhook: {}", e);
            return WebhookResponse::new(400, "Error occurred");
        }

        let envelope: Envelope = match serde_json::from_str(&request.body) {
            Ok(envelope) => envelope,
            Err(e) => {
                log::error!(
                    "Error verifying webhook: {}",
                    WebhookError::InvalidPayload(e.to_string())
                );
                return WebhookResponse::new(400, "Error occurred");
            }
        };

        self.apply(envelope).await
    }

    async fn apply(&self, envelope: Envelope) -> WebhookResponse {
        let user = envelope.data;
        let result = match envelope.event_type.as_str() {
            "user.created" => {
                let record = UserRecord {
                    email: user.email(),
                    clerk_user_id: user.id,
                    first_name: user.first_name.unwrap_or_default(),
                    last_name: user.last_name.unwrap_or_default(),
                    user_type: UserType::Parent,
                };
                self.store
                    .insert(record)
                    .await
                    .map_err(|e| ("Error creating user", e))
            }
            "user.updated" => {
                let update = UserUpdate {
                    email: user.email(),
                    first_name: user.first_name.unwrap_or_default(),
                    last_name: user.last_name.unwrap_or_default(),
                };
                self.store
                    .update(&user.id, update)
                    .await
                    .map_err(|e| ("Error updating user", e))
            }
            "user.deleted" => self
                .store
                .delete(&user.id)
                .await
                .map_err(|e| ("Error deleting user", e)),
            other => {
                log::debug!("ignoring webhook event {}", other);
                Ok(())
            }
        };

        match result {
            Ok(()) => {
                log::info!("webhook {} applied", envelope.event_type);
                WebhookResponse::new(200, "Success")
            }
            Err((message, e)) => {
                log::error!("{}: {}", message, e);
                WebhookResponse::new(500, message)
            }
        }
    }
}
