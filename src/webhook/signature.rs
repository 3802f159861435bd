//! Svix-style webhook signatures
//!
//! The sender signs `"{id}.{timestamp}.{body}"` with HMAC-SHA256 under a
//! shared secret and sends the base64 digest as one or more space-separated
//! `v1,<digest>` entries. A message is accepted when any entry matches and
//! the timestamp is within five minutes of now.

use super::WebhookError;
use base64::{engine::general_purpose, Engine as _};
use hmac::{digest::KeyInit, Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";
/// Allowed clock skew either way, in seconds
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 5 * 60;

#[derive(Clone)]
pub struct WebhookVerifier {
    mac: HmacSha256,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier").finish_non_exhaustive()
    }
}

impl WebhookVerifier {
    /// `secret` is base64, optionally prefixed with `whsec_`
    pub fn new(secret: &str) -> Result<Self, WebhookError> {
        let encoded = secret.strip_prefix(SECRET_PREFIX).unwrap_or(secret);
        let key = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|_| WebhookError::InvalidSecret)?;
        if key.is_empty() {
            return Err(WebhookError::InvalidSecret);
        }
        let mac = <HmacSha256 as KeyInit>::new_from_slice(&key)
            .map_err(|_| WebhookError::InvalidSecret)?;
        Ok(Self { mac })
    }

    fn mac(&self, id: &str, timestamp: &str, body: &str) -> HmacSha256 {
        let mut mac = self.mac.clone();
        mac.update(id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(body.as_bytes());
        mac
    }

    /// Signature header value for a message, as the sender would produce it
    pub fn sign(&self, id: &str, timestamp: i64, body: &str) -> String {
        let digest = self
            .mac(id, &timestamp.to_string(), body)
            .finalize()
            .into_bytes();
        format!(
            "{},{}",
            SIGNATURE_VERSION,
            general_purpose::STANDARD.encode(digest)
        )
    }

    /// Checks a message against the current clock
    pub fn verify(
        &self,
        id: &str,
        timestamp: &str,
        signature_header: &str,
        body: &str,
    ) -> Result<(), WebhookError> {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or_default();
        self.verify_at(id, timestamp, signature_header, body, now)
    }

    /// Checks a message as if the current time were `now` (unix seconds)
    pub fn verify_at(
        &self,
        id: &str,
        timestamp: &str,
        signature_header: &str,
        body: &str,
        now: i64,
    ) -> Result<(), WebhookError> {
        let sent: i64 = timestamp
            .trim()
            .parse()
            .map_err(|_| WebhookError::InvalidTimestamp)?;
        if (now - sent).abs() > TIMESTAMP_TOLERANCE_SECS {
            return Err(WebhookError::TimestampOutOfTolerance);
        }

        let matched = signature_header
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .filter_map(|(_, sig)| general_purpose::STANDARD.decode(sig).ok())
            .any(|sig| self.mac(id, timestamp.trim(), body).verify_slice(&sig).is_ok());

        if matched {
            Ok(())
        } else {
            Err(WebhookError::NoMatchingSignature)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw";
    const NOW: i64 = 1_700_000_000;
    const BODY: &str = r#"{"type":"user.created","data":{"id":"user_1"}}"#;

    #[test]
    fn test_signed_message_verifies() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let header = verifier.sign("msg_1", NOW, BODY);
        assert!(header.starts_with("v1,"));
        assert!(verifier
            .verify_at("msg_1", &NOW.to_string(), &header, BODY, NOW + 10)
            .is_ok());
    }

    #[test]
    fn test_any_matching_entry_is_enough() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let good = verifier.sign("msg_1", NOW, BODY);
        let header = format!("v1,bm90IGl0 v2,whatever {}", good);
        assert!(verifier
            .verify_at("msg_1", &NOW.to_string(), &header, BODY, NOW)
            .is_ok());
    }

    #[test]
    fn test_tampered_body_rejected() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let header = verifier.sign("msg_1", NOW, BODY);
        let err = verifier
            .verify_at("msg_1", &NOW.to_string(), &header, "{}", NOW)
            .unwrap_err();
        assert_eq!(err, WebhookError::NoMatchingSignature);
    }

    #[test]
    fn test_stale_timestamp_rejected() {
        let verifier = WebhookVerifier::new(SECRET).unwrap();
        let header = verifier.sign("msg_1", NOW, BODY);
        let err = verifier
            .verify_at("msg_1", &NOW.to_string(), &header, BODY, NOW + 301)
            .unwrap_err();
        assert_eq!(err, WebhookError::TimestampOutOfTolerance);
        assert_eq!(
            verifier.verify_at("msg_1", "soon", &header, BODY, NOW),
            Err(WebhookError::InvalidTimestamp)
        );
    }

    #[test]
    fn test_prefix_is_optional_and_secret_must_decode() {
        let bare = WebhookVerifier::new(&SECRET[SECRET_PREFIX.len()..]).unwrap();
        let prefixed = WebhookVerifier::new(SECRET).unwrap();
        assert_eq!(bare.sign("a", NOW, BODY), prefixed.sign("a", NOW, BODY));
        assert_eq!(WebhookVerifier::new("whsec_!!!").unwrap_err(), WebhookError::InvalidSecret);
    }
}
