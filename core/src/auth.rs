//! Bearer credential attached to every sweets request.
//!
//! The token is injected by the host (configuration or a login round trip)
//! and can be rotated at any time. If the token is a JWT, its `exp` claim is
//! read so the host can refresh before the server starts rejecting it; the
//! signature is not checked here.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct Credential {
    token: SecretString,
    expires_at: Option<SystemTime>,
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<u64>,
}

impl Credential {
    /// Wrap a bearer token. The expiry comes from the JWT `exp` claim when
    /// the token has one.
    pub fn bearer(token: impl Into<String>) -> Self {
        let token: String = token.into();
        let expires_at = jwt_expiry(&token);
        Self {
            token: SecretString::from(token),
            expires_at,
        }
    }

    /// Override the expiry, e.g. when the issuer reports it out of band.
    pub fn with_expiry(mut self, expires_at: Option<SystemTime>) -> Self {
        self.expires_at = expires_at;
        self
    }

    pub fn expires_at(&self) -> Option<SystemTime> {
        self.expires_at
    }

    /// Tokens without a known expiry never count as expired.
    pub fn is_expired_at(&self, now: SystemTime) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    pub(crate) fn authorization_header(&self) -> (String, String) {
        (
            "authorization".to_string(),
            format!("Bearer {}", self.token.expose_secret()),
        )
    }
}

fn jwt_expiry(token: &str) -> Option<SystemTime> {
    let mut parts = token.split('.');
    let (_header, payload, _sig) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let raw = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Claims = serde_json::from_slice(&raw).ok()?;
    // an exp past what SystemTime can hold counts as no known expiry
    UNIX_EPOCH.checked_add(Duration::from_secs(claims.exp?))
}
