//! HTTP request builder and response parser for the sweets API.
//!
//! # Design
//! `SweetsClient` holds a `base_url` and the current bearer `Credential`.
//! Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The host executes the actual HTTP round trip, keeping the core
//! deterministic and free of I/O dependencies.

use serde::de::DeserializeOwned;

use crate::auth::Credential;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{AccessToken, LoginRequest, Sweet};

/// Client for the sweets API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct SweetsClient {
    base_url: String,
    credential: Credential,
}

impl SweetsClient {
    pub fn new(base_url: &str, credential: Credential) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            credential,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Replace the credential used by every subsequent `build_*` call.
    /// Requests that were already built keep the old header.
    pub fn rotate_credential(&mut self, credential: Credential) {
        tracing::debug!(expires_at = ?credential.expires_at(), "rotating bearer credential");
        self.credential = credential;
    }

    pub fn build_list_sweets(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/sweets", self.base_url),
            headers: vec![self.credential.authorization_header()],
            body: None,
        }
    }

    pub fn build_purchase_sweet(&self, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/sweets/{id}/purchase", self.base_url),
            headers: vec![self.credential.authorization_header()],
            body: None,
        }
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/auth/login", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn parse_list_sweets(&self, response: HttpResponse) -> Result<Vec<Sweet>, ApiError> {
        if !response.is_success() {
            return Err(ApiError::ListFetch {
                status: Some(response.status),
            });
        }
        decode(&response)
    }

    /// The server echoes the updated sweet; callers only need the success
    /// signal, but the body is still decoded strictly.
    pub fn parse_purchase_sweet(&self, response: HttpResponse) -> Result<Sweet, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Purchase {
                status: Some(response.status),
            });
        }
        decode(&response)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<AccessToken, ApiError> {
        if !response.is_success() {
            return Err(ApiError::Login {
                status: Some(response.status),
            });
        }
        decode(&response)
    }
}

fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
}
